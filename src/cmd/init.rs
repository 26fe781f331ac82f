use anyhow::Result;
use serde_json::json;
use std::io::{self, Write};

use medtrack::core::profile::{DEFAULT_PROFILE, ensure_profile};
use medtrack::db::Database;
use medtrack::models::config::Config;
use medtrack::output;

pub fn run(skip: bool, human: bool) -> Result<()> {
    let mut config = Config::load().unwrap_or_default();

    if !skip {
        println!("medtrack: initial setup\n");

        let name = prompt_string(&format!("Profile name [{}]", DEFAULT_PROFILE))?;
        if !name.is_empty() && name != DEFAULT_PROFILE {
            config.profile.default = Some(name);
        }
        let grace = prompt_string(&format!(
            "Minutes before an unrecorded dose counts as missed [{}]",
            config.adherence.grace_minutes
        ))?;
        if !grace.is_empty() {
            config.set("grace_minutes", &grace)?;
        }
    }

    config.save()?;
    let db = Database::open(&Config::db_path())?;
    let profile_name = config
        .profile
        .default
        .clone()
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string());
    let profile = ensure_profile(&db, &profile_name)?;

    if human || !skip {
        println!(
            "Config initialized at {:?} (profile: {})",
            Config::path(),
            profile.name
        );
    } else {
        let out = output::success(
            "init",
            json!({
                "config": Config::path(),
                "database": Config::db_path(),
                "profile": profile.name,
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

fn prompt_string(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}

use anyhow::Result;
use serde_json::json;

use medtrack::core::profile;
use medtrack::db::Database;
use medtrack::models::config::Config;
use medtrack::output;

pub fn run_add(name: &str, relation: Option<&str>, human: bool) -> Result<()> {
    let db = Database::open(&Config::db_path())?;
    let p = profile::add_profile(&db, name, relation)?;

    if human {
        println!("Added profile {}", p.name);
    } else {
        let out = output::success("profile_add", json!({ "profile": p }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_list(human: bool) -> Result<()> {
    let db = Database::open(&Config::db_path())?;
    let profiles = profile::list_profiles(&db)?;

    if human {
        println!("{}", output::human::format_profiles(&profiles));
    } else {
        let count = profiles.len();
        let out = output::success(
            "profile_list",
            json!({ "profiles": profiles, "count": count }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

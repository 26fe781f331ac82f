use anyhow::{Result, bail};

use crate::db::Database;
use crate::models::Profile;
use crate::models::config::Config;

/// Profile used when neither `--profile` nor the config names one.
pub const DEFAULT_PROFILE: &str = "self";

pub fn add_profile(db: &Database, name: &str, relation: Option<&str>) -> Result<Profile> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Profile name cannot be empty.");
    }
    if db.get_profile_by_name(name)?.is_some() {
        bail!("Profile '{}' already exists.", name);
    }
    let mut profile = Profile::new(name);
    profile.relation = relation.map(String::from);
    db.insert_profile(&profile)?;
    Ok(profile)
}

/// Fetch a profile by name, creating it if absent.
pub fn ensure_profile(db: &Database, name: &str) -> Result<Profile> {
    match db.get_profile_by_name(name)? {
        Some(p) => Ok(p),
        None => {
            let mut profile = Profile::new(name);
            if name == DEFAULT_PROFILE {
                profile.relation = Some(DEFAULT_PROFILE.to_string());
            }
            db.insert_profile(&profile)?;
            Ok(profile)
        }
    }
}

pub fn list_profiles(db: &Database) -> Result<Vec<Profile>> {
    db.list_profiles()
}

/// Resolve the profile a command acts on: explicit name, then the configured
/// default, then `self`. Only the `self` profile is created implicitly.
pub fn resolve_profile(db: &Database, config: &Config, name: Option<&str>) -> Result<Profile> {
    let wanted = name
        .map(String::from)
        .or_else(|| config.profile.default.clone())
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

    if wanted == DEFAULT_PROFILE {
        return ensure_profile(db, DEFAULT_PROFILE);
    }
    match db.get_profile_by_name(&wanted)? {
        Some(p) => Ok(p),
        None => bail!("Profile '{}' not found. Use `profile add` first.", wanted),
    }
}

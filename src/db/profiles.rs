use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::models::Profile;

use super::Database;

fn row_to_profile(
    id: String,
    name: String,
    relation: Option<String>,
    created_at: String,
) -> Result<Profile> {
    Ok(Profile {
        id,
        name,
        relation,
        created_at: DateTime::parse_from_rfc3339(&created_at)?.with_timezone(&Utc),
    })
}

impl Database {
    pub fn insert_profile(&self, p: &Profile) -> Result<()> {
        self.conn.execute(
            "INSERT INTO profiles (id, name, relation, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![p.id, p.name, p.relation, p.created_at.to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn get_profile_by_name(&self, name: &str) -> Result<Option<Profile>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, relation, created_at FROM profiles WHERE name = ?1")?;
        let mut rows = stmt.query_map(params![name], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;
        match rows.next() {
            Some(row) => {
                let (id, name, relation, created_at) = row?;
                Ok(Some(row_to_profile(id, name, relation, created_at)?))
            }
            None => Ok(None),
        }
    }

    pub fn list_profiles(&self) -> Result<Vec<Profile>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, relation, created_at FROM profiles \
             ORDER BY created_at ASC, name ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut profiles = Vec::new();
        for row in rows {
            let (id, name, relation, created_at) = row?;
            profiles.push(row_to_profile(id, name, relation, created_at)?);
        }
        Ok(profiles)
    }
}

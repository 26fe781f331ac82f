mod events;
mod meds;
mod migrate;
mod profiles;

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;

use crate::models::{DoseEvent, Medication};

pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        #[cfg(unix)]
        {
            use std::fs::{self, OpenOptions};
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            if !path.exists() {
                OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(false)
                    .mode(0o600)
                    .open(path)?;
            } else {
                let mut perms = fs::metadata(path)?.permissions();
                if perms.mode() & 0o777 != 0o600 {
                    perms.set_mode(0o600);
                    fs::set_permissions(path, perms)?;
                }
            }
        }

        let conn = Connection::open(path)?;
        let db = Self { conn };
        migrate::run(&db.conn)?;
        Ok(db)
    }
}

/// Read side of persistence as seen by the analytics and reminder code.
pub trait DoseRepository {
    /// Every recorded dose event, across all profiles.
    fn dose_events(&self) -> Result<Vec<DoseEvent>>;
    fn active_medications(&self) -> Result<Vec<Medication>>;
}

impl DoseRepository for Database {
    fn dose_events(&self) -> Result<Vec<DoseEvent>> {
        self.list_dose_events(None)
    }

    fn active_medications(&self) -> Result<Vec<Medication>> {
        self.list_medications(None, false)
    }
}

impl<T: DoseRepository + ?Sized> DoseRepository for &T {
    fn dose_events(&self) -> Result<Vec<DoseEvent>> {
        (**self).dose_events()
    }

    fn active_medications(&self) -> Result<Vec<Medication>> {
        (**self).active_medications()
    }
}

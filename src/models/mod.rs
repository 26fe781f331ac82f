pub mod config;
pub mod event;
pub mod med;
pub mod profile;
pub mod stats;

pub use event::{DoseEvent, DoseEventRecord, DoseStatus};
pub use med::{DoseSlot, Medication};
pub use profile::Profile;
pub use stats::{AdherenceStats, CalendarDay, MedicationMissStat, MissTime};

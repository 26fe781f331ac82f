pub mod analyzer;
pub mod export;
pub mod med;
pub mod profile;
pub mod record;
pub mod reminder;
pub mod streak;
pub mod sweep;

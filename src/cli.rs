use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "medtrack", version, about = "Medication adherence tracker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as human-readable text instead of JSON
    #[arg(long = "human", short = 'H', global = true)]
    pub human: bool,

    /// Override date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub date: Option<NaiveDate>,

    /// Profile to act on (default: config `profile`, else "self")
    #[arg(long, short = 'p', global = true)]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize config, database and the default profile
    Init {
        /// Skip interactive setup, use defaults
        #[arg(long)]
        skip: bool,
    },

    /// Manage tracked people
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Manage medications and record doses
    Med {
        #[command(subcommand)]
        action: MedAction,
    },

    /// Adherence rate and streaks
    Stats {
        /// Trailing window in days (default: config `window_days`)
        #[arg(long)]
        window: Option<u32>,
    },

    /// Per-day adherence calendar
    Calendar {
        /// First day (default: 29 days before --to)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day (default: today)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Most frequently missed medications
    Missed,

    /// Record missed doses whose grace period has passed
    Sweep,

    /// Watch for due doses
    Remind {
        /// Check once and exit
        #[arg(long)]
        once: bool,

        /// Minutes before the scheduled time a dose becomes due
        #[arg(long)]
        lead: Option<i64>,

        /// Seconds between checks
        #[arg(long, default_value_t = 60)]
        interval: u64,
    },

    /// Export adherence data
    Export {
        /// What to export: calendar, stats, events
        #[arg(long, default_value = "calendar")]
        what: String,

        /// Output format: csv or json
        #[arg(long, default_value = "csv")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long)]
        output: Option<String>,

        /// Calendar start date
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Calendar end date
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Import dose events from a JSON file
    Import {
        /// Path to a JSON array of dose events
        file: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Add a profile
    Add {
        name: String,

        /// Relation to the user (e.g. mother, child)
        #[arg(long)]
        relation: Option<String>,
    },
    /// List profiles
    List,
}

#[derive(Subcommand)]
pub enum MedAction {
    /// Add a medication with its dose times
    Add {
        name: String,

        /// Dose time, HH:MM or HH:MM@mon,wed,fri (repeatable)
        #[arg(long = "at", required = true)]
        at: Vec<String>,

        /// Dosage (e.g. "500mg", "2 tablets")
        #[arg(long)]
        dosage: Option<String>,

        /// Free-text instructions
        #[arg(long)]
        instructions: Option<String>,
    },
    /// List medications
    List {
        /// Include stopped medications
        #[arg(long)]
        all: bool,
    },
    /// Stop a medication (history is kept)
    Stop { name: String },
    /// Record a dose as taken
    Take {
        name: String,

        /// Dose time HH:MM (default: nearest unrecorded)
        #[arg(long)]
        slot: Option<String>,
    },
    /// Record a dose as skipped
    Skip {
        name: String,

        /// Dose time HH:MM (default: nearest unrecorded)
        #[arg(long)]
        slot: Option<String>,

        /// Why it was skipped
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set a config value
    Set {
        /// Config key (e.g. window_days, grace_minutes, profile, alias.bp)
        key: String,
        /// Config value
        value: String,
    },
}

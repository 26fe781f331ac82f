mod cli;
mod cmd;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, ConfigAction, MedAction, ProfileAction};
use std::process;

use medtrack::models::DoseStatus;
use medtrack::models::config::Config;
use medtrack::{logging, output};

fn main() {
    let cli = Cli::parse();

    let logging_config = Config::load().map(|c| c.logging).unwrap_or_default();
    logging::init(&logging_config);

    let profile = cli.profile.as_deref();
    let human = cli.human;

    let result = match cli.command {
        Commands::Init { skip } => cmd::init::run(skip, human),
        Commands::Profile { action } => match action {
            ProfileAction::Add { name, relation } => {
                cmd::profile::run_add(&name, relation.as_deref(), human)
            }
            ProfileAction::List => cmd::profile::run_list(human),
        },
        Commands::Med { action } => match action {
            MedAction::Add {
                name,
                at,
                dosage,
                instructions,
            } => cmd::med::run_add(
                profile,
                &name,
                &at,
                dosage.as_deref(),
                instructions.as_deref(),
                human,
            ),
            MedAction::List { all } => cmd::med::run_list(profile, all, human),
            MedAction::Stop { name } => cmd::med::run_stop(profile, &name, cli.date, human),
            MedAction::Take { name, slot } => cmd::med::run_record(
                profile,
                &name,
                DoseStatus::Taken,
                slot.as_deref(),
                None,
                cli.date,
                human,
            ),
            MedAction::Skip { name, slot, reason } => cmd::med::run_record(
                profile,
                &name,
                DoseStatus::Skipped,
                slot.as_deref(),
                reason.as_deref(),
                cli.date,
                human,
            ),
        },
        Commands::Stats { window } => cmd::stats::run_stats(profile, window, cli.date, human),
        Commands::Calendar { from, to } => {
            cmd::stats::run_calendar(profile, from, to, cli.date, human)
        }
        Commands::Missed => cmd::stats::run_missed(profile, cli.date, human),
        Commands::Sweep => cmd::sweep::run_sweep(cli.date, human),
        Commands::Remind {
            once,
            lead,
            interval,
        } => cmd::sweep::run_remind(once, lead, interval, human),
        Commands::Export {
            what,
            format,
            output,
            from,
            to,
        } => cmd::export::run_export(
            cmd::export::ExportParams {
                profile,
                what: &what,
                format: &format,
                output_path: output.as_deref(),
                from,
                to,
                date: cli.date,
            },
            human,
        ),
        Commands::Import { file } => cmd::export::run_import(&file, human),
        Commands::Config { action } => match action {
            ConfigAction::Show => cmd::config::run_show(human),
            ConfigAction::Set { key, value } => cmd::config::run_set(&key, &value, human),
        },
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "medtrack", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        let err = output::error("", output::error_code(&e), &e.to_string());
        match serde_json::to_string(&err) {
            Ok(s) => eprintln!("{}", s),
            Err(_) => eprintln!("error: {}", e),
        }
        process::exit(1);
    }
}

use chrono::{Local, NaiveDate};
use log::{error, info};
use reminder_tool::config::DEFAULT_CONFIG_FILE;
use reminder_tool::{Config, SmtpMailer, due_reminders, load_records};
use reminder_tool::{invite, notifier};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "\
Usage: remind [command] [options]

Commands:
  (none)            run one batch pass: load, evaluate, send
  init [path]       write the default config template
  invites <dir>     write one .ics calendar invite per record

Options:
  --config <path>   config file (default: email_config.json)
  --date <date>     evaluate as if today were <date> (YYYY-MM-DD)
  --dry-run         log due reminders without sending anything
  -h, --help        show this help";

enum Command {
    Run,
    Init { path: PathBuf },
    Invites { dir: PathBuf },
    Help,
}

struct Args {
    command: Command,
    config: PathBuf,
    date: Option<NaiveDate>,
    dry_run: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut argv = env::args().skip(1);
    let mut config = PathBuf::from(DEFAULT_CONFIG_FILE);
    let mut date = None;
    let mut dry_run = false;
    let mut positional = Vec::new();

    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--config" => {
                let value = argv.next().ok_or("--config requires a path")?;
                config = PathBuf::from(value);
            }
            "--date" => {
                let value = argv.next().ok_or("--date requires a date")?;
                let parsed = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                    .map_err(|_| format!("invalid --date '{value}' (expected YYYY-MM-DD)"))?;
                date = Some(parsed);
            }
            "--dry-run" => dry_run = true,
            "-h" | "--help" => {
                return Ok(Args {
                    command: Command::Help,
                    config,
                    date,
                    dry_run,
                });
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown option '{other}'"));
            }
            other => positional.push(other.to_string()),
        }
    }

    let command = match positional.first().map(String::as_str) {
        None => Command::Run,
        Some("init") => Command::Init {
            path: positional
                .get(1)
                .map(PathBuf::from)
                .unwrap_or_else(|| config.clone()),
        },
        Some("invites") => {
            let dir = positional
                .get(1)
                .map(PathBuf::from)
                .ok_or("invites requires an output directory")?;
            Command::Invites { dir }
        }
        Some(other) => return Err(format!("unknown command '{other}'")),
    };

    Ok(Args {
        command,
        config,
        date,
        dry_run,
    })
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
        Command::Init { path } => {
            Config::write_template(&path)?;
            info!("wrote config template to {}", path.display());
            Ok(())
        }
        Command::Invites { dir } => {
            let config = Config::load(&args.config)?;
            let records = load_records(&config)?;
            invite::write_invites(&records, config.invite_location.as_deref(), &dir)?;
            Ok(())
        }
        Command::Run => {
            let config = Config::load(&args.config)?;
            let records = load_records(&config)?;
            let today = args.date.unwrap_or_else(|| Local::now().date_naive());
            let matches = due_reminders(&records, &config.reminder_days, today);
            info!("{} reminder(s) due on {today}", matches.len());

            if args.dry_run {
                for m in &matches {
                    let (subject, _) = notifier::compose(m);
                    info!("due (dry run): '{}' at offset {}", subject, m.offset);
                }
                return Ok(());
            }
            if matches.is_empty() {
                return Ok(());
            }

            let mailer = SmtpMailer::from_config(&config)?;
            let summary = notifier::send_reminders(&mailer, &config, &matches);
            info!("daily run complete: {summary}");
            // Individual send failures are already logged; the run still
            // counts as completed.
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

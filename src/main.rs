use aid_intake::config::AppConfig;
use aid_intake::error::AppError;
use aid_intake::telemetry;
use aid_intake::workflows::casework::{CaseTexts, ProcessSearchQuery, ProcessUpdate};
use aid_intake::workflows::intake::{flatten_submission, BusinessFact, FactAssembler};
use aid_intake::workflows::routing::{CaseRouting, RoutingSheets, RuleTable};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "Aid intake worker",
    about = "Extract intake facts from workflow submissions and resolve their case routing",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the flattened elements of a submission
    Flatten(SubmissionArgs),
    /// Print the intake facts of a submission
    Extract(SubmissionArgs),
    /// Extract intake facts and resolve organization and case area
    Route(RouteArgs),
    /// Print the update written back to a handled process
    ProcessUpdate(ProcessUpdateArgs),
    /// Print the daily process search query
    SearchQuery(DayArgs),
}

#[derive(Args, Debug)]
struct SubmissionArgs {
    /// Submission JSON exported from the workflow engine
    #[arg(long)]
    submission: PathBuf,
}

#[derive(Args, Debug)]
struct RouteArgs {
    /// Submission JSON exported from the workflow engine
    #[arg(long)]
    submission: PathBuf,
    /// Rule table workbook or CSV directory (overrides INTAKE_RULES_PATH)
    #[arg(long)]
    rules: Option<PathBuf>,
    /// Date stamped on case texts (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct ProcessUpdateArgs {
    /// Whether the case records were created successfully
    #[arg(long, action = clap::ArgAction::Set)]
    succeeded: bool,
    /// Processing date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct DayArgs {
    /// Search date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum RouteOutcome {
    Routed {
        fact: BusinessFact,
        routing: CaseRouting,
        texts: CaseTexts,
    },
    ManualHandling {
        fact: BusinessFact,
        reason: String,
    },
    Skipped,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let assembler = FactAssembler::new(config.intake.clone(), config.layout.clone());

    match cli.command {
        Command::Flatten(args) => {
            let submission = read_submission(&args.submission)?;
            let flattened = flatten_submission(&submission, &config.layout.elements_key);
            match flattened {
                Ok(entries) => print_json(&entries),
                Err(error) => {
                    warn!(%error, "submission could not be flattened");
                    print_json(&serde_json::json!({ "error": error.to_string() }))
                }
            }
        }
        Command::Extract(args) => {
            let submission = read_submission(&args.submission)?;
            match assembler.assemble(&submission) {
                Some(fact) => print_json(&fact),
                None => print_json(&RouteOutcome::Skipped),
            }
        }
        Command::Route(args) => {
            let rules_path = match args.rules {
                Some(path) => path,
                None => config.routing.rules_path()?.to_path_buf(),
            };
            let table = RuleTable::from_path(&rules_path)?;
            let submission = read_submission(&args.submission)?;
            let today = args.today.unwrap_or_else(|| Local::now().date_naive());

            let outcome =
                route_submission(&submission, &assembler, &table, &config.routing.sheets, today);
            print_json(&outcome)
        }
        Command::ProcessUpdate(args) => {
            let today = args.today.unwrap_or_else(|| Local::now().date_naive());
            print_json(&ProcessUpdate::completion(args.succeeded, today))
        }
        Command::SearchQuery(args) => {
            let today = args.today.unwrap_or_else(|| Local::now().date_naive());
            print_json(&ProcessSearchQuery::for_day(today))
        }
    }
}

fn route_submission(
    submission: &Value,
    assembler: &FactAssembler,
    table: &RuleTable,
    sheets: &RoutingSheets,
    today: NaiveDate,
) -> RouteOutcome {
    let Some(fact) = assembler.assemble(submission) else {
        return RouteOutcome::Skipped;
    };

    match CaseRouting::resolve(&fact, table, sheets) {
        Ok(routing) => {
            info!(
                process_id = %fact.process_id,
                organization = %routing.organization,
                case_area = %routing.case_area,
                "submission routed"
            );
            let texts = CaseTexts::new(&fact, today);
            RouteOutcome::Routed {
                fact,
                routing,
                texts,
            }
        }
        Err(error) => {
            warn!(process_id = %fact.process_id, %error, "submission needs manual handling");
            RouteOutcome::ManualHandling {
                fact,
                reason: error.to_string(),
            }
        }
    }
}

fn read_submission(path: &Path) -> Result<Value, AppError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("invalid date '{value}': {err}"))
}

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use ata_points::calendar::{self, TournamentCalendar, YamlCalendar};
use ata_points::config::Config;
use ata_points::projection::{project, SeasonWindow};
use ata_points::results::entry::{self, SubmitOutcome};
use ata_points::results::{CompetitorName, JsonResultStore, RecordKey, ResultRecord};
use ata_points::scoring::{score_records, ScoreReport, ScoringConfig};
use ata_points::{output, EngineError};

const EXIT_SUCCESS: i32 = 0;
const EXIT_VALIDATION: i32 = 1;
const EXIT_UNAVAILABLE: i32 = 2;
const EXIT_DUPLICATE: i32 = 3;
const EXIT_CONFIG: i32 = 4;
const EXIT_NOT_FOUND: i32 = 5;

#[derive(Args, Debug)]
struct CompetitorArgs {
    /// Competitor's first name
    #[arg(long)]
    first: String,

    /// Competitor's last name
    #[arg(long)]
    last: String,
}

impl CompetitorArgs {
    fn name(&self) -> Result<CompetitorName, EngineError> {
        CompetitorName::new(&self.first, &self.last)
    }
}

#[derive(Args, Debug)]
struct EntryArgs {
    #[command(flatten)]
    competitor: CompetitorArgs,

    /// Tournament name as listed in the calendar
    #[arg(long)]
    tournament: String,

    /// Tournament date, when the same name is held more than once
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Event result as EVENT=VALUE, e.g. "Traditional Forms=1st" or "CS=3" for class C
    #[arg(long = "result", value_name = "EVENT=VALUE")]
    results: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the tournament calendar
    Tournaments,
    /// List a competitor's results, marking values that do not count
    Results {
        #[command(flatten)]
        competitor: CompetitorArgs,
    },
    /// Show seasonal totals per event
    Totals {
        #[command(flatten)]
        competitor: CompetitorArgs,

        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Record results for a tournament
    Add {
        #[command(flatten)]
        entry: EntryArgs,

        /// Replace an existing entry for the same tournament instead of stopping
        #[arg(long)]
        replace: bool,
    },
    /// Replace the results recorded for a tournament
    Edit {
        #[command(flatten)]
        entry: EntryArgs,
    },
    /// Delete the results recorded for a tournament
    Delete {
        #[command(flatten)]
        competitor: CompetitorArgs,

        #[arg(long)]
        tournament: String,

        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Project the best achievable total by season end
    Project {
        #[command(flatten)]
        competitor: CompetitorArgs,

        /// Treat this date as today (defaults to the local date)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Last day of the season (overrides the config file)
        #[arg(long)]
        season_end: Option<NaiveDate>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "ata-points")]
#[command(about = "Tournament point tracker: capped seasonal totals and projections", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/ata-points/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    ata_points::telemetry::init_telemetry(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);
    let config = match ata_points::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let scoring = config.scoring();
    if let Err(errors) = ata_points::scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    tracing::debug!(
        results = %config.results_path().display(),
        calendar = %config.calendar_path().display(),
        "loaded config"
    );

    let code = match run(cli.command, &config, &scoring) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e);
            exit_code(&e)
        }
    };
    std::process::exit(code);
}

fn exit_code(error: &EngineError) -> i32 {
    match error {
        EngineError::Validation(_) => EXIT_VALIDATION,
        EngineError::Duplicate(_) => EXIT_DUPLICATE,
        EngineError::CompetitorNotFound(_) | EngineError::RecordNotFound(_) => EXIT_NOT_FOUND,
        EngineError::Unavailable { .. } => EXIT_UNAVAILABLE,
    }
}

fn run(command: Commands, config: &Config, scoring: &ScoringConfig) -> Result<i32, EngineError> {
    let calendar = YamlCalendar::new(config.calendar_path());
    let mut store = JsonResultStore::new(config.results_path());
    let use_colors = output::should_use_colors();

    match command {
        Commands::Tournaments => {
            let tournaments = calendar.list_tournaments()?;
            println!("{}", output::format_tournament_list(&tournaments, use_colors));
        }
        Commands::Results { competitor } => {
            let report = load_report(&store, &competitor.name()?, scoring)?;
            println!("{}", output::format_results_table(&report, use_colors));
        }
        Commands::Totals { competitor, tsv } => {
            let report = load_report(&store, &competitor.name()?, scoring)?;
            if tsv {
                println!("{}", output::format_totals_tsv(&report));
            } else {
                println!("{}", output::format_totals_table(&report, use_colors));
            }
        }
        Commands::Add { entry: args, replace } => {
            let competitor = args.competitor.name()?;
            let record = build_entry(&calendar, &args, scoring)?;
            let key = record.key();

            match entry::submit(&mut store, &competitor, record.clone())? {
                SubmitOutcome::Saved => println!("Results saved for {}.", key),
                SubmitOutcome::Duplicate(_) if replace => {
                    entry::edit(&mut store, &competitor, &key, record)?;
                    println!("Results replaced for {}.", key);
                }
                SubmitOutcome::Duplicate(existing) => {
                    eprintln!("Duplicate entry: {} is already recorded.", existing.key());
                    eprintln!("Rerun with `edit` (or `add --replace`) to overwrite it, or leave it as is.");
                    return Ok(EXIT_DUPLICATE);
                }
            }

            let report = load_report(&store, &competitor, scoring)?;
            println!();
            println!("{}", output::format_totals_table(&report, use_colors));
        }
        Commands::Edit { entry: args } => {
            let competitor = args.competitor.name()?;
            let record = build_entry(&calendar, &args, scoring)?;
            let key = record.key();
            entry::edit(&mut store, &competitor, &key, record)?;
            println!("Results replaced for {}.", key);

            let report = load_report(&store, &competitor, scoring)?;
            println!();
            println!("{}", output::format_totals_table(&report, use_colors));
        }
        Commands::Delete {
            competitor,
            tournament,
            date,
        } => {
            let competitor = competitor.name()?;
            let key = resolve_recorded_key(&store, &competitor, &tournament, date)?;
            entry::delete(&mut store, &competitor, &key)?;
            println!("Deleted results for {}.", key);
        }
        Commands::Project {
            competitor,
            today,
            season_end,
        } => {
            let competitor = competitor.name()?;
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            let season_end = season_end.or(config.season_end).ok_or_else(|| {
                EngineError::Validation(
                    "no season end date; pass --season-end or set season_end in the config"
                        .to_string(),
                )
            })?;
            let window = SeasonWindow::new(today, season_end)?;

            let records = entry::list_sorted(&store, &competitor)?;
            let schedule = calendar.list_tournaments()?;
            let report = project(&records, &schedule, &window, scoring);
            println!("{}", output::format_projection_table(&report, use_colors));
        }
    }

    Ok(EXIT_SUCCESS)
}

/// Score a competitor's stored records, printing any scoring warnings.
fn load_report(
    store: &JsonResultStore,
    competitor: &CompetitorName,
    scoring: &ScoringConfig,
) -> Result<ScoreReport, EngineError> {
    let records = entry::list_sorted(store, competitor)?;
    let report = score_records(&records, scoring);
    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }
    Ok(report)
}

/// Resolve the tournament from the calendar and build a record from the
/// `--result` inputs.
fn build_entry(
    source: &YamlCalendar,
    args: &EntryArgs,
    scoring: &ScoringConfig,
) -> Result<ResultRecord, EngineError> {
    let tournaments = source.list_tournaments()?;
    let tournament = calendar::find_tournament(&tournaments, &args.tournament, args.date)?;
    let inputs = args
        .results
        .iter()
        .map(|s| entry::parse_event_input(s))
        .collect::<Result<Vec<_>, _>>()?;
    entry::build_record(tournament, &inputs, &scoring.points)
}

/// Find the stored record for a tournament name, using `date` to pick
/// between several.
fn resolve_recorded_key(
    store: &JsonResultStore,
    competitor: &CompetitorName,
    tournament: &str,
    date: Option<NaiveDate>,
) -> Result<RecordKey, EngineError> {
    let matches: Vec<RecordKey> = entry::list_sorted(store, competitor)?
        .into_iter()
        .filter(|r| r.tournament.eq_ignore_ascii_case(tournament.trim()))
        .filter(|r| date.map_or(true, |d| r.date == d))
        .map(|r| r.key())
        .collect();

    match matches.as_slice() {
        [] => Err(match date {
            Some(date) => EngineError::RecordNotFound(RecordKey {
                date,
                tournament: tournament.to_string(),
            }),
            None => EngineError::Validation(format!("no results recorded for '{}'", tournament)),
        }),
        [key] => Ok(key.clone()),
        _ => Err(EngineError::Validation(format!(
            "'{}' is recorded on several dates; pass --date",
            tournament
        ))),
    }
}

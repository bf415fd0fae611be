use clap::{Parser, Subcommand};
use importer::{RosterFormat, RosterLoader, RosterValidator};
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use storage::{dto::algorithm::AlgorithmResponse, services::algorithm::run_team_formation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "contest-import")]
#[command(about = "Competition roster importer and team formation runner", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a competition with its coaches and pending teams from a JSON roster
    Roster {
        file: PathBuf,

        #[arg(long)]
        validate_only: bool,
    },
    /// Merge a coach's pending teams and print the surviving teams
    FormTeams {
        #[arg(long)]
        competition_id: Uuid,

        #[arg(long)]
        coach_id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "import={},importer={},storage={}",
                    log_level, log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Roster {
            file,
            validate_only,
        } => {
            handle_roster_import(file, validate_only, &cli.database_url).await?;
        }
        Commands::FormTeams {
            competition_id,
            coach_id,
        } => {
            handle_form_teams(competition_id, coach_id, &cli.database_url).await?;
        }
    }

    Ok(())
}

async fn connect(database_url: &str) -> Result<sqlx::PgPool, sqlx::Error> {
    tracing::info!("Connecting to database...");
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

async fn handle_roster_import(
    file: PathBuf,
    validate_only: bool,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Loading roster JSON from: {}", file.display());

    let json_content = tokio::fs::read_to_string(&file).await?;
    let roster = RosterFormat::from_json(&json_content)?;
    tracing::info!(
        "Loaded roster for {} ({} teams)",
        roster.competition.name,
        roster.teams.len()
    );

    tracing::info!("Validating roster...");
    let validation_report = RosterValidator::validate(&roster)?;
    validation_report.log_warnings();
    tracing::info!("Validation successful");

    if validate_only {
        return Ok(());
    }

    let pool = connect(database_url).await?;
    let summary = RosterLoader::new(&pool).import_to_database(&roster).await?;

    println!("{}", summary.competition_id);

    Ok(())
}

async fn handle_form_teams(
    competition_id: Uuid,
    coach_id: Uuid,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect(database_url).await?;

    let teams = run_team_formation(&pool, competition_id, coach_id).await?;
    let response = AlgorithmResponse::from(teams);

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

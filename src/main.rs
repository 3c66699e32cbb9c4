use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use attendance_board::report;
use attendance_board::source::{HttpStudentSource, DEFAULT_ENDPOINT};
use attendance_board::store::{FileSnapshotStore, PgSnapshotStore};
use attendance_board::{Board, FilterType, Repository, SnapshotStore, StudentId};
use clap::{Args, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "attendance-board")]
#[command(about = "Student attendance board with filters, sorting and selection", long_about = None)]
struct Cli {
    /// Postgres connection string; snapshots go to the data directory when unset
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Directory holding the student snapshot
    #[arg(long, env = "ATTENDANCE_DATA_DIR", default_value = ".attendance", global = true)]
    data_dir: PathBuf,

    /// Endpoint returning the user records
    #[arg(long, env = "ATTENDANCE_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the snapshot schema in Postgres
    InitDb,
    /// Print the attendance board
    Show {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Export the displayed students as CSV
    Export {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long, default_value = "attendance.csv")]
        out: PathBuf,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// all, present or absent
    #[arg(long, default_value = "all")]
    filter: FilterType,
    /// Only show students below the attendance threshold
    #[arg(long)]
    low: bool,
    /// Sort by attendance, highest first
    #[arg(long)]
    sort: bool,
    /// Student ids to mark as selected
    #[arg(long = "select")]
    select: Vec<StudentId>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attendance_board=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::InitDb => {
            let database_url = cli
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set to initialize the snapshot schema")?;
            let store = connect(database_url).await?;
            store.init().await?;
            println!("Schema ready.");
        }
        Commands::Show { view } => {
            let board = load_board(
                cli.database_url.as_deref(),
                &cli.data_dir,
                &cli.endpoint,
                &view,
            )
            .await?;
            print!("{}", report::render_board(&board, chrono::Utc::now()));
        }
        Commands::Export { view, out } => {
            let board = load_board(
                cli.database_url.as_deref(),
                &cli.data_dir,
                &cli.endpoint,
                &view,
            )
            .await?;
            let file = std::fs::File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            let board_view = board.view();
            report::write_csv(&board_view, board.selection(), file)?;
            println!(
                "Exported {} students to {}.",
                board_view.counts.filtered,
                out.display()
            );
        }
    }

    Ok(())
}

async fn connect(database_url: &str) -> anyhow::Result<PgSnapshotStore> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")?;
    Ok(PgSnapshotStore::new(pool))
}

async fn load_board(
    database_url: Option<&str>,
    data_dir: &Path,
    endpoint: &str,
    args: &ViewArgs,
) -> anyhow::Result<Board> {
    let store: Arc<dyn SnapshotStore> = match database_url {
        Some(url) => Arc::new(connect(url).await?),
        None => Arc::new(FileSnapshotStore::new(data_dir)),
    };
    let repository = Repository::new(store, Arc::new(HttpStudentSource::new(endpoint)));

    let mut board = Board::loading();
    board.resolve(repository.load().await);

    board.set_filter_type(args.filter);
    if args.low {
        board.toggle_low_attendance();
    }
    if args.sort {
        board.toggle_sort();
    }
    for &id in &args.select {
        board.toggle_student(id);
    }

    Ok(board)
}

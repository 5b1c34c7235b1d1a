//! weekboard: command-line client for a weekboard server.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use weekboard::client::{HttpTaskClient, TaskApi, TaskBoard};
use weekboard::config::{ClientConfig, DEFAULT_TIMEOUT_MS};
use weekboard_tasks::{DayOfWeek, Task};

/// Weekly task board client
#[derive(Parser, Debug)]
#[command(name = "weekboard")]
#[command(about = "Manage a weekly task board", long_about = None)]
#[command(version)]
struct Cli {
    /// Server URL including any base path
    #[arg(long, env = "WEEKBOARD_URL", default_value = "http://127.0.0.1:3000")]
    url: String,

    /// Bearer token
    #[arg(long, env = "WEEKBOARD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Reject edits made against a stale copy of a task
    #[arg(long)]
    check_versions: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the week with per-day and overall progress
    Week,

    /// Check server liveness
    Health,

    /// Add a task
    Add {
        /// Day of the week (monday ... sunday)
        day: DayOfWeek,
        /// Task title
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },

    /// Change a task's title and day
    Edit {
        /// Task id
        id: String,
        /// New day
        day: DayOfWeek,
        /// New title
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },

    /// Mark a task done
    Done {
        /// Task id
        id: String,
    },

    /// Mark a task not done
    Undo {
        /// Task id
        id: String,
    },

    /// Delete a task
    Delete {
        /// Task id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    weekboard::logging::init("warn");

    let cli = Cli::parse();
    let mut config = ClientConfig::new(cli.url);
    config.token = cli.token.filter(|t| !t.is_empty());
    config.timeout_ms = cli.timeout_ms;

    let board =
        TaskBoard::new(HttpTaskClient::new(config)?).with_version_checks(cli.check_versions);

    if let Err(e) = run(&board, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(board: &TaskBoard<HttpTaskClient>, command: Commands) -> Result<()> {
    match command {
        Commands::Health => {
            let health = board.api().health().await?;
            println!("{}", health.status);
        },
        Commands::Week => {
            board.load().await?;
            print_week(board);
        },
        Commands::Add { day, title } => {
            let task = board.save(&title.join(" "), day, None).await?;
            println!("Added {} ({})", task.id, task.day_of_week);
        },
        Commands::Edit { id, day, title } => {
            let existing = find(board, &id).await?;
            let task = board.save(&title.join(" "), day, Some(&existing)).await?;
            println!("Updated {} (version {})", task.id, task.version);
        },
        Commands::Done { id } => {
            toggle(board, &id, true).await?;
        },
        Commands::Undo { id } => {
            toggle(board, &id, false).await?;
        },
        Commands::Delete { id } => {
            board.delete(&id).await?;
            println!("Deleted {id}");
        },
    }
    Ok(())
}

async fn find(board: &TaskBoard<HttpTaskClient>, id: &str) -> Result<Task> {
    board.load().await?;
    match board.read(|state| state.find(id).cloned()) {
        Some(task) => Ok(task),
        None => bail!("no task with id {id}"),
    }
}

async fn toggle(board: &TaskBoard<HttpTaskClient>, id: &str, completed: bool) -> Result<()> {
    if board.read(|state| state.find(id).is_none()) {
        find(board, id).await?;
    }
    let task = board.toggle(id, completed).await?;
    let mark = if task.completed { "done" } else { "not done" };
    println!("{}: {}", task.title, mark);
    Ok(())
}

fn print_week(board: &TaskBoard<HttpTaskClient>) {
    board.read(|state| {
        for bucket in state.buckets() {
            let stats = bucket.stats();
            println!(
                "{:<9} {}/{} ({}%)",
                bucket.day.as_str(),
                stats.completed,
                stats.total,
                stats.completion_rate()
            );
            for task in &bucket.tasks {
                let mark = if task.completed { "x" } else { " " };
                println!("  [{mark}] {}  {}", task.title, task.id);
            }
        }
        let week = state.week_stats();
        println!(
            "Week: {}/{} done ({}%)",
            week.completed, week.total, week.completion_rate
        );
    });
}

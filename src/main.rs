//! Binary entrypoint for the srordle CLI.
//!
//! Commands:
//! - `play [--no-save]` - play today's game in the terminal
//! - `init` - write a starter `srordle.toml`
//! - `status` - print today's saved progress without contacting the server
//!
//! See the library crate docs for module-level details: `srordle::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use srordle::client::HttpGameServer;
use srordle::config::{Config, DEFAULT_CONFIG_PATH};
use srordle::engine::Notice;
use srordle::model::first_correct_index;
use srordle::session::{LineOutcome, Session, HELP_TEXT};
use srordle::storage::{AnyStore, GameDate, ProgressStore};

#[derive(Parser)]
#[command(name = "srordle")]
#[command(about = "Shaped-row Wordle in the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Play today's game
    Play {
        /// Keep progress in memory only
        #[arg(long)]
        no_save: bool,
    },
    /// Write a default configuration file
    Init,
    /// Show today's saved progress
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Init => {
            Config::create_default(&cli.config).await?;
            println!("Wrote default configuration to {}", cli.config);
        }
        Commands::Play { no_save } => {
            let config = config_or_default(pre_config, &cli.config)?;
            play(&config, no_save).await?;
        }
        Commands::Status => {
            let config = config_or_default(pre_config, &cli.config)?;
            status(&config)?;
        }
    }

    Ok(())
}

fn config_or_default(loaded: Option<Config>, path: &str) -> Result<Config> {
    let config = match loaded {
        Some(config) => config,
        None => {
            warn!("No usable config at {}; using defaults", path);
            Config::default()
        }
    };
    config.validate()?;
    Ok(config)
}

async fn play(config: &Config, no_save: bool) -> Result<()> {
    let backend = if no_save {
        "memory"
    } else {
        config.storage.backend.as_str()
    };
    let store = AnyStore::open(backend, &config.storage.data_dir)?;
    let server = HttpGameServer::new(&config.server)?;
    let day = GameDate::today();
    info!("Starting srordle v{} for {}", env!("CARGO_PKG_VERSION"), day);

    let color = config.display.color && atty::is(atty::Stream::Stdout);
    let mut session = Session::open(server, ProgressStore::new(store), day).await?;
    print!("{}", session.paint(color));
    if session.is_over() {
        println!("Today's game is already finished.");
        return Ok(());
    }
    println!("{}", HELP_TEXT);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match session.handle_line(&line).await {
            LineOutcome::Quit => break,
            LineOutcome::Help => {
                println!("{}", HELP_TEXT);
                continue;
            }
            LineOutcome::Continue(_) => {}
        }
        print!("{}", session.paint(color));
        for notice in session.take_notices() {
            print_notice(&notice);
        }
        if session.is_over() {
            break;
        }
    }
    Ok(())
}

fn print_notice(notice: &Notice) {
    println!();
    println!("{}", notice.headline());
    println!("{}", notice.body());
    println!();
}

fn status(config: &Config) -> Result<()> {
    let store = AnyStore::open(&config.storage.backend, &config.storage.data_dir)?;
    let progress = ProgressStore::new(store);
    let day = GameDate::today();
    let guesses = progress.load_past_guesses(&day);

    println!("Srordle status for {}", day);
    println!("Storage: {} ({})", config.storage.backend, config.storage.data_dir);
    println!("Guesses made: {}", guesses.len());
    match progress.peek_remaining_attempts(&day) {
        Some(n) => println!("Overrides remaining: {}", n),
        None => println!("Overrides remaining: not recorded yet"),
    }
    if let Some(idx) = first_correct_index(&guesses) {
        println!("Solved on guess {}", idx + 1);
    } else if let Some(outcome) = progress.load_outcome(&day) {
        println!("Finished: {:?}", outcome);
    }
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|c| c.logging.file.as_ref())
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        let is_tty = atty::is(atty::Stream::Stdout);

        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());

            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }

            // Only warnings reach an interactive console; the board owns the screen.
            if is_tty && record.level() <= log::Level::Warn {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}

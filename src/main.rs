//! Binary entrypoint for the Sundrop Caves CLI.
//!
//! Commands:
//! - `play [--seed <n>]` - start the game (default when no command is given)
//! - `init` - write a starter `sundrop.toml`
//! - `scores` - print the leaderboard
//!
//! See the library crate docs for module-level details: `sundrop::`.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use sundrop::config::Config;
use sundrop::console::{Console, Controller};
use sundrop::game::session::load_levels;
use sundrop::storage::scores;

#[derive(Parser)]
#[command(name = "sundrop")]
#[command(about = "Sundrop Caves: dig, sell and retire rich")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "sundrop.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the game
    Play {
        /// Seed the random source for a repeatable game
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Write a default configuration file
    Init,
    /// Show the high score table
    Scores,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Play { seed: None });

    if let Commands::Init = command {
        init_logging(&None, cli.verbose);
        info!("Writing default configuration to {}", cli.config);
        Config::create_default(&cli.config)?;
        println!("Created default configuration at {}", cli.config);
        println!("Map files are read from the paths listed under [[levels]].");
        return Ok(());
    }

    let config = Config::load_or_default(&cli.config)?;
    init_logging(&Some(config.clone()), cli.verbose);

    match command {
        Commands::Scores => {
            let board = scores::load_scores(&config.storage.scores_path())
                .context("Failed to read the score file")?;
            print!("{}", scores::format_scores(&board));
        }
        Commands::Play { seed } => {
            info!("Starting Sundrop Caves v{}", env!("CARGO_PKG_VERSION"));
            let grids = load_levels(&config.levels).context("Failed to load mine maps")?;
            let rng = match seed {
                Some(s) => {
                    info!("Using fixed seed {}", s);
                    StdRng::seed_from_u64(s)
                }
                None => StdRng::from_entropy(),
            };
            let mut controller = Controller::new(config, grids, rng);
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let mut console = Console::new(stdin.lock(), stdout.lock());
            controller.run(&mut console)?;
            info!("Game over; goodbye");
        }
        Commands::Init => {}
    }
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity wins over the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Warn),
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    let log_file = config.as_ref().and_then(|c| c.logging.file.clone());
    if let Some(file) = log_file {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
        {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));

            // Echo to stderr only when it is not the player's terminal
            let echo = !atty::is(atty::Stream::Stderr);

            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if echo {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
            let _ = builder.try_init();
            return;
        }
    }
    builder.format(|fmt, record| {
        writeln!(
            fmt,
            "{} [{}] {}",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
            record.level(),
            record.args()
        )
    });
    let _ = builder.try_init();
}

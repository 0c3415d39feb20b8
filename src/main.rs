//! cubedraft - cube draft simulator
//!
//! Command-line front end for the draft engine. Inputs are JSON card lists;
//! every command prints its result as pretty JSON on stdout. Logs go to stderr.
//!
//! ## Usage
//!
//! ```text
//! cubedraft [--config FILE] [-v] <COMMAND>
//!
//! Commands:
//!   pack    Draw one pack from a catalog
//!   packs   Draw several disjoint packs
//!   pick    Let a bot pick from a pack
//!   deck    Build a deck from a 45-card pool
//!   decks   Build decks for a table of bots
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cubedraft::{
    BotPool, Card, ColorSet, DeckBuilder, DraftConfig, PickContext, evaluate_pick_from_entropy,
    generate_pack_from_entropy, generate_packs_from_entropy,
};
use log::{debug, info};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Draft simulation and deck construction for a trading-card cube.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// JSON configuration overriding pack and deck defaults
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging (use -vv for trace output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw one pack from a catalog
    Pack {
        /// JSON array of catalog cards
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,

        /// Cards per pack
        #[arg(long, value_name = "N")]
        size: Option<usize>,

        /// Accept a smaller pack when the catalog is short, down to N cards
        #[arg(long, value_name = "N")]
        min_size: Option<usize>,

        /// Aim for two mono-colored cards of each color
        #[arg(long, default_value_t = false)]
        color_balanced: bool,

        /// Allow face-down cards into the pack
        #[arg(long, default_value_t = false)]
        include_facedown: bool,
    },

    /// Draw several mutually disjoint packs
    Packs {
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,

        /// Number of packs
        #[arg(long, value_name = "K")]
        count: usize,

        #[arg(long, value_name = "N")]
        size: Option<usize>,
    },

    /// Let a bot pick one card from a pack
    Pick {
        /// JSON array of the cards on offer
        #[arg(long, value_name = "FILE")]
        pack: PathBuf,

        /// Colors the bot has committed to, e.g. "WU"
        #[arg(long, default_value = "")]
        bot_colors: String,

        #[arg(long, value_name = "P")]
        pack_number: u32,

        #[arg(long, value_name = "Q")]
        pick_number: u32,
    },

    /// Build a deck from one bot's finished pool
    Deck {
        /// JSON array of the pool's cards
        #[arg(long, value_name = "FILE")]
        pool: PathBuf,

        #[arg(long)]
        draft_id: String,

        #[arg(long)]
        bot_id: String,
    },

    /// Build decks for every bot at a table
    Decks {
        /// JSON array of `{ botId, botName, pool }` entries
        #[arg(long, value_name = "FILE")]
        bots: PathBuf,

        #[arg(long)]
        draft_id: String,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{json}");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    let config = match &args.config {
        Some(path) => DraftConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DraftConfig::default(),
    };
    debug!("Config: {config:?}");

    match args.command {
        Command::Pack {
            catalog,
            size,
            min_size,
            color_balanced,
            include_facedown,
        } => {
            let catalog: Vec<Card> = read_json(&catalog)?;
            let mut options = config.pack.clone();
            if let Some(size) = size {
                options.size = size;
            }
            if min_size.is_some() {
                options.min_size = min_size;
            }
            options.color_balanced |= color_balanced;
            if include_facedown {
                options.exclude_facedown = false;
            }
            let pack = generate_pack_from_entropy(&catalog, &options)?;
            info!("Drew {} of {} requested cards", pack.actual_size, pack.requested_size);
            print_json(&pack)
        }
        Command::Packs {
            catalog,
            count,
            size,
        } => {
            let catalog: Vec<Card> = read_json(&catalog)?;
            let size = size.unwrap_or(config.pack.size);
            let packs = generate_packs_from_entropy(&catalog, count, size)?;
            info!("Drew {count} packs of {size}");
            print_json(&packs)
        }
        Command::Pick {
            pack,
            bot_colors,
            pack_number,
            pick_number,
        } => {
            let candidates: Vec<Card> = read_json(&pack)?;
            let colors = ColorSet::from_symbols(&bot_colors);
            let result = evaluate_pick_from_entropy(
                &candidates,
                colors,
                PickContext::new(pack_number, pick_number),
            )?;
            print_json(&result)
        }
        Command::Deck {
            pool,
            draft_id,
            bot_id,
        } => {
            let pool: Vec<Card> = read_json(&pool)?;
            let deck = DeckBuilder::new(config.deck).build(&pool, &draft_id, &bot_id)?;
            print_json(&deck)
        }
        Command::Decks { bots, draft_id } => {
            let bots: Vec<BotPool> = read_json(&bots)?;
            let results = DeckBuilder::new(config.deck).build_for_bots(&draft_id, &bots);
            let failed = results.iter().filter(|r| r.deck().is_none()).count();
            info!("Built {} decks, {failed} failed", results.len() - failed);
            print_json(&results)
        }
    }
}

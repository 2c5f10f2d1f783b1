//! Zone Map Visualization
//!
//! Run with: cargo run -p viz
//!
//! Examples:
//!   cargo run -p viz -- --demo --seed 7
//!   cargo run -p viz -- --feeds-dir output/ --config zone-map.toml

use bevy::prelude::*;
use clap::Parser;
use std::path::PathBuf;
use viz::{FeedSource, MapConfig, ZoneMapPlugin};
use zone_core::{default_config_toml, ZoneMapConfig};

/// Zone Map Visualization
#[derive(Parser, Debug)]
#[command(name = "zone-map")]
#[command(about = "3D zone map for sabotage and cosmic event feeds")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding sabotage_feed.json, cosmic_feed.json and agents.json
    #[arg(long, default_value = "output")]
    feeds_dir: PathBuf,

    /// Generate feeds in memory instead of reading files
    #[arg(long)]
    demo: bool,

    /// Random seed for the demo feed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", default_config_toml());
        return;
    }

    let config = match args.config {
        Some(ref path) => ZoneMapConfig::from_file(path).unwrap_or_else(|e| {
            eprintln!("Warning: Could not load {:?}: {}. Using defaults.", path, e);
            ZoneMapConfig::default()
        }),
        None => ZoneMapConfig::default(),
    };

    let source = if args.demo {
        FeedSource::Demo { seed: args.seed }
    } else {
        FeedSource::Directory(args.feeds_dir)
    };

    App::new()
        .insert_resource(MapConfig(config))
        .insert_resource(source)
        .add_plugins(ZoneMapPlugin)
        .run();
}

mod archive;
mod classify;
mod codepoints;
mod compile;
mod config;
mod error;
mod font_builder;
mod manifest;
mod pipeline;
mod preview;
mod readme;
mod style;
mod stylesheet;
mod svg_parser;
mod watch;
mod workspace;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;
use std::time::Duration;

use config::{
    BuildConfig, DEFAULT_FONT_TIMEOUT_SECS, DEFAULT_INPUT, DEFAULT_OUTPUT_DIR, DEFAULT_TEMP_DIR,
};

#[derive(Parser)]
#[command(name = "saxi-fonts")]
#[command(about = "Build the SAXI icon fonts, stylesheets and docs from an SVG archive")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    paths: PathArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PathArgs {
    /// Zip archive or extracted directory containing all/ or svg/all/
    #[arg(short, long, global = true, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output directory for generated files
    #[arg(short, long, global = true, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Directory the archive is extracted into
    #[arg(long, global = true, default_value = DEFAULT_TEMP_DIR)]
    temp_dir: PathBuf,

    /// Seconds allowed for generating one font
    #[arg(long, global = true, default_value_t = DEFAULT_FONT_TIMEOUT_SECS)]
    timeout: u64,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl PathArgs {
    fn config(&self) -> BuildConfig {
        BuildConfig {
            input: self.input.clone(),
            output_dir: self.output.clone(),
            temp_dir: self.temp_dir.clone(),
            font_timeout: Duration::from_secs(self.timeout),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate fonts, mappings, stylesheets, docs and demo page
    Build,

    /// Regenerate Icon-Font-README.md from existing mappings
    Docs,

    /// Regenerate demo.html from existing mappings
    Demo,

    /// Create the input, output and temp directories
    Setup,

    /// Remove temporary files
    Clean {
        /// Also empty the output directory
        #[arg(long)]
        all: bool,
    },

    /// Rebuild whenever the input archive changes
    Watch {
        /// Polling interval in milliseconds
        #[arg(long, default_value_t = watch::DEFAULT_POLL_INTERVAL_MS)]
        interval: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.paths.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let config = cli.paths.config();
    match cli.command {
        Commands::Build => build(&config)?,
        Commands::Docs => {
            let path = pipeline::generate_docs(&config.output_dir, chrono::Utc::now())?;
            println!("Generated: {}", path.display());
        }
        Commands::Demo => {
            let path = pipeline::generate_demo(&config.output_dir)?;
            println!("Generated: {}", path.display());
        }
        Commands::Setup => {
            for dir in workspace::setup(&config)? {
                println!("Created directory: {}", dir.display());
            }
            println!("\nNext steps:");
            println!("1. Place your svg.zip file in {}", config.input_dir().display());
            println!("2. Run `saxi-fonts build` to generate the icon fonts");
        }
        Commands::Clean { all } => {
            let cleaned = workspace::clean(&config, all)?;
            for path in &cleaned.removed {
                println!("Removed {}", path.display());
            }
            for path in &cleaned.skipped {
                println!("Skipped {} (not found)", path.display());
            }
        }
        Commands::Watch { interval } => {
            watch::watch(&config, Duration::from_millis(interval))?;
        }
    }

    Ok(())
}

fn build(config: &BuildConfig) -> Result<()> {
    let report = pipeline::build(config)?;

    for family in &report.families {
        println!(
            "{}: {} icons in {} fonts",
            family.family,
            family.icons,
            family.fonts.len()
        );
    }
    if report.unclassified > 0 {
        println!("{} files could not be assigned a style", report.unclassified);
    }
    if report.duplicates > 0 {
        println!("{} duplicate files skipped", report.duplicates);
    }

    println!("\nGenerated files:");
    for (path, size) in pipeline::list_outputs(&config.output_dir)? {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        println!("  {name} ({})", pipeline::human_size(size));
    }
    println!("\nDone! {} icons processed.", report.total_icons);

    Ok(())
}

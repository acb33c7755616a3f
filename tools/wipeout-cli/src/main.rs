//! wipeout - Wipeout asset tool
//!
//! Unpacks CMP archives, converts TIM images to PNG, dumps PRM objects and
//! extracts the camera path from a track directory.

mod manifest;
mod objects;
mod png;
mod track;
mod unpack;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wipeout")]
#[command(about = "Wipeout asset tool")]
#[command(version)]
struct Cli {
    /// Log decode details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompress a CMP archive into its embedded files
    Unpack {
        /// Input .CMP file
        input: PathBuf,

        /// Output directory (default: input path without extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also decode each embedded image to PNG
        #[arg(long)]
        png: bool,
    },

    /// Convert a single TIM image to PNG
    Image {
        /// Input .TIM file
        input: PathBuf,

        /// Output .png file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the objects in a PRM file
    Objects {
        /// Input .PRM file
        input: PathBuf,

        /// Print every object as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Decode a track directory and write its camera path as JSON
    Track {
        /// Track directory (holding TRACK.TRV, TRACK.TRF, ...)
        dir: PathBuf,

        /// Track manifest (default: track.toml in the track directory, if present)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Load TRACK.TEX even if the manifest does not name it
        #[arg(long)]
        tex: bool,

        /// Output .json file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the composed track textures as PNG into this directory
        #[arg(long)]
        textures: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Unpack { input, output, png } => {
            let output = output.unwrap_or_else(|| input.with_extension(""));
            tracing::info!("Unpacking {:?} -> {:?}", input, output);
            let count = unpack::unpack_archive(&input, &output, png)?;
            tracing::info!("Wrote {} files", count);
        }

        Commands::Image { input, output } => {
            let output = output.unwrap_or_else(|| input.with_extension("png"));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            png::convert_image(&input, &output)?;
        }

        Commands::Objects { input, json } => {
            objects::list_objects(&input, json)?;
        }

        Commands::Track {
            dir,
            manifest,
            tex,
            output,
            textures,
        } => {
            let options = track::TrackOptions {
                manifest,
                force_tex: tex,
                output,
                textures,
            };
            track::export_track(&dir, &options)?;
        }
    }

    Ok(())
}

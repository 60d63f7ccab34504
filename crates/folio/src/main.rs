//! folio CLI - static personal site generator with Open Graph images.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static personal site generator with Open Graph images")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to site.toml config file
    #[arg(short, long, default_value = "site.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold config and sample content in the current directory
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Build the static site
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip OG image generation
        #[arg(long)]
        skip_og: bool,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Serve the built site
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4321")]
        port: u16,

        /// Directory to serve (defaults to the output directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Render OG images per request
        #[arg(long)]
        dynamic_og: bool,

        /// Rebuild when content changes
        #[arg(short, long)]
        watch: bool,

        /// Open the site in a browser
        #[arg(long)]
        open: bool,
    },

    /// Render the OG image for one writing entry
    Og {
        /// Entry slug, e.g. `hello-world`
        slug: String,

        /// Output file (defaults to <output>/og/<slug>.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Site identity comes from the environment; .env is optional
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(yes).await?;
        }
        Commands::Build {
            output,
            skip_og,
            no_minify,
        } => {
            let minify = if no_minify { Some(false) } else { None };
            commands::build::run(&cli.config, output, skip_og, minify).await?;
        }
        Commands::Serve {
            port,
            dir,
            dynamic_og,
            watch,
            open,
        } => {
            let options = commands::serve::ServeOptions {
                port,
                dir,
                dynamic_og,
                watch,
                open,
            };
            commands::serve::run(&cli.config, options).await?;
        }
        Commands::Og { slug, output } => {
            commands::og::run(&cli.config, &slug, output).await?;
        }
    }

    Ok(())
}

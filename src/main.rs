//! CLI entry point for consul-website

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use consul_website::commands::frontmatter::IndexFormat;

#[derive(Parser)]
#[command(name = "consul-website")]
#[command(version)]
#[command(about = "Static page generator for the Consul documentation site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Generate static pages
    Build {
        /// Only build this collection
        collection: Option<String>,
    },

    /// Write the content file list of each collection
    Files {
        /// Only list this collection
        collection: Option<String>,
    },

    /// Print the frontmatter index of a collection
    Frontmatter {
        /// Collection to index
        collection: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "js")]
        format: IndexFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the page URLs a build would generate
    Paths {
        /// Only list this collection
        collection: Option<String>,
    },

    /// Build, then serve the public folder
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Serve the existing output without building
        #[arg(long)]
        no_build: bool,
    },

    /// Clean the public folder and generated data
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "consul_website=debug,info"
    } else {
        "consul_website=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            consul_website::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::Build { collection } => {
            let site = consul_website::Website::new(&base_dir)?;
            tracing::info!("Generating static pages...");
            site.build(collection.as_deref()).await?;
            println!("Generated successfully!");
        }

        Commands::Files { collection } => {
            let site = consul_website::Website::new(&base_dir)?;
            consul_website::commands::files::run(&site, collection.as_deref())?;
        }

        Commands::Frontmatter {
            collection,
            format,
            output,
        } => {
            let site = consul_website::Website::new(&base_dir)?;
            consul_website::commands::frontmatter::run(&site, &collection, format, output.as_deref())
                .await?;
        }

        Commands::Paths { collection } => {
            let site = consul_website::Website::new(&base_dir)?;
            consul_website::commands::list::run(&site, collection.as_deref())?;
        }

        Commands::Serve { port, ip, no_build } => {
            let site = consul_website::Website::new(&base_dir)?;

            if !no_build {
                tracing::info!("Generating static pages...");
                site.build(None).await?;
            }

            tracing::info!("Starting server at http://{}:{}", ip, port);
            consul_website::server::start(&site, &ip, port).await?;
        }

        Commands::Clean => {
            let site = consul_website::Website::new(&base_dir)?;
            tracing::info!("Cleaning generated output...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("consul-website version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

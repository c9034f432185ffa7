use caddyext::commands::{add, config, init, list};
use caddyext::common::GlobalOpts;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "caddyext")]
#[command(version)]
#[command(
    about = "Caddy directive registry",
    long_about = "caddyext registers third-party directives in Caddy's directives.go."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered directives in the order Caddy applies them
    List {
        /// Print the directives as JSON
        #[arg(long)]
        json: bool,
    },
    /// Register a directive and write it into the directives file
    Add {
        /// Directive name as used in a Caddyfile
        name: String,
        /// Go import path of the package providing the directive
        import_path: String,
    },
    /// Create a minimal directives file
    Init {
        /// Where to create the file (defaults to the configured directives file)
        path: Option<PathBuf>,
    },
    /// Configure caddyext
    #[command(subcommand_required = true, arg_required_else_help = true)]
    Config {
        #[command(subcommand)]
        action: config::ConfigAction,
    },
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let default_filter = format!(
        "caddyext={level},caddyext_directives={level},caddyext_syntax={level}",
        level = level
    );
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbosity = cli.global.verbosity_level();

    if let Err(e) = caddyext_logger::init_with_verbosity(verbosity) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    init_logging(verbosity);

    let result = match cli.command {
        Commands::List { json } => list::handle_list(json, &cli.global),
        Commands::Add { name, import_path } => add::handle_add(&name, &import_path, &cli.global),
        Commands::Init { path } => init::handle_init(path, &cli.global),
        Commands::Config { action } => config::handle_config(action, &cli.global),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            caddyext_logger::error(&format!("{:#}", e));
            if verbosity > 0 {
                caddyext_logger::show_log_path();
            }
            ExitCode::FAILURE
        }
    }
}

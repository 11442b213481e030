//! # dexhook entry point
//!
//! Parses arguments, installs logging on standard error, and runs the
//! selected hook on a single-threaded runtime.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dexhook_cli::post_create::{run_post_create, PostCreateArgs};
use dexhook_cli::post_finish::{run_post_finish, PostFinishArgs};
use dexhook_cli::pre_create::{run_pre_create, PreCreateArgs};
use dexhook_cli::EXIT_CONFIG;

/// Upload server hooks: metadata verification and status tracing.
#[derive(Parser, Debug)]
#[command(name = "dexhook", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify upload metadata before the upload is created.
    PreCreate(PreCreateArgs),

    /// Open the upload's status trace and start its dex-upload span.
    PostCreate(PostCreateArgs),

    /// Stop the upload's dex-upload span.
    PostFinish(PostFinishArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("cannot start runtime: {e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let result = runtime.block_on(async {
        match &cli.command {
            Commands::PreCreate(args) => run_pre_create(args).await,
            Commands::PostCreate(args) => run_post_create(args).await,
            Commands::PostFinish(args) => run_post_finish(args).await,
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_CONFIG)
        }
    }
}

/// `RUST_LOG` overrides the `-v` level.
fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

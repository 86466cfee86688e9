mod cmd;
mod modules;

use crate::cmd::{
    catalog::{self, CompaniesArgs, FilesArgs, ProblemsArgs},
    hint::{self, HintArgs},
    mine::{self, MineArgs},
    parse::{self, ParseArgs},
    progress::{self, ProgressArgs},
    server::{self, ServerArgs},
    sync::{self, SyncArgs},
};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::{env, str::FromStr};
use tokio::runtime::Builder;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{self, time::OffsetTime},
};

#[derive(Debug, Parser)]
#[command(name = "leettrack")]
#[command(about = "Company-wise interview problem tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List companies in the problem dataset
    Companies(CompaniesArgs),
    /// List problem files of a company
    Files(FilesArgs),
    /// Print normalized problems of a company
    Problems(ProblemsArgs),
    /// Normalize a local CSV export
    Parse(ParseArgs),
    /// Show or update progress
    Progress(ProgressArgs),
    /// Push local progress to the remote store for a user
    Sync(SyncArgs),
    /// Manage your tracked problems
    Mine(MineArgs),
    /// Ask for an approach hint
    Hint(HintArgs),
    Server(ServerArgs),
}

fn main() {
    dotenv().ok();

    let log_level = env::var("RUST_LOG").unwrap_or(String::from("info"));
    let filter = EnvFilter::builder()
        .with_default_directive(
            LevelFilter::from_str(&log_level)
                .unwrap_or(LevelFilter::INFO)
                .into(),
        )
        .from_env_lossy();
    let format = fmt::format()
        .with_level(true)
        .with_target(true)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_timer(OffsetTime::local_rfc_3339().expect("failed to get local time offset"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .event_format(format)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("failed to set tracing subscriber");

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build async runtime");

    let result = match Cli::parse().command {
        Commands::Companies(args) => runtime.block_on(catalog::companies(args)),
        Commands::Files(args) => runtime.block_on(catalog::files(args)),
        Commands::Problems(args) => runtime.block_on(catalog::problems(args)),
        Commands::Parse(args) => runtime.block_on(parse::run(args)),
        Commands::Progress(args) => runtime.block_on(progress::run(args)),
        Commands::Sync(args) => runtime.block_on(sync::run(args)),
        Commands::Mine(args) => runtime.block_on(mine::run(args)),
        Commands::Hint(args) => runtime.block_on(hint::run(args)),
        Commands::Server(args) => runtime.block_on(server::run(args)),
    };

    if let Err(e) = result {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

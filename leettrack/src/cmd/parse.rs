use crate::cmd::print_json;
use anyhow::{Context, Result};
use clap::Args;
use leettrack_libs::catalog::parser::parse_csv;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ParseArgs {
    path: PathBuf,
    #[arg(long)]
    company: String,
}

pub async fn run(args: ParseArgs) -> Result<()> {
    let text = tokio::fs::read_to_string(&args.path)
        .await
        .with_context(|| {
            let message = format!("couldn't read {}", args.path.display());
            tracing::error!(message);
            message
        })?;

    let problems = parse_csv(&text, &args.company);
    tracing::info!("{} problems parsed from {}", problems.len(), args.path.display());
    print_json(&problems)
}

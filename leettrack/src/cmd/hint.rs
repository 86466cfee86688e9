use anyhow::{Context, Result};
use clap::Args;
use leettrack_libs::hint::{GeminiHintGenerator, HintConfig, HintGenerator, DEFAULT_HINT_MODEL};
use std::env;

#[derive(Debug, Args)]
pub struct HintArgs {
    title: String,
    #[arg(long, default_value = "Unknown")]
    difficulty: String,
    /// Overrides GEMINI_API_KEY
    #[arg(long)]
    api_key: Option<String>,
}

pub fn hint_config(api_key: Option<String>) -> HintConfig {
    let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| String::from(DEFAULT_HINT_MODEL));
    HintConfig::new(api_key.or_else(|| env::var("GEMINI_API_KEY").ok())).with_model(&model)
}

pub async fn run(args: HintArgs) -> Result<()> {
    let generator = GeminiHintGenerator::new(hint_config(args.api_key))
        .context("failed to create hint generator")?;

    let hint = generator
        .generate_hint(&args.title, &args.difficulty)
        .await
        .with_context(|| {
            let message = format!("couldn't get a hint for {}", args.title);
            tracing::error!(message);
            message
        })?;

    println!("{}", hint);
    Ok(())
}

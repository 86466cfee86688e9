use crate::cmd::{catalog_source, print_json};
use anyhow::{bail, Context, Result};
use clap::Args;
use leettrack_libs::catalog::{
    loader::CatalogLoader,
    source::{fetch_companies, fetch_company_files},
};

#[derive(Debug, Args)]
pub struct CompaniesArgs {
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct FilesArgs {
    company: String,
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct ProblemsArgs {
    company: String,
    /// File name to load instead of the default one
    #[arg(long)]
    file: Option<String>,
}

pub async fn companies(args: CompaniesArgs) -> Result<()> {
    let source = catalog_source()?;
    let companies = fetch_companies(&source)
        .await
        .context("failed to retrieve companies")?;

    if args.json {
        return print_json(&companies);
    }
    for company in companies.iter() {
        println!("{}", company.name);
    }
    Ok(())
}

pub async fn files(args: FilesArgs) -> Result<()> {
    let source = catalog_source()?;
    let files = fetch_company_files(&source, &args.company)
        .await
        .with_context(|| format!("failed to retrieve files of {}", args.company))?;

    if args.json {
        return print_json(&files);
    }
    for file in files.iter() {
        println!("{}", file.name);
    }
    Ok(())
}

pub async fn problems(args: ProblemsArgs) -> Result<()> {
    let mut loader = CatalogLoader::new(catalog_source()?);
    loader.load_companies().await;
    if let Some(message) = loader.error() {
        bail!("{}", message);
    }

    loader.select_company(&args.company).await;
    if let Some(name) = &args.file {
        let file = loader
            .files()
            .iter()
            .find(|file| &file.name == name)
            .cloned()
            .with_context(|| {
                let message = format!("file `{}` not found for {}", name, args.company);
                tracing::error!(message);
                message
            })?;
        loader.select_file(file).await;
    }

    if let Some(message) = loader.error() {
        bail!("{}", message);
    }
    if let Some(file) = loader.selected_file() {
        tracing::info!("{} problems loaded from {}", loader.problems().len(), file.name);
    }
    print_json(&loader.problems())
}

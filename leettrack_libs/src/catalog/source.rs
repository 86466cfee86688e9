use crate::catalog::{
    model::{Company, ContentEntry, Problem, ProblemFile},
    parser::parse_csv,
};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode, Url};
use std::time::Duration;
use thiserror::Error;

/// Contents API of the company-wise problem dataset.
pub const DEFAULT_CATALOG_API_URL: &str =
    "https://api.github.com/repos/liquidslr/leetcode-company-wise-problems/contents";

type Result<T> = std::result::Result<T, SourceError>;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("GitHub API rate limit exceeded")]
    RateLimited,
    #[error("unexpected status {0} returned from {1}")]
    UnexpectedStatus(u16, String),
    #[error("failed to request to content source")]
    RequestError(#[from] reqwest::Error),
    #[error("failed to deserialize JSON data")]
    DeserializeError(#[from] serde_json::Error),
    #[error("invalid content source url given")]
    InvalidUrlError(#[from] url::ParseError),
}

impl SourceError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SourceError::RateLimited)
    }
}

/// Read-only hierarchical listing plus raw file download.
#[async_trait]
pub trait ContentSource {
    async fn list_children(&self, path: &str) -> Result<Vec<ContentEntry>>;
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

pub struct GitHubContentSource {
    base_url: Url,
    client: Client,
}

impl GitHubContentSource {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let base_url = Url::parse(base_url)?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(token) = token.filter(|token| !token.is_empty()) {
            if let Ok(value) = header::HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(header::AUTHORIZATION, value);
            }
        }

        let client = Client::builder()
            .user_agent(concat!("leettrack/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(GitHubContentSource { base_url, client })
    }

    /// URL of a listing path. Each segment is percent-encoded separately.
    pub fn listing_url(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|segment| !segment.is_empty()));
        }
        url
    }
}

fn check_status(status: StatusCode, url: &str) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        tracing::warn!("rate limited by content source at {}", url);
        Err(SourceError::RateLimited)
    } else {
        tracing::error!("content source returned {} for {}", status, url);
        Err(SourceError::UnexpectedStatus(status.as_u16(), url.to_string()))
    }
}

#[async_trait]
impl ContentSource for GitHubContentSource {
    async fn list_children(&self, path: &str) -> Result<Vec<ContentEntry>> {
        let url = self.listing_url(path);
        let res = self.client.get(url.clone()).send().await?;
        check_status(res.status(), url.as_str())?;

        let body = res.text().await?;
        let entries: Vec<ContentEntry> = serde_json::from_str(&body)?;
        Ok(entries)
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let res = self.client.get(url).send().await?;
        check_status(res.status(), url)?;

        Ok(res.text().await?)
    }
}

/// Lists the company directories at the root of the dataset.
pub async fn fetch_companies<S>(source: &S) -> Result<Vec<Company>>
where
    S: ContentSource + Sync + ?Sized,
{
    tracing::info!("Start to retrieve company list");
    let companies: Vec<Company> = source
        .list_children("")
        .await?
        .into_iter()
        .filter(ContentEntry::is_company)
        .map(Company::from)
        .collect();
    tracing::info!("{} companies successfully retrieved.", companies.len());

    Ok(companies)
}

/// Lists the CSV exports of one company.
pub async fn fetch_company_files<S>(source: &S, company_path: &str) -> Result<Vec<ProblemFile>>
where
    S: ContentSource + Sync + ?Sized,
{
    tracing::info!("Start to retrieve files of {}", company_path);
    let files: Vec<ProblemFile> = source
        .list_children(company_path)
        .await?
        .into_iter()
        .filter(ContentEntry::is_csv)
        .map(ProblemFile::from)
        .collect();
    tracing::info!("{} files found in {}.", files.len(), company_path);

    Ok(files)
}

/// Downloads one export and normalizes it.
pub async fn fetch_problems<S>(source: &S, download_url: &str, company: &str) -> Result<Vec<Problem>>
where
    S: ContentSource + Sync + ?Sized,
{
    let text = source.fetch_text(download_url).await?;
    let problems = parse_csv(&text, company);
    tracing::info!("{} problems parsed from {}.", problems.len(), download_url);

    Ok(problems)
}

//! Company → file → problems selection flow with user-facing error messages.
use crate::catalog::{
    model::{Company, Problem, ProblemFile},
    source::{fetch_companies, fetch_company_files, fetch_problems, ContentSource, SourceError},
};
use serde::Serialize;
use tokio::sync::watch;

pub const RATE_LIMIT_MESSAGE: &str =
    "GitHub API rate limit exceeded. Please try again in an hour.";
pub const COMPANIES_FAILED_MESSAGE: &str = "Failed to load companies.";
pub const FILES_FAILED_MESSAGE: &str = "Failed to load files for this company.";
pub const PROBLEMS_FAILED_MESSAGE: &str = "Failed to load problem data.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadPhase {
    NoCompany,
    FilesLoading,
    FilesLoaded,
    ProblemsLoading,
    ProblemsLoaded,
}

fn user_message(e: &SourceError, fallback: &str) -> String {
    if e.is_rate_limited() {
        String::from(RATE_LIMIT_MESSAGE)
    } else {
        String::from(fallback)
    }
}

/// File preselected for a company: the first whose name contains "All", else the first.
pub fn default_file(files: &[ProblemFile]) -> Option<&ProblemFile> {
    files
        .iter()
        .find(|file| file.name.contains("All"))
        .or_else(|| files.first())
}

pub struct CatalogLoader<S> {
    source: S,
    companies: Option<Vec<Company>>,
    selected_company: Option<String>,
    files: Vec<ProblemFile>,
    selected_file: Option<ProblemFile>,
    problems: Vec<Problem>,
    error: Option<String>,
    phase: watch::Sender<LoadPhase>,
}

impl<S> CatalogLoader<S>
where
    S: ContentSource + Send + Sync,
{
    pub fn new(source: S) -> Self {
        let (phase, _) = watch::channel(LoadPhase::NoCompany);
        Self {
            source,
            companies: None,
            selected_company: None,
            files: Vec::new(),
            selected_file: None,
            problems: Vec::new(),
            error: None,
            phase,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadPhase> {
        self.phase.subscribe()
    }

    pub fn phase(&self) -> LoadPhase {
        *self.phase.borrow()
    }

    pub fn companies(&self) -> &[Company] {
        self.companies.as_deref().unwrap_or_default()
    }

    pub fn selected_company(&self) -> Option<&str> {
        self.selected_company.as_deref()
    }

    pub fn files(&self) -> &[ProblemFile] {
        &self.files
    }

    pub fn selected_file(&self) -> Option<&ProblemFile> {
        self.selected_file.as_ref()
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn set_phase(&self, phase: LoadPhase) {
        self.phase.send_replace(phase);
    }

    /// Loads the company list once; later calls reuse it.
    pub async fn load_companies(&mut self) -> &[Company] {
        if self.companies.is_none() {
            match fetch_companies(&self.source).await {
                Ok(companies) => self.companies = Some(companies),
                Err(e) => {
                    tracing::error!("failed to load companies: {:?}", e);
                    self.error = Some(user_message(&e, COMPANIES_FAILED_MESSAGE));
                }
            }
        }
        self.companies()
    }

    /// Switches to `company` and preselects its default file.
    ///
    /// Any previous file selection and problem list are discarded first.
    pub async fn select_company(&mut self, company: &str) {
        self.selected_company = Some(company.to_string());
        self.files.clear();
        self.selected_file = None;
        self.problems.clear();
        self.error = None;
        self.set_phase(LoadPhase::FilesLoading);

        let path = self
            .companies()
            .iter()
            .find(|c| c.name == company)
            .map(|c| c.path.clone())
            .unwrap_or_else(|| company.to_string());

        match fetch_company_files(&self.source, &path).await {
            Ok(files) => {
                self.files = files;
                self.set_phase(LoadPhase::FilesLoaded);
                if let Some(file) = default_file(&self.files).cloned() {
                    self.select_file(file).await;
                }
            }
            Err(e) => {
                tracing::error!("failed to load files of {}: {:?}", company, e);
                self.error = Some(user_message(&e, FILES_FAILED_MESSAGE));
                self.set_phase(LoadPhase::FilesLoaded);
            }
        }
    }

    /// Downloads and parses `file`. On failure the previous problems are kept.
    pub async fn select_file(&mut self, file: ProblemFile) {
        let Some(company) = self.selected_company.clone() else {
            tracing::warn!("file {} selected without a company", file.name);
            return;
        };

        self.selected_file = Some(file.clone());
        self.error = None;
        self.set_phase(LoadPhase::ProblemsLoading);

        match fetch_problems(&self.source, &file.download_url, &company).await {
            Ok(problems) => self.problems = problems,
            Err(e) => {
                tracing::error!("failed to load problems from {}: {:?}", file.download_url, e);
                self.error = Some(String::from(PROBLEMS_FAILED_MESSAGE));
            }
        }
        self.set_phase(LoadPhase::ProblemsLoaded);
    }
}

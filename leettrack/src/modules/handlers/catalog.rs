use crate::{
    cmd::server::SharedSource,
    modules::models::request::{ProblemsQueryParameters, ValidatedQuery},
};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use leettrack_libs::{
    api::{ListResponse, MessageResponse},
    catalog::{
        loader::{
            default_file, COMPANIES_FAILED_MESSAGE, FILES_FAILED_MESSAGE, PROBLEMS_FAILED_MESSAGE,
            RATE_LIMIT_MESSAGE,
        },
        model::{Company, Problem, ProblemFile},
        source::{fetch_companies, fetch_company_files, fetch_problems, SourceError},
    },
};

type ErrorResponse = (StatusCode, Json<MessageResponse>);
type CatalogResponse<T> = Result<Json<ListResponse<T>>, ErrorResponse>;

fn catalog_error(e: SourceError, message: &str) -> ErrorResponse {
    tracing::error!("catalog request failed cause: {:?}", e);
    if e.is_rate_limited() {
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(MessageResponse::new(RATE_LIMIT_MESSAGE)),
        )
    } else {
        (StatusCode::BAD_GATEWAY, Json(MessageResponse::new(message)))
    }
}

pub async fn get_companies(Extension(source): Extension<SharedSource>) -> CatalogResponse<Company> {
    let companies = fetch_companies(source.as_ref())
        .await
        .map_err(|e| catalog_error(e, COMPANIES_FAILED_MESSAGE))?;

    Ok(Json(ListResponse::new(companies)))
}

pub async fn get_company_files(
    Path(company): Path<String>,
    Extension(source): Extension<SharedSource>,
) -> CatalogResponse<ProblemFile> {
    let files = fetch_company_files(source.as_ref(), &company)
        .await
        .map_err(|e| catalog_error(e, FILES_FAILED_MESSAGE))?;

    Ok(Json(ListResponse::new(files)))
}

/// Problems of one file of a company; the default file when none is named.
pub async fn get_problems(
    ValidatedQuery(params): ValidatedQuery<ProblemsQueryParameters>,
    Extension(source): Extension<SharedSource>,
) -> CatalogResponse<Problem> {
    let files = fetch_company_files(source.as_ref(), &params.company)
        .await
        .map_err(|e| catalog_error(e, FILES_FAILED_MESSAGE))?;

    let file = match &params.file {
        Some(name) => files.iter().find(|file| &file.name == name),
        None => default_file(&files),
    };
    let Some(file) = file else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(MessageResponse::new(format!(
                "no problem file found for {}",
                params.company
            ))),
        ));
    };

    let problems = fetch_problems(source.as_ref(), &file.download_url, &params.company)
        .await
        .map_err(|e| {
            tracing::error!("failed to download {}: {:?}", file.download_url, e);
            (
                StatusCode::BAD_GATEWAY,
                Json(MessageResponse::new(PROBLEMS_FAILED_MESSAGE)),
            )
        })?;
    tracing::info!(
        target: "querylog",
        "company={} file={} hits={}",
        params.company,
        file.name,
        problems.len()
    );

    Ok(Json(ListResponse::new(problems)))
}

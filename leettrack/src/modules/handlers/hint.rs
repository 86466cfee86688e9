use crate::{
    cmd::server::SharedHintGenerator,
    modules::models::{
        request::{HintQueryParameters, ValidatedQuery},
        response::HintResponse,
    },
};
use axum::{extract::Extension, http::StatusCode, Json};
use leettrack_libs::{api::MessageResponse, hint::HintError};

pub async fn get_hint(
    ValidatedQuery(params): ValidatedQuery<HintQueryParameters>,
    Extension(generator): Extension<SharedHintGenerator>,
) -> Result<Json<HintResponse>, (StatusCode, Json<MessageResponse>)> {
    let difficulty = params.difficulty.as_deref().unwrap_or("Unknown");

    match generator.generate_hint(&params.title, difficulty).await {
        Ok(hint) => Ok(Json(HintResponse {
            title: params.title,
            hint,
        })),
        Err(HintError::MissingApiKey) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(MessageResponse::new("API Key not configured")),
        )),
        Err(e) => {
            tracing::error!("hint request failed cause: {:?}", e);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(MessageResponse::new("Failed to fetch hint.")),
            ))
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{
        cmd::server::create_router,
        modules::handlers::test_util::{get, FailingHints, StaticSource},
    };
    use axum::http::StatusCode;
    use leettrack_libs::hint::{GeminiHintGenerator, HintConfig};
    use std::sync::Arc;

    #[tokio::test]
    async fn missing_key() {
        let generator = GeminiHintGenerator::new(HintConfig::new(None)).unwrap();
        let app = create_router(Arc::new(StaticSource::default()), Arc::new(generator));
        let (status, body) = get(app, "/api/hint?title=Two+Sum&difficulty=Easy").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["message"], "API Key not configured");
    }

    #[tokio::test]
    async fn generation_failure() {
        let app = create_router(Arc::new(StaticSource::default()), Arc::new(FailingHints));
        let (status, body) = get(app, "/api/hint?title=Two+Sum").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["message"], "Failed to fetch hint.");
    }
}

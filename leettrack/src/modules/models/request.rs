use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};
use leettrack_libs::api::MessageResponse;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct ProblemsQueryParameters {
    #[validate(length(min = 1, max = 200))]
    pub company: String,
    #[validate(length(min = 1, max = 200))]
    pub file: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct HintQueryParameters {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(max = 20))]
    pub difficulty: Option<String>,
}

/// Query string deserialized and validated before reaching the handler.
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<MessageResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let value: T = serde_urlencoded::from_str(query).map_err(|rejection| {
            tracing::error!("Parsing error: {}", rejection);
            (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::new(format!(
                    "invalid format query string: [{}]",
                    rejection
                ))),
            )
        })?;

        value.validate().map_err(|rejection| {
            tracing::error!("Validation error: {}", rejection);
            (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::new(
                    format!("Validation error: [{}]", rejection).replace('\n', ", "),
                )),
            )
        })?;

        Ok(ValidatedQuery(value))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn problems_query() {
        let params: ProblemsQueryParameters =
            serde_urlencoded::from_str("company=Goldman%20Sachs&file=5.%20All").unwrap();
        assert_eq!(params.company, "Goldman Sachs");
        assert_eq!(params.file.as_deref(), Some("5. All"));
        assert!(params.validate().is_ok());

        let params: ProblemsQueryParameters = serde_urlencoded::from_str("company=").unwrap();
        assert!(params.validate().is_err());
    }

    #[test]
    fn hint_query_requires_title() {
        assert!(serde_urlencoded::from_str::<HintQueryParameters>("difficulty=Easy").is_err());

        let params: HintQueryParameters =
            serde_urlencoded::from_str("title=Two+Sum&difficulty=Easy").unwrap();
        assert_eq!(params.title, "Two Sum");
        assert!(params.validate().is_ok());
    }
}

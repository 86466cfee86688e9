pub mod catalog;
pub mod hint;

use axum::http::StatusCode;

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
pub(crate) mod test_util {
    use axum::{
        async_trait,
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use leettrack_libs::{
        catalog::{
            model::{ContentEntry, EntryType},
            source::{ContentSource, SourceError},
        },
        hint::{HintError, HintGenerator},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    #[derive(Default)]
    pub struct StaticSource {
        pub rate_limited: bool,
        pub download_rate_limited: bool,
    }

    fn entry(name: &str, path: &str, entry_type: EntryType) -> ContentEntry {
        ContentEntry {
            name: name.to_string(),
            path: path.to_string(),
            entry_type,
            download_url: Some(format!("mem://{}", path)),
        }
    }

    #[async_trait]
    impl ContentSource for StaticSource {
        async fn list_children(&self, path: &str) -> Result<Vec<ContentEntry>, SourceError> {
            if self.rate_limited {
                return Err(SourceError::RateLimited);
            }
            match path {
                "" => Ok(vec![entry("Google", "Google", EntryType::Dir)]),
                "Google" => Ok(vec![
                    entry("1. Thirty Days.csv", "Google/1. Thirty Days.csv", EntryType::File),
                    entry("5. All.csv", "Google/5. All.csv", EntryType::File),
                ]),
                _ => Err(SourceError::UnexpectedStatus(404, path.to_string())),
            }
        }

        async fn fetch_text(&self, url: &str) -> Result<String, SourceError> {
            if self.download_rate_limited {
                return Err(SourceError::RateLimited);
            }
            match url {
                "mem://Google/5. All.csv" => Ok(String::from(
                    "Difficulty,Title,Frequency,Acceptance Rate,Link\nEASY,Two Sum,100,0.55,https://leetcode.com/problems/two-sum\n",
                )),
                _ => Err(SourceError::UnexpectedStatus(404, url.to_string())),
            }
        }
    }

    pub struct FailingHints;

    #[async_trait]
    impl HintGenerator for FailingHints {
        async fn generate_hint(&self, _title: &str, _difficulty: &str) -> Result<String, HintError> {
            Err(HintError::GenerationFailed(String::from("status 500")))
        }
    }

    pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HintResponse {
    pub title: String,
    pub hint: String,
}

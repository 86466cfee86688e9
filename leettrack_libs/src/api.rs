use serde::Serialize;

pub trait FieldList {
    fn field_list() -> &'static str;
}

/// Envelope used by the HTTP API for list endpoints.
#[derive(Debug, Serialize)]
pub struct ListResponse<T>
where
    T: Serialize,
{
    pub total: usize,
    pub items: Vec<T>,
    pub message: Option<String>,
}

impl<T> ListResponse<T>
where
    T: Serialize,
{
    pub fn new(items: Vec<T>) -> Self {
        Self {
            total: items.len(),
            items,
            message: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

pub mod api;
pub mod catalog;
pub mod hint;
pub mod identity;
pub mod personal;
pub mod progress;
pub mod store;
pub mod sync;

#[cfg(test)]
mod testing;

pub use leettrack_derive::FieldList;

#[cfg(test)]
mod test {
    use crate::api::FieldList;
    use leettrack_derive::FieldList;

    #[allow(dead_code)]
    #[derive(FieldList)]
    struct ResponseDocument {
        id: i32,
        title: String,
        #[field_list(skip)]
        score: f64,
        sentence: Vec<String>,
    }

    #[test]
    fn test_field_list() {
        assert_eq!(ResponseDocument::field_list(), "id, title, sentence");
    }
}

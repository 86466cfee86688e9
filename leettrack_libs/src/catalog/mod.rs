pub mod loader;
pub mod model;
pub mod parser;
pub mod source;

pub mod local;
pub mod model;
pub mod stats;
pub mod store;

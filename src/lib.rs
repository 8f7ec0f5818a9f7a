pub mod config;
pub mod errors;
pub mod link;
pub mod materialize;
pub mod repo;
pub mod templates;

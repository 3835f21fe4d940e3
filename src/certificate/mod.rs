pub mod documents;
pub mod handlers;
pub mod models;

pub mod discover;
pub mod handlers;
pub mod models;
pub mod store;

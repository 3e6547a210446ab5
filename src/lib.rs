pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod notices;
pub mod router;
pub mod session;
pub mod stores;

pub use app::App;
pub use error::{Result, TaskdeskError};

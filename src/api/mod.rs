pub mod client;
pub mod models;
pub mod response;
pub mod transport;

pub use client::ApiClient;
pub use models::{ApiRequest, ApiResponse, Collection, ListShape};
pub use transport::{HttpTransport, Transport};

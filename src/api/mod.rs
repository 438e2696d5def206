pub mod arrivals;
pub mod error;
pub mod health;

pub use error::ErrorResponse;

use std::sync::Arc;

use axum::Router;

use crate::directory::DirectoryStore;
use crate::providers::mta::MtaProvider;

pub fn router(directory: DirectoryStore, provider: Arc<MtaProvider>) -> Router {
    Router::new()
        .nest("/arrivals", arrivals::router(directory.clone(), provider))
        .nest("/health", health::router(directory))
}

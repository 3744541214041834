mod search;
mod users;

use axum::Router;
use axum::extract::DefaultBodyLimit;

use crate::config::Server;

pub fn create_router(server: &Server) -> Router {
    Router::new()
        .merge(users::router())
        .merge(search::router())
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
}

//! REST API (warp 라우트와 핸들러)

pub mod handlers;
pub mod routes;

pub use routes::create_routes;

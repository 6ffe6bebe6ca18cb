pub mod content;
pub mod handlers;
pub mod ingest;
pub mod middleware;
pub mod routes;
pub mod video;

pub use routes::create_router;

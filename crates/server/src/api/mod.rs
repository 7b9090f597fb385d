pub mod handlers;
pub mod inspection;
pub mod routes;

pub use routes::create_router;

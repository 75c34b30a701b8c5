//! HTTP surface: frame polling, input updates and the control page

pub mod routes;

pub use routes::build_router;

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

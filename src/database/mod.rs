pub mod manager;
pub mod models;
pub mod ports;
pub mod postgres;
pub mod transaction;

pub use manager::{DatabaseError, DatabaseManager};
pub use transaction::with_transaction;

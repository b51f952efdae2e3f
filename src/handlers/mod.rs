// handlers/mod.rs - HTTP handlers grouped by access level
//
// public:    no bearer token required (health, registration)
// protected: every handler resolves the caller from the bearer token itself,
//            after request validation and before any domain query

pub mod protected;
pub mod public;

// handlers/protected/mod.rs - Handlers that require a bearer token
//
// Each handler runs the same sequence: parse ids and body, resolve the caller,
// check ownership of the target row where there is one, query, then wrap the
// result in its group's envelope.

pub mod babies;
pub mod documents;
pub mod export;
pub mod feeding;
pub mod forum;
pub mod growth;
pub mod journal;
pub mod lookups;
pub mod milestones;
pub mod providers;
pub mod reminders;
pub mod stool;
pub mod users;

#[cfg(test)]
mod tests;

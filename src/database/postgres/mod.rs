//! PostgreSQL adapters for the repository ports.
//!
//! Queries are runtime-checked (`sqlx::query_as`) and always parameterized.

mod baby;
mod care;
mod document;
mod export;
mod forum;
mod journal;
mod lookup;
mod provider;
mod reminder;
mod user;

pub use baby::PgBabyRepository;
pub use care::{PgFeedingRepository, PgGrowthRepository, PgMilestoneRepository, PgStoolRepository};
pub use document::PgDocumentRepository;
pub use export::PgExportRepository;
pub use forum::PgForumRepository;
pub use journal::PgJournalRepository;
pub use lookup::PgLookupRepository;
pub use provider::PgProviderRepository;
pub use reminder::PgReminderRepository;
pub use user::PgUserRepository;
pub(crate) use user::DUPLICATE_EMAIL;

/// Wraps a user-supplied search term for `ILIKE`, escaping wildcard characters
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("sleep"), "%sleep%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}

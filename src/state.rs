use std::sync::Arc;

use crate::auth::{IdentityResolver, OwnershipGuard, TokenVerifier};
use crate::database::manager::DatabaseManager;
use crate::database::ports::*;
use crate::database::postgres::*;
use crate::services::export::{ExportAssembler, ExportError};
use crate::services::pdf::PdfRenderer;

/// Repository ports the handlers talk to
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub babies: Arc<dyn BabyRepository>,
    pub feeding: Arc<dyn FeedingRepository>,
    pub growth: Arc<dyn GrowthRepository>,
    pub milestones: Arc<dyn MilestoneRepository>,
    pub stool: Arc<dyn StoolRepository>,
    pub reminders: Arc<dyn ReminderRepository>,
    pub forum: Arc<dyn ForumRepository>,
    pub journal: Arc<dyn JournalRepository>,
    pub documents: Arc<dyn DocumentRepository>,
    pub exports: Arc<dyn ExportRepository>,
    pub lookups: Arc<dyn LookupRepository>,
    pub providers: Arc<dyn ProviderRepository>,
}

impl Repositories {
    /// PostgreSQL adapters; the provider directory runs on its own pool
    pub fn postgres(db: &DatabaseManager) -> Self {
        let main = db.main_pool().clone();
        Self {
            users: Arc::new(PgUserRepository::new(main.clone())),
            babies: Arc::new(PgBabyRepository::new(main.clone())),
            feeding: Arc::new(PgFeedingRepository::new(main.clone())),
            growth: Arc::new(PgGrowthRepository::new(main.clone())),
            milestones: Arc::new(PgMilestoneRepository::new(main.clone())),
            stool: Arc::new(PgStoolRepository::new(main.clone())),
            reminders: Arc::new(PgReminderRepository::new(main.clone())),
            forum: Arc::new(PgForumRepository::new(main.clone())),
            journal: Arc::new(PgJournalRepository::new(main.clone())),
            documents: Arc::new(PgDocumentRepository::new(main.clone())),
            exports: Arc::new(PgExportRepository::new(main.clone())),
            lookups: Arc::new(PgLookupRepository::new(main)),
            providers: Arc::new(PgProviderRepository::new(db.provider_pool().clone())),
        }
    }
}

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub identity: Arc<IdentityResolver>,
    pub guard: Arc<OwnershipGuard>,
    pub exporter: Arc<ExportAssembler>,
    pub health: Arc<dyn DatabaseHealth>,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        health: Arc<dyn DatabaseHealth>,
        verifier: TokenVerifier,
        pdf: Arc<dyn PdfRenderer>,
    ) -> Result<Self, ExportError> {
        let identity = IdentityResolver::new(verifier, repos.users.clone());
        let guard = OwnershipGuard::new(repos.babies.clone(), repos.forum.clone(), repos.journal.clone());
        let exporter = ExportAssembler::new(
            repos.babies.clone(),
            repos.growth.clone(),
            repos.milestones.clone(),
            repos.feeding.clone(),
            repos.stool.clone(),
            repos.exports.clone(),
            pdf,
        )?;

        Ok(Self {
            repos,
            identity: Arc::new(identity),
            guard: Arc::new(guard),
            exporter: Arc::new(exporter),
            health,
        })
    }
}

pub mod baby;
pub mod document;
pub mod export;
pub mod feeding;
pub mod forum;
pub mod growth;
pub mod journal;
pub mod lookup;
pub mod milestone;
pub mod provider;
pub mod reminder;
pub mod stool;
pub mod user;

pub use baby::{Baby, BabyInput};
pub use document::{NewSharedDocument, SharedDocument};
pub use export::ExportRecord;
pub use feeding::{FeedingInput, FeedingSchedule};
pub use forum::{ForumPost, ForumPostSummary, ForumReply, PostInput, ReplyInput};
pub use growth::{Growth, GrowthInput};
pub use journal::{JournalEntry, JournalInput};
pub use lookup::{Coupon, CuratedTip, QuizQuestion, TipFilter};
pub use milestone::{Milestone, MilestoneInput};
pub use provider::{ChildProvider, FavoriteProvider, ProviderFilter};
pub use reminder::{Reminder, ReminderInput};
pub use stool::{StoolEntry, StoolInput};
pub use user::{NewUser, ProfileImage, Role, User, UserUpdate};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive date window used to filter care logs. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    /// Stable label used in export file names
    pub fn label(&self) -> String {
        match (self.start, self.end) {
            (Some(s), Some(e)) => format!("{}_to_{}", s, e),
            (Some(s), None) => format!("from_{}", s),
            (None, Some(e)) => format!("until_{}", e),
            (None, None) => "all-time".to_string(),
        }
    }

    /// Human-readable description used inside export documents
    pub fn describe(&self) -> String {
        match (self.start, self.end) {
            (Some(s), Some(e)) => format!("{} to {}", s, e),
            (Some(s), None) => format!("From {}", s),
            (None, Some(e)) => format!("Until {}", e),
            (None, None) => "All dates".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = DateRange::new(Some(d("2024-01-01")), Some(d("2024-01-31")));
        assert!(range.contains(d("2024-01-01")));
        assert!(range.contains(d("2024-01-31")));
        assert!(!range.contains(d("2024-02-01")));
        assert!(DateRange::all().contains(d("1999-12-31")));
    }

    #[test]
    fn labels() {
        assert_eq!(DateRange::all().label(), "all-time");
        assert_eq!(DateRange::new(Some(d("2024-01-01")), None).label(), "from_2024-01-01");
        assert_eq!(DateRange::new(None, Some(d("2024-03-01"))).label(), "until_2024-03-01");
        assert_eq!(
            DateRange::new(Some(d("2024-01-01")), Some(d("2024-03-01"))).label(),
            "2024-01-01_to_2024-03-01"
        );
    }
}

//! In-memory implementation of every repository port.
//!
//! Mirrors the ordering and scoping rules of the PostgreSQL adapters so handler
//! tests exercise the same observable behaviour without a database.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::json;

use crate::database::manager::DatabaseError;
use crate::database::models::*;
use crate::database::ports::*;
use crate::database::postgres::DUPLICATE_EMAIL;

#[derive(Default)]
struct Tables {
    next_id: i32,
    users: Vec<User>,
    profile_images: Vec<ProfileImage>,
    babies: Vec<Baby>,
    user_baby: Vec<(i32, i32)>,
    doctor_baby: Vec<(i32, i32)>,
    feeding: Vec<FeedingSchedule>,
    growth: Vec<Growth>,
    milestones: Vec<Milestone>,
    stool: Vec<StoolEntry>,
    reminders: Vec<Reminder>,
    posts: Vec<ForumPost>,
    replies: Vec<ForumReply>,
    journal: Vec<JournalEntry>,
    documents: Vec<SharedDocument>,
    exports: Vec<ExportRecord>,
    coupons: Vec<Coupon>,
    quiz: Vec<QuizQuestion>,
    tips: Vec<CuratedTip>,
    providers: Vec<ChildProvider>,
    favorites: Vec<(i32, i32, DateTime<Utc>)>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn author_name(&self, user_id: i32) -> String {
        self.users
            .iter()
            .find(|u| u.user_id == user_id)
            .map(|u| u.full_name().trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    fn delete_babies(&mut self, ids: &[i32]) -> u64 {
        self.feeding.retain(|r| !ids.contains(&r.baby_id));
        self.growth.retain(|r| !ids.contains(&r.baby_id));
        self.milestones.retain(|r| !ids.contains(&r.baby_id));
        self.stool.retain(|r| !ids.contains(&r.baby_id));
        self.reminders.retain(|r| !ids.contains(&r.baby_id));
        self.documents.retain(|r| !ids.contains(&r.baby_id));
        self.doctor_baby.retain(|(_, b)| !ids.contains(b));
        self.user_baby.retain(|(_, b)| !ids.contains(b));
        let before = self.babies.len();
        self.babies.retain(|b| !ids.contains(&b.baby_id));
        (before - self.babies.len()) as u64
    }
}

/// Shared in-memory store. `fail_queries(true)` makes every port call error.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the database going away
    pub fn fail_queries(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, DatabaseError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DatabaseError::Query("simulated database failure".to_string()));
        }
        Ok(self.tables.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn seed(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    // Fixtures

    pub fn seed_user(&self, email: &str, role: &str) -> User {
        let mut t = self.seed();
        let user_id = t.next_id();
        let local = email.split('@').next().unwrap_or(email);
        let user = User {
            user_id,
            email: email.to_string(),
            first_name: local.to_string(),
            last_name: "Tester".to_string(),
            role: role.to_string(),
            created_at: Utc::now(),
        };
        t.users.push(user.clone());
        user
    }

    pub fn seed_baby(&self, user_id: i32, first_name: &str) -> Baby {
        let mut t = self.seed();
        let baby_id = t.next_id();
        let baby = Baby {
            baby_id,
            first_name: first_name.to_string(),
            last_name: "Tester".to_string(),
            gender: "female".to_string(),
            birthdate: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            weight: Some(3.2),
            height: Some(49.0),
        };
        t.babies.push(baby.clone());
        t.user_baby.push((user_id, baby_id));
        baby
    }

    /// Links another parent to an existing baby
    pub fn link_parent(&self, user_id: i32, baby_id: i32) {
        self.seed().user_baby.push((user_id, baby_id));
    }

    pub fn seed_growth(&self, baby_id: i32, date: NaiveDate, height: f64, weight: f64, notes: Option<&str>) -> Growth {
        let mut t = self.seed();
        let row = Growth {
            growth_id: t.next_id(),
            baby_id,
            date,
            height,
            weight,
            notes: notes.map(str::to_string),
        };
        t.growth.push(row.clone());
        row
    }

    pub fn seed_milestone(&self, baby_id: i32, date: NaiveDate, title: &str) -> Milestone {
        let mut t = self.seed();
        let row = Milestone {
            milestone_id: t.next_id(),
            baby_id,
            date,
            title: title.to_string(),
            details: None,
        };
        t.milestones.push(row.clone());
        row
    }

    pub fn seed_stool(&self, baby_id: i32, timestamp: NaiveDateTime, color: &str) -> StoolEntry {
        let mut t = self.seed();
        let row = StoolEntry {
            stool_id: t.next_id(),
            baby_id,
            color: color.to_string(),
            consistency: "soft".to_string(),
            notes: None,
            timestamp,
        };
        t.stool.push(row.clone());
        row
    }

    /// Inserts a reminder with an explicit id, for tests that address ids directly
    pub fn seed_reminder_with_id(&self, reminder_id: i32, baby_id: i32, title: &str, date: NaiveDate) -> Reminder {
        let mut t = self.seed();
        t.next_id = t.next_id.max(reminder_id);
        let row = Reminder {
            reminder_id,
            baby_id,
            title: title.to_string(),
            date,
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            notes: None,
        };
        t.reminders.push(row.clone());
        row
    }

    pub fn seed_reminder(&self, baby_id: i32, title: &str, date: NaiveDate) -> Reminder {
        let id = self.seed().next_id();
        self.seed_reminder_with_id(id, baby_id, title, date)
    }

    pub fn seed_post(&self, user_id: i32, title: &str) -> ForumPost {
        let mut t = self.seed();
        let now = Utc::now();
        let post = ForumPost {
            post_id: t.next_id(),
            user_id,
            title: title.to_string(),
            content: format!("{} content", title),
            category: None,
            created_at: now,
            updated_at: now,
        };
        t.posts.push(post.clone());
        post
    }

    pub fn seed_coupon(&self, code: &str, expiration_date: Option<NaiveDate>) -> Coupon {
        let mut t = self.seed();
        let coupon = Coupon {
            coupon_id: t.next_id(),
            code: code.to_string(),
            description: Some(format!("{} discount", code)),
            discount: Some("10%".to_string()),
            expiration_date,
        };
        t.coupons.push(coupon.clone());
        coupon
    }

    pub fn seed_quiz_question(&self, question: &str) -> QuizQuestion {
        let mut t = self.seed();
        let row = QuizQuestion {
            question_id: t.next_id(),
            question: question.to_string(),
            options: json!(["yes", "no"]),
            answer: "yes".to_string(),
            explanation: None,
        };
        t.quiz.push(row.clone());
        row
    }

    pub fn seed_tip(&self, title: &str, content: &str, category: &str) -> CuratedTip {
        let mut t = self.seed();
        let tip = CuratedTip {
            tip_id: t.next_id(),
            title: title.to_string(),
            content: content.to_string(),
            category: Some(category.to_string()),
        };
        t.tips.push(tip.clone());
        tip
    }

    pub fn seed_provider(&self, name: &str, city: &str) -> ChildProvider {
        let mut t = self.seed();
        let provider = ChildProvider {
            provider_id: t.next_id(),
            name: name.to_string(),
            address: Some(format!("1 {} Street", name)),
            city: Some(city.to_string()),
            phone: None,
            email: None,
            capacity: Some(20),
            ages_served: Some("0-5".to_string()),
        };
        t.providers.push(provider.clone());
        provider
    }

    // Inspection

    pub fn baby(&self, baby_id: i32) -> Option<Baby> {
        self.seed().babies.iter().find(|b| b.baby_id == baby_id).cloned()
    }

    pub fn reminder_ids(&self, baby_id: i32) -> Vec<i32> {
        self.seed()
            .reminders
            .iter()
            .filter(|r| r.baby_id == baby_id)
            .map(|r| r.reminder_id)
            .collect()
    }

    pub fn post(&self, post_id: i32) -> Option<ForumPost> {
        self.seed().posts.iter().find(|p| p.post_id == post_id).cloned()
    }

    pub fn export_count(&self, user_id: i32) -> usize {
        self.seed().exports.iter().filter(|e| e.user_id == user_id).count()
    }

    pub fn favorite_count(&self, user_id: i32) -> usize {
        self.seed().favorites.iter().filter(|(u, _, _)| *u == user_id).count()
    }

    pub fn document_count(&self, baby_id: i32) -> usize {
        self.seed().documents.iter().filter(|d| d.baby_id == baby_id).count()
    }

    pub fn is_doctor_linked(&self, doctor_id: i32, baby_id: i32) -> bool {
        self.seed().doctor_baby.contains(&(doctor_id, baby_id))
    }
}

fn in_range(range: &DateRange, date: NaiveDate) -> bool {
    range.contains(date)
}

#[async_trait]
impl DatabaseHealth for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.tables().map(|_| ())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user_id_by_email(&self, email: &str) -> Result<Option<i32>, DatabaseError> {
        let t = self.tables()?;
        Ok(t.users.iter().find(|u| u.email == email).map(|u| u.user_id))
    }

    async fn get_user(&self, user_id: i32) -> Result<Option<User>, DatabaseError> {
        let t = self.tables()?;
        Ok(t.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn create_user(&self, input: NewUser) -> Result<User, DatabaseError> {
        let mut t = self.tables()?;
        if t.users.iter().any(|u| u.email == input.email) {
            return Err(DatabaseError::Conflict(DUPLICATE_EMAIL.to_string()));
        }
        let user = User {
            user_id: t.next_id(),
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            role: input.role.as_str().to_string(),
            created_at: Utc::now(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, user_id: i32, input: UserUpdate) -> Result<Option<User>, DatabaseError> {
        let mut t = self.tables()?;
        Ok(t.users.iter_mut().find(|u| u.user_id == user_id).map(|u| {
            u.first_name = input.first_name;
            u.last_name = input.last_name;
            u.clone()
        }))
    }

    async fn delete_user(&self, user_id: i32) -> Result<bool, DatabaseError> {
        let mut t = self.tables()?;
        let baby_ids: Vec<i32> = t
            .user_baby
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, b)| *b)
            .collect();
        t.user_baby.retain(|(u, _)| *u != user_id);
        let orphaned: Vec<i32> = baby_ids
            .into_iter()
            .filter(|b| !t.user_baby.iter().any(|(_, linked)| linked == b))
            .collect();
        t.delete_babies(&orphaned);

        let own_posts: Vec<i32> = t.posts.iter().filter(|p| p.user_id == user_id).map(|p| p.post_id).collect();
        t.replies.retain(|r| r.user_id != user_id && !own_posts.contains(&r.post_id));
        t.posts.retain(|p| p.user_id != user_id);
        t.journal.retain(|j| j.user_id != user_id);
        t.exports.retain(|e| e.user_id != user_id);
        t.profile_images.retain(|p| p.user_id != user_id);
        t.documents.retain(|d| d.doctor_id != user_id && d.shared_by != user_id);
        t.doctor_baby.retain(|(d, _)| *d != user_id);

        let before = t.users.len();
        t.users.retain(|u| u.user_id != user_id);
        Ok(t.users.len() < before)
    }

    async fn list_doctors(&self) -> Result<Vec<User>, DatabaseError> {
        let t = self.tables()?;
        let mut doctors: Vec<User> = t.users.iter().filter(|u| u.is_doctor()).cloned().collect();
        doctors.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.user_id).cmp(&(&b.last_name, &b.first_name, b.user_id))
        });
        Ok(doctors)
    }

    async fn get_profile_image(&self, user_id: i32) -> Result<Option<ProfileImage>, DatabaseError> {
        let t = self.tables()?;
        Ok(t.profile_images.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn upsert_profile_image(&self, user_id: i32, image_url: String) -> Result<ProfileImage, DatabaseError> {
        let mut t = self.tables()?;
        let image = ProfileImage {
            user_id,
            image_url,
            updated_at: Utc::now(),
        };
        t.profile_images.retain(|p| p.user_id != user_id);
        t.profile_images.push(image.clone());
        Ok(image)
    }
}

#[async_trait]
impl BabyRepository for MemoryStore {
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Baby>, DatabaseError> {
        let t = self.tables()?;
        let mut babies: Vec<Baby> = t
            .babies
            .iter()
            .filter(|b| t.user_baby.contains(&(user_id, b.baby_id)))
            .cloned()
            .collect();
        babies.sort_by_key(|b| b.baby_id);
        Ok(babies)
    }

    async fn get(&self, baby_id: i32) -> Result<Option<Baby>, DatabaseError> {
        let t = self.tables()?;
        Ok(t.babies.iter().find(|b| b.baby_id == baby_id).cloned())
    }

    async fn exists(&self, baby_id: i32) -> Result<bool, DatabaseError> {
        let t = self.tables()?;
        Ok(t.babies.iter().any(|b| b.baby_id == baby_id))
    }

    async fn belongs_to_user(&self, baby_id: i32, user_id: i32) -> Result<bool, DatabaseError> {
        let t = self.tables()?;
        Ok(t.user_baby.contains(&(user_id, baby_id)))
    }

    async fn create_for_user(&self, user_id: i32, input: BabyInput) -> Result<Baby, DatabaseError> {
        let mut t = self.tables()?;
        let baby = Baby {
            baby_id: t.next_id(),
            first_name: input.first_name,
            last_name: input.last_name,
            gender: input.gender,
            birthdate: input.birthdate,
            weight: input.weight,
            height: input.height,
        };
        t.babies.push(baby.clone());
        t.user_baby.push((user_id, baby.baby_id));
        Ok(baby)
    }

    async fn update(&self, baby_id: i32, input: BabyInput) -> Result<Option<Baby>, DatabaseError> {
        let mut t = self.tables()?;
        Ok(t.babies.iter_mut().find(|b| b.baby_id == baby_id).map(|b| {
            b.first_name = input.first_name;
            b.last_name = input.last_name;
            b.gender = input.gender;
            b.birthdate = input.birthdate;
            b.weight = input.weight;
            b.height = input.height;
            b.clone()
        }))
    }

    async fn delete(&self, baby_id: i32) -> Result<bool, DatabaseError> {
        let mut t = self.tables()?;
        Ok(t.delete_babies(&[baby_id]) > 0)
    }
}

#[async_trait]
impl FeedingRepository for MemoryStore {
    async fn list(&self, baby_id: i32, range: DateRange) -> Result<Vec<FeedingSchedule>, DatabaseError> {
        let t = self.tables()?;
        let mut rows: Vec<FeedingSchedule> = t
            .feeding
            .iter()
            .filter(|r| r.baby_id == baby_id && in_range(&range, r.date))
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.date, b.time, b.feeding_schedule_id).cmp(&(a.date, a.time, a.feeding_schedule_id)));
        Ok(rows)
    }

    async fn create(&self, baby_id: i32, input: FeedingInput) -> Result<FeedingSchedule, DatabaseError> {
        let mut t = self.tables()?;
        let row = FeedingSchedule {
            feeding_schedule_id: t.next_id(),
            baby_id,
            date: input.date,
            time: input.time,
            meal: input.meal,
            amount: input.amount,
            feeding_type: input.feeding_type,
            issues: input.issues,
            notes: input.notes,
        };
        t.feeding.push(row.clone());
        Ok(row)
    }

    async fn update(&self, baby_id: i32, id: i32, input: FeedingInput) -> Result<Option<FeedingSchedule>, DatabaseError> {
        let mut t = self.tables()?;
        Ok(t
            .feeding
            .iter_mut()
            .find(|r| r.feeding_schedule_id == id && r.baby_id == baby_id)
            .map(|r| {
                r.date = input.date;
                r.time = input.time;
                r.meal = input.meal;
                r.amount = input.amount;
                r.feeding_type = input.feeding_type;
                r.issues = input.issues;
                r.notes = input.notes;
                r.clone()
            }))
    }

    async fn delete(&self, baby_id: i32, id: i32) -> Result<bool, DatabaseError> {
        let mut t = self.tables()?;
        let before = t.feeding.len();
        t.feeding.retain(|r| !(r.feeding_schedule_id == id && r.baby_id == baby_id));
        Ok(t.feeding.len() < before)
    }
}

#[async_trait]
impl GrowthRepository for MemoryStore {
    async fn list(&self, baby_id: i32, range: DateRange) -> Result<Vec<Growth>, DatabaseError> {
        let t = self.tables()?;
        let mut rows: Vec<Growth> = t
            .growth
            .iter()
            .filter(|r| r.baby_id == baby_id && in_range(&range, r.date))
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.date, b.growth_id).cmp(&(a.date, a.growth_id)));
        Ok(rows)
    }

    async fn create(&self, baby_id: i32, input: GrowthInput) -> Result<Growth, DatabaseError> {
        let mut t = self.tables()?;
        let row = Growth {
            growth_id: t.next_id(),
            baby_id,
            date: input.date,
            height: input.height,
            weight: input.weight,
            notes: input.notes,
        };
        t.growth.push(row.clone());
        Ok(row)
    }

    async fn update(&self, baby_id: i32, id: i32, input: GrowthInput) -> Result<Option<Growth>, DatabaseError> {
        let mut t = self.tables()?;
        Ok(t
            .growth
            .iter_mut()
            .find(|r| r.growth_id == id && r.baby_id == baby_id)
            .map(|r| {
                r.date = input.date;
                r.height = input.height;
                r.weight = input.weight;
                r.notes = input.notes;
                r.clone()
            }))
    }

    async fn delete(&self, baby_id: i32, id: i32) -> Result<bool, DatabaseError> {
        let mut t = self.tables()?;
        let before = t.growth.len();
        t.growth.retain(|r| !(r.growth_id == id && r.baby_id == baby_id));
        Ok(t.growth.len() < before)
    }
}

#[async_trait]
impl MilestoneRepository for MemoryStore {
    async fn list(&self, baby_id: i32, range: DateRange) -> Result<Vec<Milestone>, DatabaseError> {
        let t = self.tables()?;
        let mut rows: Vec<Milestone> = t
            .milestones
            .iter()
            .filter(|r| r.baby_id == baby_id && in_range(&range, r.date))
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.date, b.milestone_id).cmp(&(a.date, a.milestone_id)));
        Ok(rows)
    }

    async fn create(&self, baby_id: i32, input: MilestoneInput) -> Result<Milestone, DatabaseError> {
        let mut t = self.tables()?;
        let row = Milestone {
            milestone_id: t.next_id(),
            baby_id,
            date: input.date,
            title: input.title,
            details: input.details,
        };
        t.milestones.push(row.clone());
        Ok(row)
    }

    async fn update(&self, baby_id: i32, id: i32, input: MilestoneInput) -> Result<Option<Milestone>, DatabaseError> {
        let mut t = self.tables()?;
        Ok(t
            .milestones
            .iter_mut()
            .find(|r| r.milestone_id == id && r.baby_id == baby_id)
            .map(|r| {
                r.date = input.date;
                r.title = input.title;
                r.details = input.details;
                r.clone()
            }))
    }

    async fn delete(&self, baby_id: i32, id: i32) -> Result<bool, DatabaseError> {
        let mut t = self.tables()?;
        let before = t.milestones.len();
        t.milestones.retain(|r| !(r.milestone_id == id && r.baby_id == baby_id));
        Ok(t.milestones.len() < before)
    }
}

#[async_trait]
impl StoolRepository for MemoryStore {
    async fn list(&self, baby_id: i32, range: DateRange) -> Result<Vec<StoolEntry>, DatabaseError> {
        let t = self.tables()?;
        let mut rows: Vec<StoolEntry> = t
            .stool
            .iter()
            .filter(|r| r.baby_id == baby_id && in_range(&range, r.timestamp.date()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.timestamp, b.stool_id).cmp(&(a.timestamp, a.stool_id)));
        Ok(rows)
    }

    async fn create(&self, baby_id: i32, input: StoolInput) -> Result<StoolEntry, DatabaseError> {
        let mut t = self.tables()?;
        let row = StoolEntry {
            stool_id: t.next_id(),
            baby_id,
            color: input.color,
            consistency: input.consistency,
            notes: input.notes,
            timestamp: input.timestamp,
        };
        t.stool.push(row.clone());
        Ok(row)
    }

    async fn update(&self, baby_id: i32, id: i32, input: StoolInput) -> Result<Option<StoolEntry>, DatabaseError> {
        let mut t = self.tables()?;
        Ok(t
            .stool
            .iter_mut()
            .find(|r| r.stool_id == id && r.baby_id == baby_id)
            .map(|r| {
                r.color = input.color;
                r.consistency = input.consistency;
                r.notes = input.notes;
                r.timestamp = input.timestamp;
                r.clone()
            }))
    }

    async fn delete(&self, baby_id: i32, id: i32) -> Result<bool, DatabaseError> {
        let mut t = self.tables()?;
        let before = t.stool.len();
        t.stool.retain(|r| !(r.stool_id == id && r.baby_id == baby_id));
        Ok(t.stool.len() < before)
    }
}

#[async_trait]
impl ReminderRepository for MemoryStore {
    async fn list(&self, baby_id: i32) -> Result<Vec<Reminder>, DatabaseError> {
        let t = self.tables()?;
        let mut rows: Vec<Reminder> = t.reminders.iter().filter(|r| r.baby_id == baby_id).cloned().collect();
        rows.sort_by_key(|r| (r.date, r.time, r.reminder_id));
        Ok(rows)
    }

    async fn create(&self, baby_id: i32, input: ReminderInput) -> Result<Reminder, DatabaseError> {
        let mut t = self.tables()?;
        let row = Reminder {
            reminder_id: t.next_id(),
            baby_id,
            title: input.title,
            date: input.date,
            time: input.time,
            notes: input.notes,
        };
        t.reminders.push(row.clone());
        Ok(row)
    }

    async fn update(&self, baby_id: i32, id: i32, input: ReminderInput) -> Result<Option<Reminder>, DatabaseError> {
        let mut t = self.tables()?;
        Ok(t
            .reminders
            .iter_mut()
            .find(|r| r.reminder_id == id && r.baby_id == baby_id)
            .map(|r| {
                r.title = input.title;
                r.date = input.date;
                r.time = input.time;
                r.notes = input.notes;
                r.clone()
            }))
    }

    async fn delete_many(&self, baby_id: i32, ids: Vec<i32>) -> Result<Vec<i32>, DatabaseError> {
        let mut t = self.tables()?;
        let mut deleted: Vec<i32> = t
            .reminders
            .iter()
            .filter(|r| r.baby_id == baby_id && ids.contains(&r.reminder_id))
            .map(|r| r.reminder_id)
            .collect();
        t.reminders.retain(|r| !(r.baby_id == baby_id && ids.contains(&r.reminder_id)));
        deleted.sort_unstable();
        Ok(deleted)
    }

    async fn upcoming(&self, user_id: i32, from: NaiveDate, to: NaiveDate) -> Result<Vec<Reminder>, DatabaseError> {
        let t = self.tables()?;
        let mut rows: Vec<Reminder> = t
            .reminders
            .iter()
            .filter(|r| t.user_baby.contains(&(user_id, r.baby_id)) && r.date >= from && r.date <= to)
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.date, r.time, r.reminder_id));
        Ok(rows)
    }
}

#[async_trait]
impl ForumRepository for MemoryStore {
    async fn list_posts(&self) -> Result<Vec<ForumPostSummary>, DatabaseError> {
        let t = self.tables()?;
        let mut posts: Vec<ForumPostSummary> = t
            .posts
            .iter()
            .map(|p| ForumPostSummary {
                post_id: p.post_id,
                user_id: p.user_id,
                title: p.title.clone(),
                content: p.content.clone(),
                category: p.category.clone(),
                created_at: p.created_at,
                updated_at: p.updated_at,
                author_name: t.author_name(p.user_id),
                reply_count: t.replies.iter().filter(|r| r.post_id == p.post_id).count() as i64,
            })
            .collect();
        posts.sort_by(|a, b| (b.created_at, b.post_id).cmp(&(a.created_at, a.post_id)));
        Ok(posts)
    }

    async fn get_post(&self, post_id: i32) -> Result<Option<ForumPost>, DatabaseError> {
        let t = self.tables()?;
        Ok(t.posts.iter().find(|p| p.post_id == post_id).cloned())
    }

    async fn list_replies(&self, post_id: i32) -> Result<Vec<ForumReply>, DatabaseError> {
        let t = self.tables()?;
        let mut replies: Vec<ForumReply> = t
            .replies
            .iter()
            .filter(|r| r.post_id == post_id)
            .map(|r| ForumReply {
                author_name: t.author_name(r.user_id),
                ..r.clone()
            })
            .collect();
        replies.sort_by_key(|r| (r.created_at, r.reply_id));
        Ok(replies)
    }

    async fn create_post(&self, user_id: i32, input: PostInput) -> Result<ForumPost, DatabaseError> {
        let mut t = self.tables()?;
        let now = Utc::now();
        let post = ForumPost {
            post_id: t.next_id(),
            user_id,
            title: input.title,
            content: input.content,
            category: input.category,
            created_at: now,
            updated_at: now,
        };
        t.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, post_id: i32, input: PostInput) -> Result<Option<ForumPost>, DatabaseError> {
        let mut t = self.tables()?;
        Ok(t.posts.iter_mut().find(|p| p.post_id == post_id).map(|p| {
            p.title = input.title;
            p.content = input.content;
            p.category = input.category;
            p.updated_at = Utc::now();
            p.clone()
        }))
    }

    async fn delete_post(&self, post_id: i32) -> Result<bool, DatabaseError> {
        let mut t = self.tables()?;
        t.replies.retain(|r| r.post_id != post_id);
        let before = t.posts.len();
        t.posts.retain(|p| p.post_id != post_id);
        Ok(t.posts.len() < before)
    }

    async fn post_exists(&self, post_id: i32) -> Result<bool, DatabaseError> {
        let t = self.tables()?;
        Ok(t.posts.iter().any(|p| p.post_id == post_id))
    }

    async fn post_belongs_to_user(&self, post_id: i32, user_id: i32) -> Result<bool, DatabaseError> {
        let t = self.tables()?;
        Ok(t.posts.iter().any(|p| p.post_id == post_id && p.user_id == user_id))
    }

    async fn create_reply(&self, post_id: i32, user_id: i32, input: ReplyInput) -> Result<ForumReply, DatabaseError> {
        let mut t = self.tables()?;
        let now = Utc::now();
        let reply = ForumReply {
            reply_id: t.next_id(),
            post_id,
            user_id,
            content: input.content,
            created_at: now,
            updated_at: now,
            author_name: t.author_name(user_id),
        };
        t.replies.push(reply.clone());
        Ok(reply)
    }

    async fn update_reply(&self, reply_id: i32, input: ReplyInput) -> Result<Option<ForumReply>, DatabaseError> {
        let mut t = self.tables()?;
        let updated = t.replies.iter_mut().find(|r| r.reply_id == reply_id).map(|r| {
            r.content = input.content;
            r.updated_at = Utc::now();
            r.clone()
        });
        Ok(updated.map(|r| ForumReply {
            author_name: t.author_name(r.user_id),
            ..r
        }))
    }

    async fn delete_reply(&self, reply_id: i32) -> Result<bool, DatabaseError> {
        let mut t = self.tables()?;
        let before = t.replies.len();
        t.replies.retain(|r| r.reply_id != reply_id);
        Ok(t.replies.len() < before)
    }

    async fn reply_exists(&self, reply_id: i32) -> Result<bool, DatabaseError> {
        let t = self.tables()?;
        Ok(t.replies.iter().any(|r| r.reply_id == reply_id))
    }

    async fn reply_belongs_to_user(&self, reply_id: i32, user_id: i32) -> Result<bool, DatabaseError> {
        let t = self.tables()?;
        Ok(t.replies.iter().any(|r| r.reply_id == reply_id && r.user_id == user_id))
    }
}

#[async_trait]
impl JournalRepository for MemoryStore {
    async fn list(&self, user_id: i32) -> Result<Vec<JournalEntry>, DatabaseError> {
        let t = self.tables()?;
        let mut rows: Vec<JournalEntry> = t.journal.iter().filter(|j| j.user_id == user_id).cloned().collect();
        rows.sort_by(|a, b| (b.date, b.entry_id).cmp(&(a.date, a.entry_id)));
        Ok(rows)
    }

    async fn get(&self, entry_id: i32) -> Result<Option<JournalEntry>, DatabaseError> {
        let t = self.tables()?;
        Ok(t.journal.iter().find(|j| j.entry_id == entry_id).cloned())
    }

    async fn create(&self, user_id: i32, input: JournalInput) -> Result<JournalEntry, DatabaseError> {
        let mut t = self.tables()?;
        let now = Utc::now();
        let entry = JournalEntry {
            entry_id: t.next_id(),
            user_id,
            title: input.title,
            content: input.content,
            category: input.category,
            date: input.date,
            created_at: now,
            updated_at: now,
        };
        t.journal.push(entry.clone());
        Ok(entry)
    }

    async fn update(&self, entry_id: i32, input: JournalInput) -> Result<Option<JournalEntry>, DatabaseError> {
        let mut t = self.tables()?;
        Ok(t.journal.iter_mut().find(|j| j.entry_id == entry_id).map(|j| {
            j.title = input.title;
            j.content = input.content;
            j.category = input.category;
            j.date = input.date;
            j.updated_at = Utc::now();
            j.clone()
        }))
    }

    async fn delete(&self, entry_id: i32) -> Result<bool, DatabaseError> {
        let mut t = self.tables()?;
        let before = t.journal.len();
        t.journal.retain(|j| j.entry_id != entry_id);
        Ok(t.journal.len() < before)
    }

    async fn exists(&self, entry_id: i32) -> Result<bool, DatabaseError> {
        let t = self.tables()?;
        Ok(t.journal.iter().any(|j| j.entry_id == entry_id))
    }

    async fn belongs_to_user(&self, entry_id: i32, user_id: i32) -> Result<bool, DatabaseError> {
        let t = self.tables()?;
        Ok(t.journal.iter().any(|j| j.entry_id == entry_id && j.user_id == user_id))
    }
}

#[async_trait]
impl DocumentRepository for MemoryStore {
    async fn list_for_baby(&self, baby_id: i32) -> Result<Vec<SharedDocument>, DatabaseError> {
        let t = self.tables()?;
        let mut docs: Vec<SharedDocument> = t.documents.iter().filter(|d| d.baby_id == baby_id).cloned().collect();
        docs.sort_by(|a, b| (b.shared_at, b.document_id).cmp(&(a.shared_at, a.document_id)));
        Ok(docs)
    }

    async fn share(&self, baby_id: i32, shared_by: i32, input: NewSharedDocument) -> Result<SharedDocument, DatabaseError> {
        let mut t = self.tables()?;
        if !t.doctor_baby.contains(&(input.doctor_id, baby_id)) {
            t.doctor_baby.push((input.doctor_id, baby_id));
        }
        let doc = SharedDocument {
            document_id: t.next_id(),
            baby_id,
            doctor_id: input.doctor_id,
            document_name: input.document_name,
            document_url: input.document_url,
            shared_by,
            shared_at: Utc::now(),
        };
        t.documents.push(doc.clone());
        Ok(doc)
    }

    async fn delete(&self, baby_id: i32, document_id: i32) -> Result<bool, DatabaseError> {
        let mut t = self.tables()?;
        let before = t.documents.len();
        t.documents.retain(|d| !(d.document_id == document_id && d.baby_id == baby_id));
        Ok(t.documents.len() < before)
    }

    async fn list_for_doctor(&self, doctor_id: i32) -> Result<Vec<SharedDocument>, DatabaseError> {
        let t = self.tables()?;
        let mut docs: Vec<SharedDocument> = t
            .documents
            .iter()
            .filter(|d| d.doctor_id == doctor_id && t.doctor_baby.contains(&(doctor_id, d.baby_id)))
            .cloned()
            .collect();
        docs.sort_by(|a, b| (b.shared_at, b.document_id).cmp(&(a.shared_at, a.document_id)));
        Ok(docs)
    }
}

#[async_trait]
impl ExportRepository for MemoryStore {
    async fn record_export(&self, user_id: i32, file_name: &str, format: &str) -> Result<ExportRecord, DatabaseError> {
        let mut t = self.tables()?;
        let record = ExportRecord {
            export_id: t.next_id(),
            user_id,
            file_name: file_name.to_string(),
            format: format.to_string(),
            exported_at: Utc::now(),
        };
        t.exports.push(record.clone());
        Ok(record)
    }

    async fn list_exports(&self, user_id: i32) -> Result<Vec<ExportRecord>, DatabaseError> {
        let t = self.tables()?;
        let mut rows: Vec<ExportRecord> = t.exports.iter().filter(|e| e.user_id == user_id).cloned().collect();
        rows.sort_by(|a, b| (b.exported_at, b.export_id).cmp(&(a.exported_at, a.export_id)));
        Ok(rows)
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl LookupRepository for MemoryStore {
    async fn active_coupons(&self, today: NaiveDate) -> Result<Vec<Coupon>, DatabaseError> {
        let t = self.tables()?;
        let mut coupons: Vec<Coupon> = t
            .coupons
            .iter()
            .filter(|c| c.expiration_date.map_or(true, |d| d >= today))
            .cloned()
            .collect();
        coupons.sort_by_key(|c| (c.expiration_date.is_none(), c.expiration_date, c.coupon_id));
        Ok(coupons)
    }

    async fn quiz_questions(&self, limit: i64) -> Result<Vec<QuizQuestion>, DatabaseError> {
        let t = self.tables()?;
        Ok(t.quiz.iter().take(limit.max(0) as usize).cloned().collect())
    }

    async fn tips(&self, filter: TipFilter) -> Result<Vec<CuratedTip>, DatabaseError> {
        let t = self.tables()?;
        Ok(t
            .tips
            .iter()
            .filter(|tip| {
                filter.category.as_deref().map_or(true, |c| {
                    tip.category.as_deref().map_or(false, |tc| tc.eq_ignore_ascii_case(c))
                })
            })
            .filter(|tip| {
                filter
                    .search
                    .as_deref()
                    .map_or(true, |q| contains_ci(&tip.title, q) || contains_ci(&tip.content, q))
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProviderRepository for MemoryStore {
    async fn list(&self, filter: ProviderFilter) -> Result<Vec<ChildProvider>, DatabaseError> {
        let t = self.tables()?;
        let mut providers: Vec<ChildProvider> = t
            .providers
            .iter()
            .filter(|p| {
                filter.city.as_deref().map_or(true, |c| {
                    p.city.as_deref().map_or(false, |pc| pc.eq_ignore_ascii_case(c))
                })
            })
            .filter(|p| {
                filter.search.as_deref().map_or(true, |q| {
                    contains_ci(&p.name, q) || p.address.as_deref().map_or(false, |a| contains_ci(a, q))
                })
            })
            .cloned()
            .collect();
        providers.sort_by(|a, b| (&a.name, a.provider_id).cmp(&(&b.name, b.provider_id)));
        Ok(providers)
    }

    async fn exists(&self, provider_id: i32) -> Result<bool, DatabaseError> {
        let t = self.tables()?;
        Ok(t.providers.iter().any(|p| p.provider_id == provider_id))
    }

    async fn favorites(&self, user_id: i32) -> Result<Vec<FavoriteProvider>, DatabaseError> {
        let t = self.tables()?;
        let mut rows: Vec<FavoriteProvider> = t
            .favorites
            .iter()
            .filter(|(u, _, _)| *u == user_id)
            .filter_map(|(_, provider_id, at)| {
                t.providers.iter().find(|p| p.provider_id == *provider_id).map(|p| FavoriteProvider {
                    provider_id: p.provider_id,
                    name: p.name.clone(),
                    address: p.address.clone(),
                    city: p.city.clone(),
                    phone: p.phone.clone(),
                    email: p.email.clone(),
                    capacity: p.capacity,
                    ages_served: p.ages_served.clone(),
                    favorited_at: *at,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.favorited_at.cmp(&a.favorited_at).then(a.provider_id.cmp(&b.provider_id)));
        Ok(rows)
    }

    async fn toggle_favorite(&self, user_id: i32, provider_id: i32) -> Result<bool, DatabaseError> {
        let mut t = self.tables()?;
        let before = t.favorites.len();
        t.favorites.retain(|(u, p, _)| !(*u == user_id && *p == provider_id));
        if t.favorites.len() < before {
            return Ok(false);
        }
        t.favorites.push((user_id, provider_id, Utc::now()));
        Ok(true)
    }

    async fn clear_favorites(&self, user_id: i32) -> Result<u64, DatabaseError> {
        let mut t = self.tables()?;
        let before = t.favorites.len();
        t.favorites.retain(|(u, _, _)| *u != user_id);
        Ok((before - t.favorites.len()) as u64)
    }
}

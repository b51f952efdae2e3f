//! Per-baby care logs: feeding schedules, growth, milestones and stool entries.
//!
//! Every statement is scoped by `baby_id` so a row id from another baby never matches.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    DateRange, FeedingInput, FeedingSchedule, Growth, GrowthInput, Milestone, MilestoneInput,
    StoolEntry, StoolInput,
};
use crate::database::ports::{FeedingRepository, GrowthRepository, MilestoneRepository, StoolRepository};

const FEEDING_COLUMNS: &str =
    "feeding_schedule_id, baby_id, date, time, meal, amount, type, issues, notes";
const GROWTH_COLUMNS: &str = "growth_id, baby_id, date, height, weight, notes";
const MILESTONE_COLUMNS: &str = "milestone_id, baby_id, date, title, details";
const STOOL_COLUMNS: &str = "stool_id, baby_id, color, consistency, notes, timestamp";

pub struct PgFeedingRepository {
    pool: PgPool,
}

impl PgFeedingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedingRepository for PgFeedingRepository {
    async fn list(&self, baby_id: i32, range: DateRange) -> Result<Vec<FeedingSchedule>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM feedingschedule WHERE baby_id = $1 \
             AND ($2::date IS NULL OR date >= $2) AND ($3::date IS NULL OR date <= $3) \
             ORDER BY date DESC, time DESC, feeding_schedule_id DESC",
            FEEDING_COLUMNS
        );
        let rows = sqlx::query_as::<_, FeedingSchedule>(&sql)
            .bind(baby_id)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create(&self, baby_id: i32, input: FeedingInput) -> Result<FeedingSchedule, DatabaseError> {
        let sql = format!(
            "INSERT INTO feedingschedule (baby_id, date, time, meal, amount, type, issues, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            FEEDING_COLUMNS
        );
        let row = sqlx::query_as::<_, FeedingSchedule>(&sql)
            .bind(baby_id)
            .bind(input.date)
            .bind(input.time)
            .bind(&input.meal)
            .bind(&input.amount)
            .bind(&input.feeding_type)
            .bind(&input.issues)
            .bind(&input.notes)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, baby_id: i32, id: i32, input: FeedingInput) -> Result<Option<FeedingSchedule>, DatabaseError> {
        let sql = format!(
            "UPDATE feedingschedule SET date = $1, time = $2, meal = $3, amount = $4, type = $5, \
             issues = $6, notes = $7 WHERE feeding_schedule_id = $8 AND baby_id = $9 RETURNING {}",
            FEEDING_COLUMNS
        );
        let row = sqlx::query_as::<_, FeedingSchedule>(&sql)
            .bind(input.date)
            .bind(input.time)
            .bind(&input.meal)
            .bind(&input.amount)
            .bind(&input.feeding_type)
            .bind(&input.issues)
            .bind(&input.notes)
            .bind(id)
            .bind(baby_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, baby_id: i32, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM feedingschedule WHERE feeding_schedule_id = $1 AND baby_id = $2")
            .bind(id)
            .bind(baby_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgGrowthRepository {
    pool: PgPool,
}

impl PgGrowthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GrowthRepository for PgGrowthRepository {
    async fn list(&self, baby_id: i32, range: DateRange) -> Result<Vec<Growth>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM growth WHERE baby_id = $1 \
             AND ($2::date IS NULL OR date >= $2) AND ($3::date IS NULL OR date <= $3) \
             ORDER BY date DESC, growth_id DESC",
            GROWTH_COLUMNS
        );
        let rows = sqlx::query_as::<_, Growth>(&sql)
            .bind(baby_id)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create(&self, baby_id: i32, input: GrowthInput) -> Result<Growth, DatabaseError> {
        let sql = format!(
            "INSERT INTO growth (baby_id, date, height, weight, notes) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            GROWTH_COLUMNS
        );
        let row = sqlx::query_as::<_, Growth>(&sql)
            .bind(baby_id)
            .bind(input.date)
            .bind(input.height)
            .bind(input.weight)
            .bind(&input.notes)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, baby_id: i32, id: i32, input: GrowthInput) -> Result<Option<Growth>, DatabaseError> {
        let sql = format!(
            "UPDATE growth SET date = $1, height = $2, weight = $3, notes = $4 \
             WHERE growth_id = $5 AND baby_id = $6 RETURNING {}",
            GROWTH_COLUMNS
        );
        let row = sqlx::query_as::<_, Growth>(&sql)
            .bind(input.date)
            .bind(input.height)
            .bind(input.weight)
            .bind(&input.notes)
            .bind(id)
            .bind(baby_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, baby_id: i32, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM growth WHERE growth_id = $1 AND baby_id = $2")
            .bind(id)
            .bind(baby_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgMilestoneRepository {
    pool: PgPool,
}

impl PgMilestoneRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MilestoneRepository for PgMilestoneRepository {
    async fn list(&self, baby_id: i32, range: DateRange) -> Result<Vec<Milestone>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM milestones WHERE baby_id = $1 \
             AND ($2::date IS NULL OR date >= $2) AND ($3::date IS NULL OR date <= $3) \
             ORDER BY date DESC, milestone_id DESC",
            MILESTONE_COLUMNS
        );
        let rows = sqlx::query_as::<_, Milestone>(&sql)
            .bind(baby_id)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create(&self, baby_id: i32, input: MilestoneInput) -> Result<Milestone, DatabaseError> {
        let sql = format!(
            "INSERT INTO milestones (baby_id, date, title, details) VALUES ($1, $2, $3, $4) RETURNING {}",
            MILESTONE_COLUMNS
        );
        let row = sqlx::query_as::<_, Milestone>(&sql)
            .bind(baby_id)
            .bind(input.date)
            .bind(&input.title)
            .bind(&input.details)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, baby_id: i32, id: i32, input: MilestoneInput) -> Result<Option<Milestone>, DatabaseError> {
        let sql = format!(
            "UPDATE milestones SET date = $1, title = $2, details = $3 \
             WHERE milestone_id = $4 AND baby_id = $5 RETURNING {}",
            MILESTONE_COLUMNS
        );
        let row = sqlx::query_as::<_, Milestone>(&sql)
            .bind(input.date)
            .bind(&input.title)
            .bind(&input.details)
            .bind(id)
            .bind(baby_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, baby_id: i32, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM milestones WHERE milestone_id = $1 AND baby_id = $2")
            .bind(id)
            .bind(baby_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgStoolRepository {
    pool: PgPool,
}

impl PgStoolRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoolRepository for PgStoolRepository {
    async fn list(&self, baby_id: i32, range: DateRange) -> Result<Vec<StoolEntry>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM stool_entries WHERE baby_id = $1 \
             AND ($2::date IS NULL OR timestamp::date >= $2) AND ($3::date IS NULL OR timestamp::date <= $3) \
             ORDER BY timestamp DESC, stool_id DESC",
            STOOL_COLUMNS
        );
        let rows = sqlx::query_as::<_, StoolEntry>(&sql)
            .bind(baby_id)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create(&self, baby_id: i32, input: StoolInput) -> Result<StoolEntry, DatabaseError> {
        let sql = format!(
            "INSERT INTO stool_entries (baby_id, color, consistency, notes, timestamp) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            STOOL_COLUMNS
        );
        let row = sqlx::query_as::<_, StoolEntry>(&sql)
            .bind(baby_id)
            .bind(&input.color)
            .bind(&input.consistency)
            .bind(&input.notes)
            .bind(input.timestamp)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, baby_id: i32, id: i32, input: StoolInput) -> Result<Option<StoolEntry>, DatabaseError> {
        let sql = format!(
            "UPDATE stool_entries SET color = $1, consistency = $2, notes = $3, timestamp = $4 \
             WHERE stool_id = $5 AND baby_id = $6 RETURNING {}",
            STOOL_COLUMNS
        );
        let row = sqlx::query_as::<_, StoolEntry>(&sql)
            .bind(&input.color)
            .bind(&input.consistency)
            .bind(&input.notes)
            .bind(input.timestamp)
            .bind(id)
            .bind(baby_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, baby_id: i32, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM stool_entries WHERE stool_id = $1 AND baby_id = $2")
            .bind(id)
            .bind(baby_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::leaderboard::BestLift;
use crate::dto::lift::NewLift;
use crate::error::{Result, StorageError};
use crate::models::LiftRecord;

/// Repository for lift row operations.
pub struct LiftRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LiftRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All lifts for one user, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<LiftRecord>> {
        let lifts = sqlx::query_as::<_, LiftRecord>(
            r#"
            SELECT lift_id, user_id, squat, bench, deadlift, body_weight, total,
                   dots_score, age, gender, institution, lift_type, legacy_key, created_at
            FROM lifts
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lifts)
    }

    pub async fn insert(&self, user_id: &str, lift: &NewLift) -> Result<LiftRecord> {
        let record = sqlx::query_as::<_, LiftRecord>(
            r#"
            INSERT INTO lifts (
                user_id, squat, bench, deadlift, body_weight, total, dots_score,
                age, gender, institution, lift_type, legacy_key, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, COALESCE($13, now()))
            RETURNING lift_id, user_id, squat, bench, deadlift, body_weight, total,
                      dots_score, age, gender, institution, lift_type, legacy_key, created_at
            "#,
        )
        .bind(user_id)
        .bind(lift.squat)
        .bind(lift.bench)
        .bind(lift.deadlift)
        .bind(lift.body_weight)
        .bind(lift.total)
        .bind(lift.dots_score)
        .bind(lift.age)
        .bind(lift.gender)
        .bind(&lift.institution)
        .bind(&lift.lift_type)
        .bind(&lift.legacy_key)
        .bind(lift.created_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.code().as_deref() == Some("23503") {
                    return StorageError::ConstraintViolation(
                        "Owning user does not exist".to_string(),
                    );
                }
            }
            StorageError::from(e)
        })?;

        Ok(record)
    }

    /// Replace a lift's values and refresh its timestamp. Returns `None` if
    /// the record does not exist (the caller decides whether that falls back
    /// to a create).
    pub async fn update(
        &self,
        user_id: &str,
        lift_id: Uuid,
        lift: &NewLift,
    ) -> Result<Option<LiftRecord>> {
        let record = sqlx::query_as::<_, LiftRecord>(
            r#"
            UPDATE lifts
            SET squat = $3,
                bench = $4,
                deadlift = $5,
                body_weight = $6,
                total = $7,
                dots_score = $8,
                age = $9,
                gender = $10,
                institution = $11,
                lift_type = $12,
                created_at = now()
            WHERE user_id = $1 AND lift_id = $2
            RETURNING lift_id, user_id, squat, bench, deadlift, body_weight, total,
                      dots_score, age, gender, institution, lift_type, legacy_key, created_at
            "#,
        )
        .bind(user_id)
        .bind(lift_id)
        .bind(lift.squat)
        .bind(lift.bench)
        .bind(lift.deadlift)
        .bind(lift.body_weight)
        .bind(lift.total)
        .bind(lift.dots_score)
        .bind(lift.age)
        .bind(lift.gender)
        .bind(&lift.institution)
        .bind(&lift.lift_type)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    pub async fn delete(&self, user_id: &str, lift_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM lifts
            WHERE user_id = $1 AND lift_id = $2
            "#,
        )
        .bind(user_id)
        .bind(lift_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Each user's highest-scoring lift, one row per user. Rows come back in
    /// user-id order, which gives the ranking service a stable tie order.
    pub async fn best_per_user(&self) -> Result<Vec<BestLift>> {
        let rows = sqlx::query_as::<_, BestLift>(
            r#"
            SELECT DISTINCT ON (l.user_id)
                   l.user_id, u.display_name, l.lift_id, l.squat, l.bench,
                   l.deadlift, l.body_weight, l.total, l.dots_score, l.age,
                   l.gender, l.institution, l.created_at
            FROM lifts l
            INNER JOIN users u ON u.user_id = l.user_id
            ORDER BY l.user_id, l.dots_score DESC, l.created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Whether a row copied from a legacy document already exists. The
    /// legacy migration checks this before every write so reruns are no-ops.
    pub async fn legacy_key_exists(&self, legacy_key: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM lifts WHERE legacy_key = $1)
            "#,
        )
        .bind(legacy_key)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }
}

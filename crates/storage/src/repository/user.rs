use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::dto::user::UpsertUserRequest;
use crate::error::Result;
use crate::models::{Gender, User, UserStats};

const USER_COLUMNS: &str = "user_id, display_name, user_name, email, gender, institution, \
                            best_dots, best_total, last_lift_at, lift_count, created_at, updated_at";

/// Repository for user rows and their derived aggregate columns.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, user_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_display_name(&self, display_name: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE display_name = $1 LIMIT 1"
        ))
        .bind(display_name)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Create or replace a user's profile fields. Aggregate columns are left
    /// alone; only `recompute_stats` writes those.
    pub async fn upsert_profile(
        &self,
        user_id: &str,
        req: &UpsertUserRequest,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (user_id, display_name, user_name, email, gender, institution)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE
            SET display_name = EXCLUDED.display_name,
                user_name = EXCLUDED.user_name,
                email = EXCLUDED.email,
                gender = EXCLUDED.gender,
                institution = EXCLUDED.institution,
                updated_at = now()
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&req.display_name)
        .bind(&req.user_name)
        .bind(req.email.clone().unwrap_or_default())
        .bind(req.gender)
        .bind(&req.institution)
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }

    /// Create the user row if it is missing, without touching an existing
    /// profile. First submissions from users who never filled in a profile
    /// go through here.
    pub async fn ensure_exists(
        &self,
        user_id: &str,
        display_name: &str,
        gender: Gender,
        institution: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, display_name, user_name, gender, institution)
            VALUES ($1, $2, $2, $3, $4)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(display_name)
        .bind(gender)
        .bind(institution)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Used by the legacy migration, which knows the aggregate for a user it
    /// is about to create because it folds it from the lifts being copied.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_with_stats(
        &self,
        user_id: &str,
        display_name: &str,
        gender: Gender,
        institution: &str,
        best_dots: Decimal,
        best_total: Decimal,
        last_lift_at: Option<DateTime<Utc>>,
        lift_count: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, display_name, user_name, gender, institution,
                               best_dots, best_total, last_lift_at, lift_count)
            VALUES ($1, $2, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(display_name)
        .bind(gender)
        .bind(institution)
        .bind(best_dots)
        .bind(best_total)
        .bind(last_lift_at)
        .bind(lift_count)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn exists(&self, user_id: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Rewrite the user's aggregate columns from a fold over their current
    /// lift set. This is the only write path for those columns — every
    /// mutation of the lift set calls this afterwards, so the aggregate can
    /// never drift from its derivation.
    pub async fn recompute_stats(&self, user_id: &str) -> Result<UserStats> {
        let stats = sqlx::query_as::<_, UserStats>(
            r#"
            UPDATE users u
            SET best_dots = s.best_dots,
                best_total = s.best_total,
                last_lift_at = s.last_lift_at,
                lift_count = s.lift_count,
                updated_at = now()
            FROM (
                SELECT COALESCE(MAX(dots_score), 0) AS best_dots,
                       COALESCE(MAX(total), 0) AS best_total,
                       MAX(created_at) AS last_lift_at,
                       COUNT(*) AS lift_count
                FROM lifts
                WHERE user_id = $1
            ) s
            WHERE u.user_id = $1
            RETURNING u.best_dots, u.best_total, u.last_lift_at, u.lift_count
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(crate::error::StorageError::NotFound)?;

        Ok(stats)
    }

    /// Display-name prefix search for the people search box.
    pub async fn search_by_display_name(&self, prefix: &str, limit: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE display_name ILIKE $1 || '%'
            ORDER BY display_name
            LIMIT $2
            "#
        ))
        .bind(prefix)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }
}

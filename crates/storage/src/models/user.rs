use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::Gender;

/// A user profile plus the derived aggregate columns over their lift set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub user_id: String,
    pub display_name: String,
    pub user_name: String,
    pub email: String,
    pub gender: Gender,
    pub institution: String,
    pub best_dots: Decimal,
    pub best_total: Decimal,
    pub last_lift_at: Option<DateTime<Utc>>,
    pub lift_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The derived aggregate alone, as produced by the stats fold.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct UserStats {
    pub best_dots: Decimal,
    pub best_total: Decimal,
    pub last_lift_at: Option<DateTime<Utc>>,
    pub lift_count: i64,
}

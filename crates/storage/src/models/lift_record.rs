use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Gender;

/// A persisted lift entry. All weights are in the canonical unit (pounds);
/// `total` and `dots_score` are derived at write time and never patched
/// independently of the lift weights.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LiftRecord {
    pub lift_id: Uuid,
    pub user_id: String,
    pub squat: Decimal,
    pub bench: Decimal,
    pub deadlift: Decimal,
    pub body_weight: Decimal,
    pub total: Decimal,
    pub dots_score: Decimal,
    pub age: i32,
    pub gender: Gender,
    pub institution: String,
    pub lift_type: String,
    pub legacy_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

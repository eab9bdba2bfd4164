use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::{Gender, WeightUnit};

/// One user's highest-scoring lift, as selected by the lift repository.
/// Input row for the ranking service.
#[derive(Debug, Clone, FromRow)]
pub struct BestLift {
    pub user_id: String,
    pub display_name: String,
    pub lift_id: Uuid,
    pub squat: Decimal,
    pub bench: Decimal,
    pub deadlift: Decimal,
    pub body_weight: Decimal,
    pub total: Decimal,
    pub dots_score: Decimal,
    pub age: i32,
    pub gender: Gender,
    pub institution: String,
    pub created_at: DateTime<Utc>,
}

/// A ranked leaderboard row. Never persisted; recomputed from scratch on
/// every read and on every change notification.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: String,
    pub display_name: String,
    pub squat: f64,
    pub bench: f64,
    pub deadlift: f64,
    pub body_weight: f64,
    pub total: f64,
    pub dots_score: f64,
    pub age: i32,
    pub gender: Gender,
    pub institution: String,
    pub created_at: DateTime<Utc>,
}

/// What a leaderboard view is over: everything, or one institution
/// (matched fuzzily), in a display unit.
#[derive(Debug, Clone, Default)]
pub struct LeaderboardQuery {
    pub institution: Option<String>,
    pub unit: WeightUnit,
}

impl LeaderboardQuery {
    pub fn global(unit: WeightUnit) -> Self {
        Self {
            institution: None,
            unit,
        }
    }

    pub fn institution(name: impl Into<String>, unit: WeightUnit) -> Self {
        Self {
            institution: Some(name.into()),
            unit,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct GlobalLeaderboardParams {
    #[serde(default)]
    pub unit: WeightUnit,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct InstitutionLeaderboardParams {
    pub name: String,
    #[serde(default)]
    pub unit: WeightUnit,
}

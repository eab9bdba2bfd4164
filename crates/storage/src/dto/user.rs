use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{Gender, User};
use crate::services::units;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpsertUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub user_name: String,
    #[validate(email)]
    #[serde(default)]
    pub email: Option<String>,
    pub gender: Gender,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub institution: String,
}

/// Profile plus the derived aggregate, as served to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub user_id: String,
    pub display_name: String,
    pub user_name: String,
    pub email: String,
    pub gender: Gender,
    pub institution: String,
    pub stats: UserStatsResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserStatsResponse {
    pub best_dots: f64,
    pub best_total: f64,
    pub last_lift_at: Option<DateTime<Utc>>,
    pub lift_count: i64,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            display_name: user.display_name,
            user_name: user.user_name,
            email: user.email,
            gender: user.gender,
            institution: user.institution,
            stats: UserStatsResponse {
                best_dots: units::decimal_to_f64(user.best_dots),
                best_total: units::decimal_to_f64(user.best_total),
                last_lift_at: user.last_lift_at,
                lift_count: user.lift_count,
            },
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    pub q: String,
}

/// Minimal hit for the people search box.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    pub user_id: String,
    pub display_name: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            display_name: user.display_name,
        }
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{Gender, LiftRecord, WeightUnit};
use crate::services::units;

/// Plausibility ceilings: a lift further above body weight than this is a
/// typo or a troll, not a record.
const MAX_SQUAT_RATIO: f64 = 5.0;
const MAX_BENCH_RATIO: f64 = 2.5;
const MAX_DEADLIFT_RATIO: f64 = 5.0;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_submit_ratios"))]
pub struct SubmitLiftRequest {
    #[validate(range(min = 0.1, message = "body weight must be positive"))]
    pub body_weight: f64,
    #[validate(range(min = 0.0))]
    pub squat: f64,
    #[validate(range(min = 0.0))]
    pub bench: f64,
    #[validate(range(min = 0.0))]
    pub deadlift: f64,
    #[validate(range(min = 5, max = 120))]
    pub age: i32,
    pub gender: Gender,
    #[serde(default)]
    pub unit: WeightUnit,
    #[serde(default)]
    pub institution: String,
    #[serde(default = "default_lift_type")]
    pub lift_type: String,
}

/// Full corrective edit: the same shape as a submission. Total and score
/// are always recomputed, never accepted from the client.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_update_ratios"))]
pub struct UpdateLiftRequest {
    #[validate(range(min = 0.1, message = "body weight must be positive"))]
    pub body_weight: f64,
    #[validate(range(min = 0.0))]
    pub squat: f64,
    #[validate(range(min = 0.0))]
    pub bench: f64,
    #[validate(range(min = 0.0))]
    pub deadlift: f64,
    #[validate(range(min = 5, max = 120))]
    pub age: i32,
    pub gender: Gender,
    #[serde(default)]
    pub unit: WeightUnit,
    #[serde(default)]
    pub institution: String,
    #[serde(default = "default_lift_type")]
    pub lift_type: String,
}

fn default_lift_type() -> String {
    "Gym Lift".to_string()
}

fn validate_submit_ratios(req: &SubmitLiftRequest) -> Result<(), ValidationError> {
    check_ratios(req.body_weight, req.squat, req.bench, req.deadlift)
}

fn validate_update_ratios(req: &UpdateLiftRequest) -> Result<(), ValidationError> {
    check_ratios(req.body_weight, req.squat, req.bench, req.deadlift)
}

fn check_ratios(body_weight: f64, squat: f64, bench: f64, deadlift: f64) -> Result<(), ValidationError> {
    let checks = [
        ("squat", squat, MAX_SQUAT_RATIO),
        ("bench", bench, MAX_BENCH_RATIO),
        ("deadlift", deadlift, MAX_DEADLIFT_RATIO),
    ];

    for (lift, weight, max_ratio) in checks {
        if weight > body_weight * max_ratio {
            let mut err = ValidationError::new("lift_ratio");
            err.message = Some(
                format!("{lift} exceeds {max_ratio}x body weight").into(),
            );
            return Err(err);
        }
    }

    Ok(())
}

/// Values for a lift row insert, already converted to the canonical unit
/// and scored. `created_at` is only set by the legacy migration; normal
/// submissions take the database default.
#[derive(Debug, Clone)]
pub struct NewLift {
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
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LiftResponse {
    pub lift_id: Uuid,
    pub user_id: String,
    pub squat: f64,
    pub bench: f64,
    pub deadlift: f64,
    pub body_weight: f64,
    pub total: f64,
    pub dots_score: f64,
    pub age: i32,
    pub gender: Gender,
    pub institution: String,
    pub lift_type: String,
    pub unit: WeightUnit,
    pub created_at: DateTime<Utc>,
}

impl LiftResponse {
    /// Render a stored record in the requested display unit (weights rounded
    /// to the nearest half unit; the score is unit-independent).
    pub fn from_record(record: LiftRecord, unit: WeightUnit) -> Self {
        let display = |w| units::decimal_to_f64(units::to_display(w, unit));

        Self {
            lift_id: record.lift_id,
            user_id: record.user_id,
            squat: display(record.squat),
            bench: display(record.bench),
            deadlift: display(record.deadlift),
            body_weight: display(record.body_weight),
            total: display(record.total),
            dots_score: units::decimal_to_f64(record.dots_score),
            age: record.age,
            gender: record.gender,
            institution: record.institution,
            lift_type: record.lift_type,
            unit,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> SubmitLiftRequest {
        SubmitLiftRequest {
            body_weight: 180.0,
            squat: 300.0,
            bench: 200.0,
            deadlift: 350.0,
            age: 25,
            gender: Gender::Male,
            unit: WeightUnit::Lbs,
            institution: "Michigan".to_string(),
            lift_type: default_lift_type(),
        }
    }

    #[test]
    fn plausible_submission_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn squat_over_five_times_body_weight_is_rejected() {
        let mut req = valid_request();
        req.squat = 180.0 * 5.0 + 1.0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn bench_ceiling_is_two_and_a_half_times() {
        let mut req = valid_request();
        req.bench = 180.0 * 2.5 + 0.5;
        assert!(req.validate().is_err());

        req.bench = 180.0 * 2.5;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn non_positive_body_weight_is_rejected() {
        let mut req = valid_request();
        req.body_weight = 0.0;
        assert!(req.validate().is_err());
    }
}

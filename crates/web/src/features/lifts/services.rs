use rust_decimal::{Decimal, RoundingStrategy};
use storage::Database;
use storage::dto::lift::{NewLift, SubmitLiftRequest, UpdateLiftRequest};
use storage::error::Result;
use storage::models::{LiftRecord, WeightUnit};
use storage::repository::{LiftRepository, UserRepository};
use storage::services::feed::LeaderboardFeed;
use storage::services::{scoring, units};
use uuid::Uuid;

use crate::middleware::auth::Identity;

/// Validate-then-persist pipeline for a new lift: convert to the canonical
/// unit, derive total and score, make sure the user row exists, insert,
/// rebuild the owner's aggregate and wake the leaderboard feed.
pub async fn submit_lift(
    db: &Database,
    feed: &LeaderboardFeed,
    identity: &Identity,
    req: &SubmitLiftRequest,
) -> Result<LiftRecord> {
    let new_lift = build_lift(
        req.squat,
        req.bench,
        req.deadlift,
        req.body_weight,
        req.unit,
        req.age,
        req.gender,
        &req.institution,
        &req.lift_type,
    );

    let users = UserRepository::new(db.pool());
    users
        .ensure_exists(
            &identity.user_id,
            &identity.display_name,
            req.gender,
            &req.institution,
        )
        .await?;

    let record = LiftRepository::new(db.pool())
        .insert(&identity.user_id, &new_lift)
        .await?;

    users.recompute_stats(&identity.user_id).await?;
    feed.notify_changed();

    Ok(record)
}

/// Corrective edit. A missing record is not an error: the edit falls back
/// to creating a new record with the submitted values.
pub async fn update_lift(
    db: &Database,
    feed: &LeaderboardFeed,
    identity: &Identity,
    lift_id: Uuid,
    req: &UpdateLiftRequest,
) -> Result<LiftRecord> {
    let new_lift = build_lift(
        req.squat,
        req.bench,
        req.deadlift,
        req.body_weight,
        req.unit,
        req.age,
        req.gender,
        &req.institution,
        &req.lift_type,
    );

    let lifts = LiftRepository::new(db.pool());
    let users = UserRepository::new(db.pool());

    let record = match lifts.update(&identity.user_id, lift_id, &new_lift).await? {
        Some(record) => record,
        None => {
            tracing::info!(
                user = %identity.user_id,
                lift = %lift_id,
                "Edited lift does not exist; creating a new record instead"
            );
            users
                .ensure_exists(
                    &identity.user_id,
                    &identity.display_name,
                    req.gender,
                    &req.institution,
                )
                .await?;
            lifts.insert(&identity.user_id, &new_lift).await?
        }
    };

    users.recompute_stats(&identity.user_id).await?;
    feed.notify_changed();

    Ok(record)
}

pub async fn delete_lift(
    db: &Database,
    feed: &LeaderboardFeed,
    identity: &Identity,
    lift_id: Uuid,
) -> Result<()> {
    LiftRepository::new(db.pool())
        .delete(&identity.user_id, lift_id)
        .await?;

    UserRepository::new(db.pool())
        .recompute_stats(&identity.user_id)
        .await?;
    feed.notify_changed();

    Ok(())
}

pub async fn list_own_lifts(db: &Database, identity: &Identity) -> Result<Vec<LiftRecord>> {
    LiftRepository::new(db.pool())
        .list_for_user(&identity.user_id)
        .await
}

#[allow(clippy::too_many_arguments)]
fn build_lift(
    squat: f64,
    bench: f64,
    deadlift: f64,
    body_weight: f64,
    unit: WeightUnit,
    age: i32,
    gender: storage::models::Gender,
    institution: &str,
    lift_type: &str,
) -> NewLift {
    let canonical = |value: f64| -> Decimal {
        units::to_canonical(to_decimal(value), unit)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    };

    let squat = canonical(squat);
    let bench = canonical(bench);
    let deadlift = canonical(deadlift);
    let body_weight = canonical(body_weight);
    let total = squat + bench + deadlift;
    let dots_score = scoring::score_lift(gender, age, body_weight, total);

    NewLift {
        squat,
        bench,
        deadlift,
        body_weight,
        total,
        dots_score,
        age,
        gender,
        institution: institution.to_string(),
        lift_type: lift_type.to_string(),
        legacy_key: None,
        created_at: None,
    }
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64_retain(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use storage::models::Gender;

    use super::*;

    #[test]
    fn builds_canonical_scored_lift_from_pounds() {
        let lift = build_lift(
            300.0,
            200.0,
            350.0,
            180.0,
            WeightUnit::Lbs,
            25,
            Gender::Male,
            "Michigan",
            "Gym Lift",
        );

        assert_eq!(lift.total, "850".parse().unwrap());
        assert_eq!(lift.dots_score, "262.71".parse().unwrap());
        assert!(lift.legacy_key.is_none());
    }

    #[test]
    fn kilogram_submissions_are_stored_in_pounds() {
        let lift = build_lift(
            100.0,
            80.0,
            120.0,
            75.0,
            WeightUnit::Kg,
            30,
            Gender::Male,
            "",
            "Gym Lift",
        );

        assert_eq!(lift.squat, "220.5".parse::<Decimal>().unwrap());
        assert_eq!(lift.body_weight, "165.38".parse::<Decimal>().unwrap());
        // Total is the sum of the converted lifts: 300 kg -> 661.5 lbs.
        assert_eq!(lift.total, "661.5".parse::<Decimal>().unwrap());
    }
}

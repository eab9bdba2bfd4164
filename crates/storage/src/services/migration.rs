use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use sqlx::PgPool;
use sqlx::types::Json;

use crate::dto::lift::NewLift;
use crate::error::Result;
use crate::models::Gender;
use crate::repository::{LiftRepository, UserRepository};

/// One-off batch job copying the two legacy storage shapes into the
/// canonical `users` + `lifts` tables:
///
/// - `lifters`: one row per lifter with the lift history embedded as a JSON
///   map keyed by lift id.
/// - `legacy_lifts`: a flat table of lift rows carrying denormalized user
///   fields.
///
/// The job is idempotent and resumable: every write is preceded by an
/// existence check (`legacy_key` for lifts, primary key for users), so an
/// interrupted run can simply be started again. Legacy tables that do not
/// exist are skipped.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub users_created: u64,
    pub lifts_migrated: u64,
    pub lifts_skipped: u64,
}

/// A lift document as embedded in the legacy shapes (Firestore-style
/// camelCase field names).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyLiftDoc {
    #[serde(default)]
    pub squat: f64,
    #[serde(default)]
    pub bench: f64,
    #[serde(default)]
    pub deadlift: f64,
    #[serde(default)]
    pub body_weight: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub dots_score: f64,
    #[serde(default)]
    pub age: i32,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub selected_university: Option<String>,
    #[serde(default)]
    pub lift_type: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, sqlx::FromRow)]
struct LegacyLifterRow {
    user_id: Option<String>,
    display_name: Option<String>,
    gender: Option<String>,
    institution: Option<String>,
    lifts: Option<Json<HashMap<String, LegacyLiftDoc>>>,
}

#[derive(Debug, sqlx::FromRow)]
struct LegacyLiftRow {
    id: String,
    user_id: Option<String>,
    display_name: Option<String>,
    #[sqlx(flatten)]
    doc: LegacyLiftSqlDoc,
}

/// Same document, but as flat SQL columns rather than JSON.
#[derive(Debug, sqlx::FromRow)]
struct LegacyLiftSqlDoc {
    squat: f64,
    bench: f64,
    deadlift: f64,
    body_weight: f64,
    total: f64,
    dots_score: f64,
    age: i32,
    gender: Option<String>,
    institution: Option<String>,
    lift_type: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

pub async fn migrate_legacy_shapes(pool: &PgPool) -> Result<MigrationReport> {
    let mut report = MigrationReport::default();

    migrate_embedded_lifters(pool, &mut report).await?;
    migrate_flat_lifts(pool, &mut report).await?;

    tracing::info!(
        users_created = report.users_created,
        lifts_migrated = report.lifts_migrated,
        lifts_skipped = report.lifts_skipped,
        "Legacy migration finished"
    );

    Ok(report)
}

async fn migrate_embedded_lifters(pool: &PgPool, report: &mut MigrationReport) -> Result<()> {
    if !table_exists(pool, "lifters").await? {
        tracing::info!("No legacy lifters table; skipping embedded-map migration");
        return Ok(());
    }

    let rows = sqlx::query_as::<_, LegacyLifterRow>(
        "SELECT user_id, display_name, gender, institution, lifts FROM lifters",
    )
    .fetch_all(pool)
    .await?;

    tracing::info!("Found {} legacy lifter rows to migrate", rows.len());

    let users = UserRepository::new(pool);
    let lift_repo = LiftRepository::new(pool);

    for row in rows {
        let Some(user_id) = row.user_id.filter(|id| !id.is_empty()) else {
            tracing::warn!("Skipping legacy lifter row without a user id");
            continue;
        };

        let display_name = row.display_name.unwrap_or_default();
        let gender = gender_from_label(row.gender.as_deref());
        let institution = row.institution.unwrap_or_default();
        let docs: Vec<(String, LegacyLiftDoc)> = row
            .lifts
            .map(|Json(map)| map.into_iter().collect())
            .unwrap_or_default();

        if !users.exists(&user_id).await? {
            let stats = fold_stats(docs.iter().map(|(_, doc)| doc));
            users
                .insert_with_stats(
                    &user_id,
                    &display_name,
                    gender,
                    &institution,
                    stats.best_dots,
                    stats.best_total,
                    stats.last_lift_at,
                    stats.lift_count,
                )
                .await?;
            report.users_created += 1;
        }

        for (key, doc) in docs {
            let legacy_key = format!("lifters:{user_id}:{key}");
            migrate_one_lift(&lift_repo, report, &user_id, &legacy_key, &doc).await?;
        }
    }

    Ok(())
}

async fn migrate_flat_lifts(pool: &PgPool, report: &mut MigrationReport) -> Result<()> {
    if !table_exists(pool, "legacy_lifts").await? {
        tracing::info!("No legacy flat lifts table; skipping flat-shape migration");
        return Ok(());
    }

    let rows = sqlx::query_as::<_, LegacyLiftRow>(
        r#"
        SELECT id, user_id, display_name, squat, bench, deadlift, body_weight,
               total, dots_score, age, gender, institution, lift_type, created_at
        FROM legacy_lifts
        "#,
    )
    .fetch_all(pool)
    .await?;

    tracing::info!("Found {} standalone legacy lift rows", rows.len());

    let users = UserRepository::new(pool);
    let lift_repo = LiftRepository::new(pool);

    for row in rows {
        let Some(user_id) = row.user_id.filter(|id| !id.is_empty()) else {
            tracing::warn!(lift = %row.id, "Skipping legacy lift row without a user id");
            continue;
        };

        let doc = LegacyLiftDoc {
            squat: row.doc.squat,
            bench: row.doc.bench,
            deadlift: row.doc.deadlift,
            body_weight: row.doc.body_weight,
            total: row.doc.total,
            dots_score: row.doc.dots_score,
            age: row.doc.age,
            gender: row.doc.gender,
            selected_university: row.doc.institution,
            lift_type: row.doc.lift_type,
            timestamp: row.doc.created_at,
        };

        if !users.exists(&user_id).await? {
            let stats = fold_stats(std::iter::once(&doc));
            users
                .insert_with_stats(
                    &user_id,
                    row.display_name.as_deref().unwrap_or(""),
                    gender_from_label(doc.gender.as_deref()),
                    doc.selected_university.as_deref().unwrap_or(""),
                    stats.best_dots,
                    stats.best_total,
                    stats.last_lift_at,
                    stats.lift_count,
                )
                .await?;
            report.users_created += 1;
        }

        let legacy_key = format!("lifts:{}", row.id);
        migrate_one_lift(&lift_repo, report, &user_id, &legacy_key, &doc).await?;
    }

    Ok(())
}

async fn migrate_one_lift(
    repo: &LiftRepository<'_>,
    report: &mut MigrationReport,
    user_id: &str,
    legacy_key: &str,
    doc: &LegacyLiftDoc,
) -> Result<()> {
    if repo.legacy_key_exists(legacy_key).await? {
        report.lifts_skipped += 1;
        return Ok(());
    }

    let new_lift = NewLift {
        squat: dec2(doc.squat),
        bench: dec2(doc.bench),
        deadlift: dec2(doc.deadlift),
        body_weight: dec2(doc.body_weight),
        total: dec2(doc.total),
        dots_score: dec2(doc.dots_score),
        age: doc.age,
        gender: gender_from_label(doc.gender.as_deref()),
        institution: doc.selected_university.clone().unwrap_or_default(),
        lift_type: doc
            .lift_type
            .clone()
            .unwrap_or_else(|| "Gym Lift".to_string()),
        legacy_key: Some(legacy_key.to_string()),
        created_at: doc.timestamp,
    };

    match repo.insert(user_id, &new_lift).await {
        Ok(_) => {
            report.lifts_migrated += 1;
            if report.lifts_migrated % 10 == 0 {
                tracing::info!("Migrated {} lifts so far", report.lifts_migrated);
            }
            Ok(())
        }
        // A concurrent or previously interrupted run already wrote this key.
        Err(e) if e.is_unique_violation() => {
            report.lifts_skipped += 1;
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// The aggregate a user row starts with, folded from the lifts being
/// migrated for them. Mirrors `UserRepository::recompute_stats`.
#[derive(Debug, Default, PartialEq)]
pub struct FoldedStats {
    pub best_dots: Decimal,
    pub best_total: Decimal,
    pub last_lift_at: Option<DateTime<Utc>>,
    pub lift_count: i64,
}

pub fn fold_stats<'a>(docs: impl Iterator<Item = &'a LegacyLiftDoc>) -> FoldedStats {
    let mut stats = FoldedStats::default();

    for doc in docs {
        stats.best_dots = stats.best_dots.max(dec2(doc.dots_score));
        stats.best_total = stats.best_total.max(dec2(doc.total));
        if doc.timestamp > stats.last_lift_at {
            stats.last_lift_at = doc.timestamp;
        }
        stats.lift_count += 1;
    }

    stats
}

fn gender_from_label(label: Option<&str>) -> Gender {
    match label {
        Some(l) if l.eq_ignore_ascii_case("female") => Gender::Female,
        _ => Gender::Male,
    }
}

fn dec2(value: f64) -> Decimal {
    Decimal::from_f64_retain(value)
        .unwrap_or_default()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

async fn table_exists(pool: &PgPool, table: &str) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT to_regclass($1) IS NOT NULL")
        .bind(table)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn doc(dots: f64, total: f64, ts: Option<DateTime<Utc>>) -> LegacyLiftDoc {
        LegacyLiftDoc {
            squat: 300.0,
            bench: 200.0,
            deadlift: 350.0,
            body_weight: 180.0,
            total,
            dots_score: dots,
            age: 25,
            gender: Some("Male".to_string()),
            selected_university: None,
            lift_type: None,
            timestamp: ts,
        }
    }

    #[test]
    fn fold_takes_maxima_and_counts() {
        let t1 = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 6, 2, 9, 30, 0).unwrap();
        let docs = vec![
            doc(262.71, 850.0, Some(t1)),
            doc(301.44, 900.0, Some(t2)),
            doc(250.0, 800.0, None),
        ];

        let stats = fold_stats(docs.iter());

        assert_eq!(stats.best_dots, dec2(301.44));
        assert_eq!(stats.best_total, dec2(900.0));
        assert_eq!(stats.last_lift_at, Some(t2));
        assert_eq!(stats.lift_count, 3);
    }

    #[test]
    fn fold_of_nothing_is_zeroed() {
        let stats = fold_stats(std::iter::empty());
        assert_eq!(stats, FoldedStats::default());
    }

    #[test]
    fn unknown_gender_labels_default_to_male() {
        assert_eq!(gender_from_label(Some("Female")), Gender::Female);
        assert_eq!(gender_from_label(Some("female")), Gender::Female);
        assert_eq!(gender_from_label(Some("other")), Gender::Male);
        assert_eq!(gender_from_label(None), Gender::Male);
    }

    #[test]
    fn legacy_doc_parses_camel_case_fields() {
        let json = serde_json::json!({
            "squat": 300.0,
            "bench": 200.0,
            "deadlift": 350.0,
            "bodyWeight": 180.0,
            "total": 850.0,
            "dotsScore": 262.71,
            "age": 25,
            "gender": "Male",
            "selectedUniversity": "Michigan",
            "liftType": "Gym Lift"
        });

        let doc: LegacyLiftDoc = serde_json::from_value(json).unwrap();
        assert_eq!(doc.body_weight, 180.0);
        assert_eq!(doc.dots_score, 262.71);
        assert_eq!(doc.selected_university.as_deref(), Some("Michigan"));
    }
}

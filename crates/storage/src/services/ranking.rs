use rust_decimal::Decimal;

use crate::dto::leaderboard::{BestLift, LeaderboardEntry};
use crate::models::WeightUnit;
use crate::services::{institutions, units};

/// Assemble a leaderboard view from each user's best lift: optionally
/// restrict to one institution (fuzzy-matched), sort by score descending,
/// and assign 1-based dense ranks — tied scores share a rank and the next
/// distinct score takes the next rank, so there are never gaps. The sort is
/// stable, so tie order is the input order.
pub fn rank(
    best_lifts: Vec<BestLift>,
    institution: Option<&str>,
    unit: WeightUnit,
) -> Vec<LeaderboardEntry> {
    let mut selected: Vec<BestLift> = match institution {
        Some(target) => best_lifts
            .into_iter()
            .filter(|lift| institutions::names_match(&lift.institution, target))
            .collect(),
        None => best_lifts,
    };

    selected.sort_by(|a, b| b.dots_score.cmp(&a.dots_score));

    let mut entries = Vec::with_capacity(selected.len());
    let mut rank = 0u32;
    let mut previous_score: Option<Decimal> = None;

    for lift in selected {
        if previous_score != Some(lift.dots_score) {
            rank += 1;
            previous_score = Some(lift.dots_score);
        }

        entries.push(to_entry(lift, rank, unit));
    }

    entries
}

fn to_entry(lift: BestLift, rank: u32, unit: WeightUnit) -> LeaderboardEntry {
    let display = |w| units::decimal_to_f64(units::to_display(w, unit));

    LeaderboardEntry {
        rank,
        user_id: lift.user_id,
        display_name: lift.display_name,
        squat: display(lift.squat),
        bench: display(lift.bench),
        deadlift: display(lift.deadlift),
        body_weight: display(lift.body_weight),
        total: display(lift.total),
        dots_score: units::decimal_to_f64(lift.dots_score),
        age: lift.age,
        gender: lift.gender,
        institution: lift.institution,
        created_at: lift.created_at,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::Gender;

    fn best_lift(user: &str, dots: &str, institution: &str) -> BestLift {
        BestLift {
            user_id: user.to_string(),
            display_name: user.to_string(),
            lift_id: Uuid::new_v4(),
            squat: "300".parse().unwrap(),
            bench: "200".parse().unwrap(),
            deadlift: "350".parse().unwrap(),
            body_weight: "180".parse().unwrap(),
            total: "850".parse().unwrap(),
            dots_score: dots.parse().unwrap(),
            age: 25,
            gender: Gender::Male,
            institution: institution.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn sorts_descending_with_dense_ranks() {
        let lifts = vec![
            best_lift("alice", "100", ""),
            best_lift("bob", "250", ""),
            best_lift("carol", "250", ""),
        ];

        let board = rank(lifts, None, WeightUnit::Lbs);

        assert_eq!(board.len(), 3);
        assert_eq!(board[0].dots_score, 250.0);
        assert_eq!(board[1].dots_score, 250.0);
        assert_eq!(board[2].dots_score, 100.0);

        // Ties share a rank; no gaps afterwards.
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].rank, 1);
        assert_eq!(board[2].rank, 2);

        // Stable sort keeps input order among the tied pair.
        assert_eq!(board[0].user_id, "bob");
        assert_eq!(board[1].user_id, "carol");
    }

    #[test]
    fn distinct_scores_get_consecutive_ranks() {
        let lifts = vec![
            best_lift("alice", "310.5", ""),
            best_lift("bob", "295", ""),
            best_lift("carol", "402.13", ""),
        ];

        let board = rank(lifts, None, WeightUnit::Lbs);

        let ranks: Vec<u32> = board.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(board[0].user_id, "carol");
    }

    #[test]
    fn institution_filter_uses_fuzzy_matching() {
        let lifts = vec![
            best_lift("alice", "300", "University of Michigan - Ann Arbor"),
            best_lift("bob", "280", "Michigan"),
            best_lift("carol", "350", "Ohio State University"),
        ];

        let board = rank(lifts, Some("Michigan"), WeightUnit::Lbs);

        assert_eq!(board.len(), 2);
        assert_eq!(board[0].user_id, "alice");
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].user_id, "bob");
        assert_eq!(board[1].rank, 2);
    }

    #[test]
    fn empty_input_yields_empty_board() {
        assert!(rank(Vec::new(), None, WeightUnit::Kg).is_empty());
    }

    #[test]
    fn weights_render_in_requested_unit() {
        let board = rank(vec![best_lift("alice", "262.71", "")], None, WeightUnit::Kg);

        // 180 lbs -> 81.63 kg -> nearest half is 81.5
        assert_eq!(board[0].body_weight, 81.5);
        // Score is unit-independent.
        assert_eq!(board[0].dots_score, 262.71);
    }
}

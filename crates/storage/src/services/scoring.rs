use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Gender;
use crate::services::units::decimal_to_f64;

/// DOTS score computation.
///
/// Formula: score = 500 / (c0 + c1·bw + c2·bw² + c3·bw³ + c4·bw⁴) × total,
/// with total and body weight in kilograms and body weight clamped into the
/// valid range for the lifter's gender. Inputs arrive in the canonical
/// storage unit (pounds). Pure and deterministic; callers validate inputs
/// before scoring (non-positive body weight is a validation failure
/// upstream, not here).
const LBS_PER_KG: f64 = 2.205;

const MALE_COEFF: [f64; 5] = [
    -307.75076,
    24.0900756,
    -0.1918759221,
    0.0007391293,
    -0.000001093,
];

const FEMALE_COEFF: [f64; 5] = [
    -57.96288,
    13.6175032,
    -0.1126655495,
    0.0005158568,
    -0.0000010706,
];

const MIN_BODYWEIGHT_KG: f64 = 40.0;
const MAX_BODYWEIGHT_KG_MALE: f64 = 210.0;
const MAX_BODYWEIGHT_KG_FEMALE: f64 = 150.0;

/// Compute the DOTS score for a total lifted at a given body weight, both in
/// pounds, rounded to 2 decimal places.
pub fn dots_score(gender: Gender, body_weight_lbs: Decimal, total_lbs: Decimal) -> Decimal {
    let body_weight = decimal_to_f64(body_weight_lbs) / LBS_PER_KG;
    let total = decimal_to_f64(total_lbs) / LBS_PER_KG;

    let (coeff, max_bw) = match gender {
        Gender::Male => (MALE_COEFF, MAX_BODYWEIGHT_KG_MALE),
        Gender::Female => (FEMALE_COEFF, MAX_BODYWEIGHT_KG_FEMALE),
    };

    let bw = body_weight.clamp(MIN_BODYWEIGHT_KG, max_bw);

    let mut denominator = coeff[0];
    for (i, c) in coeff.iter().enumerate().skip(1) {
        denominator += c * bw.powi(i as i32);
    }

    round2((500.0 / denominator) * total)
}

/// Apply the youth age-adjustment factor to an already-rounded DOTS score.
/// Ages 14–22 get a per-year multiplier; everything else is a no-op (still
/// rounded to 2 decimal places).
pub fn age_adjusted(age: i32, dots: Decimal) -> Decimal {
    let factor = match age {
        14 => "1.23",
        15 => "1.18",
        16 => "1.13",
        17 => "1.08",
        18 => "1.06",
        19 => "1.04",
        20 => "1.03",
        21 => "1.02",
        22 => "1.01",
        _ => return dots.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
    };

    // The factor table is fixed; parsing cannot fail.
    let factor: Decimal = factor.parse().unwrap_or(Decimal::ONE);
    (dots * factor).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Full pipeline for a submission: DOTS then age adjustment.
pub fn score_lift(gender: Gender, age: i32, body_weight_lbs: Decimal, total_lbs: Decimal) -> Decimal {
    age_adjusted(age, dots_score(gender, body_weight_lbs, total_lbs))
}

fn round2(value: f64) -> Decimal {
    Decimal::from_f64_retain(value)
        .unwrap_or_default()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn male_reference_score() {
        // 850 lbs total at 180 lbs body weight.
        assert_eq!(dots_score(Gender::Male, dec("180"), dec("850")), dec("262.71"));
    }

    #[test]
    fn female_reference_score() {
        assert_eq!(dots_score(Gender::Female, dec("130"), dec("600")), dec("305.02"));
    }

    #[test]
    fn score_is_deterministic() {
        let a = dots_score(Gender::Male, dec("180"), dec("850"));
        let b = dots_score(Gender::Male, dec("180"), dec("850"));
        assert_eq!(a, b);
    }

    #[test]
    fn score_is_non_negative_for_valid_inputs() {
        for total in [0, 100, 500, 1200] {
            let score = dots_score(Gender::Male, dec("200"), Decimal::from(total));
            assert!(score >= Decimal::ZERO);
        }
    }

    #[test]
    fn body_weight_clamped_to_lower_bound() {
        // 80 lbs is ~36.3 kg, below the 40 kg floor; 88.2 lbs is exactly
        // 40 kg. Both must score identically.
        let below = dots_score(Gender::Male, dec("80"), dec("500"));
        let at_floor = dots_score(Gender::Male, dec("88.2"), dec("500"));
        assert_eq!(below, at_floor);
        assert_eq!(below, dec("288.23"));
    }

    #[test]
    fn body_weight_clamped_to_gender_ceiling() {
        // 400 and 500 lbs are both above the 150 kg female ceiling, so both
        // clamp to the same denominator.
        let above = dots_score(Gender::Female, dec("400"), dec("600"));
        let further_above = dots_score(Gender::Female, dec("500"), dec("600"));
        assert_eq!(above, further_above);
    }

    #[test]
    fn age_fourteen_gets_largest_factor() {
        assert_eq!(age_adjusted(14, dec("482.92")), dec("593.99"));
    }

    #[test]
    fn age_adjustment_is_noop_outside_range() {
        assert_eq!(age_adjusted(23, dec("262.71")), dec("262.71"));
        assert_eq!(age_adjusted(13, dec("262.71")), dec("262.71"));
        assert_eq!(age_adjusted(45, dec("100.00")), dec("100.00"));
    }

    #[test]
    fn age_twentytwo_gets_smallest_factor() {
        // 200.00 * 1.01 = 202.00
        assert_eq!(age_adjusted(22, dec("200.00")), dec("202"));
    }

    #[test]
    fn end_to_end_adult_submission() {
        // squat 300 + bench 200 + deadlift 350 at 180 lbs, male, age 25.
        let total = dec("300") + dec("200") + dec("350");
        assert_eq!(total, dec("850"));
        assert_eq!(score_lift(Gender::Male, 25, dec("180"), total), dec("262.71"));
    }
}

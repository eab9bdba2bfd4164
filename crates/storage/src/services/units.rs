use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::WeightUnit;

/// Weight unit conversions. Storage is always in pounds; kilograms exist
/// only at the submission and display edges. Displayed values round to the
/// nearest half unit, stored values are kept as entered (after canonical
/// conversion).

fn lbs_per_kg() -> Decimal {
    Decimal::new(2205, 3)
}

/// Convert a submitted weight into the canonical storage unit (pounds).
pub fn to_canonical(weight: Decimal, unit: WeightUnit) -> Decimal {
    match unit {
        WeightUnit::Lbs => weight,
        WeightUnit::Kg => weight * lbs_per_kg(),
    }
}

/// Convert a stored weight (pounds) into the requested display unit,
/// rounded to the nearest half unit.
pub fn to_display(weight_lbs: Decimal, unit: WeightUnit) -> Decimal {
    let value = match unit {
        WeightUnit::Lbs => weight_lbs,
        WeightUnit::Kg => weight_lbs / lbs_per_kg(),
    };

    round_to_half(value)
}

fn round_to_half(value: Decimal) -> Decimal {
    (value * Decimal::TWO).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        / Decimal::TWO
}

/// Lossy bridge for JSON output, where the API surface is plain numbers.
pub fn decimal_to_f64(decimal: Decimal) -> f64 {
    decimal.to_string().parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn kilograms_convert_to_pounds_on_intake() {
        assert_eq!(to_canonical(dec("100"), WeightUnit::Kg), dec("220.5"));
        assert_eq!(to_canonical(dec("180"), WeightUnit::Lbs), dec("180"));
    }

    #[test]
    fn display_rounds_to_nearest_half() {
        assert_eq!(to_display(dec("101.3"), WeightUnit::Lbs), dec("101.5"));
        assert_eq!(to_display(dec("101.2"), WeightUnit::Lbs), dec("101"));
        // 220.5 lbs -> 100 kg exactly
        assert_eq!(to_display(dec("220.5"), WeightUnit::Kg), dec("100"));
        // 225 lbs -> 102.04 kg -> nearest half is 102
        assert_eq!(to_display(dec("225"), WeightUnit::Kg), dec("102"));
    }

    #[test]
    fn round_trip_within_half_unit() {
        for raw in ["60", "82.5", "100", "137.5", "149.9"] {
            let kg = dec(raw);
            let displayed = to_display(to_canonical(kg, WeightUnit::Kg), WeightUnit::Kg);
            let diff = (displayed - kg).abs();
            assert!(diff <= dec("0.5"), "{kg} round-tripped to {displayed}");
        }
    }
}

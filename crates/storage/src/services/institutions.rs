use once_cell::sync::Lazy;
use regex::Regex;

/// Institution name normalization and fuzzy matching.
///
/// Users type institution names free-form, so "The Ohio State University",
/// "Ohio State" and "Ohio State University - Main Campus" must all land on
/// the same leaderboard. Matching is: exact, then normalized-equal, then
/// substring containment guarded by a minimum length so short names cannot
/// swallow each other.

/// Shorter normalized name must be at least this long for a substring match,
/// so "Ohio" can claim "Ohio State" but "A" cannot claim "A&M".
const MIN_SUBSTRING_LEN: usize = 4;

static CAMPUS_QUALIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*-\s*(main\s+campus|ann\s+arbor|college\s+park|university\s+park|campus|main).*$")
        .expect("campus qualifier regex")
});

static LEADING_THE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^the\s+").expect("leading-the regex"));

static TYPE_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+(university|college|institute|school)(\s+of.*)?$")
        .expect("type suffix regex")
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Reduce an institution name to its comparable core: lowercased, campus
/// qualifiers and institutional-type suffixes stripped, whitespace collapsed.
pub fn normalize_name(name: &str) -> String {
    let name = name.to_lowercase();
    let name = name.trim();
    let name = CAMPUS_QUALIFIER.replace(name, "");
    let name = LEADING_THE.replace(&name, "");
    let name = TYPE_SUFFIX.replace(&name, "");
    let name = WHITESPACE.replace_all(&name, " ");
    name.trim().to_string()
}

/// Decide whether two institution names refer to the same institution.
pub fn names_match(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    if a == b {
        return true;
    }

    let norm_a = normalize_name(a);
    let norm_b = normalize_name(b);

    if norm_a == norm_b {
        return true;
    }

    if norm_a.contains(&norm_b) || norm_b.contains(&norm_a) {
        // Guard against false positives on very short names.
        let min_len = norm_a.len().min(norm_b.len());
        if min_len >= MIN_SUBSTRING_LEN {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_decoration() {
        assert_eq!(normalize_name("The Ohio State University"), "ohio state");
        assert_eq!(normalize_name("University of Michigan - Ann Arbor"), "university of michigan");
        assert_eq!(normalize_name("Georgia  Institute   of Technology"), "georgia");
        assert_eq!(normalize_name("Penn State - University Park"), "penn state");
    }

    #[test]
    fn exact_match_short_circuits() {
        assert!(names_match("MIT", "MIT"));
    }

    #[test]
    fn campus_qualifier_matches_plain_name() {
        assert!(names_match("University of Michigan - Ann Arbor", "Michigan"));
    }

    #[test]
    fn type_suffix_matches_plain_name() {
        // "Ohio State University" normalizes to "ohio state"; "ohio" is long
        // enough to pass the substring guard.
        assert!(names_match("Ohio State University", "Ohio"));
    }

    #[test]
    fn leading_the_is_ignored() {
        assert!(names_match("The Ohio State University", "Ohio State"));
    }

    #[test]
    fn short_substrings_do_not_match() {
        assert!(!names_match("A", "B"));
        assert!(!names_match("A&M", "A"));
    }

    #[test]
    fn empty_names_never_match() {
        assert!(!names_match("", ""));
        assert!(!names_match("Michigan", ""));
    }
}

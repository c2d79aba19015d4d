//! Natural ordering for plate-well identifiers.
//!
//! A lexicographic sort puts "A10" before "A2" because the comparison stops at
//! the first differing character. Plate layouts run the column 1..N
//! numerically, so well labels are split into their row letters and column
//! digits and the column is compared as an integer.

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading row letters followed by the column digits, anchored at the start.
/// Anything after the digit run does not take part in the key.
static WELL_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+)([0-9]+)").expect("static well-id pattern"));

/// Derive the sort key for a single well label.
///
/// Labels matching the row+column shape map to `(uppercased row, column)`.
/// Everything else falls back to `(uppercased full label, 0)`, so malformed
/// labels sort deterministically by their own text instead of failing.
pub fn well_sort_key(label: &str) -> (String, u64) {
    match WELL_ID_RE.captures(label) {
        Some(caps) => {
            let row = caps[1].to_ascii_uppercase();
            // Digit runs too long for u64 all land in one top bucket.
            let column = caps[2].parse::<u64>().unwrap_or(u64::MAX);
            (row, column)
        }
        None => (label.to_ascii_uppercase(), 0),
    }
}

/// Split a label into its row letters and column index, if it has that shape.
///
/// Unlike [`well_sort_key`] this returns `None` for malformed labels; it is
/// what the plate-grid code uses to place values at row/column positions.
pub fn split_well_label(label: &str) -> Option<(&str, u32)> {
    let caps = WELL_ID_RE.captures(label)?;
    let row = caps.get(1)?.as_str();
    let column = caps.get(2)?.as_str().parse::<u32>().ok()?;
    Some((row, column))
}

/// Sort well labels in natural order (A1, A2, ..., A10, A11, ..., B1, ...).
///
/// Returns a new, stably sorted vector; the input is left untouched and the
/// returned labels keep their original casing. Never fails, whatever the
/// input strings look like.
pub fn natural_sort_wells(labels: &[String]) -> Vec<String> {
    let mut sorted = labels.to_vec();
    sorted.sort_by_cached_key(|label| well_sort_key(label));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sort(labels: &[&str]) -> Vec<String> {
        let owned: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
        natural_sort_wells(&owned)
    }

    #[test]
    fn numeric_columns_sort_numerically() {
        assert_eq!(sort(&["A1", "A10", "A2"]), vec!["A1", "A2", "A10"]);
    }

    #[test]
    fn rows_sort_before_columns() {
        assert_eq!(sort(&["B1", "A2", "A1"]), vec!["A1", "A2", "B1"]);
    }

    #[test]
    fn output_is_a_permutation_of_the_input() {
        let input = vec![
            "H12".to_string(),
            "A1".to_string(),
            "H12".to_string(),
            "Control".to_string(),
        ];
        let sorted = natural_sort_wells(&input);
        assert_eq!(sorted.len(), input.len(), "no labels inserted or removed");

        let mut expected = input.clone();
        expected.sort();
        let mut actual = sorted.clone();
        actual.sort();
        assert_eq!(actual, expected, "same multiset of labels");
    }

    #[test]
    fn sorting_is_idempotent() {
        let once = sort(&["C3", "A10", "B2", "A2", "Blank"]);
        let twice = natural_sort_wells(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn keys_ignore_case_but_output_keeps_it() {
        assert_eq!(sort(&["a2", "A1"]), vec!["A1", "a2"]);
    }

    #[test]
    fn multi_letter_rows_sort_after_single_letters() {
        assert_eq!(sort(&["AA1", "A1"]), vec!["A1", "AA1"]);
    }

    #[test]
    fn malformed_labels_sort_by_their_own_text() {
        // Keys: ("A", 1), ("BLANK", 0), ("CONTROL", 0).
        assert_eq!(sort(&["Control", "A1", "Blank"]), vec!["A1", "Blank", "Control"]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        // "A1", "A01" and "A1_dup" all derive the key ("A", 1).
        assert_eq!(sort(&["A1_dup", "A01", "A1"]), vec!["A1_dup", "A01", "A1"]);
    }

    #[test]
    fn trailing_characters_are_ignored_by_the_key() {
        assert_eq!(well_sort_key("A1x"), ("A".to_string(), 1));
        assert_eq!(sort(&["A2", "A1x"]), vec!["A1x", "A2"]);
    }

    #[test]
    fn empty_input_and_singletons_pass_through() {
        assert_eq!(sort(&[]), Vec::<String>::new());
        assert_eq!(sort(&["G12"]), vec!["G12"]);
    }

    #[test]
    fn empty_string_maps_to_the_empty_key() {
        assert_eq!(well_sort_key(""), (String::new(), 0));
        assert_eq!(sort(&["A1", ""]), vec!["", "A1"]);
    }

    #[test]
    fn labels_without_digits_use_the_fallback_key() {
        assert_eq!(well_sort_key("5A"), ("5A".to_string(), 0));
        assert_eq!(well_sort_key("Control"), ("CONTROL".to_string(), 0));
    }

    #[test]
    fn split_rejects_what_the_sorter_tolerates() {
        assert_eq!(split_well_label("B7"), Some(("B", 7)));
        assert_eq!(split_well_label("AA12"), Some(("AA", 12)));
        assert_eq!(split_well_label("Control"), None);
        assert_eq!(split_well_label("7B"), None);
    }
}

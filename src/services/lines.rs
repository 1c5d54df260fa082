//! Line-label ordering and the line-picker list.
//!
//! Warsaw line labels mix plain numbers ("20", "200") with letter-prefixed
//! night/express lines ("N61", "E-2"). The picker wants numeric ordering
//! within each letter group rather than plain lexicographic order, which
//! would put "200" before "34".

use std::cmp::Ordering;

use crate::models::Bus;

/// Fixed first entry of the line picker: show every bus, no line filter.
pub const SHOW_ALL_LABEL: &str = "POKAŻ WSZYSTKIE AUTOBUSY";

/// Sort line labels: letter part lexicographically, then numeric part
/// numerically, falling back to a full label compare when either side has no
/// digits. Stable for equal keys.
pub fn sort_bus_lines(mut lines: Vec<String>) -> Vec<String> {
    lines.sort_by(|a, b| compare_lines(a, b));
    lines
}

fn compare_lines(a: &str, b: &str) -> Ordering {
    let letters_a: String = a.chars().filter(|c| !c.is_ascii_digit()).collect();
    let letters_b: String = b.chars().filter(|c| !c.is_ascii_digit()).collect();

    let by_letters = letters_a.cmp(&letters_b);
    if by_letters != Ordering::Equal {
        return by_letters;
    }

    let digits_a: String = a.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits_b: String = b.chars().filter(|c| c.is_ascii_digit()).collect();

    if let (Ok(num_a), Ok(num_b)) = (digits_a.parse::<u64>(), digits_b.parse::<u64>()) {
        return num_a.cmp(&num_b);
    }

    a.cmp(b)
}

/// Distinct line labels in first-seen order.
pub fn distinct_lines(buses: &[Bus]) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for bus in buses {
        if !lines.contains(&bus.lines) {
            lines.push(bus.lines.clone());
        }
    }
    lines
}

/// The ordered picker list: the show-all sentinel first, then the sorted
/// distinct line labels.
pub fn line_picker_entries(buses: &[Bus]) -> Vec<String> {
    let mut entries = vec![SHOW_ALL_LABEL.to_string()];
    entries.extend(sort_bus_lines(distinct_lines(buses)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bus(line: &str) -> Bus {
        Bus {
            lines: line.to_string(),
            lon: 21.0,
            lat: 52.2,
            time: String::new(),
            vehicle_number: format!("v-{line}"),
            brigade: String::new(),
        }
    }

    #[test]
    fn numbers_sort_numerically_and_letter_lines_last() {
        let sorted = sort_bus_lines(vec![
            "200".to_string(),
            "34".to_string(),
            "20".to_string(),
            "N61".to_string(),
        ]);
        assert_eq!(sorted, vec!["20", "34", "200", "N61"]);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(sort_bus_lines(Vec::new()), Vec::<String>::new());
    }

    #[test]
    fn sorting_is_idempotent() {
        let input = vec![
            "N61".to_string(),
            "9".to_string(),
            "E-2".to_string(),
            "192".to_string(),
            "19".to_string(),
        ];
        let once = sort_bus_lines(input);
        let twice = sort_bus_lines(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn groups_by_letter_prefix_with_numeric_order_inside() {
        let sorted = sort_bus_lines(vec![
            "N91".to_string(),
            "N3".to_string(),
            "E2".to_string(),
            "E10".to_string(),
            "7".to_string(),
        ]);
        assert_eq!(sorted, vec!["7", "E2", "E10", "N3", "N91"]);
    }

    #[test]
    fn letter_only_labels_fall_back_to_full_compare() {
        let sorted = sort_bus_lines(vec!["Z".to_string(), "A".to_string()]);
        assert_eq!(sorted, vec!["A", "Z"]);
    }

    #[test]
    fn distinct_lines_dedupes_in_first_seen_order() {
        let buses = vec![bus("180"), bus("N61"), bus("180"), bus("20")];
        assert_eq!(distinct_lines(&buses), vec!["180", "N61", "20"]);
    }

    #[test]
    fn picker_entries_start_with_show_all() {
        let buses = vec![bus("200"), bus("20")];
        let entries = line_picker_entries(&buses);
        assert_eq!(entries, vec![SHOW_ALL_LABEL, "20", "200"]);
    }
}

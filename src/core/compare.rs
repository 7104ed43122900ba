//! Record comparison for sortable tables
//!
//! Ordering rules, applied to the values found at a dotted field path:
//!
//! - absent values (missing path segment or `null`) sort after present ones,
//!   whatever the direction;
//! - two strings are collated for the Ukrainian locale with numeric ordering
//!   (`"item2" < "item10"`);
//! - two numbers compare numerically, two timestamps by instant;
//! - anything else is rendered to a string and collated.
//!
//! Descending order negates the result for two present values only.

use crate::core::field::{FieldSource, FieldValue};
use crate::core::sort::{SortConfig, SortDirection};
use icu_collator::{Collator, CollatorOptions, Numeric};
use icu_locid::locale;
use std::cmp::Ordering;

thread_local! {
    static COLLATOR: Option<Collator> = build_collator();
}

fn build_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.numeric = Some(Numeric::On);
    match Collator::try_new(&locale!("uk").into(), options) {
        Ok(collator) => Some(collator),
        Err(e) => {
            tracing::warn!("Ukrainian collator unavailable, using natural ordering: {}", e);
            None
        }
    }
}

/// Locale-aware, numeric-aware string comparison
pub fn collate(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => natural_cmp(a, b),
    })
}

/// Case-insensitive comparison treating digit runs as numbers
///
/// Used only when the ICU collator cannot be built.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let l_trim = l_run.trim_start_matches('0');
                let r_trim = r_run.trim_start_matches('0');
                let ord = l_trim
                    .len()
                    .cmp(&r_trim.len())
                    .then_with(|| l_trim.cmp(r_trim));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                let ord = l.to_lowercase().cmp(r.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        run.push(c);
    }
    run
}

/// Compare two present leaf values in ascending order
///
/// Values of different kinds are collated through their string rendering,
/// so across kinds the relation is not transitive (`1.25 < 1.5 < "1.7" <
/// 1.25`). [`sort_records`](crate::sorting::sort_records) tolerates that.
pub fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::String(x), FieldValue::String(y)) => collate(x, y),
        (FieldValue::Integer(x), FieldValue::Integer(y)) => x.cmp(y),
        (FieldValue::DateTime(x), FieldValue::DateTime(y)) => x.cmp(y),
        _ => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => collate(&a.render(), &b.render()),
        },
    }
}

/// Compare two resolved keys, absent keys last whatever the direction
pub fn compare_keys(
    left: Option<&FieldValue>,
    right: Option<&FieldValue>,
    direction: SortDirection,
) -> Ordering {
    match (left.filter(|v| !v.is_null()), right.filter(|v| !v.is_null())) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ord = compare_values(x, y);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
    }
}

/// Ascending comparison of the values at `path`, absent values last
pub fn compare_field<T: FieldSource + ?Sized>(a: &T, b: &T, path: &str) -> Ordering {
    compare_keys(
        a.field_value(path).as_ref(),
        b.field_value(path).as_ref(),
        SortDirection::Asc,
    )
}

/// Compare two records under a sort configuration
///
/// Absent values stay at the end for both directions.
pub fn compare_by<T: FieldSource + ?Sized>(a: &T, b: &T, config: &SortConfig) -> Ordering {
    compare_keys(
        a.field_value(&config.field).as_ref(),
        b.field_value(&config.field).as_ref(),
        config.direction,
    )
}

/// [`compare_by`] as a signed number: `-1`, `0` or `1`
pub fn compare_signed<T: FieldSource + ?Sized>(a: &T, b: &T, config: &SortConfig) -> i32 {
    match compare_by(a, b, config) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn asc(field: &str) -> SortConfig {
        SortConfig::asc(field).unwrap()
    }

    fn desc(field: &str) -> SortConfig {
        SortConfig::desc(field).unwrap()
    }

    #[test]
    fn test_numeric_aware_strings() {
        assert_eq!(collate("item2", "item10"), Ordering::Less);
        assert_eq!(collate("item10", "item1"), Ordering::Greater);
    }

    #[test]
    fn test_cyrillic_alphabet_order() {
        // Ukrainian places і and ї after и, and є after е
        assert_eq!(collate("Київ", "Канів"), Ordering::Greater);
        assert_eq!(collate("Євген", "Ельза"), Ordering::Greater);
        assert_eq!(collate("іній", "ялина"), Ordering::Less);
    }

    #[test]
    fn test_natural_fallback() {
        assert_eq!(natural_cmp("item2", "item10"), Ordering::Less);
        assert_eq!(natural_cmp("A-007", "a-7"), Ordering::Less);
        assert_eq!(natural_cmp("Box", "box"), Ordering::Less);
        assert_eq!(natural_cmp("abc", "abcd"), Ordering::Less);
    }

    #[test]
    fn test_numbers_compare_numerically() {
        let a = json!({"qty": 9});
        let b = json!({"qty": 10.5});
        assert_eq!(compare_by(&a, &b, &asc("qty")), Ordering::Less);
        assert_eq!(compare_by(&a, &b, &desc("qty")), Ordering::Greater);
    }

    #[test]
    fn test_datetimes_compare_by_instant() {
        let early = FieldValue::DateTime(Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap());
        let late = FieldValue::DateTime(Utc.with_ymd_and_hms(2024, 11, 1, 8, 0, 0).unwrap());
        assert_eq!(compare_values(&early, &late), Ordering::Less);
    }

    #[test]
    fn test_mixed_types_fall_back_to_strings() {
        let a = json!({"code": 12});
        let b = json!({"code": "12a"});
        assert_eq!(compare_by(&a, &b, &asc("code")), Ordering::Less);
        assert_eq!(
            compare_values(&FieldValue::Boolean(false), &FieldValue::Boolean(true)),
            Ordering::Less
        );
    }

    #[test]
    fn test_absent_values_sort_last_in_both_directions() {
        let present = json!({"client": {"name": "Бета"}});
        let absent = json!({"client": null});
        assert_eq!(compare_by(&absent, &present, &asc("client.name")), Ordering::Greater);
        assert_eq!(compare_by(&absent, &present, &desc("client.name")), Ordering::Greater);
        assert_eq!(compare_by(&present, &absent, &desc("client.name")), Ordering::Less);
        assert_eq!(compare_by(&absent, &absent, &desc("client.name")), Ordering::Equal);
    }

    #[test]
    fn test_direction_symmetry() {
        let records = [
            json!({"v": "item10"}),
            json!({"v": "item2"}),
            json!({"v": 3}),
            json!({"v": true}),
            json!({"v": "Ярослав"}),
        ];
        for a in &records {
            for b in &records {
                assert_eq!(
                    compare_signed(a, b, &desc("v")),
                    -compare_signed(a, b, &asc("v"))
                );
            }
        }
    }

    #[test]
    fn test_nan_never_panics() {
        let nan = FieldValue::Float(f64::NAN);
        assert_eq!(compare_values(&nan, &FieldValue::Integer(1)), Ordering::Equal);
    }

    #[test]
    fn test_compare_field_ignores_direction() {
        let a = json!({"n": 1});
        let b = json!({"n": 2});
        assert_eq!(compare_field(&a, &b, "n"), Ordering::Less);
        assert_eq!(compare_field(&a, &json!({}), "n"), Ordering::Less);
    }
}

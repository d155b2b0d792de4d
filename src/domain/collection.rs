//! Generic grouping and ordering over borrowed record snapshots.
//!
//! Nothing here mutates or takes ownership of the caller's collection: the
//! results borrow from it.

use std::{cmp::Ordering, collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Groups items by a key, stringified for lookup.
///
/// Items keep their original relative order inside each group.
///
/// ```
/// use cidade::domain::collection::group_by;
///
/// let statuses = ["pendente", "andamento", "pendente"];
/// let groups = group_by(&statuses, |s| *s);
/// assert_eq!(groups["pendente"], vec![&"pendente", &"pendente"]);
/// assert_eq!(groups["andamento"].len(), 1);
/// ```
pub fn group_by<'a, T, K, F>(items: &'a [T], key: F) -> BTreeMap<String, Vec<&'a T>>
where
    K: ToString,
    F: Fn(&T) -> K,
{
    let mut groups: BTreeMap<String, Vec<&T>> = BTreeMap::new();
    for item in items {
        groups.entry(key(item).to_string()).or_default().push(item);
    }
    groups
}

/// Counts items per stringified key.
pub fn count_by<T, K, F>(items: &[T], key: F) -> BTreeMap<String, usize>
where
    K: ToString,
    F: Fn(&T) -> K,
{
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(key(item).to_string()).or_insert(0) += 1;
    }
    counts
}

/// Ordering direction for [`sort_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest key first.
    #[default]
    Asc,
    /// Largest key first.
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

/// Returns the items ordered by a key, leaving the input untouched.
///
/// The sort is stable: items with equal keys keep their relative order in
/// both directions. Keys are compared with their natural ordering, so
/// numbers sort numerically and strings lexicographically. Keys that are not
/// comparable even with themselves (a floating-point `NaN`) are placed after
/// every other key when ascending, and before them when descending.
pub fn sort_by<'a, T, K, F>(items: &'a [T], key: F, direction: SortDirection) -> Vec<&'a T>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| {
        let ordering = compare_keys(&key(*a), &key(*b));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

fn compare_keys<K: PartialOrd>(a: &K, b: &K) -> Ordering {
    let a_ordered = a.partial_cmp(a).is_some();
    let b_ordered = b.partial_cmp(b).is_some();
    match (a_ordered, b_ordered) {
        (true, true) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item {
        status: &'static str,
        score: f64,
        label: &'static str,
    }

    const fn item(status: &'static str, score: f64, label: &'static str) -> Item {
        Item {
            status,
            score,
            label,
        }
    }

    #[test]
    fn grouping_preserves_order_within_groups() {
        let items = [
            item("pendente", 1.0, "a"),
            item("andamento", 2.0, "b"),
            item("pendente", 3.0, "c"),
        ];

        let groups = group_by(&items, |i| i.status);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups["pendente"], vec![&items[0], &items[2]]);
        assert_eq!(groups["andamento"], vec![&items[1]]);
    }

    #[test]
    fn grouping_stringifies_keys() {
        let numbers = [1, 2, 3, 4, 5];
        let groups = group_by(&numbers, |n| n % 2 == 0);
        assert_eq!(groups["true"], vec![&2, &4]);
        assert_eq!(groups["false"], vec![&1, &3, &5]);
    }

    #[test]
    fn grouping_empty_input() {
        let empty: [Item; 0] = [];
        assert!(group_by(&empty, |i| i.status).is_empty());
    }

    #[test]
    fn counting() {
        let statuses = ["pendente", "concluida", "pendente", "pendente"];
        let counts = count_by(&statuses, |s| *s);
        assert_eq!(counts["pendente"], 3);
        assert_eq!(counts["concluida"], 1);
        assert!(!counts.contains_key("cancelada"));
    }

    #[test]
    fn sorts_numbers_numerically() {
        let items = [
            item("x", 10.0, "ten"),
            item("x", 9.0, "nine"),
            item("x", 100.0, "hundred"),
        ];

        let labels: Vec<_> = sort_by(&items, |i| i.score, SortDirection::Asc)
            .into_iter()
            .map(|i| i.label)
            .collect();
        assert_eq!(labels, ["nine", "ten", "hundred"]);

        let labels: Vec<_> = sort_by(&items, |i| i.score, SortDirection::Desc)
            .into_iter()
            .map(|i| i.label)
            .collect();
        assert_eq!(labels, ["hundred", "ten", "nine"]);
    }

    #[test]
    fn sorts_strings_lexicographically() {
        let items = [item("b", 0.0, "1"), item("a", 0.0, "2"), item("c", 0.0, "3")];
        let labels: Vec<_> = sort_by(&items, |i| i.status, SortDirection::Asc)
            .into_iter()
            .map(|i| i.label)
            .collect();
        assert_eq!(labels, ["2", "1", "3"]);
    }

    #[test]
    fn sort_is_stable_in_both_directions() {
        let items = [
            item("a", 1.0, "first"),
            item("b", 2.0, "second"),
            item("a", 1.0, "third"),
        ];

        let asc: Vec<_> = sort_by(&items, |i| i.status, SortDirection::Asc)
            .into_iter()
            .map(|i| i.label)
            .collect();
        assert_eq!(asc, ["first", "third", "second"]);

        let desc: Vec<_> = sort_by(&items, |i| i.status, SortDirection::Desc)
            .into_iter()
            .map(|i| i.label)
            .collect();
        assert_eq!(desc, ["second", "first", "third"]);
    }

    #[test]
    fn sort_leaves_input_untouched() {
        let items = [item("b", 0.0, "1"), item("a", 0.0, "2")];
        let _ = sort_by(&items, |i| i.status, SortDirection::Asc);
        assert_eq!(items[0].label, "1");
    }

    #[test]
    fn nan_keys_sort_last() {
        let items = [
            item("x", f64::NAN, "nan"),
            item("x", 2.0, "two"),
            item("x", 1.0, "one"),
        ];
        let labels: Vec<_> = sort_by(&items, |i| i.score, SortDirection::Asc)
            .into_iter()
            .map(|i| i.label)
            .collect();
        assert_eq!(labels, ["one", "two", "nan"]);
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert!("sideways".parse::<SortDirection>().is_err());
    }
}

//! Filtering and ordering of the item collection for display.
//!
//! [`apply_filters`] is a pure function: it never touches the input and
//! returns a freshly ordered subset.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::models::{Category, Item, ItemStatus};

/// Display order of filtered results.
///
/// Unknown keys parse to [`SortKey::Unordered`], which keeps the input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest `dateFound` first
    #[default]
    Recent,
    /// Oldest `dateFound` first
    Oldest,
    /// Title ascending, ignoring case; exact text breaks ties
    Title,
    /// Category name ascending, newest first within a category
    Category,
    /// Input order
    Unordered,
}

impl SortKey {
    /// Parse an optional query value; absent or empty means [`SortKey::Recent`].
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => SortKey::Recent,
            Some(key) => SortKey::from(key),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Recent => "recent",
            SortKey::Oldest => "oldest",
            SortKey::Title => "title",
            SortKey::Category => "category",
            SortKey::Unordered => "unordered",
        }
    }

    fn compare(&self, a: &Item, b: &Item) -> Ordering {
        match self {
            SortKey::Recent => b.date_found.cmp(&a.date_found),
            SortKey::Oldest => a.date_found.cmp(&b.date_found),
            SortKey::Title => a
                .title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.title.cmp(&b.title)),
            SortKey::Category => a
                .category
                .as_str()
                .cmp(b.category.as_str())
                .then_with(|| b.date_found.cmp(&a.date_found)),
            SortKey::Unordered => Ordering::Equal,
        }
    }
}

impl From<&str> for SortKey {
    fn from(key: &str) -> Self {
        match key {
            "recent" => SortKey::Recent,
            "oldest" => SortKey::Oldest,
            "title" => SortKey::Title,
            "category" => SortKey::Category,
            _ => SortKey::Unordered,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SortKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SortKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(SortKey::parse(raw.as_deref()))
    }
}

/// Criteria combined conjunctively; unset fields do not restrict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive text matched against title, description, location and category
    #[serde(default)]
    pub q: String,
    pub category: Option<Category>,
    pub status: Option<ItemStatus>,
    /// Earliest `dateFound`, inclusive
    pub from: Option<NaiveDate>,
    /// Latest `dateFound`, inclusive
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub sort: SortKey,
}

impl FilterCriteria {
    /// Whether any predicate restricts the result. Sorting alone does not.
    pub fn is_active(&self) -> bool {
        !self.q.trim().is_empty()
            || self.category.is_some()
            || self.status.is_some()
            || self.from.is_some()
            || self.to.is_some()
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.matches_with(item, &self.q.trim().to_lowercase())
    }

    fn matches_with(&self, item: &Item, needle: &str) -> bool {
        if self.category.is_some_and(|c| c != item.category) {
            return false;
        }
        if self.status.is_some_and(|s| s != item.status) {
            return false;
        }
        if self.from.is_some_and(|from| item.date_found < from) {
            return false;
        }
        if self.to.is_some_and(|to| item.date_found > to) {
            return false;
        }
        needle.is_empty() || item.search_text().contains(needle)
    }
}

/// Filter and order `items` for display.
pub fn apply_filters(items: &[Item], criteria: &FilterCriteria) -> Vec<Item> {
    let needle = criteria.q.trim().to_lowercase();

    let mut out: Vec<Item> = items
        .iter()
        .filter(|item| criteria.matches_with(item, &needle))
        .cloned()
        .collect();

    // sort_by is stable, so ties keep input order
    out.sort_by(|a, b| criteria.sort.compare(a, b));
    out
}

/// "N items shown (of M)" line for a filtered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultsSummary {
    pub shown: usize,
    pub total: usize,
}

impl ResultsSummary {
    pub fn new(shown: usize, total: usize) -> Self {
        Self { shown, total }
    }
}

impl fmt::Display for ResultsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.shown == 1 { "" } else { "s" };
        write!(f, "{} item{} shown", self.shown, plural)?;
        if self.shown != self.total {
            write!(f, " (of {})", self.total)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Claimer, NewItem};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn item(title: &str, category: Category, found: &str) -> Item {
        Item::new(NewItem {
            title: title.to_string(),
            category,
            location: "Library".to_string(),
            date_found: date(found),
            description: format!("{title} found on campus"),
            image_data: None,
        })
    }

    fn campus() -> Vec<Item> {
        let mut bottle = item("Water Bottle", Category::Accessories, "2024-01-07");
        bottle
            .claim(Claimer {
                name: "Jo".into(),
                email: "jo@campus.edu".into(),
                details: "Teal with stickers".into(),
            })
            .unwrap();

        vec![
            item("Blue Nike Hoodie", Category::Clothing, "2024-01-08"),
            item("TI-84 Calculator", Category::Academic, "2024-01-09"),
            item("AirPods Case", Category::Electronics, "2024-01-05"),
            bottle,
            item("Geometry Notebook", Category::Academic, "2024-01-03"),
            item("Chromebook Charger", Category::Electronics, "2024-01-08"),
        ]
    }

    fn criteria_sets() -> Vec<FilterCriteria> {
        vec![
            FilterCriteria::default(),
            FilterCriteria {
                q: "  CHARGER ".into(),
                ..Default::default()
            },
            FilterCriteria {
                category: Some(Category::Academic),
                sort: SortKey::Title,
                ..Default::default()
            },
            FilterCriteria {
                status: Some(ItemStatus::Unclaimed),
                from: Some(date("2024-01-05")),
                to: Some(date("2024-01-08")),
                sort: SortKey::Oldest,
                ..Default::default()
            },
            FilterCriteria {
                q: "library".into(),
                sort: SortKey::Category,
                ..Default::default()
            },
            FilterCriteria {
                sort: SortKey::Unordered,
                ..Default::default()
            },
        ]
    }

    fn titles(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_single_item_scenario() {
        let items = vec![item("Phone", Category::Electronics, "2024-01-10")];

        let by_category = |category| FilterCriteria {
            category: Some(category),
            ..Default::default()
        };
        assert_eq!(apply_filters(&items, &by_category(Category::Electronics)).len(), 1);
        assert!(apply_filters(&items, &by_category(Category::Clothing)).is_empty());

        let after = FilterCriteria {
            from: Some(date("2024-01-11")),
            ..Default::default()
        };
        assert!(apply_filters(&items, &after).is_empty());
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let items = vec![item("Phone", Category::Electronics, "2024-01-10")];
        let exact = FilterCriteria {
            from: Some(date("2024-01-10")),
            to: Some(date("2024-01-10")),
            ..Default::default()
        };
        assert_eq!(apply_filters(&items, &exact).len(), 1);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let items = campus();
        for criteria in criteria_sets() {
            let once = apply_filters(&items, &criteria);
            let twice = apply_filters(&once, &criteria);
            assert_eq!(once, twice, "criteria {criteria:?}");
        }
    }

    #[test]
    fn test_every_result_satisfies_every_predicate() {
        let items = campus();
        for criteria in criteria_sets() {
            let out = apply_filters(&items, &criteria);
            assert!(out.len() <= items.len());
            for found in &out {
                assert!(criteria.matches(found), "{} vs {criteria:?}", found.title);
            }
            let expected = items.iter().filter(|i| criteria.matches(i)).count();
            assert_eq!(out.len(), expected);
        }
    }

    #[test]
    fn test_input_is_not_mutated() {
        let items = campus();
        let before = items.clone();
        apply_filters(
            &items,
            &FilterCriteria {
                sort: SortKey::Title,
                ..Default::default()
            },
        );
        assert_eq!(items, before);
    }

    #[test]
    fn test_recent_and_oldest_are_reverses_without_ties() {
        let items: Vec<Item> = ["2024-01-04", "2024-01-09", "2024-01-01", "2024-01-06"]
            .iter()
            .enumerate()
            .map(|(n, d)| item(&format!("Item {n}"), Category::Other, d))
            .collect();

        let recent = apply_filters(&items, &FilterCriteria::default());
        let mut oldest = apply_filters(
            &items,
            &FilterCriteria {
                sort: SortKey::Oldest,
                ..Default::default()
            },
        );
        oldest.reverse();
        assert_eq!(recent, oldest);
    }

    #[test]
    fn test_category_sort_breaks_ties_by_newest() {
        let out = apply_filters(
            &campus(),
            &FilterCriteria {
                sort: SortKey::Category,
                ..Default::default()
            },
        );
        assert_eq!(
            titles(&out),
            vec![
                "TI-84 Calculator",
                "Geometry Notebook",
                "Water Bottle",
                "Blue Nike Hoodie",
                "Chromebook Charger",
                "AirPods Case",
            ]
        );
    }

    #[test]
    fn test_recent_sort_is_stable_on_ties() {
        let out = apply_filters(&campus(), &FilterCriteria::default());
        // Hoodie precedes Charger in the input; both found 2024-01-08
        assert_eq!(
            &titles(&out)[..3],
            &["TI-84 Calculator", "Blue Nike Hoodie", "Chromebook Charger"]
        );
    }

    #[test]
    fn test_title_sort_ignores_case() {
        let items = vec![
            item("Zebra Scarf", Category::Clothing, "2024-01-02"),
            item("apple Charger", Category::Electronics, "2024-01-03"),
            item("Apple Charger", Category::Electronics, "2024-01-04"),
            item("mittens", Category::Clothing, "2024-01-05"),
        ];
        let criteria = FilterCriteria {
            sort: SortKey::Title,
            ..Default::default()
        };
        assert_eq!(
            titles(&apply_filters(&items, &criteria)),
            vec!["Apple Charger", "apple Charger", "mittens", "Zebra Scarf"]
        );
    }

    #[test]
    fn test_unknown_sort_key_keeps_input_order() {
        let items = campus();
        let criteria = FilterCriteria {
            sort: SortKey::parse(Some("popularity")),
            ..Default::default()
        };
        assert_eq!(criteria.sort, SortKey::Unordered);
        assert_eq!(apply_filters(&items, &criteria), items);
    }

    #[test]
    fn test_text_query_matches_category_name() {
        let out = apply_filters(
            &campus(),
            &FilterCriteria {
                q: "electronics".into(),
                ..Default::default()
            },
        );
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse(None), SortKey::Recent);
        assert_eq!(SortKey::parse(Some(" ")), SortKey::Recent);
        assert_eq!(SortKey::parse(Some("title")), SortKey::Title);
    }

    #[test]
    fn test_is_active_ignores_sort() {
        assert!(!FilterCriteria::default().is_active());
        assert!(
            !FilterCriteria {
                sort: SortKey::Title,
                ..Default::default()
            }
            .is_active()
        );
        assert!(
            FilterCriteria {
                status: Some(ItemStatus::Claimed),
                ..Default::default()
            }
            .is_active()
        );
    }

    #[test]
    fn test_results_summary() {
        assert_eq!(ResultsSummary::new(1, 1).to_string(), "1 item shown");
        assert_eq!(ResultsSummary::new(3, 8).to_string(), "3 items shown (of 8)");
        assert_eq!(ResultsSummary::new(0, 8).to_string(), "0 items shown (of 8)");
    }
}

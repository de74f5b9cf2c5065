//! Plain-text rendering for listings and item details.

use domain_items::{Item, ItemStatus, ResultsSummary};
use std::fmt::Write;

/// One line per item: id, status, date, category, title and location.
pub fn item_line(item: &Item) -> String {
    format!(
        "{}  {:<9}  {}  {:<11}  {} @ {}",
        item.id, item.status, item.date_found, item.category, item.title, item.location
    )
}

pub fn listing(items: &[Item], total: usize) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&item_line(item));
        out.push('\n');
    }
    out.push_str(&ResultsSummary::new(items.len(), total).to_string());
    out
}

pub fn item_details(item: &Item) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", item.title);
    let _ = writeln!(out, "  id:          {}", item.id);
    let _ = writeln!(out, "  category:    {}", item.category);
    let _ = writeln!(out, "  found:       {} at {}", item.date_found, item.location);
    let _ = writeln!(out, "  description: {}", item.description);
    let status = match item.status {
        ItemStatus::Claimed => "Claimed",
        ItemStatus::Unclaimed => "Unclaimed",
    };
    let _ = writeln!(out, "  status:      {}", status);
    if let Some(image) = &item.image_data {
        let _ = writeln!(out, "  photo:       {} ({} bytes)", image.mime, image.bytes.len());
    }
    if let Some(claimer) = &item.claimer {
        let _ = writeln!(out, "  claimed by:  {} <{}>", claimer.name, claimer.email);
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_items::{Category, Claimer, NewItem};

    fn item() -> Item {
        Item::new(NewItem {
            title: "AirPods Case".into(),
            category: Category::Electronics,
            location: "Gym bleachers".into(),
            date_found: "2024-01-10".parse().unwrap(),
            description: "White case, no earbuds".into(),
            image_data: None,
        })
    }

    #[test]
    fn test_item_line_contains_key_fields() {
        let item = item();
        let line = item_line(&item);
        assert!(line.starts_with(&item.id.to_string()));
        assert!(line.contains("unclaimed"));
        assert!(line.contains("2024-01-10"));
        assert!(line.ends_with("AirPods Case @ Gym bleachers"));
    }

    #[test]
    fn test_listing_ends_with_summary() {
        let items = vec![item()];
        let out = listing(&items, 3);
        assert_eq!(out.lines().count(), 2);
        assert_eq!(out.lines().last(), Some("1 item shown (of 3)"));
    }

    #[test]
    fn test_details_show_claimer_when_present() {
        let mut item = item();
        assert!(!item_details(&item).contains("claimed by"));

        item.claim(Claimer {
            name: "Sam".into(),
            email: "sam@example.com".into(),
            details: "crack on the lid".into(),
        })
        .unwrap();
        let details = item_details(&item);
        assert!(details.contains("status:      Claimed"));
        assert!(details.contains("claimed by:  Sam <sam@example.com>"));
    }
}

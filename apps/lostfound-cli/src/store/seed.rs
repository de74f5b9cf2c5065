//! Demo listings for a fresh local store.

use chrono::{Days, NaiveDate};
use domain_items::{Category, Item, ItemStatus, NewItem};

struct Sample {
    title: &'static str,
    category: Category,
    location: &'static str,
    days_ago: u64,
    description: &'static str,
    claimed: bool,
}

const SAMPLES: [Sample; 8] = [
    Sample {
        title: "Blue Nike Hoodie",
        category: Category::Clothing,
        location: "Library",
        days_ago: 2,
        description: "Blue pullover, size M, white swoosh logo",
        claimed: false,
    },
    Sample {
        title: "TI-84 Calculator",
        category: Category::Academic,
        location: "Room 204",
        days_ago: 1,
        description: "Name sticker partially peeled, scratches on back",
        claimed: false,
    },
    Sample {
        title: "AirPods Case",
        category: Category::Electronics,
        location: "Gym bleachers",
        days_ago: 5,
        description: "White case, no earbuds, small crack",
        claimed: false,
    },
    Sample {
        title: "Water Bottle",
        category: Category::Accessories,
        location: "Cafeteria",
        days_ago: 3,
        description: "Hydro Flask, teal, stickers on side",
        claimed: true,
    },
    Sample {
        title: "Geometry Notebook",
        category: Category::Academic,
        location: "Bus #12",
        days_ago: 7,
        description: "Graph-ruled, label: \"Geo\"",
        claimed: false,
    },
    Sample {
        title: "Black Scarf",
        category: Category::Clothing,
        location: "Auditorium",
        days_ago: 4,
        description: "Soft knit scarf",
        claimed: false,
    },
    Sample {
        title: "Chromebook Charger",
        category: Category::Electronics,
        location: "Hallway C",
        days_ago: 2,
        description: "USB-C 65W",
        claimed: false,
    },
    Sample {
        title: "Car Keys",
        category: Category::Other,
        location: "Parking Lot B",
        days_ago: 6,
        description: "Key fob with red tag",
        claimed: false,
    },
];

/// Fresh demo items with `dateFound` counted back from `today`.
pub fn demo_items(today: NaiveDate) -> Vec<Item> {
    SAMPLES
        .iter()
        .map(|sample| {
            let mut item = Item::new(NewItem {
                title: sample.title.to_string(),
                category: sample.category,
                location: sample.location.to_string(),
                date_found: today
                    .checked_sub_days(Days::new(sample.days_ago))
                    .unwrap_or(today),
                description: sample.description.to_string(),
                image_data: None,
            });
            if sample.claimed {
                item.status = ItemStatus::Claimed;
            }
            item
        })
        .collect()
}

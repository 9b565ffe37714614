//! Built-in sample tables used when no data file can be read.

use crate::models::{DashboardKind, Dataset};

const PREFECTURES: [(&str, f64); 7] = [
    ("Tokyo", 300.0),
    ("Osaka", 200.0),
    ("Kanagawa", 250.0),
    ("Aichi", 180.0),
    ("Hokkaido", 220.0),
    ("Fukuoka", 150.0),
    ("Hyogo", 170.0),
];

const PRODUCTS: [(&str, &str, f64); 6] = [
    ("2024-01-01", "Widget", 120.0),
    ("2024-01-01", "Gadget", 80.0),
    ("2024-01-02", "Widget", 150.0),
    ("2024-01-02", "Gadget", 95.0),
    ("2024-01-03", "Widget", 130.0),
    ("2024-01-03", "Gadget", 110.0),
];

/// The fixed sample table for a dashboard.
pub fn fallback_dataset(kind: DashboardKind) -> Dataset {
    let mut dataset = Dataset::for_kind(kind);

    match kind {
        DashboardKind::Prefectures => {
            for (prefecture, sales) in PREFECTURES {
                dataset.push(vec![prefecture.to_string()], sales);
            }
        }
        DashboardKind::Products => {
            for (date, product, sales) in PRODUCTS {
                dataset.push(vec![date.to_string(), product.to_string()], sales);
            }
        }
    }

    dataset
}

use std::collections::BTreeSet;

use crate::product::Product;

/// Categories offered to the admin form. Any other string is still accepted.
pub const PREDEFINED_CATEGORIES: [&str; 10] = [
    "Fashion-Men",
    "Fashion-Women",
    "Electronics",
    "Books",
    "Home & Kitchen",
    "Sports & Outdoors",
    "Health & Beauty",
    "Toys & Games",
    "Automotive",
    "Garden & Outdoor",
];

/// Keep products whose category equals `category` exactly (case-sensitive).
/// `None` or an empty filter keeps everything. Order is preserved.
pub fn filter_by_category(products: Vec<Product>, category: Option<&str>) -> Vec<Product> {
    match category {
        None | Some("") => products,
        Some(wanted) => products.into_iter().filter(|p| p.category == wanted).collect(),
    }
}

/// Sorted, de-duplicated union of the predefined list and stored categories.
pub fn available_categories(products: &[Product]) -> Vec<String> {
    PREDEFINED_CATEGORIES
        .iter()
        .copied()
        .chain(products.iter().map(|p| p.category.as_str()))
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

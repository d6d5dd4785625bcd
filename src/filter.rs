//! Client-side product filters.
//!
//! Both filters are pure and order-preserving. They always run against the
//! full product list, so applying one replaces the other instead of
//! narrowing it further.

use crate::models::Product;

/// The filter currently shaping the rendered view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveFilter {
    #[default]
    None,
    Search(String),
    Category(String),
}

impl ActiveFilter {
    /// Apply this filter to the full list.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        match self {
            ActiveFilter::None => products.iter().collect(),
            ActiveFilter::Search(term) => search(products, term),
            ActiveFilter::Category(category) => by_category(products, category),
        }
    }
}

/// Products whose name or description contains `term`, ignoring case.
pub fn search<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let needle = term.to_lowercase();
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Products in exactly `category`. An empty category matches everything.
pub fn by_category<'a>(products: &'a [Product], category: &str) -> Vec<&'a Product> {
    if category.is_empty() {
        return products.iter().collect();
    }
    products.iter().filter(|p| p.category == category).collect()
}

//! Shipped jurisdictions
//!
//! Each module declares one dataset's table, default columns, joins, filter
//! templates and coordinate projection as a [`Retriever`].

mod alberta;
mod british_columbia;
mod nova_scotia;
mod ontario;
mod saskatchewan;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::wells::{Category, Retriever};

/// Slugs in presentation order
pub const SLUGS: [&str; 5] = [
    alberta::SLUG,
    british_columbia::SLUG,
    ontario::SLUG,
    saskatchewan::SLUG,
    nova_scotia::SLUG,
];

/// `2002-05-16 12:00:00.000 AM`
const AMPM_LAYOUT: &str = "%Y-%m-%d %-I:%M:00.000 %p";

fn text(name: &str, values: &[&str]) -> Category {
    Category::new(name, values.iter().copied())
}

fn codes(name: &str, values: &[i64]) -> Category {
    Category::new(name, values.iter().copied())
}

/// Immutable slug to [`Retriever`] lookup shared across requests
#[derive(Debug, Clone)]
pub struct DatasetRegistry {
    retrievers: BTreeMap<&'static str, Arc<Retriever>>,
}

impl DatasetRegistry {
    /// Every shipped dataset
    pub fn standard() -> Self {
        let retrievers = [
            (alberta::SLUG, alberta::retriever()),
            (british_columbia::SLUG, british_columbia::retriever()),
            (ontario::SLUG, ontario::retriever()),
            (saskatchewan::SLUG, saskatchewan::retriever()),
            (nova_scotia::SLUG, nova_scotia::retriever()),
        ]
        .into_iter()
        .map(|(slug, retriever)| (slug, Arc::new(retriever)))
        .collect();
        Self { retrievers }
    }

    pub fn get(&self, slug: &str) -> Option<&Arc<Retriever>> {
        self.retrievers.get(slug)
    }

    /// Datasets in [`SLUGS`] order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Retriever>> {
        SLUGS.iter().filter_map(|slug| self.retrievers.get(slug))
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.retrievers.contains_key(slug)
    }
}

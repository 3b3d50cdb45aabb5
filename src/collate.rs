//! Locale-aware ordering for user-facing listings.
//!
//! Store names are alphabetized with Spanish collation so accented
//! characters land alongside their unaccented counterparts instead of after
//! the whole ASCII range, which is what byte ordering would do.

use std::cmp::Ordering;
use std::collections::HashSet;

use icu_collator::{Collator, CollatorOptions, Strength};
use icu_locid::locale;
use once_cell::sync::Lazy;

static COLLATOR: Lazy<Collator> = Lazy::new(|| {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Tertiary);
    Collator::try_new(&locale!("es").into(), options).expect("embedded es collation data")
});

pub fn compare(a: &str, b: &str) -> Ordering {
    COLLATOR.compare(a, b)
}

/// Collapse duplicates, drop blank entries, and sort with the locale
/// collator. Input order is irrelevant.
pub fn dedupe_and_sort(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out: Vec<String> = names
        .into_iter()
        .filter(|n| !n.trim().is_empty())
        .filter(|n| seen.insert(n.clone()))
        .collect();
    out.sort_by(|a, b| compare(a, b));
    out
}

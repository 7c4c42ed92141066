// ABOUTME: Process-wide cache of parsed selectors keyed by their source text.
// ABOUTME: Invalid selectors are cached too, so repeated bad input is rejected cheaply.

//! Selector caching for repeated queries.
//!
//! Every selection and filter operation takes selector text. Parsing it is
//! cheap but not free, and callers tend to reuse a handful of selectors, so
//! parsed selectors are kept in a shared map.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use super::Selector;

static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Arc<Selector>>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or parses a selector, caching the result.
///
/// Returns `None` if `css` is not a valid selector. A poisoned lock is
/// recovered rather than propagated; the map only ever holds complete entries.
pub fn get_or_compile(css: &str) -> Option<Arc<Selector>> {
    {
        let cache = SELECTOR_CACHE.read().unwrap_or_else(|e| e.into_inner());
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = compile(css);
    let mut cache = SELECTOR_CACHE.write().unwrap_or_else(|e| e.into_inner());
    if let Some(cached) = cache.get(css) {
        return cached.clone();
    }
    cache.insert(css.to_string(), compiled.clone());
    compiled
}

fn compile(css: &str) -> Option<Arc<Selector>> {
    match Selector::parse(css) {
        Ok(selector) => Some(Arc::new(selector)),
        Err(err) => {
            log::debug!("rejecting selector {:?}: {}", css, err);
            None
        }
    }
}

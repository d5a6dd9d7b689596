//! CSS-query helpers over parsed markup.
//!
//! Thin wrappers around the `scraper` crate that encode the assembly rules
//! every DOM-driven source shares: text fragments are trimmed, empty
//! fragments dropped, and the remainder joined with single spaces.
//! Selectors are static strings, so a selector that fails to parse is a
//! programmer error.

use scraper::{ElementRef, Selector};

/// Parses a static CSS selector.
///
/// # Panics
///
/// Panics when the selector is syntactically invalid; selectors in this
/// crate are compile-time constants.
#[must_use]
pub fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("valid CSS selector")
}

/// Collects the text of every element matching `css` under `scope`:
/// fragments trimmed, empties skipped, joined with single spaces.
/// Returns `None` when nothing non-empty matched.
#[must_use]
pub fn text_joined(scope: ElementRef<'_>, css: &str) -> Option<String> {
    let selector = sel(css);
    let joined = scope
        .select(&selector)
        .flat_map(|el| el.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!joined.is_empty()).then_some(joined)
}

/// Joined text of the first element matching `css`, or `None`.
#[must_use]
pub fn first_text(scope: ElementRef<'_>, css: &str) -> Option<String> {
    let selector = sel(css);
    scope.select(&selector).next().and_then(|el| {
        let joined = el
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!joined.is_empty()).then_some(joined)
    })
}

/// `attr` of the first element matching `css`, or `None`.
#[must_use]
pub fn first_attr(scope: ElementRef<'_>, css: &str, attr: &str) -> Option<String> {
    let selector = sel(css);
    scope
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_owned)
}

/// `attr` of every element matching `css`, in document order.
#[must_use]
pub fn all_attrs(scope: ElementRef<'_>, css: &str, attr: &str) -> Vec<String> {
    let selector = sel(css);
    scope
        .select(&selector)
        .filter_map(|el| el.value().attr(attr))
        .map(str::to_owned)
        .collect()
}

//! Pagination termination logic.
//!
//! The page loop itself lives in [`crate::pipeline`]; this module decides,
//! from what a listing page exposed, whether the loop may advance. The
//! sites' own pagination contract is the authority: an affordance that
//! does not reference the next page number means the contract is exhausted
//! or inconsistent, and the loop stops.

use crate::extract::NextPage;

/// Decides whether pagination continues past `current_page` given the
/// page's next-page affordance. The empty-item-list termination is checked
/// separately by the pipeline before this.
#[must_use]
pub fn should_continue(next: &NextPage, current_page: u32) -> bool {
    match next {
        NextPage::Open => true,
        NextPage::End => false,
        NextPage::Link(href) => {
            extract_query_param(href, "page").as_deref()
                == Some((current_page + 1).to_string().as_str())
        }
    }
}

/// Extracts the value of a named query parameter from a URL or href.
fn extract_query_param(url: &str, param: &str) -> Option<String> {
    let query_start = url.find('?')? + 1;
    let query = &url[query_start..];

    let needle = format!("{param}=");
    for pair in query.split('&') {
        if let Some(value) = pair.strip_prefix(needle.as_str()) {
            let value = value.split('#').next().unwrap_or(value);
            if !value.is_empty() {
                return Some(value.to_owned());
            }
        }
    }
    None
}

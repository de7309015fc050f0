//! Clause parsing shared by the builders.

use crate::args::Args;
use regex::Regex;
use std::sync::OnceLock;
use xcrud_core::{Result, SortDirection, SortSpec};

const SORT_PATTERN: &str = r"(?i)^\s*(.*?)\s+(ASC|DESC)\s*$";

fn sort_regex() -> Option<&'static Regex> {
    static SORT: OnceLock<Option<Regex>> = OnceLock::new();
    SORT.get_or_init(|| match Regex::new(SORT_PATTERN) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "sort pattern failed to compile, directions will not be parsed"
            );
            None
        }
    })
    .as_ref()
}

/// Parse `"expr [ASC|DESC]"`. Direction defaults to ascending.
///
/// Returns `None` for blank criteria.
pub fn parse_sort(criterion: &str) -> Option<SortSpec> {
    let criterion = criterion.trim();
    if criterion.is_empty() {
        return None;
    }
    if let Some(caps) = sort_regex().and_then(|re| re.captures(criterion)) {
        let expr = caps.get(1).map_or("", |m| m.as_str());
        let desc = caps
            .get(2)
            .is_some_and(|m| m.as_str().eq_ignore_ascii_case("desc"));
        if !expr.is_empty() {
            return Some(SortSpec {
                expr: expr.to_string(),
                direction: if desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                },
            });
        }
    }
    Some(SortSpec::asc(criterion))
}

/// Parse a non-empty list of sort criteria.
pub fn sort_list(args: &Args<'_>, criteria: &[String]) -> Result<Vec<SortSpec>> {
    if criteria.is_empty() {
        return Err(args.error("Order criteria can not be empty").into());
    }
    criteria
        .iter()
        .map(|c| {
            parse_sort(c).ok_or_else(|| args.error("Order criteria can not be empty").into())
        })
        .collect()
}

/// Document path of an index field: `name` becomes `$.name`.
pub fn index_path(path: &str) -> String {
    if path.starts_with('$') {
        path.to_string()
    } else {
        format!("$.{path}")
    }
}

/// A path addressing one array element, e.g. `hobbies[3]`.
pub fn is_array_element_path(path: &str) -> bool {
    let Some(open) = path.rfind('[') else {
        return false;
    };
    let Some(index) = path[open + 1..].strip_suffix(']') else {
        return false;
    };
    open > 0 && !index.is_empty() && index.chars().all(|c| c.is_ascii_digit())
}

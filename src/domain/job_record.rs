use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "unknown";
pub const NOT_AVAILABLE: &str = "not available";

/// One listing row pulled off a results page.
///
/// Every field is always populated: either with text read from the page or
/// with one of the sentinels above. `company` and `description` are never
/// shown in the list view, so they always carry [`NOT_AVAILABLE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub link: String,
    pub location: String,
    pub date_posted: String,
    pub company: String,
    pub description: String,
}

impl JobRecord {
    pub fn new(
        title: Option<String>,
        link: Option<String>,
        location: Option<String>,
        date_posted: Option<String>,
    ) -> Self {
        JobRecord {
            title: or_sentinel(title, UNKNOWN),
            link: link.unwrap_or_default(),
            location: or_sentinel(location, UNKNOWN),
            date_posted: or_sentinel(date_posted, UNKNOWN),
            company: NOT_AVAILABLE.to_string(),
            description: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Blank text counts as missing.
fn or_sentinel(value: Option<String>, sentinel: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => sentinel.to_string(),
    }
}

use std::fmt;

/// How an element is looked up on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn css(selector: &str) -> Self {
        Locator::Css(selector.to_string())
    }

    /// Any link or button whose visible text contains `label`, matched
    /// case-sensitively. Submit-style inputs show their `value` as text.
    pub fn by_visible_text(label: &str) -> Self {
        let label = xpath_literal(label);
        Locator::XPath(format!(
            "//a[contains(normalize-space(.), {label})] \
             | //button[contains(normalize-space(.), {label})] \
             | //input[(@type='submit' or @type='button') and contains(@value, {label})]"
        ))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css={}", s),
            Locator::XPath(s) => write!(f, "xpath={}", s),
        }
    }
}

// XPath 1.0 has no escape sequences, so a label holding both quote kinds
// has to be stitched together with concat().
fn xpath_literal(s: &str) -> String {
    match (s.contains('\''), s.contains('"')) {
        (false, _) => format!("'{}'", s),
        (true, false) => format!("\"{}\"", s),
        (true, true) => {
            let parts: Vec<String> = s.split('\'').map(|p| format!("'{}'", p)).collect();
            format!("concat({})", parts.join(", \"'\", "))
        }
    }
}

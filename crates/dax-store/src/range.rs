//! Half-open key intervals for range scans.

use std::fmt;

/// Smallest string greater than every string that starts with `prefix`.
///
/// Computed by incrementing the last character of the prefix, carrying past
/// characters that cannot be incremented. Returns `None` when no such bound
/// exists (empty prefix, or a prefix made only of `char::MAX`), meaning the
/// scan is unbounded above.
///
/// Because UTF-8 byte order matches code point order, the bound is valid for
/// byte-ordered ledgers too.
///
/// ```
/// use dax_store::prefix_upper_bound;
///
/// assert_eq!(prefix_upper_bound("Department").as_deref(), Some("Departmenu"));
/// assert_eq!(prefix_upper_bound(""), None);
/// ```
pub fn prefix_upper_bound(prefix: &str) -> Option<String> {
    let mut chars: Vec<char> = prefix.chars().collect();
    while let Some(last) = chars.pop() {
        if let Some(next) = next_char(last) {
            chars.push(next);
            return Some(chars.into_iter().collect());
        }
    }
    None
}

fn next_char(c: char) -> Option<char> {
    let mut code = c as u32 + 1;
    if (0xD800..=0xDFFF).contains(&code) {
        code = 0xE000;
    }
    char::from_u32(code)
}

/// A half-open key interval `[start, end)`. `end = None` is unbounded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyRange {
    pub start: String,
    pub end: Option<String>,
}

impl KeyRange {
    pub fn new(start: impl Into<String>, end: Option<String>) -> Self {
        Self {
            start: start.into(),
            end,
        }
    }

    /// The interval holding exactly the keys that start with `prefix`.
    pub fn prefix(prefix: &str) -> Self {
        Self {
            start: prefix.to_string(),
            end: prefix_upper_bound(prefix),
        }
    }

    /// Returns `true` if `key` falls inside the interval.
    pub fn contains(&self, key: &str) -> bool {
        key >= self.start.as_str() && self.end.as_deref().map_or(true, |end| key < end)
    }

    /// The end bound in stub form: empty means unbounded.
    pub fn end_key(&self) -> &str {
        self.end.as_deref().unwrap_or("")
    }
}

impl fmt::Display for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.end {
            Some(end) => write!(f, "[{:?}, {:?})", self.start, end),
            None => write!(f, "[{:?}, ..)", self.start),
        }
    }
}

use std::fmt;

use crate::error::StoreResult;

/// One entry yielded by a range scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Lazy cursor over the entries of a range scan.
///
/// Backends attach a release hook that frees the underlying cursor. The hook
/// runs exactly once: when the iterator is exhausted, when [`close`] is
/// called, or when the iterator is dropped, whichever comes first.
///
/// [`close`]: StateIterator::close
pub struct StateIterator<'a> {
    entries: Box<dyn Iterator<Item = StoreResult<KeyValue>> + 'a>,
    release: Option<Box<dyn FnOnce() + 'a>>,
}

impl<'a> StateIterator<'a> {
    /// Wrap an entry iterator with no release hook.
    pub fn new<I>(entries: I) -> Self
    where
        I: Iterator<Item = StoreResult<KeyValue>> + 'a,
    {
        Self {
            entries: Box::new(entries),
            release: None,
        }
    }

    /// Build a cursor over already materialized entries.
    pub fn from_entries(entries: Vec<KeyValue>) -> Self {
        Self::new(entries.into_iter().map(Ok))
    }

    /// Attach the hook that releases the backend cursor.
    pub fn with_release(mut self, release: impl FnOnce() + 'a) -> Self {
        self.release = Some(Box::new(release));
        self
    }

    /// Returns `true` until the cursor has been released.
    pub fn is_open(&self) -> bool {
        self.release.is_some()
    }

    /// Abandon the scan and release the cursor now.
    pub fn close(mut self) {
        self.release_cursor();
    }

    fn release_cursor(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Iterator for StateIterator<'_> {
    type Item = StoreResult<KeyValue>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.entries.next();
        if next.is_none() {
            self.release_cursor();
        }
        next
    }
}

impl Drop for StateIterator<'_> {
    fn drop(&mut self) {
        self.release_cursor();
    }
}

impl fmt::Debug for StateIterator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateIterator")
            .field("open", &self.is_open())
            .finish()
    }
}

#![forbid(unsafe_code)]

//! The ordered set of pages and their boundary fillers.
//!
//! A flip shows three items at once: the current page, and on the back of
//! each half the neighbour that will be revealed. At the ends of a book
//! without wraparound there is no neighbour, so the host may supply a filler
//! for before the first page and after the last.

/// Pages plus optional boundary fillers.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSet<T> {
    pages: Vec<T>,
    before_first: Option<T>,
    after_last: Option<T>,
}

impl<T> Default for PageSet<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> PageSet<T> {
    #[must_use]
    pub fn new(pages: Vec<T>) -> Self {
        Self {
            pages,
            before_first: None,
            after_last: None,
        }
    }

    /// Set the items shown past either end when wraparound is off.
    #[must_use]
    pub fn with_fillers(mut self, before_first: Option<T>, after_last: Option<T>) -> Self {
        self.before_first = before_first;
        self.after_last = after_last;
        self
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.pages.get(index)
    }

    #[inline]
    #[must_use]
    pub fn pages(&self) -> &[T] {
        &self.pages
    }

    /// Swap in a new page list, keeping the fillers. Returns the old pages.
    pub fn replace(&mut self, pages: Vec<T>) -> Vec<T> {
        std::mem::replace(&mut self.pages, pages)
    }

    /// Item revealed when turning back from `index`.
    #[must_use]
    pub fn before_item(&self, index: usize, wrap: bool) -> Option<&T> {
        if index > 0 {
            return self.pages.get(index - 1);
        }
        if wrap {
            self.pages.last()
        } else {
            self.before_first.as_ref()
        }
    }

    /// Item revealed when turning forward from `index`.
    #[must_use]
    pub fn after_item(&self, index: usize, wrap: bool) -> Option<&T> {
        if index + 1 < self.pages.len() {
            return self.pages.get(index + 1);
        }
        if wrap {
            self.pages.first()
        } else {
            self.after_last.as_ref()
        }
    }
}

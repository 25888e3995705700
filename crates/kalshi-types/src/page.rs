//! Cursor-paginated results

/// One page of a paginated collection
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page (may be empty even when more pages follow)
    pub items: Vec<T>,
    /// Continuation token; `None` on the last page
    pub cursor: Option<String>,
}

impl<T> Page<T> {
    /// Build a page, treating an empty cursor string as absent
    pub fn new(items: Vec<T>, cursor: Option<String>) -> Self {
        Self {
            items,
            cursor: normalize_cursor(cursor),
        }
    }

    /// Final page with no continuation
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            cursor: None,
        }
    }

    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Map the items, keeping the cursor
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            cursor: self.cursor,
        }
    }
}

/// Upper bounds for a full pagination walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageCap {
    /// Stop once this many items were collected (excess is truncated)
    pub max_items: Option<usize>,
    /// Stop after fetching this many pages
    pub max_pages: Option<usize>,
}

impl PageCap {
    /// No limits: walk until the cursor runs out
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn items(max_items: usize) -> Self {
        Self {
            max_items: Some(max_items),
            max_pages: None,
        }
    }

    pub fn pages(max_pages: usize) -> Self {
        Self {
            max_items: None,
            max_pages: Some(max_pages),
        }
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }
}

/// Empty-string cursors mean "no more pages"
pub fn normalize_cursor(cursor: Option<String>) -> Option<String> {
    cursor.filter(|c| !c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cursor_is_absent() {
        let page = Page::new(vec![1, 2], Some(String::new()));
        assert!(!page.has_more());

        let page = Page::new(Vec::<u8>::new(), Some("next".into()));
        assert!(page.is_empty());
        assert!(page.has_more());
    }

    #[test]
    fn test_map_keeps_cursor() {
        let page = Page::new(vec![1, 2, 3], Some("c".into())).map(|n| n * 2);
        assert_eq!(page.items, vec![2, 4, 6]);
        assert_eq!(page.cursor.as_deref(), Some("c"));
    }
}

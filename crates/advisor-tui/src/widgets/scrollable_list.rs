//! Scrollable, filterable list cursor. Holds the items and a view over them;
//! rendering is left to the owning component.

pub struct ScrollableList<T> {
    items: Vec<T>,
    filtered: Vec<usize>,
    cursor: usize,
    offset: usize,
    filter: String,
    matches: Box<dyn Fn(&T, &str) -> bool + Send + Sync>,
}

impl<T> ScrollableList<T> {
    pub fn new(matches: impl Fn(&T, &str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            items: Vec::new(),
            filtered: Vec::new(),
            cursor: 0,
            offset: 0,
            filter: String::new(),
            matches: Box::new(matches),
        }
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.rebuild();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Re-filter, keeping the cursor on the same item when it survives.
    pub fn set_filter(&mut self, query: &str) {
        let previous = self.filtered.get(self.cursor).copied();
        self.filter = query.to_string();
        self.rebuild();
        self.cursor = previous
            .and_then(|orig| self.filtered.iter().position(|&i| i == orig))
            .unwrap_or(0);
        self.offset = 0;
    }

    fn rebuild(&mut self) {
        self.filtered = if self.filter.trim().is_empty() {
            (0..self.items.len()).collect()
        } else {
            self.items
                .iter()
                .enumerate()
                .filter(|(_, item)| (self.matches)(item, &self.filter))
                .map(|(i, _)| i)
                .collect()
        };
        if self.cursor >= self.filtered.len() {
            self.cursor = self.filtered.len().saturating_sub(1);
        }
    }

    pub fn select_up(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        self.cursor = (self.cursor + n).min(self.filtered.len().saturating_sub(1));
    }

    pub fn select_first(&mut self) {
        self.cursor = 0;
    }

    pub fn select_last(&mut self) {
        self.cursor = self.filtered.len().saturating_sub(1);
    }

    /// Move the cursor onto an item by its unfiltered index, if it is visible.
    pub fn select_original(&mut self, orig: usize) {
        if let Some(pos) = self.filtered.iter().position(|&i| i == orig) {
            self.cursor = pos;
        }
    }

    pub fn cursor_item(&self) -> Option<&T> {
        self.filtered.get(self.cursor).map(|&i| &self.items[i])
    }

    /// Keep the cursor row inside a window of `height` rows.
    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }
    }

    /// `(is_cursor, item)` for the rows currently in view.
    pub fn visible(&self, height: usize) -> impl Iterator<Item = (bool, &T)> {
        let end = (self.offset + height).min(self.filtered.len());
        let start = self.offset.min(end);
        self.filtered[start..end]
            .iter()
            .enumerate()
            .map(move |(row, &i)| (start + row == self.cursor, &self.items[i]))
    }

    /// Click on view row `row`. Returns the clicked item.
    pub fn click(&mut self, row: usize) -> Option<&T> {
        let target = self.offset + row;
        if target >= self.filtered.len() {
            return None;
        }
        self.cursor = target;
        self.cursor_item()
    }

    pub fn len(&self) -> usize {
        self.filtered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> ScrollableList<&'static str> {
        let mut l = ScrollableList::new(|s: &&str, q: &str| s.contains(q));
        l.set_items(vec!["alpha", "beta", "gamma", "delta", "epsilon"]);
        l
    }

    #[test]
    fn test_cursor_bounds() {
        let mut l = list();
        l.select_up(3);
        assert_eq!(l.cursor_item(), Some(&"alpha"));
        l.select_down(10);
        assert_eq!(l.cursor_item(), Some(&"epsilon"));
        l.select_first();
        assert_eq!(l.cursor_item(), Some(&"alpha"));
    }

    #[test]
    fn test_filter_keeps_cursor_item() {
        let mut l = list();
        l.select_original(3); // delta
        l.set_filter("ta");
        assert_eq!(l.len(), 2);
        assert_eq!(l.cursor_item(), Some(&"delta"));
        l.set_filter("zzz");
        assert!(l.is_empty());
        assert_eq!(l.cursor_item(), None);
        l.set_filter("");
        assert_eq!(l.len(), 5);
    }

    #[test]
    fn test_scroll_window() {
        let mut l = list();
        l.select_last();
        l.ensure_visible(2);
        let rows: Vec<_> = l.visible(2).collect();
        assert_eq!(rows, vec![(false, &"delta"), (true, &"epsilon")]);
        assert_eq!(l.click(0), Some(&"delta"));
        assert_eq!(l.click(5), None);
    }
}

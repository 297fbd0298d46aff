//! Selection state for one run of the selector.
//!
//! Everything here is pure: no terminal, no I/O. The loop in
//! [`crate::selector`] drives it once per keystroke.

use crate::input::Key;
use crate::item::SelectableItem;

/// Indices of the items whose name contains `query`, ignoring case.
/// Order follows `items`; an empty query keeps everything.
pub fn filter(items: &[SelectableItem], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..items.len()).collect();
    }

    let query = query.to_lowercase();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.name.to_lowercase().contains(&query))
        .map(|(i, _)| i)
        .collect()
}

/// Clamp a selection index into `[0, len - 1]`, or 0 for an empty list
pub fn clamp_selection(selected: usize, len: usize) -> usize {
    selected.min(len.saturating_sub(1))
}

/// Move the viewport as little as possible so `selected` is visible.
pub fn scroll_viewport(start: usize, selected: usize, rows: usize) -> usize {
    if rows == 0 || selected < start {
        selected
    } else if selected >= start + rows {
        selected + 1 - rows
    } else {
        start
    }
}

/// What a keystroke did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Running,
    /// Index into the full item list
    Accepted(usize),
    Cancelled,
}

/// Query, cursor and viewport over a fixed item list
#[derive(Debug)]
pub struct Session<'a> {
    items: &'a [SelectableItem],
    query: String,
    filtered: Vec<usize>,
    selected: usize,
    viewport_start: usize,
}

impl<'a> Session<'a> {
    pub fn new(items: &'a [SelectableItem]) -> Self {
        Self {
            items,
            query: String::new(),
            filtered: (0..items.len()).collect(),
            selected: 0,
            viewport_start: 0,
        }
    }

    pub fn items(&self) -> &'a [SelectableItem] {
        self.items
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Selection index into [`Session::filtered`]
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn viewport_start(&self) -> usize {
        self.viewport_start
    }

    /// Indices into [`Session::items`] matching the current query
    pub fn filtered(&self) -> &[usize] {
        &self.filtered
    }

    pub fn selected_item(&self) -> Option<&'a SelectableItem> {
        let items = self.items;
        self.filtered.get(self.selected).map(|&i| &items[i])
    }

    /// Recompute the filtered list and clamp the cursor (frame steps 1-2)
    pub fn refresh(&mut self) {
        self.filtered = filter(self.items, &self.query);
        self.selected = clamp_selection(self.selected, self.filtered.len());
    }

    /// Keep the cursor inside a window of `rows` lines (frame step 5)
    pub fn scroll(&mut self, rows: usize) {
        self.viewport_start = scroll_viewport(self.viewport_start, self.selected, rows);
    }

    /// Apply one keystroke against the current filtered list
    pub fn apply(&mut self, key: Key) -> Step {
        match key {
            Key::Enter => {
                if let Some(&idx) = self.filtered.get(self.selected) {
                    return Step::Accepted(idx);
                }
            }
            Key::Up => self.selected = self.selected.saturating_sub(1),
            Key::Down => {
                if self.selected + 1 < self.filtered.len() {
                    self.selected += 1;
                }
            }
            Key::Escape | Key::Interrupt | Key::Eof => return Step::Cancelled,
            Key::Backspace => {
                if self.query.pop().is_some() {
                    self.selected = 0;
                }
            }
            Key::Char(c) => {
                self.query.push(c);
                self.selected = 0;
            }
            Key::Tab | Key::Other => {}
        }
        Step::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn items(names: &[&str]) -> Vec<SelectableItem> {
        names
            .iter()
            .map(|n| SelectableItem::new(*n, n.to_lowercase()))
            .collect()
    }

    fn names<'a>(items: &'a [SelectableItem], idx: &[usize]) -> Vec<&'a str> {
        idx.iter().map(|&i| items[i].name.as_str()).collect()
    }

    fn type_str(session: &mut Session, s: &str) {
        for c in s.chars() {
            session.apply(Key::Char(c));
            session.refresh();
        }
    }

    #[test]
    fn test_filter_is_case_insensitive_and_ordered() {
        let list = items(&["Firefox", "Files", "Terminal", "fish", "GIMP"]);
        assert_eq!(names(&list, &filter(&list, "FI")), vec!["Firefox", "Files", "fish"]);
        assert_eq!(names(&list, &filter(&list, "im")), vec!["GIMP"]);
        assert!(filter(&list, "zzz").is_empty());
    }

    #[test]
    fn test_empty_query_keeps_everything() {
        let list = items(&["b", "a", "c"]);
        assert_eq!(filter(&list, ""), vec![0, 1, 2]);
    }

    #[test]
    fn test_clamp_selection() {
        assert_eq!(clamp_selection(5, 3), 2);
        assert_eq!(clamp_selection(1, 3), 1);
        assert_eq!(clamp_selection(4, 0), 0);
    }

    #[test]
    fn test_scroll_viewport_minimal_moves() {
        // Inside the window: untouched
        assert_eq!(scroll_viewport(3, 5, 10), 3);
        // Past the bottom: shift by exactly the overrun
        assert_eq!(scroll_viewport(0, 10, 10), 1);
        assert_eq!(scroll_viewport(0, 14, 10), 5);
        // Above the top: bring it back to the first row
        assert_eq!(scroll_viewport(6, 2, 10), 2);
    }

    #[test]
    fn test_firefox_files_scenario() {
        let list = items(&["Firefox", "Files", "Terminal"]);
        let mut session = Session::new(&list);

        type_str(&mut session, "fi");
        assert_eq!(names(&list, session.filtered()), vec!["Firefox", "Files"]);

        assert_eq!(session.apply(Key::Down), Step::Running);
        session.refresh();
        assert_eq!(session.selected(), 1);

        assert_eq!(session.apply(Key::Enter), Step::Accepted(1));
        assert_eq!(list[1].name, "Files");
    }

    #[test]
    fn test_enter_on_empty_result_stays_running() {
        let list = items(&["Firefox"]);
        let mut session = Session::new(&list);
        type_str(&mut session, "xyz");
        assert!(session.filtered().is_empty());
        assert_eq!(session.apply(Key::Enter), Step::Running);
        assert_eq!(session.selected_item(), None);
    }

    #[test]
    fn test_cancel_keys() {
        let list = items(&["a"]);
        let mut session = Session::new(&list);
        assert_eq!(session.apply(Key::Escape), Step::Cancelled);
        assert_eq!(session.apply(Key::Interrupt), Step::Cancelled);
        assert_eq!(session.apply(Key::Eof), Step::Cancelled);
    }

    #[test]
    fn test_navigation_bounds() {
        let list = items(&["a", "b", "c"]);
        let mut session = Session::new(&list);
        session.apply(Key::Up);
        assert_eq!(session.selected(), 0);
        for _ in 0..5 {
            session.apply(Key::Down);
        }
        assert_eq!(session.selected(), 2);
    }

    #[test]
    fn test_backspace_on_empty_query_is_noop() {
        let list = items(&["a", "b", "c"]);
        let mut session = Session::new(&list);
        session.apply(Key::Down);
        session.apply(Key::Backspace);
        session.refresh();
        assert_eq!(session.query(), "");
        assert_eq!(session.selected(), 1);
    }

    #[test]
    fn test_type_then_delete_restores_full_list() {
        let list = items(&["Firefox", "Files", "Terminal"]);
        let mut session = Session::new(&list);
        type_str(&mut session, "term");
        assert_eq!(session.filtered().len(), 1);

        for _ in 0..4 {
            session.apply(Key::Backspace);
            session.refresh();
        }
        assert_eq!(session.query(), "");
        assert_eq!(session.filtered(), &[0, 1, 2]);
        assert_eq!(session.selected(), 0);
    }

    #[test]
    fn test_tab_and_other_are_inert() {
        let list = items(&["a", "b"]);
        let mut session = Session::new(&list);
        session.apply(Key::Down);
        assert_eq!(session.apply(Key::Tab), Step::Running);
        assert_eq!(session.apply(Key::Other), Step::Running);
        assert_eq!(session.selected(), 1);
        assert_eq!(session.query(), "");
    }

    #[test]
    fn test_random_key_sequences_keep_invariants() {
        let list = items(&[
            "Firefox", "Files", "Terminal", "fish", "GIMP", "Inkscape", "htop", "vim",
            "Thunar", "Steam", "mpv", "Krita",
        ]);
        let alphabet = ['f', 'i', 'e', 't', 'm', 'x', 'a'];
        let mut rng = StdRng::seed_from_u64(7);

        for rows in [0usize, 1, 3, 20] {
            let mut session = Session::new(&list);
            for _ in 0..500 {
                let key = match rng.gen_range(0..6) {
                    0 => Key::Up,
                    1 | 2 => Key::Down,
                    3 => Key::Backspace,
                    4 => Key::Tab,
                    _ => Key::Char(alphabet[rng.gen_range(0..alphabet.len())]),
                };
                assert_ne!(session.apply(key), Step::Cancelled);
                session.refresh();
                session.scroll(rows);

                let len = session.filtered().len();
                if len == 0 {
                    assert_eq!(session.selected(), 0);
                } else {
                    assert!(session.selected() < len);
                    if rows > 0 {
                        let start = session.viewport_start();
                        assert!(start <= session.selected());
                        assert!(session.selected() < start + rows);
                    }
                }
                assert_eq!(session.filtered(), filter(&list, session.query()).as_slice());
            }
        }
    }
}

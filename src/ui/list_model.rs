use crate::library::Item;

use super::command::Command;

/// The game list behind the main view.
///
/// `items` is fixed at construction. Commands reshape `shown` (indices into
/// `items`), and the live filter narrows `shown` down to `visible`. The
/// selection always points into `visible` and resets whenever it changes.
#[derive(Debug, Clone)]
pub struct ListModel {
    items: Vec<Item>,
    shown: Vec<usize>,
    query: String,
    visible: Vec<usize>,
    selected: usize,
}

impl ListModel {
    pub fn new(items: Vec<Item>) -> Self {
        let shown: Vec<usize> = (0..items.len()).collect();

        Self {
            items,
            visible: shown.clone(),
            shown,
            query: String::new(),
            selected: 0,
        }
    }

    /// Every item, in construction (name-sorted) order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Items currently on screen, in display order
    pub fn visible(&self) -> impl Iterator<Item = &Item> + '_ {
        self.visible.iter().map(move |&i| &self.items[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        (!self.visible.is_empty()).then_some(self.selected)
    }

    pub fn selected(&self) -> Option<&Item> {
        self.visible.get(self.selected).map(|&i| &self.items[i])
    }

    /// The active live filter, empty when none
    pub fn filter(&self) -> &str {
        &self.query
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::SortRecent => {
                let items = &self.items;
                self.shown
                    .sort_by(|&a, &b| items[b].last_played().cmp(&items[a].last_played()));
            }
            Command::FilterInstalled => {
                let items = &self.items;
                self.shown.retain(|&i| items[i].installed());
            }
            Command::ShowAll => {
                self.shown = (0..self.items.len()).collect();
            }
            Command::SortAlphabetical => {
                let items = &self.items;
                self.shown
                    .sort_by(|&a, &b| items[a].title().cmp(items[b].title()));
            }
        }

        self.refresh();
    }

    /// Replace the live filter (case-insensitive substring on the title)
    pub fn set_filter(&mut self, query: &str) {
        self.query = query.to_string();
        self.refresh();
    }

    pub fn clear_filter(&mut self) {
        self.set_filter("");
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.visible.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible.len().saturating_sub(1);
    }

    pub fn page_down(&mut self, page: usize) {
        let last = self.visible.len().saturating_sub(1);
        self.selected = (self.selected + page.max(1)).min(last);
    }

    pub fn page_up(&mut self, page: usize) {
        self.selected = self.selected.saturating_sub(page.max(1));
    }

    fn refresh(&mut self) {
        let needle = self.query.to_lowercase();
        let items = &self.items;

        self.visible = self
            .shown
            .iter()
            .copied()
            .filter(|&i| {
                needle.is_empty() || items[i].filter_value().to_lowercase().contains(&needle)
            })
            .collect();
        self.selected = 0;
    }
}

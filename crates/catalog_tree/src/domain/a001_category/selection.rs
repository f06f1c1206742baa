use super::forest::Forest;
use contracts::domain::a001_category::aggregate::CategoryId;
use std::collections::HashSet;

/// State of a "select all" header checkbox over the visible nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    Unchecked,
    Indeterminate,
    Checked,
}

/// Multi-select state of one picker instance, from open to confirm/cancel.
///
/// Selection is keyed by id only, so it is independent of tree shape and of
/// expansion, and survives a reload of the forest.
#[derive(Debug, Clone)]
pub struct SelectionSession {
    initial: Vec<CategoryId>,
    selected: HashSet<CategoryId>,
}

impl SelectionSession {
    pub fn open(initial: Vec<CategoryId>) -> Self {
        let selected = initial.iter().copied().collect();
        Self { initial, selected }
    }

    pub fn initial(&self) -> &[CategoryId] {
        &self.initial
    }

    pub fn is_selected(&self, id: CategoryId) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected_len(&self) -> usize {
        self.selected.len()
    }

    pub fn selected_ids(&self) -> &HashSet<CategoryId> {
        &self.selected
    }

    /// Add when absent, remove when present. Returns the new state.
    pub fn toggle(&mut self, id: CategoryId) -> bool {
        if self.selected.contains(&id) {
            self.selected.remove(&id);
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// "Select all" over the visible forest, with toggle-all semantics: when
    /// every visible id is already selected they are all deselected instead.
    /// Ids outside `visible` are never touched.
    pub fn select_all_visible(&mut self, visible: &Forest) {
        let ids = visible.flatten_ids();
        if ids.is_empty() {
            return;
        }
        if ids.iter().all(|id| self.selected.contains(id)) {
            for id in &ids {
                self.selected.remove(id);
            }
        } else {
            self.selected.extend(ids);
        }
    }

    /// Deselect only what the visible forest shows
    pub fn clear_visible(&mut self, visible: &Forest) {
        for id in visible.flatten_ids() {
            self.selected.remove(&id);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn visible_state(&self, visible: &Forest) -> SelectAllState {
        let ids = visible.flatten_ids();
        let selected = ids.iter().filter(|id| self.selected.contains(id)).count();
        if selected == 0 {
            SelectAllState::Unchecked
        } else if selected == ids.len() {
            SelectAllState::Checked
        } else {
            SelectAllState::Indeterminate
        }
    }

    /// Selected ids in depth-first order of the full (unfiltered) forest.
    /// Ids the forest no longer contains are dropped.
    pub fn confirm(&self, forest: &Forest) -> Vec<CategoryId> {
        forest
            .flatten_ids()
            .into_iter()
            .filter(|id| self.selected.contains(id))
            .collect()
    }

    /// Throw away changes made during the session
    pub fn cancel(&mut self) -> Vec<CategoryId> {
        self.selected = self.initial.iter().copied().collect();
        self.initial.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::super::builder::build;
    use super::super::filter::filter;
    use super::*;
    use contracts::domain::a001_category::aggregate::CategoryRecord;
    use contracts::domain::common::LocalizedText;

    fn record(id: i64, parent: Option<i64>, name: &str) -> CategoryRecord {
        CategoryRecord::new(id, parent, LocalizedText::new(name))
    }

    fn ids(raw: &[i64]) -> Vec<CategoryId> {
        raw.iter().copied().map(CategoryId).collect()
    }

    fn ten_nodes() -> Forest {
        build(vec![
            record(1, None, "Clothing"),
            record(2, Some(1), "Men"),
            record(3, Some(1), "Women"),
            record(4, Some(3), "Dresses"),
            record(5, None, "Electronics"),
            record(6, Some(5), "Phones"),
            record(7, Some(5), "Laptops"),
            record(8, None, "Home"),
            record(9, Some(8), "Kitchen"),
            record(10, Some(8), "Garden"),
        ])
    }

    #[test]
    fn test_toggle_twice_restores_selection() {
        let mut selection = SelectionSession::open(ids(&[1, 2]));
        let before = selection.selected_ids().clone();

        assert!(!selection.toggle(CategoryId(2)));
        assert!(selection.toggle(CategoryId(2)));
        assert_eq!(selection.selected_ids(), &before);

        assert!(selection.toggle(CategoryId(9)));
        assert!(!selection.toggle(CategoryId(9)));
        assert_eq!(selection.selected_ids(), &before);
    }

    #[test]
    fn test_select_all_with_three_visible() {
        let forest = ten_nodes();
        let visible = filter(&forest, "dress");
        assert_eq!(visible.flatten_ids(), ids(&[1, 3, 4]));

        let mut selection = SelectionSession::open(Vec::new());
        selection.select_all_visible(&visible);
        assert_eq!(selection.selected_len(), 3);
        assert_eq!(selection.confirm(&forest), ids(&[1, 3, 4]));
    }

    #[test]
    fn test_select_all_twice_deselects_visible_only() {
        let forest = ten_nodes();
        let visible = filter(&forest, "dress");

        let mut selection = SelectionSession::open(ids(&[9]));
        selection.select_all_visible(&visible);
        assert_eq!(selection.visible_state(&visible), SelectAllState::Checked);

        selection.select_all_visible(&visible);
        assert_eq!(selection.visible_state(&visible), SelectAllState::Unchecked);
        assert_eq!(selection.confirm(&forest), ids(&[9]));
    }

    #[test]
    fn test_partial_visible_selection_selects_rest() {
        let forest = ten_nodes();
        let visible = filter(&forest, "dress");

        let mut selection = SelectionSession::open(ids(&[3]));
        assert_eq!(selection.visible_state(&visible), SelectAllState::Indeterminate);
        selection.select_all_visible(&visible);
        assert_eq!(selection.confirm(&forest), ids(&[1, 3, 4]));
    }

    #[test]
    fn test_select_all_on_empty_view_is_noop() {
        let mut selection = SelectionSession::open(ids(&[2]));
        selection.select_all_visible(&Forest::empty());
        assert_eq!(selection.selected_len(), 1);
        assert_eq!(selection.visible_state(&Forest::empty()), SelectAllState::Unchecked);
    }

    #[test]
    fn test_clear_visible_and_clear() {
        let forest = ten_nodes();
        let visible = filter(&forest, "phones");
        let mut selection = SelectionSession::open(ids(&[5, 6, 9]));

        selection.clear_visible(&visible);
        assert_eq!(selection.confirm(&forest), ids(&[9]));

        selection.clear();
        assert!(selection.confirm(&forest).is_empty());
    }

    #[test]
    fn test_confirm_uses_forest_order() {
        let forest = ten_nodes();
        let mut selection = SelectionSession::open(Vec::new());
        for id in [10, 2, 6, 1] {
            selection.toggle(CategoryId(id));
        }
        assert_eq!(selection.confirm(&forest), ids(&[1, 2, 6, 10]));
    }

    #[test]
    fn test_confirm_drops_stale_ids() {
        let mut selection = SelectionSession::open(ids(&[7, 2]));
        selection.toggle(CategoryId(3));

        // reload without category 7
        let reloaded = build(vec![
            record(1, None, "Clothing"),
            record(2, Some(1), "Men"),
            record(3, Some(1), "Women"),
        ]);
        assert_eq!(selection.confirm(&reloaded), ids(&[2, 3]));
    }

    #[test]
    fn test_cancel_restores_initial() {
        let mut selection = SelectionSession::open(ids(&[4, 1]));
        selection.toggle(CategoryId(1));
        selection.toggle(CategoryId(8));
        selection.clear();

        assert_eq!(selection.cancel(), ids(&[4, 1]));
        assert!(selection.is_selected(CategoryId(4)));
        assert!(selection.is_selected(CategoryId(1)));
        assert!(!selection.is_selected(CategoryId(8)));
    }

    #[test]
    fn test_selection_does_not_touch_expansion() {
        let mut forest = ten_nodes();
        forest.toggle_expand(CategoryId(5));
        let expanded = forest.expanded_ids();

        let mut selection = SelectionSession::open(Vec::new());
        selection.toggle(CategoryId(5));
        selection.select_all_visible(&forest);
        assert_eq!(forest.expanded_ids(), expanded);

        forest.toggle_expand(CategoryId(8));
        assert_eq!(selection.selected_len(), 10);
    }

    #[test]
    fn test_scenario_select_men() {
        let forest = build(vec![
            record(1, None, "Clothing"),
            record(2, Some(1), "Men"),
            record(3, Some(1), "Women"),
            record(4, None, "Electronics"),
        ]);
        let mut selection = SelectionSession::open(Vec::new());
        selection.toggle(CategoryId(2));
        assert_eq!(selection.confirm(&forest), ids(&[2]));
    }
}

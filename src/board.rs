use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::{FilterType, Student, StudentId, ViewConfig};
use crate::repository::{LoadOrigin, Loaded};
use crate::selection::Selection;
use crate::view::{derive_view, View};

/// View state driven by the presentation layer.
///
/// Holds the loaded collection read-only next to the view toggles and the
/// selection. Events are accepted while loading and act on an empty collection.
#[derive(Debug, Clone)]
pub struct Board {
    students: Arc<[Student]>,
    config: ViewConfig,
    selection: Selection,
    origin: Option<LoadOrigin>,
}

impl Board {
    pub fn loading() -> Self {
        Self {
            students: Vec::<Student>::new().into(),
            config: ViewConfig::default(),
            selection: Selection::new(),
            origin: None,
        }
    }

    pub fn from_loaded(loaded: Loaded) -> Self {
        let mut board = Self::loading();
        board.resolve(loaded);
        board
    }

    pub fn resolve(&mut self, loaded: Loaded) {
        debug!(count = loaded.students.len(), origin = ?loaded.origin, "board resolved");
        self.students = loaded.students;
        self.origin = Some(loaded.origin);
    }

    pub fn is_loading(&self) -> bool {
        self.origin.is_none()
    }

    pub fn fetch_failed(&self) -> bool {
        self.origin == Some(LoadOrigin::Unavailable)
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn view(&self) -> View {
        derive_view(&self.students, &self.config, &self.selection)
    }

    pub fn set_filter_type(&mut self, filter_type: FilterType) {
        self.config.filter_type = filter_type;
    }

    pub fn toggle_low_attendance(&mut self) {
        self.config.show_low_attendance = !self.config.show_low_attendance;
    }

    pub fn toggle_sort(&mut self) {
        self.config.sort_by_attendance = !self.config.sort_by_attendance;
    }

    /// Ignores ids that are not in the loaded collection and returns `false`.
    pub fn toggle_student(&mut self, id: StudentId) -> bool {
        if !self.students.iter().any(|student| student.id == id) {
            warn!(id, "ignoring selection of unknown student");
            return false;
        }
        self.selection.toggle(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn can_clear_selection(&self) -> bool {
        !self.selection.is_empty()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::loading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(pairs: &[(u32, u8)]) -> Loaded {
        let students: Vec<Student> = pairs
            .iter()
            .map(|&(id, attendance)| Student {
                id,
                name: format!("Student {id}"),
                email: format!("student{id}@example.com"),
                city: "Wisokyburgh".to_string(),
                attendance,
            })
            .collect();
        Loaded {
            students: students.into(),
            origin: LoadOrigin::Fetched,
        }
    }

    #[test]
    fn events_while_loading_do_not_panic() {
        let mut board = Board::loading();
        board.set_filter_type(FilterType::Absent);
        board.toggle_low_attendance();
        board.toggle_sort();
        assert!(!board.toggle_student(1));
        board.clear_selection();

        let view = board.view();
        assert!(board.is_loading());
        assert!(view.display_list.is_empty());
        assert_eq!(view.counts.total, 0);
    }

    #[test]
    fn toggles_flip_config() {
        let mut board = Board::from_loaded(loaded(&[(1, 80)]));
        board.toggle_sort();
        board.toggle_low_attendance();
        assert!(board.config().sort_by_attendance);
        assert!(board.config().show_low_attendance);
        board.toggle_sort();
        board.toggle_low_attendance();
        assert_eq!(*board.config(), ViewConfig::default());
    }

    #[test]
    fn hidden_selection_survives_filter_changes() {
        let mut board = Board::from_loaded(loaded(&[(1, 80), (2, 60), (3, 75)]));
        assert!(board.toggle_student(2));

        board.set_filter_type(FilterType::Present);
        let view = board.view();
        assert!(view.display_list.iter().all(|s| s.id != 2));
        assert_eq!(view.counts.selected, 1);

        board.set_filter_type(FilterType::All);
        let view = board.view();
        assert!(view.display_list.iter().any(|s| s.id == 2));
        assert!(board.selection().contains(2));
    }

    #[test]
    fn unknown_ids_are_not_selected() {
        let mut board = Board::from_loaded(loaded(&[(1, 80)]));
        assert!(!board.toggle_student(42));
        assert!(!board.can_clear_selection());
    }

    #[test]
    fn failed_fetch_is_distinguishable_from_empty() {
        let board = Board::from_loaded(Loaded {
            students: Vec::<Student>::new().into(),
            origin: LoadOrigin::Unavailable,
        });
        assert!(!board.is_loading());
        assert!(board.fetch_failed());
        assert!(board.view().display_list.is_empty());
    }
}

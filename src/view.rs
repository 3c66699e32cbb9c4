use crate::models::{Counts, FilterType, Student, ViewConfig};
use crate::selection::Selection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub display_list: Vec<Student>,
    pub counts: Counts,
}

/// Derives the displayed students and the stat counts for one view configuration.
///
/// Steps run in a fixed order: type filter, low-attendance filter, then sort.
/// `total`, `present` and `absent` always describe the full collection.
pub fn derive_view(students: &[Student], config: &ViewConfig, selection: &Selection) -> View {
    let filtered = filter_by_type(students.to_vec(), config.filter_type);
    let filtered = filter_low_attendance(filtered, config.show_low_attendance);
    let display_list = sort_by_attendance(filtered, config.sort_by_attendance);

    let counts = Counts {
        filtered: display_list.len(),
        selected: selection.len(),
        ..count_students(students)
    };

    View {
        display_list,
        counts,
    }
}

pub fn count_students(students: &[Student]) -> Counts {
    let present = students.iter().filter(|student| student.is_present()).count();

    Counts {
        total: students.len(),
        present,
        absent: students.len() - present,
        ..Counts::default()
    }
}

pub fn filter_by_type(students: Vec<Student>, filter_type: FilterType) -> Vec<Student> {
    match filter_type {
        FilterType::All => students,
        FilterType::Present => students
            .into_iter()
            .filter(|student| student.is_present())
            .collect(),
        FilterType::Absent => students
            .into_iter()
            .filter(|student| student.is_absent())
            .collect(),
    }
}

pub fn filter_low_attendance(students: Vec<Student>, show_low: bool) -> Vec<Student> {
    if !show_low {
        return students;
    }

    students
        .into_iter()
        .filter(|student| student.is_absent())
        .collect()
}

/// Highest attendance first; `sort_by` is stable so ties keep their order.
pub fn sort_by_attendance(mut students: Vec<Student>, should_sort: bool) -> Vec<Student> {
    if should_sort {
        students.sort_by(|a, b| b.attendance.cmp(&a.attendance));
    }
    students
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: u32, attendance: u8) -> Student {
        Student {
            id,
            name: format!("Student {id}"),
            email: format!("student{id}@example.com"),
            city: "Gwenborough".to_string(),
            attendance,
        }
    }

    fn ids(students: &[Student]) -> Vec<u32> {
        students.iter().map(|s| s.id).collect()
    }

    fn sample() -> Vec<Student> {
        vec![student(1, 80), student(2, 60), student(3, 75)]
    }

    fn roster() -> Vec<Student> {
        vec![
            student(1, 92),
            student(2, 41),
            student(3, 75),
            student(4, 74),
            student(5, 92),
            student(6, 58),
            student(7, 100),
            student(8, 74),
        ]
    }

    fn config(filter_type: FilterType, low: bool, sort: bool) -> ViewConfig {
        ViewConfig {
            filter_type,
            show_low_attendance: low,
            sort_by_attendance: sort,
        }
    }

    #[test]
    fn counts_cover_the_full_collection() {
        let view = derive_view(
            &sample(),
            &config(FilterType::Present, false, true),
            &Selection::new(),
        );

        assert_eq!(view.counts.total, 3);
        assert_eq!(view.counts.present, 2);
        assert_eq!(view.counts.absent, 1);
        assert_eq!(view.counts.filtered, 2);
        assert_eq!(ids(&view.display_list), vec![1, 3]);
    }

    #[test]
    fn low_attendance_view_keeps_only_absent() {
        let view = derive_view(
            &sample(),
            &config(FilterType::All, true, false),
            &Selection::new(),
        );
        assert_eq!(ids(&view.display_list), vec![2]);
    }

    #[test]
    fn default_config_returns_collection_unchanged() {
        let students = roster();
        let view = derive_view(&students, &ViewConfig::default(), &Selection::new());
        assert_eq!(view.display_list, students);
    }

    #[test]
    fn present_filter_is_an_ordered_subsequence() {
        let view = derive_view(
            &roster(),
            &config(FilterType::Present, false, false),
            &Selection::new(),
        );
        assert_eq!(ids(&view.display_list), vec![1, 3, 5, 7]);
    }

    #[test]
    fn low_attendance_narrows_each_type_filter() {
        for filter_type in [FilterType::All, FilterType::Present, FilterType::Absent] {
            let typed = filter_by_type(roster(), filter_type);
            let expected: Vec<u32> = typed
                .iter()
                .filter(|s| s.attendance < 75)
                .map(|s| s.id)
                .collect();

            let view = derive_view(&roster(), &config(filter_type, true, false), &Selection::new());
            assert_eq!(ids(&view.display_list), expected, "filter {filter_type}");
        }
    }

    #[test]
    fn present_with_low_attendance_is_empty() {
        let view = derive_view(
            &roster(),
            &config(FilterType::Present, true, true),
            &Selection::new(),
        );
        assert!(view.display_list.is_empty());
        assert_eq!(view.counts.filtered, 0);
        assert_eq!(view.counts.total, 8);
    }

    #[test]
    fn sort_is_descending_stable_and_idempotent() {
        let once = sort_by_attendance(roster(), true);
        let twice = sort_by_attendance(once.clone(), true);

        assert_eq!(once, twice);
        assert!(once.windows(2).all(|pair| pair[0].attendance >= pair[1].attendance));
        assert_eq!(ids(&once), vec![7, 1, 5, 3, 4, 8, 6, 2]);
    }

    #[test]
    fn counts_always_partition_total() {
        for students in [Vec::new(), sample(), roster()] {
            let counts = count_students(&students);
            assert_eq!(counts.present + counts.absent, counts.total);
        }
    }

    #[test]
    fn selection_count_passes_through() {
        let selection: Selection = [2, 3].into_iter().collect();
        let view = derive_view(
            &sample(),
            &config(FilterType::Present, false, false),
            &selection,
        );
        assert_eq!(view.counts.selected, 2);
    }

    #[test]
    fn empty_collection_yields_empty_view() {
        let view = derive_view(&[], &config(FilterType::Absent, true, true), &Selection::new());
        assert!(view.display_list.is_empty());
        assert_eq!(view.counts, Counts::default());
    }
}

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::board::Board;
use crate::error::Result;
use crate::models::{FilterType, PRESENT_THRESHOLD};
use crate::selection::Selection;
use crate::view::View;

pub fn render_board(board: &Board, generated_at: DateTime<Utc>) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Student Attendance");
    let _ = writeln!(
        output,
        "Generated {}",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);

    let view = board.view();
    render_stats(&mut output, &view);
    render_filters(&mut output, board);

    if board.is_loading() {
        let _ = writeln!(output, "Loading students...");
        return output;
    }

    if board.can_clear_selection() {
        let _ = writeln!(
            output,
            "Clear Selection ({} selected)",
            board.selection().len()
        );
        let _ = writeln!(output);
    }

    let _ = writeln!(output, "## Students");

    if view.display_list.is_empty() {
        let _ = writeln!(output, "No students found");
        if board.fetch_failed() {
            let _ = writeln!(output, "Student data could not be fetched");
        } else {
            let _ = writeln!(output, "Try changing the filters");
        }
        return output;
    }

    for student in view.display_list.iter() {
        let status = student.status();
        let marker = if board.selection().contains(student.id) {
            "[x]"
        } else {
            "[ ]"
        };
        let _ = writeln!(
            output,
            "- {} #{} {} <{}>, {}: {}% {} {}",
            marker,
            student.id,
            student.name,
            student.email,
            student.city,
            student.attendance,
            status.badge(),
            status.label()
        );
    }

    output
}

fn render_stats(output: &mut String, view: &View) {
    let counts = view.counts;
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(output, "- Total Students: {}", counts.total);
    let _ = writeln!(
        output,
        "- Present (>={}%): {}",
        PRESENT_THRESHOLD, counts.present
    );
    let _ = writeln!(
        output,
        "- Absent (<{}%): {}",
        PRESENT_THRESHOLD, counts.absent
    );
    let _ = writeln!(output, "- Filtered Results: {}", counts.filtered);
    let _ = writeln!(output, "- Selected: {}", counts.selected);
    let _ = writeln!(output);
}

fn render_filters(output: &mut String, board: &Board) {
    let config = board.config();
    let mut active = vec![filter_label(config.filter_type).to_string()];
    if config.show_low_attendance {
        active.push("low attendance only".to_string());
    }
    if config.sort_by_attendance {
        active.push("sorted by attendance".to_string());
    }
    let _ = writeln!(output, "Showing: {}", active.join(", "));
    let _ = writeln!(output);
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: u32,
    name: &'a str,
    email: &'a str,
    city: &'a str,
    attendance: u8,
    status: &'static str,
    selected: bool,
}

/// Writes the display list, in display order, as CSV.
pub fn write_csv<W: std::io::Write>(view: &View, selection: &Selection, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for student in view.display_list.iter() {
        csv_writer.serialize(CsvRow {
            id: student.id,
            name: &student.name,
            email: &student.email,
            city: &student.city,
            attendance: student.attendance,
            status: student.status().label(),
            selected: selection.contains(student.id),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn filter_label(filter_type: FilterType) -> &'static str {
    match filter_type {
        FilterType::All => "📚 All",
        FilterType::Present => "✅ Present",
        FilterType::Absent => "⚠️ Absent",
    }
}

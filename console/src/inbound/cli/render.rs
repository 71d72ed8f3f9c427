//! Plain-text rendering of list views and notifications.

use crate::domain::ListView;
use crate::domain::ports::{Notification, NotificationLevel};

/// Placeholder shown while a list is loading.
pub const LOADING: &str = "Loading…";
/// Empty-state message.
pub const EMPTY: &str = "No records";

/// Render a list view as an aligned table, banner, or placeholder.
///
/// # Examples
/// ```
/// use admin_console::domain::ListView;
/// use admin_console::inbound::cli::render::render_list;
///
/// let rows = [("Ten rides", "$1,200.00")];
/// let table = render_list(ListView::Rows(&rows), &["Name", "Price"], |row| {
///     vec![row.0.to_owned(), row.1.to_owned()]
/// });
/// assert_eq!(table, "Name       Price\n---------  ---------\nTen rides  $1,200.00");
/// ```
pub fn render_list<T>(
    view: ListView<'_, T>,
    columns: &[&str],
    row: impl Fn(&T) -> Vec<String>,
) -> String {
    match view {
        ListView::Loading => LOADING.to_owned(),
        ListView::Error(banner) => banner.to_owned(),
        ListView::Empty => EMPTY.to_owned(),
        ListView::Rows(records) => {
            let cells = records.iter().map(row).collect::<Vec<_>>();
            render_table(columns, &cells)
        }
    }
}

/// Render a header and rows with columns padded to their widest cell.
pub fn render_table(columns: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = columns
        .iter()
        .map(|heading| heading.chars().count())
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = columns.iter().map(|heading| (*heading).to_owned()).collect::<Vec<_>>();
    let rule = widths.iter().map(|width| "-".repeat(*width)).collect::<Vec<_>>();
    let mut lines = vec![format_line(&header, &widths), format_line(&rule, &widths)];
    lines.extend(rows.iter().map(|row| format_line(row, &widths)));
    lines.join("\n")
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let padded = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>();
    padded.join("  ").trim_end().to_owned()
}

/// Render notifications one per line, oldest first.
pub fn render_notifications(notifications: &[Notification]) -> String {
    notifications
        .iter()
        .map(|notification| {
            let marker = match notification.level {
                NotificationLevel::Success => "[ok]",
                NotificationLevel::Error => "[error]",
            };
            format!("{marker} {}", notification.message)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn cells(row: &(&str, &str)) -> Vec<String> {
        vec![row.0.to_owned(), row.1.to_owned()]
    }

    #[rstest]
    fn placeholders_cover_every_non_row_state() {
        let columns = ["Id", "Name"];
        assert_eq!(render_list(ListView::<(&str, &str)>::Loading, &columns, cells), LOADING);
        assert_eq!(render_list(ListView::<(&str, &str)>::Empty, &columns, cells), EMPTY);
        assert_eq!(
            render_list(
                ListView::<(&str, &str)>::Error("Error: code required"),
                &columns,
                cells
            ),
            "Error: code required"
        );
    }

    #[rstest]
    fn columns_align_on_multibyte_text() {
        let rows = [("p-1", "Señora"), ("p-22", "Al")];
        let table = render_list(ListView::Rows(&rows), &["Id", "Name"], cells);
        assert_eq!(
            table,
            "Id    Name\n----  ------\np-1   Señora\np-22  Al"
        );
    }

    #[rstest]
    fn notifications_are_prefixed_by_level() {
        let rendered = render_notifications(&[
            Notification::success("Package created"),
            Notification::error("code required"),
        ]);
        assert_eq!(rendered, "[ok] Package created\n[error] code required");
    }
}

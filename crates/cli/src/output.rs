//! Plain-text rendering of list screens.

use std::io::{self, Write};

use utpfund_admin::ListView;

/// A column-aligned text table.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        let widths = self.widths();
        write_line(out, self.headers.iter().copied(), &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(out, rule.iter().map(String::as_str), &widths)?;
        for row in &self.rows {
            write_line(out, row.iter().map(String::as_str), &widths)?;
        }
        Ok(())
    }
}

fn write_line<'a>(
    out: &mut impl Write,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
) -> io::Result<()> {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())
}

/// Write a list screen: error banner, rows (or an empty notice) and the
/// paging footer.
pub fn write_view<R>(
    out: &mut impl Write,
    view: &ListView<'_, R>,
    headers: &[&'static str],
    row: impl Fn(&R) -> Vec<String>,
) -> io::Result<()> {
    if let Some(error) = view.error {
        writeln!(out, "! {error}")?;
    }

    if view.rows.is_empty() {
        if view.error.is_none() {
            writeln!(out, "No matching records.")?;
        }
    } else {
        let mut table = Table::new(headers);
        for record in &view.rows {
            table.push(row(record));
        }
        table.write_to(out)?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Showing {}-{} of {} ({} fetched), page {} of {}",
        view.first_row,
        view.last_row,
        view.filtered_count,
        view.total_count,
        view.page,
        view.total_pages
    )?;
    match (view.has_previous(), view.has_next()) {
        (_, true) => writeln!(out, "Next: --page {}", view.page + 1),
        (true, false) => writeln!(out, "Previous: --page {}", view.page - 1),
        (false, false) => Ok(()),
    }
}

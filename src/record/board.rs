//! Board snapshots recorded after each move.

use std::fmt;

use serde::Serialize;

/// Raw cell value as written in the log.
///
/// The recorders use [`EMPTY`], `1` and `2`, but values are passed through
/// unchecked.
pub type Cell = i32;

/// Cell value of an unoccupied intersection.
pub const EMPTY: Cell = 0;

/// A square grid of cells.
///
/// Invariant: `rows.len() == size` and every row has exactly `size` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BoardState {
    rows: Vec<Vec<Cell>>,
}

impl BoardState {
    /// An all-empty board.
    pub fn empty(size: usize) -> Self {
        Self {
            rows: vec![vec![EMPTY; size]; size],
        }
    }

    /// Rows already validated by the parser.
    pub(super) fn from_checked_rows(rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == rows.len()));
        Self { rows }
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Cell at `row`, `col`, or `None` when outside the board.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Overwrite the cell at `row`, `col`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if let Some(slot) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = cell;
        }
    }

    /// Number of non-empty cells.
    pub fn stone_count(&self) -> usize {
        self.rows.iter().flatten().filter(|&&c| c != EMPTY).count()
    }

    /// Rows in the log's bracketed form, one string per row.
    pub fn to_row_lines(&self) -> Vec<String> {
        self.rows.iter().map(|row| render_row(row)).collect()
    }
}

/// Parse a bracketed, comma separated row such as `[0,1,2]`.
///
/// Returns `None` when the line is not a list of integers.
pub fn parse_row(line: &str) -> Option<Vec<Cell>> {
    let inner = line.trim().strip_prefix('[')?.strip_suffix(']')?;
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }
    inner
        .split(',')
        .map(|cell| cell.trim().parse::<Cell>().ok())
        .collect()
}

/// Render one row in the log's bracketed form.
pub fn render_row(row: &[Cell]) -> String {
    let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
    format!("[{}]", cells.join(","))
}

/// Matrix rendering used in prompts:
///
/// ```text
/// [[0 0 0]
///  [0 1 0]
///  [0 0 2]]
/// ```
impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return write!(f, "[]");
        }

        let width = self
            .rows
            .iter()
            .flatten()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);

        for (i, row) in self.rows.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|c| format!("{c:>width$}")).collect();
            let open = if i == 0 { "[[" } else { " [" };
            let close = if i + 1 == self.rows.len() { "]]" } else { "]\n" };
            write!(f, "{}{}{}", open, cells.join(" "), close)?;
        }
        Ok(())
    }
}

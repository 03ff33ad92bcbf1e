/// Character width of one cell, including its left border column.
pub const CELL_WIDTH: usize = 8;
/// Character height of one cell, including its top border row.
pub const CELL_HEIGHT: usize = 3;

/// Snake-ordered board geometry derived from a tape length.
///
/// Cells are laid out `columns` to a row. Even rows run left to right and
/// odd rows run right to left, so consecutive indices always share an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    len: usize,
    columns: usize,
    rows: usize,
}

/// Logical position of a cell on the board, before mirroring is applied
/// to character coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
}

impl GridLayout {
    pub fn new(len: usize) -> Self {
        let columns = ceil_sqrt(len);
        let mut rows = columns;
        // Drop a trailing row that would stay empty.
        if rows > 0 && rows * (rows - 1) >= len {
            rows -= 1;
        }
        Self { len, columns, rows }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cells per row.
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Width of the rendered board in characters.
    pub fn char_width(&self) -> usize {
        CELL_WIDTH * self.columns + 1
    }

    /// Height of the rendered board in characters.
    pub fn char_height(&self) -> usize {
        CELL_HEIGHT * self.rows + 1
    }

    /// Logical cell of `index`, with `column` counted in reading direction
    /// of its row.
    pub fn cell(&self, index: usize) -> Option<Cell> {
        if index >= self.len {
            return None;
        }
        Some(Cell {
            row: index / self.columns,
            column: index % self.columns,
        })
    }

    /// Character coordinates `(row, col)` of the top-left border corner of
    /// the cell holding `index`.
    pub fn cell_origin(&self, index: usize) -> Option<(usize, usize)> {
        let cell = self.cell(index)?;
        let displayed = if cell.row % 2 == 0 {
            cell.column
        } else {
            self.columns - cell.column - 1
        };
        Some((CELL_HEIGHT * cell.row, CELL_WIDTH * displayed))
    }
}

/// `cell_origin` without holding on to a layout.
pub fn cell_origin(tape_len: usize, index: usize) -> Option<(usize, usize)> {
    GridLayout::new(tape_len).cell_origin(index)
}

/// Smallest `r` with `r * r >= n`.
fn ceil_sqrt(n: usize) -> usize {
    let mut r = (n as f64).sqrt() as usize;
    while r * r < n {
        r += 1;
    }
    while r > 0 && (r - 1) * (r - 1) >= n {
        r -= 1;
    }
    r
}

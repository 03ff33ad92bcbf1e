use std::fmt;
use std::io::Write;

use crate::grid::{CELL_HEIGHT, CELL_WIDTH, GridLayout};
use crate::tape::Tape;

/// Glyph used for every cell border.
pub const BORDER: char = '*';

/// A character surface sized for one board.
///
/// Borders are painted on creation; labels are written into cell interiors
/// and clipped so they never overwrite a border.
#[derive(Debug, Clone)]
pub struct Canvas {
    layout: GridLayout,
    cells: Vec<Vec<char>>,
}

impl Canvas {
    pub fn new(layout: GridLayout) -> Self {
        let width = layout.char_width();
        let cells = (0..layout.char_height())
            .map(|r| {
                (0..width)
                    .map(|c| {
                        if r % CELL_HEIGHT == 0 || c % CELL_WIDTH == 0 {
                            BORDER
                        } else {
                            ' '
                        }
                    })
                    .collect()
            })
            .collect();
        Self { layout, cells }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Character at `(row, col)`, if on the canvas.
    pub fn at(&self, row: usize, col: usize) -> Option<char> {
        self.cells.get(row).and_then(|line| line.get(col)).copied()
    }

    /// Write `label` into the cell for `index`, one line per `\n` segment,
    /// starting one character inside the cell's top-left corner.
    ///
    /// Returns false if `index` is not on the board.
    pub fn fill_cell(&mut self, index: usize, label: &str) -> bool {
        let Some((row, col)) = self.layout.cell_origin(index) else {
            return false;
        };
        for (r, line) in label.split('\n').take(CELL_HEIGHT - 1).enumerate() {
            let target = &mut self.cells[row + 1 + r];
            for (k, ch) in line.chars().take(CELL_WIDTH - 1).enumerate() {
                target[col + 1 + k] = ch;
            }
        }
        true
    }

    /// Rows as strings, top to bottom.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.cells.iter().map(|line| line.iter().collect())
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&line)?;
        }
        Ok(())
    }
}

/// Paint every square of `tape` as `"<index>\n<instruction>"`.
pub fn paint(tape: &Tape) -> Canvas {
    let mut canvas = Canvas::new(GridLayout::new(tape.len()));
    for (i, instr) in tape.instructions().iter().enumerate() {
        canvas.fill_cell(i, &format!("{i}\n{instr}"));
    }
    canvas
}

/// Render `tape` as a newline-joined block of text.
pub fn render(tape: &Tape) -> String {
    paint(tape).to_string()
}

/// Write the rendered board followed by a newline.
pub fn render_to<W: Write>(tape: &Tape, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{}", paint(tape))
}

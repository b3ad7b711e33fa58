use ratatui::{prelude::*, widgets::*};

use crate::hooks::Frame;

/// Terminal columns taken by one grid cell
pub const CELL_WIDTH: u16 = 3;

/// Draws the pitch, one styled glyph per cell
pub struct FieldView<'a> {
    frame: &'a Frame<'a>,
}

impl<'a> FieldView<'a> {
    pub fn new(frame: &'a Frame<'a>) -> Self {
        Self { frame }
    }

    /// Width and height including the border
    pub fn extent(size: usize) -> (u16, u16) {
        (size as u16 * CELL_WIDTH + 2, size as u16 + 2)
    }
}

fn cell(glyph: char) -> (&'static str, Style) {
    match glyph {
        'A' => (" A ", Style::default().black().on_light_yellow().bold()),
        'G' => (" G ", Style::default().white().on_green().bold()),
        'D' => (" D ", Style::default().light_red().bold()),
        'K' => (" K ", Style::default().light_magenta().bold()),
        _ => (" · ", Style::default().dark_gray()),
    }
}

impl Widget for FieldView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Pitch");
        let inner = block.inner(area);
        block.render(area, buf);

        for row in 0..self.frame.size {
            let y = inner.y + row as u16;
            if y >= inner.bottom() {
                break;
            }
            for col in 0..self.frame.size {
                let x = inner.x + col as u16 * CELL_WIDTH;
                if x + CELL_WIDTH > inner.right() {
                    break;
                }
                let (text, style) = cell(self.frame.glyph((row, col)));
                buf.set_string(x, y, text, style);
            }
        }
    }
}

use std::{
    io::{self, stdout, Stdout},
    panic,
    sync::Once,
};

use crossterm as ct;
use ct::{
    cursor,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

static PANIC_HOOK: Once = Once::new();

/// The alternate screen the pitch is drawn on
///
/// Entering switches the terminal to raw mode; the terminal is handed back on
/// [`leave`](Screen::leave) or when the screen is dropped.
pub struct Screen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl Screen {
    pub fn enter() -> io::Result<Self> {
        PANIC_HOOK.call_once(install_panic_hook);
        enable_raw_mode()?;
        ct::execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        terminal.clear()?;
        Ok(Self {
            terminal,
            active: true,
        })
    }

    pub fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut ratatui::Frame<'_>),
    {
        self.terminal.draw(render)?;
        Ok(())
    }

    pub fn leave(mut self) -> io::Result<()> {
        self.active = false;
        restore()
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        if self.active {
            let _ = restore();
        }
    }
}

fn restore() -> io::Result<()> {
    ct::execute!(stdout(), cursor::Show, LeaveAlternateScreen)?;
    disable_raw_mode()
}

/// Leave the alternate screen before a panic message is printed
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}

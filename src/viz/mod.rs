use std::{process, time::Duration};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::LevelFilter;
use ratatui::{prelude::*, widgets::WidgetRef};

use crate::{
    algo::tabular::EpisodeSummary,
    error::Result,
    hooks::{Frame, Renderer},
};

use self::components::{render_help, Component, FieldView, Logs, Stats};

mod components;
mod tui;

/// Route `log` records into the terminal's log panel
pub fn init_logger(level: LevelFilter) -> std::result::Result<(), log::SetLoggerError> {
    tui_logger::init_logger(level)?;
    tui_logger::set_default_level(level);
    Ok(())
}

/// Draws the pitch, episode statistics and recent log records in the terminal
///
/// The terminal is taken over on the first frame and handed back on [`close`](Renderer::close).
/// Pressing `q` or `Esc` at any point restores it and ends the process.
pub struct TerminalRenderer {
    screen: Option<tui::Screen>,
    delay: Duration,
    stats: Stats,
    logs: Logs,
}

impl TerminalRenderer {
    /// `delay` is how long each frame stays on screen
    pub fn new(delay: Duration) -> Self {
        Self {
            screen: None,
            delay,
            stats: Stats::default(),
            logs: Logs::new(),
        }
    }

    fn handle_input(&mut self) -> Result<()> {
        if !event::poll(self.delay)? {
            return Ok(());
        }
        let event = event::read()?;
        if let Event::Key(key) = &event {
            if key.kind == KeyEventKind::Press
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            {
                self.close()?;
                log::info!("Window closed, exiting");
                process::exit(0);
            }
        }
        self.logs.handle_ui_event(&event);
        Ok(())
    }
}

impl Renderer for TerminalRenderer {
    fn draw_frame(&mut self, frame: &Frame<'_>) -> Result<()> {
        if self.screen.is_none() {
            self.screen = Some(tui::Screen::enter()?);
        }
        if let Some(screen) = self.screen.as_mut() {
            let (stats, logs) = (&self.stats, &self.logs);
            screen.draw(|f| {
                let (field_width, field_height) = FieldView::extent(frame.size);
                let [main_area, log_area, help_area] = Layout::vertical([
                    Constraint::Length(field_height.max(12)),
                    Constraint::Fill(1),
                    Constraint::Length(1),
                ])
                .areas(f.size());
                let [field_area, stats_area] = Layout::horizontal([
                    Constraint::Length(field_width),
                    Constraint::Fill(1),
                ])
                .areas(main_area);

                f.render_widget(FieldView::new(frame), field_area);
                stats.render(frame, stats_area, f.buffer_mut());
                logs.render_ref(log_area, f.buffer_mut());
                render_help(help_area, f.buffer_mut());
            })?;
        }
        self.handle_input()
    }

    fn episode_end(&mut self, summary: &EpisodeSummary) {
        self.stats.record(summary);
    }

    fn close(&mut self) -> Result<()> {
        if let Some(screen) = self.screen.take() {
            screen.leave()?;
        }
        Ok(())
    }
}

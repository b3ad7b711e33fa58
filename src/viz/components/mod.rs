pub mod field;
pub mod help;
pub mod log;
pub mod stats;

use crossterm::event::Event;
pub use field::FieldView;
pub use help::render_help;
pub use log::Logs;
use ratatui::widgets::WidgetRef;
pub use stats::Stats;

/// A widget that can react to terminal input
pub trait Component: WidgetRef {
    /// **Returns** whether the event was consumed
    fn handle_ui_event(&mut self, event: &Event) -> bool;
}

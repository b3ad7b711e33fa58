use ratatui::{prelude::*, widgets::*};

/// One-line key legend below the pitch
pub fn render_help(area: Rect, buf: &mut Buffer) {
    let keys = [
        ("q / Esc", "quit"),
        ("PgUp / PgDn", "scroll log"),
        ("+ / -", "log level"),
    ];

    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, action)| {
            [
                Span::from(format!(" {key} ")).light_cyan().bold(),
                Span::raw(format!(": {action}  ")),
            ]
        })
        .collect();

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}

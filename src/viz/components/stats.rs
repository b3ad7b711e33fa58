use ratatui::{prelude::*, widgets::*};

use crate::{algo::tabular::EpisodeSummary, hooks::Frame};

/// Running episode statistics next to the pitch
#[derive(Default)]
pub struct Stats {
    pub episode: u32,
    pub last: Option<EpisodeSummary>,
    /// Steps taken per finished episode
    pub history: Vec<u64>,
}

impl Stats {
    pub fn record(&mut self, summary: &EpisodeSummary) {
        self.episode += 1;
        self.history.push(summary.steps.into());
        self.last = Some(*summary);
    }

    pub fn render(&self, frame: &Frame<'_>, area: Rect, buf: &mut Buffer) {
        let [text_area, spark_area] =
            Layout::vertical([Constraint::Length(7), Constraint::Fill(1)]).areas(area);

        let mut lines = vec![
            Line::from(vec![
                Span::from("Episode  ").cyan(),
                Span::raw((self.episode + 1).to_string()),
            ]),
            Line::from(vec![
                Span::from("Steps    ").cyan(),
                Span::raw(frame.steps.to_string()),
            ]),
            Line::from(vec![
                Span::from("Reward   ").cyan(),
                Span::raw(format!("{:.2}", frame.reward)),
            ]),
        ];
        if let Some(last) = &self.last {
            lines.push(Line::from(vec![
                Span::from("Previous ").cyan(),
                Span::raw(format!("{:.2} in {} steps", last.reward, last.steps)),
            ]));
            lines.push(Line::from(vec![
                Span::from("Epsilon  ").cyan(),
                Span::raw(format!("{:.3}", last.epsilon)),
            ]));
        }

        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Episode"),
            )
            .render(text_area, buf);

        let width = spark_area.width.saturating_sub(2) as usize;
        let recent = &self.history[self.history.len().saturating_sub(width)..];
        Sparkline::default()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Steps per episode"),
            )
            .data(recent)
            .style(Style::default().light_green())
            .render(spark_area, buf);
    }
}

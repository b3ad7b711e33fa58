use std::{
    collections::BTreeMap,
    fmt,
    io::{self, Write},
    thread,
    time::Duration,
};

use log::debug;
use strum::Display;

use crate::{
    algo::tabular::q_table::EpisodeSummary,
    error::Result,
    gym::penalty_kick::{Obstacle, Pos, Role},
};

/// Everything needed to draw the pitch at one instant
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub size: usize,
    pub agent: Pos,
    pub goals: &'a BTreeMap<String, Pos>,
    pub obstacles: &'a [Obstacle],
    pub steps: u32,
    pub reward: f32,
}

impl Frame<'_> {
    /// The glyph occupying a cell, the striker drawn above everything else
    pub fn glyph(&self, pos: Pos) -> char {
        if pos == self.agent {
            'A'
        } else if self.goals.values().any(|&g| g == pos) {
            'G'
        } else {
            match self.obstacles.iter().find(|o| o.pos == pos) {
                Some(Obstacle {
                    role: Role::Defender,
                    ..
                }) => 'D',
                Some(Obstacle {
                    role: Role::Goalkeeper,
                    ..
                }) => 'K',
                None => '.',
            }
        }
    }
}

impl fmt::Display for Frame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            let line: String = (0..self.size).map(|col| self.glyph((row, col))).collect();
            writeln!(f, "{line}")?;
        }
        write!(f, "steps: {}  reward: {:.2}", self.steps, self.reward)
    }
}

/// Named sound effects emitted over an episode
#[derive(Display, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    /// Referee whistle at the start of an episode
    Kickoff,
    /// Footsteps just before every move
    Run,
    /// Crowd applause for a goal
    Score,
    /// Crowd booing after running into an obstacle
    Fail,
    /// The episode ran out of time
    Concede,
}

/// Draws the pitch. Called once per step when rendering is enabled.
pub trait Renderer {
    fn draw_frame(&mut self, frame: &Frame<'_>) -> Result<()>;

    /// Called after every finished episode
    fn episode_end(&mut self, _summary: &EpisodeSummary) {}

    /// Release any display resources
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Plays sound effects. Purely side-effecting.
pub trait Sound {
    fn play_cue(&mut self, cue: Cue);
}

/// Renderer that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl Renderer for Headless {
    fn draw_frame(&mut self, _frame: &Frame<'_>) -> Result<()> {
        Ok(())
    }
}

/// Prints the pitch as text, pausing between frames
pub struct AsciiRenderer<W: Write> {
    out: W,
    delay: Duration,
}

impl AsciiRenderer<io::Stdout> {
    pub fn stdout(delay: Duration) -> Self {
        Self::new(io::stdout(), delay)
    }
}

impl<W: Write> AsciiRenderer<W> {
    pub fn new(out: W, delay: Duration) -> Self {
        Self { out, delay }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for AsciiRenderer<W> {
    fn draw_frame(&mut self, frame: &Frame<'_>) -> Result<()> {
        writeln!(self.out, "{frame}\n")?;
        self.out.flush()?;
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        Ok(())
    }
}

/// Sound that stays quiet
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Sound for Silent {
    fn play_cue(&mut self, _cue: Cue) {}
}

/// Reports every cue to the logger instead of an audio device
#[derive(Debug, Default, Clone, Copy)]
pub struct CueLog;

impl Sound for CueLog {
    fn play_cue(&mut self, cue: Cue) {
        debug!(target: "sound", "{cue}");
    }
}

/// The presentation capabilities injected into the training and evaluation loops
pub struct Hooks {
    renderer: Box<dyn Renderer>,
    sound: Box<dyn Sound>,
}

impl Hooks {
    pub fn new(renderer: Box<dyn Renderer>, sound: Box<dyn Sound>) -> Self {
        Self { renderer, sound }
    }

    /// No drawing and no sound
    pub fn headless() -> Self {
        Self::new(Box::new(Headless), Box::new(Silent))
    }

    pub fn draw(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.renderer.draw_frame(frame)
    }

    pub fn cue(&mut self, cue: Cue) {
        self.sound.play_cue(cue);
    }

    pub fn episode_end(&mut self, summary: &EpisodeSummary) {
        self.renderer.episode_end(summary);
    }

    pub fn close(&mut self) -> Result<()> {
        self.renderer.close()
    }
}

impl Default for Hooks {
    fn default() -> Self {
        Self::headless()
    }
}

#[cfg(test)]
mod tests {
    use crate::gym::penalty_kick::{PenaltyKick, PenaltyKickConfig};

    use super::*;

    fn field() -> PenaltyKick {
        let mut env = PenaltyKick::new(PenaltyKickConfig {
            size: 4,
            start: (1, 0),
            goals: BTreeMap::from([(String::from("Bar"), (1, 3))]),
            ..Default::default()
        })
        .unwrap();
        env.add_danger((0, 2), Role::Defender).unwrap();
        env.add_danger((1, 2), Role::Goalkeeper).unwrap();
        env
    }

    #[test]
    fn frame_draws_every_piece() {
        let env = field();
        let drawn = env.frame().to_string();
        let rows: Vec<&str> = drawn.lines().collect();
        assert_eq!(rows[..4], ["..D.", "A.KG", "....", "...."]);
        assert_eq!(rows[4], "steps: 0  reward: 0.00");
    }

    #[test]
    fn ascii_renderer_writes_frames() {
        let env = field();
        let mut renderer = AsciiRenderer::new(Vec::new(), Duration::ZERO);
        renderer.draw_frame(&env.frame()).unwrap();
        renderer.draw_frame(&env.frame()).unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out.matches("A.KG").count(), 2);
    }
}

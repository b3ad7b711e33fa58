use std::collections::BTreeMap;

use strum::{Display, EnumIter, FromRepr, VariantArray};

use crate::{
    env::{DiscreteActionSpace, Environment, Step},
    error::{Error, Result},
    hooks::Frame,
};

/// Grid coordinates `(row, col)`
pub type Pos = (usize, usize);

/// Reward for scoring in one of the goal cells
pub const GOAL_REWARD: f32 = 10.0;

/// Magnitude of the penalty for running into a defender or the goalkeeper
pub const OBSTACLE_PENALTY: f32 = 10.0;

#[derive(EnumIter, VariantArray, FromRepr, Display, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Action {
    Up = 0,
    Down = 1,
    Right = 2,
    Left = 3,
}

impl Action {
    /// Position of this action along the last axis of a Q-table
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for Action {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        Action::from_repr(value).ok_or(Error::InvalidAction(value))
    }
}

/// What an obstacle represents on the pitch. Only affects rendering.
#[derive(Display, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Defender,
    Goalkeeper,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Obstacle {
    pub pos: Pos,
    pub role: Role,
}

/// How an episode stands after the latest transition
#[derive(Display, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    #[default]
    Running,
    Goal,
    Obstacle,
    /// Ended by the step cap rather than by reaching a goal or an obstacle
    Truncated,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Running
    }
}

/// The reward scheme applied by [`PenaltyKick::step`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RewardPolicy {
    /// `+10` for a goal, `-10` for an obstacle, nothing otherwise
    Flat,
    /// Terminal rewards decayed by `steps / 100` plus a per-step progress signal
    #[default]
    Shaped,
    /// Same rewards as [`Shaped`](RewardPolicy::Shaped), but every step reports the
    /// episode's running total instead of its own increment
    ShapedCumulative,
}

impl RewardPolicy {
    /// Whether [`PenaltyKick::step`] reports the running total rather than the increment
    pub fn reports_running_total(self) -> bool {
        self == RewardPolicy::ShapedCumulative
    }

    /// Reward for a transition that left the episode in `outcome`
    ///
    /// `cumulative` is the episode's reward before this transition.
    pub fn reward(
        self,
        outcome: Outcome,
        old_distance: f32,
        new_distance: f32,
        steps: u32,
        cumulative: f32,
    ) -> f32 {
        match self {
            RewardPolicy::Flat => match outcome {
                Outcome::Goal => GOAL_REWARD,
                Outcome::Obstacle => -OBSTACLE_PENALTY,
                Outcome::Running | Outcome::Truncated => 0.0,
            },
            RewardPolicy::Shaped | RewardPolicy::ShapedCumulative => {
                let time_cost = steps as f32 / 100.0;
                match outcome {
                    Outcome::Goal => GOAL_REWARD - time_cost,
                    Outcome::Obstacle => -(cumulative.abs() + OBSTACLE_PENALTY + time_cost),
                    Outcome::Running | Outcome::Truncated => {
                        shaping(old_distance, new_distance) - time_cost
                    }
                }
            }
        }
    }
}

/// Progress signal: `+0.1` when the nearest goal got closer, `0` when unchanged, `-0.2` otherwise
pub fn shaping(old_distance: f32, new_distance: f32) -> f32 {
    if new_distance < old_distance {
        0.1
    } else if new_distance == old_distance {
        0.0
    } else {
        -0.2
    }
}

/// Diagnostics returned alongside every observation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Info {
    /// Euclidean distance from the agent to the nearest goal cell
    pub distance_to_goal: f32,
    pub steps: u32,
    pub outcome: Outcome,
}

/// Mutable state of the episode in progress
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EpisodeState {
    pub pos: Pos,
    pub steps: u32,
    pub cumulative_reward: f32,
    pub terminated: bool,
    pub last_distance: f32,
    pub outcome: Outcome,
}

/// Configuration for [`PenaltyKick`]
#[derive(Clone, Debug)]
pub struct PenaltyKickConfig {
    pub size: usize,
    pub start: Pos,
    /// Named goal cells, e.g. the three bars of the goal mouth
    pub goals: BTreeMap<String, Pos>,
    pub reward_policy: RewardPolicy,
    /// Force-terminate an episode after this many steps
    pub max_steps: Option<u32>,
}

impl Default for PenaltyKickConfig {
    fn default() -> Self {
        Self {
            size: 9,
            start: (4, 0),
            goals: BTreeMap::from([
                (String::from("Bar1"), (3, 8)),
                (String::from("Bar2"), (4, 8)),
                (String::from("Bar3"), (5, 8)),
            ]),
            reward_policy: RewardPolicy::default(),
            max_steps: Some(10 * 9 * 9),
        }
    }
}

/// A square pitch on which the striker dribbles from the left edge towards the goal
/// on the right edge, past defenders and a goalkeeper.
///
/// Every move costs a step. Stepping onto a goal cell scores and ends the episode,
/// stepping onto an obstacle ends it with a penalty. Moves off the pitch leave the
/// striker where it is.
#[derive(Clone, Debug)]
pub struct PenaltyKick {
    size: usize,
    start: Pos,
    goals: BTreeMap<String, Pos>,
    obstacles: Vec<Obstacle>,
    reward_policy: RewardPolicy,
    max_steps: Option<u32>,
    episode: EpisodeState,
}

impl PenaltyKick {
    /// Build the pitch without any obstacles. Add them with [`add_danger`](Self::add_danger).
    pub fn new(config: PenaltyKickConfig) -> Result<Self> {
        let PenaltyKickConfig {
            size,
            start,
            goals,
            reward_policy,
            max_steps,
        } = config;

        if size == 0 {
            return Err(Error::invalid_parameter("size", "grid must not be empty"));
        }
        if goals.is_empty() {
            return Err(Error::invalid_parameter("goals", "at least one goal is required"));
        }
        if max_steps == Some(0) {
            return Err(Error::invalid_parameter("max_steps", "must be positive"));
        }
        for &pos in goals.values().chain([&start]) {
            if !in_bounds(pos, size) {
                return Err(Error::OutOfBounds { pos, size });
            }
        }
        if goals.values().any(|&g| g == start) {
            return Err(Error::invalid_parameter("start", "must not be a goal cell"));
        }

        let mut env = Self {
            size,
            start,
            goals,
            obstacles: Vec::new(),
            reward_policy,
            max_steps,
            episode: EpisodeState::default(),
        };
        env.reset();
        Ok(env)
    }

    /// Place a defender or the goalkeeper on the pitch
    ///
    /// Obstacles must lie on the pitch and may not cover a goal or the kickoff cell.
    pub fn add_danger(&mut self, pos: Pos, role: Role) -> Result<()> {
        if !in_bounds(pos, self.size) {
            return Err(Error::OutOfBounds {
                pos,
                size: self.size,
            });
        }
        if self.is_goal(pos) {
            return Err(Error::invalid_parameter(
                "pos",
                format!("({}, {}) is a goal cell", pos.0, pos.1),
            ));
        }
        if pos == self.start {
            return Err(Error::invalid_parameter(
                "pos",
                format!("({}, {}) is the kickoff cell", pos.0, pos.1),
            ));
        }
        self.obstacles.push(Obstacle { pos, role });
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn goals(&self) -> &BTreeMap<String, Pos> {
        &self.goals
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn reward_policy(&self) -> RewardPolicy {
        self.reward_policy
    }

    pub fn episode(&self) -> &EpisodeState {
        &self.episode
    }

    /// Snapshot of everything a renderer needs to draw the pitch
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            size: self.size,
            agent: self.episode.pos,
            goals: &self.goals,
            obstacles: &self.obstacles,
            steps: self.episode.steps,
            reward: self.episode.cumulative_reward,
        }
    }

    /// Euclidean distance from `pos` to the nearest goal
    pub fn distance_to_goal(&self, pos: Pos) -> f32 {
        self.goals
            .values()
            .map(|&goal| euclidean(pos, goal))
            .fold(f32::INFINITY, f32::min)
    }

    fn is_goal(&self, pos: Pos) -> bool {
        self.goals.values().any(|&g| g == pos)
    }

    fn is_obstacle(&self, pos: Pos) -> bool {
        self.obstacles.iter().any(|o| o.pos == pos)
    }

    fn info(&self) -> Info {
        Info {
            distance_to_goal: self.episode.last_distance,
            steps: self.episode.steps,
            outcome: self.episode.outcome,
        }
    }

    /// Decide termination and reward for the position just reached
    fn judge(&mut self) -> (bool, f32) {
        let pos = self.episode.pos;
        let old_distance = self.episode.last_distance;
        let new_distance = self.distance_to_goal(pos);
        self.episode.last_distance = new_distance;

        let outcome = if self.is_goal(pos) {
            Outcome::Goal
        } else if self.is_obstacle(pos) {
            Outcome::Obstacle
        } else if self.max_steps.is_some_and(|max| self.episode.steps >= max) {
            Outcome::Truncated
        } else {
            Outcome::Running
        };

        let reward = self.reward_policy.reward(
            outcome,
            old_distance,
            new_distance,
            self.episode.steps,
            self.episode.cumulative_reward,
        );

        self.episode.outcome = outcome;
        self.episode.terminated = outcome.is_terminal();
        self.episode.cumulative_reward += reward;

        let reported = if self.reward_policy.reports_running_total() {
            self.episode.cumulative_reward
        } else {
            reward
        };
        (self.episode.terminated, reported)
    }
}

impl Environment for PenaltyKick {
    type State = Pos;
    type Action = Action;
    type Info = Info;

    fn step(&mut self, action: Self::Action) -> Step<Self> {
        let (row, col) = &mut self.episode.pos;
        match action {
            Action::Up if *row > 0 => *row -= 1,
            Action::Down if *row < self.size - 1 => *row += 1,
            Action::Right if *col < self.size - 1 => *col += 1,
            Action::Left if *col > 0 => *col -= 1,
            _ => {}
        }
        self.episode.steps += 1;

        let (terminated, reward) = self.judge();

        Step {
            state: self.episode.pos,
            terminated,
            reward,
            info: self.info(),
        }
    }

    fn reset(&mut self) -> (Self::State, Self::Info) {
        self.episode = EpisodeState {
            pos: self.start,
            last_distance: self.distance_to_goal(self.start),
            ..Default::default()
        };
        (self.episode.pos, self.info())
    }
}

impl DiscreteActionSpace for PenaltyKick {
    fn actions(&self) -> Vec<Self::Action> {
        Action::VARIANTS.to_vec()
    }
}

fn in_bounds(pos: Pos, size: usize) -> bool {
    pos.0 < size && pos.1 < size
}

fn euclidean(a: Pos, b: Pos) -> f32 {
    let dr = a.0 as f32 - b.0 as f32;
    let dc = a.1 as f32 - b.1 as f32;
    (dr * dr + dc * dc).sqrt()
}

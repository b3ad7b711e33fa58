use std::{fs, path::Path};

use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use strum::VariantArray;

use crate::{
    decay::Multiplicative,
    ensure_interval,
    env::{DiscreteActionSpace, Environment, Step},
    error::{Error, Result},
    exploration::{Choice, EpsilonGreedy},
    gym::penalty_kick::{Action, Pos},
};

/// Number of actions, the length of the last table axis
const ACTIONS: usize = Action::VARIANTS.len();

/// Dense table of action values over a square grid, shaped `[size, size, 4]`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    size: usize,
    values: Vec<f32>,
}

impl QTable {
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            values: vec![0.0; size * size * ACTIONS],
        }
    }

    /// Every entry drawn independently from `U[0, 1)`
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let dist = Uniform::new(0.0f32, 1.0);
        Self {
            size,
            values: (0..size * size * ACTIONS).map(|_| dist.sample(rng)).collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn shape(&self) -> [usize; 3] {
        [self.size, self.size, ACTIONS]
    }

    /// Fails unless the table covers a `size x size` grid
    pub fn check_size(&self, size: usize) -> Result<()> {
        if self.size == size {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: format!("[{size}, {size}, {ACTIONS}]"),
                actual: format!("{:?}", self.shape()),
            })
        }
    }

    fn offset(&self, pos: Pos) -> usize {
        (pos.0 * self.size + pos.1) * ACTIONS
    }

    /// The four action values at `pos`, in [`Action`] order
    pub fn q_values(&self, pos: Pos) -> &[f32] {
        let i = self.offset(pos);
        &self.values[i..i + ACTIONS]
    }

    pub fn get(&self, pos: Pos, action: Action) -> f32 {
        self.values[self.offset(pos) + action.index()]
    }

    pub fn set(&mut self, pos: Pos, action: Action, value: f32) {
        let i = self.offset(pos) + action.index();
        self.values[i] = value;
    }

    /// Highest action value at `pos`
    pub fn max(&self, pos: Pos) -> f32 {
        self.q_values(pos)
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Greedy action at `pos`. Ties go to the action listed first.
    pub fn argmax(&self, pos: Pos) -> Action {
        let q = self.q_values(pos);
        let best = (1..ACTIONS).fold(0, |best, i| if q[i] > q[best] { i } else { best });
        Action::VARIANTS[best]
    }

    /// Write the table to `path`, replacing any previous file in one rename
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("partial");
        fs::write(&tmp, bincode::serialize(self)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read(path)?;
        let table: Self = bincode::deserialize(&data)?;
        let Some(expected) = table
            .size
            .checked_mul(table.size)
            .and_then(|n| n.checked_mul(ACTIONS))
        else {
            return Err(Error::DimensionMismatch {
                expected: format!("a {0}x{0} table", table.size),
                actual: format!("{} values", table.values.len()),
            });
        };
        if table.values.len() != expected {
            return Err(Error::DimensionMismatch {
                expected: format!("{expected} values"),
                actual: format!("{} values", table.values.len()),
            });
        }
        Ok(table)
    }

    /// Run one purely greedy episode without changing the table
    ///
    /// `on_step` sees the environment after every transition.
    pub fn play<E, F>(&self, env: &mut E, mut on_step: F) -> Result<EpisodeSummary>
    where
        E: Environment<State = Pos, Action = Action>,
        F: FnMut(&E, &Step<E>) -> Result<()>,
    {
        let (mut state, _) = env.reset();
        let mut summary = EpisodeSummary::default();

        loop {
            let step = env.step(self.argmax(state));
            on_step(env, &step)?;

            summary.reward += step.reward;
            summary.steps += 1;
            state = step.state;

            if step.terminated {
                break;
            }
        }

        Ok(summary)
    }
}

/// Totals for one finished episode
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpisodeSummary {
    pub reward: f32,
    pub steps: u32,
    /// Exploration rate in effect during the episode
    pub epsilon: f32,
    /// How the final action of the episode was picked
    pub last_choice: Choice,
}

impl Default for EpisodeSummary {
    fn default() -> Self {
        Self {
            reward: 0.0,
            steps: 0,
            epsilon: 0.0,
            last_choice: Choice::Exploit,
        }
    }
}

/// Configuration for the [`QTableAgent`]
#[derive(Clone, Debug)]
pub struct QTableAgentConfig {
    /// The learning rate - must be between 0 and 1
    pub alpha: f32,
    /// The discount factor - must be between 0 and 1
    pub gamma: f32,
    /// Exploration rate of the first episode
    pub epsilon: f32,
    /// Exploration rate never decays below this
    pub epsilon_min: f32,
    /// Factor applied to the exploration rate after every episode
    pub epsilon_decay: f32,
    /// Start from `U[0, 1)` values instead of zeros
    pub random_init: bool,
    /// Seed for exploration and initialization, drawn from the OS when `None`
    pub seed: Option<u64>,
}

impl Default for QTableAgentConfig {
    fn default() -> Self {
        Self {
            alpha: 0.01,
            gamma: 0.99,
            epsilon: 1.0,
            epsilon_min: 0.1,
            epsilon_decay: 0.995,
            random_init: false,
            seed: None,
        }
    }
}

/// A Q-learning agent that keeps one value per cell and action
pub struct QTableAgent {
    q_table: QTable,
    exploration: EpsilonGreedy<Multiplicative>,
    alpha: f32,   // learning rate
    gamma: f32,   // discount factor
    episode: u32, // current episode
    rng: StdRng,
}

impl QTableAgent {
    /// Initialize a new agent for a `size x size` grid
    ///
    /// Fails if `alpha`, `gamma`, `epsilon` or `epsilon_min` is not in `[0,1]`,
    /// if `epsilon` is below `epsilon_min`, or if `epsilon_decay` is not in `(0,1]`.
    pub fn new(size: usize, config: QTableAgentConfig) -> Result<Self> {
        ensure_interval!(config.alpha, 0.0, 1.0);
        ensure_interval!(config.gamma, 0.0, 1.0);
        ensure_interval!(config.epsilon, 0.0, 1.0);
        ensure_interval!(config.epsilon_min, 0.0, 1.0);
        let schedule =
            Multiplicative::new(config.epsilon_decay, config.epsilon, config.epsilon_min)?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let q_table = if config.random_init {
            QTable::random(size, &mut rng)
        } else {
            QTable::zeros(size)
        };

        Ok(Self {
            q_table,
            exploration: EpsilonGreedy::new(schedule),
            alpha: config.alpha,
            gamma: config.gamma,
            episode: 0,
            rng,
        })
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn into_q_table(self) -> QTable {
        self.q_table
    }

    /// Number of finished episodes
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Exploration rate for the next episode
    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon(self.episode)
    }

    fn act<E>(&mut self, env: &E, state: Pos) -> (Action, Choice)
    where
        E: DiscreteActionSpace<State = Pos, Action = Action>,
    {
        let choice = self.exploration.choose(&mut self.rng, self.episode);
        let action = match choice {
            Choice::Explore => env.random_action(&mut self.rng),
            Choice::Exploit => self.q_table.argmax(state),
        };
        (action, choice)
    }

    /// Move `Q(s, a)` towards `r + gamma * max Q(s', .)`
    fn learn(&mut self, state: Pos, action: Action, reward: f32, next_state: Pos) {
        let q_value = self.q_table.get(state, action);
        let max_next_q = self.q_table.max(next_state);
        let update = q_value + self.alpha * (reward + self.gamma * max_next_q - q_value);
        self.q_table.set(state, action, update);
    }

    /// Play and learn from one full episode
    ///
    /// `on_step` sees the environment after every transition. The exploration rate
    /// decays once the episode is over.
    pub fn go<E, F>(&mut self, env: &mut E, mut on_step: F) -> Result<EpisodeSummary>
    where
        E: DiscreteActionSpace<State = Pos, Action = Action>,
        F: FnMut(&E, &Step<E>) -> Result<()>,
    {
        let (mut state, _) = env.reset();
        let mut summary = EpisodeSummary {
            epsilon: self.epsilon(),
            ..Default::default()
        };

        loop {
            let (action, choice) = self.act(env, state);
            let step = env.step(action);
            on_step(env, &step)?;

            self.learn(state, action, step.reward, step.state);

            summary.reward += step.reward;
            summary.steps += 1;
            summary.last_choice = choice;
            state = step.state;

            if step.terminated {
                break;
            }
        }

        self.episode += 1;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use crate::env::tests::MockEnv;

    use super::*;

    fn config(epsilon: f32, epsilon_min: f32, epsilon_decay: f32) -> QTableAgentConfig {
        QTableAgentConfig {
            alpha: 0.5,
            gamma: 0.9,
            epsilon,
            epsilon_min,
            epsilon_decay,
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn argmax_prefers_first_of_ties() {
        let mut table = QTable::zeros(3);
        assert_eq!(table.argmax((1, 1)), Action::Up, "All zeros picks the first action");

        table.set((1, 1), Action::Down, 3.0);
        table.set((1, 1), Action::Right, 3.0);
        table.set((1, 1), Action::Left, -1.0);
        assert_eq!(table.argmax((1, 1)), Action::Down);
        assert_eq!(table.max((1, 1)), 3.0);
        assert_eq!(table.q_values((1, 1)), [0.0, 3.0, 3.0, -1.0]);
        assert_eq!(table.get((1, 2), Action::Down), 0.0, "Neighbouring cell untouched");
    }

    #[test]
    fn random_init_is_unit_interval() {
        let mut rng = StdRng::seed_from_u64(3);
        let table = QTable::random(9, &mut rng);
        assert_eq!(table.shape(), [9, 9, 4]);
        assert!(table.values.iter().all(|v| (0.0..1.0).contains(v)));
        assert!(table.values.iter().any(|&v| v != table.values[0]));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables/q_table.bin");

        let mut table = QTable::zeros(9);
        table.set((4, 7), Action::Right, 9.5);
        table.save(&path).unwrap();

        let loaded = QTable::load(&path).unwrap();
        assert_eq!(loaded, table);
        assert!(loaded.check_size(9).is_ok());
        assert!(matches!(
            loaded.check_size(5),
            Err(Error::DimensionMismatch { .. })
        ));
        assert!(!path.with_extension("partial").exists());
    }

    #[test]
    fn load_rejects_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            QTable::load(dir.path().join("missing.bin")),
            Err(Error::Io(_))
        ));

        let short = dir.path().join("short.bin");
        fs::write(&short, bincode::serialize(&(3usize, vec![0.0f32; 5])).unwrap()).unwrap();
        assert!(matches!(
            QTable::load(&short),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn load_rejects_overflowing_size() {
        let dir = tempfile::tempdir().unwrap();
        let huge = dir.path().join("huge.bin");
        fs::write(&huge, bincode::serialize(&(usize::MAX, Vec::<f32>::new())).unwrap()).unwrap();
        assert!(matches!(
            QTable::load(&huge),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn single_goal_transition_learns_alpha_times_reward() {
        let mut agent = QTableAgent::new(2, config(1.0, 1.0, 1.0)).unwrap();
        agent.learn((0, 0), Action::Right, 10.0, (0, 1));
        assert_eq!(agent.q_table().get((0, 0), Action::Right), 0.5 * 10.0);
    }

    #[test]
    fn first_episode_learns_goal_value() {
        let mut env = MockEnv::new(2, 10.0);
        let mut agent = QTableAgent::new(2, config(1.0, 1.0, 1.0)).unwrap();
        let mut seen = 0;
        let summary = agent
            .go(&mut env, |_, _| {
                seen += 1;
                Ok(())
            })
            .unwrap();

        assert_eq!(summary.steps, seen);
        assert_eq!(summary.reward, 10.0);
        assert_eq!(summary.last_choice, Choice::Explore);
        assert_eq!(agent.q_table().get((0, 0), Action::Right), 5.0);
        assert_eq!(agent.episode(), 1);
    }

    #[test]
    fn epsilon_floors_after_enough_episodes() {
        let mut env = MockEnv::new(3, 1.0);
        let mut agent = QTableAgent::new(3, config(1.0, 0.25, 0.5)).unwrap();
        for _ in 0..10 {
            agent.go(&mut env, |_, _| Ok(())).unwrap();
        }
        assert_eq!(agent.epsilon(), 0.25);
    }

    #[test]
    fn greedy_play_follows_table() {
        let mut table = QTable::zeros(3);
        table.set((0, 0), Action::Right, 1.0);
        table.set((0, 1), Action::Right, 1.0);
        let mut env = MockEnv::new(3, 2.0);
        let summary = table.play(&mut env, |_, _| Ok(())).unwrap();
        assert_eq!(summary.steps, 2);
        assert_eq!(summary.reward, 2.0);
    }

    #[test]
    fn invalid_hyperparameters_are_rejected() {
        let bad_alpha = QTableAgentConfig {
            alpha: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            QTableAgent::new(9, bad_alpha),
            Err(Error::InvalidParameter { .. })
        ));

        let inverted = QTableAgentConfig {
            epsilon: 0.05,
            epsilon_min: 0.1,
            ..Default::default()
        };
        assert!(QTableAgent::new(9, inverted).is_err());
    }
}

use penalty_kick::{
    algo::tabular::QTableAgentConfig,
    config::{Config, TrainConfig},
    gym::penalty_kick::Outcome,
    hooks::{Frame, Hooks, Renderer, Silent},
    runner, Error, Result,
};

const SIZE: u32 = 9;

fn scenario(seed: u64, q_table_path: std::path::PathBuf) -> Config {
    Config {
        train: TrainConfig {
            episodes: 1_000,
            agent: QTableAgentConfig {
                alpha: 0.01,
                gamma: 0.99,
                epsilon: 1.0,
                epsilon_min: 0.1,
                epsilon_decay: 0.995,
                random_init: false,
                seed: Some(seed),
            },
            q_table_path,
        },
        ..Default::default()
    }
}

/// Fails the episode once it has drawn more frames than the pitch has room for
struct Guard {
    frames: u32,
    limit: u32,
}

impl Renderer for Guard {
    fn draw_frame(&mut self, _frame: &Frame<'_>) -> Result<()> {
        self.frames += 1;
        if self.frames > self.limit {
            return Err(Error::invalid_parameter("steps", "greedy policy never terminated"));
        }
        Ok(())
    }
}

#[test]
fn trained_striker_scores() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = scenario(7, dir.path().join("q_table.bin"));
    assert_eq!(cfg.env.max_steps, Some(10 * SIZE * SIZE));

    let mut env = cfg.build_env().unwrap();
    runner::train(&mut env, &cfg.train, &mut Hooks::headless()).unwrap();
    assert!(cfg.train.q_table_path.is_file());

    // Only the learned policy may end the replay
    cfg.env.max_steps = None;
    let mut env = cfg.build_env().unwrap();
    let guard = Guard {
        frames: 0,
        limit: 10 * SIZE * SIZE,
    };
    let mut hooks = Hooks::new(Box::new(guard), Box::new(Silent));
    let evaluation = runner::evaluate(&mut env, &cfg.train.q_table_path, &mut hooks)
        .unwrap()
        .expect("table was just saved");

    assert_eq!(evaluation.outcome, Outcome::Goal);
    assert!(evaluation.total_reward > 0.0);
    assert!(evaluation.steps >= 8, "The goal line is eight columns away");
    assert_eq!(env.episode().outcome, Outcome::Goal);
}

#[test]
fn evaluation_without_training_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = scenario(1, dir.path().join("missing.bin"));
    let mut env = cfg.build_env().unwrap();
    let evaluation =
        runner::evaluate(&mut env, &cfg.train.q_table_path, &mut Hooks::headless()).unwrap();
    assert!(evaluation.is_none());
}

use std::path::Path;

use log::{info, warn};

use crate::{
    algo::tabular::{QTable, QTableAgent},
    config::TrainConfig,
    env::Step,
    error::Result,
    gym::penalty_kick::{Outcome, PenaltyKick},
    hooks::{Cue, Hooks},
};

/// Result of a greedy evaluation run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluation {
    pub total_reward: f32,
    pub steps: u32,
    pub outcome: Outcome,
}

/// The striker starts running before every move, including the first one
fn kickoff(hooks: &mut Hooks) {
    hooks.cue(Cue::Kickoff);
    hooks.cue(Cue::Run);
}

fn present(hooks: &mut Hooks, env: &PenaltyKick, step: &Step<PenaltyKick>) -> Result<()> {
    match step.info.outcome {
        Outcome::Goal => hooks.cue(Cue::Score),
        Outcome::Obstacle => hooks.cue(Cue::Fail),
        Outcome::Truncated => hooks.cue(Cue::Concede),
        Outcome::Running => {}
    }
    hooks.draw(&env.frame())?;
    if !step.terminated {
        hooks.cue(Cue::Run);
    }
    Ok(())
}

/// Train a fresh agent for `config.episodes` episodes and save its table
///
/// The table is written once, after the last episode.
pub fn train(env: &mut PenaltyKick, config: &TrainConfig, hooks: &mut Hooks) -> Result<QTable> {
    let mut agent = QTableAgent::new(env.size(), config.agent.clone())?;

    for episode in 0..config.episodes {
        kickoff(hooks);
        let summary = agent.go(env, |env, step| present(hooks, env, step))?;
        hooks.episode_end(&summary);

        info!(
            "Episode {}: Total Reward: {:.2}, Epsilon: {:.3}, Steps: {}, Outcome: {}, Mode: {}",
            episode + 1,
            summary.reward,
            agent.epsilon(),
            summary.steps,
            env.episode().outcome,
            summary.last_choice,
        );
    }

    hooks.close()?;
    info!("Training finished");

    let table = agent.into_q_table();
    table.save(&config.q_table_path)?;
    info!("Saved the Q-table to {}", config.q_table_path.display());

    Ok(table)
}

/// Replay one greedy episode with a trained table
pub fn evaluate_table(
    table: &QTable,
    env: &mut PenaltyKick,
    hooks: &mut Hooks,
) -> Result<Evaluation> {
    table.check_size(env.size())?;

    kickoff(hooks);
    let summary = table.play(env, |env, step| present(hooks, env, step))?;
    hooks.close()?;

    let evaluation = Evaluation {
        total_reward: summary.reward,
        steps: summary.steps,
        outcome: env.episode().outcome,
    };
    info!(
        "Test completed. Total Reward: {:.2}, Steps Taken: {}, Outcome: {}",
        evaluation.total_reward, evaluation.steps, evaluation.outcome
    );
    Ok(evaluation)
}

/// Load the table at `path` and evaluate it
///
/// A missing table is not an error: it is reported and `None` is returned.
pub fn evaluate(
    env: &mut PenaltyKick,
    path: impl AsRef<Path>,
    hooks: &mut Hooks,
) -> Result<Option<Evaluation>> {
    let path = path.as_ref();
    if !path.is_file() {
        warn!(
            "No saved Q-table was found at {}. Train the agent first.",
            path.display()
        );
        return Ok(None);
    }

    let table = QTable::load(path)?;
    evaluate_table(&table, env, hooks).map(Some)
}

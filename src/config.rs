use std::path::PathBuf;

use crate::{
    algo::tabular::QTableAgentConfig,
    error::Result,
    gym::penalty_kick::{PenaltyKick, PenaltyKickConfig, Pos, Role},
};

/// Default location of the persisted Q-table
pub const Q_TABLE_PATH: &str = "q_table.bin";

/// Default directory for exported heatmaps
pub const EXPORT_DIR: &str = "Learning Data";

/// The defense lined up in front of the goal: two lines of defenders and a goalkeeper
pub const DEFAULT_DEFENSE: [(Pos, Role); 6] = [
    ((3, 2), Role::Defender),
    ((5, 2), Role::Defender),
    ((1, 5), Role::Defender),
    ((4, 4), Role::Defender),
    ((7, 5), Role::Defender),
    ((4, 6), Role::Goalkeeper),
];

/// Hyperparameters of a training run
#[derive(Clone, Debug)]
pub struct TrainConfig {
    pub episodes: u32,
    pub agent: QTableAgentConfig,
    /// Where the trained table is written
    pub q_table_path: PathBuf,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            episodes: 1_000,
            agent: QTableAgentConfig::default(),
            q_table_path: PathBuf::from(Q_TABLE_PATH),
        }
    }
}

/// Top-level settings: the pitch, the defense placed on it and the training run
#[derive(Clone, Debug)]
pub struct Config {
    pub env: PenaltyKickConfig,
    pub defense: Vec<(Pos, Role)>,
    pub train: TrainConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env: PenaltyKickConfig::default(),
            defense: DEFAULT_DEFENSE.to_vec(),
            train: TrainConfig::default(),
        }
    }
}

impl Config {
    /// Build the pitch and line up the defense on it
    pub fn build_env(&self) -> Result<PenaltyKick> {
        let mut env = PenaltyKick::new(self.env.clone())?;
        for &(pos, role) in &self.defense {
            env.add_danger(pos, role)?;
        }
        Ok(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_builds() {
        let env = Config::default().build_env().unwrap();
        assert_eq!(env.size(), 9);
        assert_eq!(env.start(), (4, 0));
        assert_eq!(env.goals().len(), 3);
        assert_eq!(env.obstacles().len(), 6);
        assert_eq!(
            env.obstacles()
                .iter()
                .filter(|o| o.role == Role::Goalkeeper)
                .count(),
            1
        );
    }

    #[test]
    fn defense_on_goal_fails() {
        let mut config = Config::default();
        config.defense.push(((4, 8), Role::Goalkeeper));
        assert!(config.build_env().is_err());
    }
}

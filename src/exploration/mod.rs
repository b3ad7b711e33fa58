use strum::Display;

/// Exploration policy result
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Explore,
    Exploit,
}

mod epsilon_greedy;

pub use epsilon_greedy::EpsilonGreedy;

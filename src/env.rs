use rand::{seq::IteratorRandom, Rng};

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent
/// and a finite state space and action space.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Side-channel diagnostics that accompany every observation
    type Info;

    /// Update the environment in response to an action taken by an agent
    fn step(&mut self, action: Self::Action) -> Step<Self>;

    /// Reset the environment to an initial state
    ///
    /// **Returns** `(state, info)`
    fn reset(&mut self) -> (Self::State, Self::Info);
}

/// An environment whose actions can be enumerated
pub trait DiscreteActionSpace: Environment {
    /// Get the available actions for the current state
    ///
    /// The returned vector should never be empty
    fn actions(&self) -> Vec<Self::Action>;

    /// Pick one of the available actions uniformly at random
    fn random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Action {
        self.actions()
            .into_iter()
            .choose(rng)
            .expect("action space is not empty")
    }
}

/// The observable outcome of a single [`Environment::step`]
pub struct Step<E: Environment + ?Sized> {
    /// The state after the action was applied, also reported for terminal transitions
    pub state: E::State,
    /// Whether the episode ended with this transition
    pub terminated: bool,
    /// The reward for this transition alone
    pub reward: f32,
    pub info: E::Info,
}

#[cfg(test)]
pub(crate) mod tests {
    use strum::VariantArray;

    use crate::gym::penalty_kick::{Action, Pos};

    use super::*;

    /// A one-row corridor where moving right eventually reaches a goal in the last cell
    pub struct MockEnv {
        pub len: usize,
        pub pos: Pos,
        pub goal_reward: f32,
    }

    impl MockEnv {
        pub fn new(len: usize, goal_reward: f32) -> Self {
            Self {
                len,
                pos: (0, 0),
                goal_reward,
            }
        }
    }

    impl Environment for MockEnv {
        type State = Pos;
        type Action = Action;
        type Info = ();

        fn step(&mut self, action: Self::Action) -> Step<Self> {
            if action == Action::Right {
                self.pos.1 += 1;
            }
            let terminated = self.pos.1 == self.len - 1;
            Step {
                state: self.pos,
                terminated,
                reward: if terminated { self.goal_reward } else { 0.0 },
                info: (),
            }
        }

        fn reset(&mut self) -> (Self::State, Self::Info) {
            self.pos = (0, 0);
            (self.pos, ())
        }
    }

    impl DiscreteActionSpace for MockEnv {
        fn actions(&self) -> Vec<Self::Action> {
            Action::VARIANTS.to_vec()
        }
    }
}

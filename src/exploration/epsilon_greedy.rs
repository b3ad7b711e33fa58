use rand::Rng;

use crate::decay::Decay;

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// The exploration rate in effect during `episode`
    pub fn epsilon(&self, episode: u32) -> f32 {
        self.epsilon.evaluate(episode as f32)
    }

    /// Invoke epsilon greedy policy for current episode
    ///
    /// Explores when a uniform draw from `[0, 1)` falls strictly below epsilon.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R, episode: u32) -> Choice {
        if rng.gen::<f32>() < self.epsilon(episode) {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use crate::decay::Multiplicative;

    use super::*;

    #[test]
    fn extremes_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let always = EpsilonGreedy::new(Multiplicative::new(1.0, 1.0, 1.0).unwrap());
        let never = EpsilonGreedy::new(Multiplicative::new(1.0, 0.0, 0.0).unwrap());
        for episode in 0..200 {
            assert_eq!(always.choose(&mut rng, episode), Choice::Explore);
            assert_eq!(never.choose(&mut rng, episode), Choice::Exploit);
        }
    }

    #[test]
    fn epsilon_follows_schedule() {
        let policy = EpsilonGreedy::new(Multiplicative::new(0.995, 1.0, 0.1).unwrap());
        assert_eq!(policy.epsilon(0), 1.0);
        assert!(policy.epsilon(100) < policy.epsilon(99));
        assert_eq!(policy.epsilon(5000), 0.1);
    }
}

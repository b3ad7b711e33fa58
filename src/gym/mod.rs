pub mod penalty_kick;

pub use penalty_kick::PenaltyKick;

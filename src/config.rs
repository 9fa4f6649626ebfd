// src/config.rs
//
// Engine configuration for finite-horizon tabular Q-learning.
//
// The reward arrays and scalars are immutable once the engine is built.
// Validation is explicit and happens up front: the original formulation of
// this problem let a bad discount factor or a mismatched reward matrix
// surface as silently wrong value functions, which is exactly the failure
// mode we want to rule out.

use serde::{Deserialize, Serialize};

use crate::error::HorizonError;

/// Configuration of a Q-learning run.
///
/// `terminal_rewards[x]` is the payoff `g(x)` assigned at the final time
/// step; its length defines the number of states. `running_rewards[x][a]`
/// is the time-independent immediate reward `f(x, a)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QConfig {
    /// Terminal payoff per state, assigned only at the final time index.
    pub terminal_rewards: Vec<f64>,
    /// Discount factor gamma in `[0, 1]` of the Bellman update.
    pub discount_factor: f64,
    /// Immediate rewards `f(x, a)`, shape `num_states x num_actions`.
    pub running_rewards: Vec<Vec<f64>>,
    /// Number of time steps per episode; at least 2.
    pub num_times: usize,
    /// Number of independent training episodes.
    pub num_episodes: usize,
    /// Learning rate lambda of the Q-value update, strictly positive.
    pub learning_rate: f64,
    /// Probability epsilon of exploring instead of exploiting.
    pub exploration_probability: f64,
    /// Seed of the engine's random source (start states, exploration).
    pub seed: u64,
}

impl QConfig {
    /// Number of states, defined by the terminal reward vector.
    pub fn num_states(&self) -> usize {
        self.terminal_rewards.len()
    }

    /// Check scalar ranges and array shapes against an environment's
    /// action-space size.
    pub fn validate(&self, num_actions: usize) -> Result<(), HorizonError> {
        if self.terminal_rewards.is_empty() {
            return Err(HorizonError::InvalidConfig(
                "terminal_rewards must not be empty".to_string(),
            ));
        }
        if self.num_times < 2 {
            return Err(HorizonError::InvalidConfig(format!(
                "num_times must be at least 2, got {}",
                self.num_times
            )));
        }
        if self.num_episodes == 0 {
            return Err(HorizonError::InvalidConfig(
                "num_episodes must be positive".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(HorizonError::InvalidConfig(format!(
                "learning_rate must be finite and positive, got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.exploration_probability) {
            return Err(HorizonError::InvalidConfig(format!(
                "exploration_probability must lie in [0, 1], got {}",
                self.exploration_probability
            )));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(HorizonError::InvalidConfig(format!(
                "discount_factor must lie in [0, 1], got {}",
                self.discount_factor
            )));
        }
        if self.running_rewards.len() != self.num_states() {
            return Err(HorizonError::InvalidConfig(format!(
                "running_rewards has {} rows, expected one per state ({})",
                self.running_rewards.len(),
                self.num_states()
            )));
        }
        for (state, row) in self.running_rewards.iter().enumerate() {
            if row.len() != num_actions {
                return Err(HorizonError::InvalidConfig(format!(
                    "running_rewards row {} has {} entries, expected {}",
                    state,
                    row.len(),
                    num_actions
                )));
            }
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_num_episodes(mut self, num_episodes: usize) -> Self {
        self.num_episodes = num_episodes;
        self
    }

    pub fn with_exploration_probability(mut self, epsilon: f64) -> Self {
        self.exploration_probability = epsilon;
        self
    }
}

// src/investment.rs
//
// Reference environment: discretized optimal investment (Merton-type).
//
// Wealth lives on a grid over [minimum_wealth, maximum_wealth]; the control
// is the fraction of wealth invested in the risky asset, discretized on
// [0, maximum_investment]. One transition is a single Euler-Maruyama step
// of the controlled wealth SDE, clamped back onto the grid.
//
// The reference problem defines no intermediate reward: the running-reward
// matrix handed to the engine is all zeros and learning is driven purely by
// the terminal utility of wealth (a pure terminal-utility maximization in
// the Merton style). Callers wanting consumption-style intermediate rewards
// must build their own QConfig.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::config::QConfig;
use crate::engine::QLearning;
use crate::env::EnvironmentModel;
use crate::error::HorizonError;

/// Scalar parameters of the discretized optimal-investment problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentConfig {
    /// Drift mu of the risky asset.
    pub constant_drift: f64,
    /// Volatility sigma of the risky asset.
    pub constant_volatility: f64,
    /// Per-step discount factor gamma; the implied continuously compounded
    /// interest rate is `-ln(gamma) / time_step`.
    pub discount_factor: f64,
    /// Lower end of the wealth grid.
    pub minimum_wealth: f64,
    /// Upper end of the wealth grid.
    pub maximum_wealth: f64,
    /// Grid spacing of the wealth discretization.
    pub wealth_step: f64,
    /// Length of one Euler step, in units of time.
    pub time_step: f64,
    /// Grid spacing of the investment-fraction discretization.
    pub investment_step: f64,
    /// Largest investable fraction (may exceed 1 for leverage).
    pub maximum_investment: f64,
}

/// Episode/training parameters for assembling a solver on top of the
/// investment environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainParams {
    pub num_times: usize,
    pub num_episodes: usize,
    pub learning_rate: f64,
    pub exploration_probability: f64,
    /// Seed of the engine RNG (start states, exploration coin flips).
    pub engine_seed: u64,
    /// Seed of the environment RNG (transition noise).
    pub environment_seed: u64,
}

/// Power utility `w -> w^exponent`, the usual example of a monotone
/// terminal utility for this problem.
pub fn power_utility(exponent: f64) -> impl Fn(f64) -> f64 {
    move |wealth: f64| wealth.powf(exponent)
}

/// Discretized Merton-type investment environment.
///
/// State `x` encodes wealth `minimum_wealth + x * wealth_step`; action `a`
/// encodes the fraction `a * investment_step` invested in the risky asset.
pub struct InvestmentModel {
    config: InvestmentConfig,
    rng: ChaCha8Rng,
}

impl InvestmentModel {
    pub fn new(config: InvestmentConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Number of wealth grid points.
    pub fn num_states(&self) -> usize {
        let span = (self.config.maximum_wealth - self.config.minimum_wealth)
            / self.config.wealth_step;
        span.floor() as usize + 1
    }

    /// Wealth level encoded by a state index.
    pub fn wealth(&self, state: usize) -> f64 {
        self.config.minimum_wealth + state as f64 * self.config.wealth_step
    }

    /// Investment fraction encoded by an action index.
    pub fn fraction(&self, action: usize) -> f64 {
        action as f64 * self.config.investment_step
    }

    /// Terminal reward vector `utility(wealth(x))` for every state.
    pub fn terminal_rewards<F: Fn(f64) -> f64>(&self, utility: F) -> Vec<f64> {
        (0..self.num_states())
            .map(|state| utility(self.wealth(state)))
            .collect()
    }

    /// Assemble a ready-to-train engine over this environment.
    ///
    /// Terminal rewards come from the utility; the running-reward matrix is
    /// all zeros (see the module docs on the pure terminal-utility
    /// objective).
    pub fn solver<F: Fn(f64) -> f64>(
        config: InvestmentConfig,
        utility: F,
        params: TrainParams,
    ) -> Result<QLearning<InvestmentModel>, HorizonError> {
        let env = InvestmentModel::new(config.clone(), params.environment_seed);
        let num_states = env.num_states();
        let num_actions = env.num_actions();

        let q_config = QConfig {
            terminal_rewards: env.terminal_rewards(utility),
            discount_factor: config.discount_factor,
            running_rewards: vec![vec![0.0; num_actions]; num_states],
            num_times: params.num_times,
            num_episodes: params.num_episodes,
            learning_rate: params.learning_rate,
            exploration_probability: params.exploration_probability,
            seed: params.engine_seed,
        };

        QLearning::new(q_config, env)
    }
}

impl EnvironmentModel for InvestmentModel {
    fn num_actions(&self) -> usize {
        (self.config.maximum_investment / self.config.investment_step) as usize + 1
    }

    /// Actions that keep the discretized wealth representable: invested
    /// fractions up to `(maximum_wealth - w) / w`.
    ///
    /// At `w == 0` that bound is not a number; a zero-wealth state admits
    /// only the zero-investment action, which also matches the dynamics
    /// (zero wealth stays at zero under any control).
    fn admissible_actions(&self, state: usize) -> Vec<usize> {
        let wealth = self.wealth(state);
        if wealth <= 0.0 {
            return vec![0];
        }
        let bound = (self.config.maximum_wealth - wealth) / wealth;
        (0..self.num_actions())
            .filter(|&action| self.fraction(action) <= bound)
            .collect()
    }

    /// One Euler-Maruyama step of the controlled wealth process, clamped to
    /// the grid and rounded to the nearest state index.
    fn sample_next_state(&mut self, state: usize, action: usize) -> usize {
        let cfg = &self.config;
        let fraction = action as f64 * cfg.investment_step;
        let wealth = cfg.minimum_wealth + state as f64 * cfg.wealth_step;

        // Interest rate implied by the per-step discount factor.
        let interest_rate = -cfg.discount_factor.ln() / cfg.time_step;

        let drift = fraction * (cfg.constant_drift - interest_rate) + interest_rate;
        let diffusion = cfg.constant_volatility * fraction;

        let z: f64 = self.rng.sample(StandardNormal);
        let new_wealth = wealth
            + wealth * drift * cfg.time_step
            + wealth * diffusion * cfg.time_step.sqrt() * z;

        let new_wealth = new_wealth.clamp(cfg.minimum_wealth, cfg.maximum_wealth);
        let index = ((new_wealth - cfg.minimum_wealth) / cfg.wealth_step).round() as usize;
        index.min(self.num_states() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> InvestmentConfig {
        InvestmentConfig {
            constant_drift: 0.05,
            constant_volatility: 0.4,
            discount_factor: 1.0,
            minimum_wealth: 0.0,
            maximum_wealth: 2.0,
            wealth_step: 0.5,
            time_step: 0.05,
            investment_step: 0.5,
            maximum_investment: 2.0,
        }
    }

    #[test]
    fn test_grid_sizes() {
        let env = InvestmentModel::new(small_config(), 0);
        // wealth grid: 0.0, 0.5, 1.0, 1.5, 2.0
        assert_eq!(env.num_states(), 5);
        // fractions: 0.0, 0.5, 1.0, 1.5, 2.0
        assert_eq!(env.num_actions(), 5);
        assert_eq!(env.wealth(3), 1.5);
        assert_eq!(env.fraction(2), 1.0);
    }

    #[test]
    fn test_zero_wealth_admits_only_zero_action() {
        let env = InvestmentModel::new(small_config(), 0);
        assert_eq!(env.admissible_actions(0), vec![0]);
    }

    #[test]
    fn test_maximum_wealth_admits_only_zero_action() {
        let env = InvestmentModel::new(small_config(), 0);
        let top = env.num_states() - 1;
        assert_eq!(env.wealth(top), 2.0);
        assert_eq!(env.admissible_actions(top), vec![0]);
    }

    #[test]
    fn test_admissible_bound_tightens_with_wealth() {
        let env = InvestmentModel::new(small_config(), 0);
        // w = 0.5: bound = (2.0 - 0.5) / 0.5 = 3.0 -> all fractions <= 2.0
        assert_eq!(env.admissible_actions(1), vec![0, 1, 2, 3, 4]);
        // w = 1.0: bound = 1.0 -> fractions 0.0, 0.5, 1.0
        assert_eq!(env.admissible_actions(2), vec![0, 1, 2]);
        // w = 1.5: bound = 1/3 -> only fraction 0.0
        assert_eq!(env.admissible_actions(3), vec![0]);
    }

    #[test]
    fn test_next_state_always_on_grid() {
        let mut env = InvestmentModel::new(small_config(), 7);
        let num_states = env.num_states();
        for state in 0..num_states {
            for action in env.admissible_actions(state) {
                for _ in 0..200 {
                    let next = env.sample_next_state(state, action);
                    assert!(next < num_states);
                }
            }
        }
    }

    #[test]
    fn test_zero_wealth_is_absorbing_under_zero_action() {
        let mut env = InvestmentModel::new(small_config(), 3);
        for _ in 0..50 {
            assert_eq!(env.sample_next_state(0, 0), 0);
        }
    }

    #[test]
    fn test_transitions_deterministic_given_seed() {
        let mut a = InvestmentModel::new(small_config(), 99);
        let mut b = InvestmentModel::new(small_config(), 99);
        for _ in 0..100 {
            assert_eq!(a.sample_next_state(2, 1), b.sample_next_state(2, 1));
        }
    }

    #[test]
    fn test_terminal_rewards_follow_utility() {
        let env = InvestmentModel::new(small_config(), 0);
        let rewards = env.terminal_rewards(power_utility(0.5));
        assert_eq!(rewards.len(), env.num_states());
        assert_eq!(rewards[0], 0.0);
        assert!((rewards[4] - 2.0_f64.sqrt()).abs() < 1e-12);
        // Monotone utility of monotone wealth grid.
        for pair in rewards.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }
}

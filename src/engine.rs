// src/engine.rs
//
// Time-dependent tabular Q-learning over an injected EnvironmentModel.
//
// The Q-function depends explicitly on the time index, so the engine can
// solve fixed finite-horizon problems: episodes always run the full horizon
// and terminate at final time regardless of the state reached. Admissible
// actions, running rewards and the transition law are all time-independent,
// so one `num_times x num_states x num_actions` table serves every step and
// only the terminal layer is seeded differently.
//
// Bellman update, in the classical form:
//   Q(t, x, a) += lambda * (f(x, a) + gamma * max_b Q(t+1, y, b) - Q(t, x, a))

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::argmax::{argmax, max_and_argmax, max_value};
use crate::config::QConfig;
use crate::env::EnvironmentModel;
use crate::error::HorizonError;
use crate::logging::{EpisodeRecord, EpisodeSink, NoopSink};

/// Explicit training lifecycle: `train` is the single transition
/// `Untrained -> Trained` and is idempotent.
enum TrainingState {
    Untrained,
    Trained(TrainedTables),
}

/// Immutable snapshot produced by one training run.
struct TrainedTables {
    /// Q(t, x, a) after all episodes.
    q: Vec<Vec<Vec<f64>>>,
    /// V(t, x) = max_a Q(t, x, a).
    value_functions: Vec<Vec<f64>>,
    /// pi(t, x) = first argmax_a Q(t, x, a).
    optimal_actions: Vec<Vec<usize>>,
}

/// Model-free solver for finite-horizon stochastic control problems on a
/// discretized state/action space.
///
/// The engine never inspects what a state or action index means; the
/// injected [`EnvironmentModel`] owns all problem semantics. Training runs
/// lazily on the first accessor call and exactly once per engine instance;
/// accessors hand out defensive copies of the cached tables.
///
/// The engine owns a seeded [`ChaCha8Rng`] for start-state draws and
/// exploration decisions, so identical seeds (engine and environment)
/// reproduce a training run bit for bit. The `&mut self` accessors make the
/// lazy first-call check safe for a single owner; concurrent callers must
/// wrap the engine in a lock of their own.
pub struct QLearning<E: EnvironmentModel> {
    config: QConfig,
    env: E,
    rng: ChaCha8Rng,
    training: TrainingState,
}

impl<E: EnvironmentModel> QLearning<E> {
    /// Build an engine, rejecting invalid configurations up front.
    pub fn new(config: QConfig, env: E) -> Result<Self, HorizonError> {
        config.validate(env.num_actions())?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            env,
            rng,
            training: TrainingState::Untrained,
        })
    }

    /// Number of states of the underlying problem.
    pub fn num_states(&self) -> usize {
        self.config.num_states()
    }

    /// Discount factor gamma of the Bellman update.
    pub fn discount_factor(&self) -> f64 {
        self.config.discount_factor
    }

    /// Run training if it has not run yet. Idempotent.
    pub fn train(&mut self) -> Result<(), HorizonError> {
        self.train_with(&mut NoopSink)
    }

    /// Run training with per-episode telemetry. Idempotent: once the engine
    /// is trained, the sink is not invoked again.
    pub fn train_with(&mut self, sink: &mut dyn EpisodeSink) -> Result<(), HorizonError> {
        if matches!(self.training, TrainingState::Trained(_)) {
            return Ok(());
        }
        let tables = self.run_training(sink)?;
        self.training = TrainingState::Trained(tables);
        Ok(())
    }

    /// Value functions `V(t, x)` as a `num_times x num_states` matrix.
    ///
    /// Trains lazily on first call; every call returns a fresh copy, so
    /// callers may retain or mutate the result freely.
    pub fn value_functions(&mut self) -> Result<Vec<Vec<f64>>, HorizonError> {
        self.train()?;
        Ok(self.tables().value_functions.clone())
    }

    /// Optimal action indices `pi(t, x)`, same lazy/caching contract as
    /// [`value_functions`](Self::value_functions).
    pub fn optimal_action_indices(&mut self) -> Result<Vec<Vec<usize>>, HorizonError> {
        self.train()?;
        Ok(self.tables().optimal_actions.clone())
    }

    /// Defensive copy of the full trained Q-table, for research harnesses
    /// and invariant checks.
    pub fn q_table(&mut self) -> Result<Vec<Vec<Vec<f64>>>, HorizonError> {
        self.train()?;
        Ok(self.tables().q.clone())
    }

    fn tables(&self) -> &TrainedTables {
        match &self.training {
            TrainingState::Trained(tables) => tables,
            // train() always precedes this call on every accessor path.
            TrainingState::Untrained => unreachable!("accessor reached untrained engine"),
        }
    }

    fn run_training(&mut self, sink: &mut dyn EpisodeSink) -> Result<TrainedTables, HorizonError> {
        let num_states = self.config.num_states();
        let num_actions = self.env.num_actions();
        let num_times = self.config.num_times;

        // The trait contract makes admissible sets deterministic per state,
        // so they are queried once and cached for the whole run. Empty sets
        // would poison every backup routed through the state with -inf and
        // are rejected here.
        let mut admissible: Vec<Vec<usize>> = Vec::with_capacity(num_states);
        for state in 0..num_states {
            let actions = self.env.admissible_actions(state);
            if actions.is_empty() {
                return Err(HorizonError::NoAdmissibleActions { state });
            }
            if let Some(&action) = actions.iter().find(|&&a| a >= num_actions) {
                return Err(HorizonError::AdmissibleActionOutOfRange {
                    state,
                    action,
                    num_actions,
                });
            }
            admissible.push(actions);
        }

        // Non-terminal layers: zero where admissible, -inf otherwise. The
        // mask keeps inadmissible actions out of every max/argmax and stays
        // visibly distinct from a genuinely learned zero.
        let mut q = vec![vec![vec![0.0_f64; num_actions]; num_states]; num_times];
        for (state, actions) in admissible.iter().enumerate() {
            for t in 0..num_times - 1 {
                for a in 0..num_actions {
                    q[t][state][a] = if actions.contains(&a) {
                        0.0
                    } else {
                        f64::NEG_INFINITY
                    };
                }
            }
            // Terminal layer: the payoff carries no action dependence.
            for a in 0..num_actions {
                q[num_times - 1][state][a] = self.config.terminal_rewards[state];
            }
        }

        let gamma = self.config.discount_factor;
        let lambda = self.config.learning_rate;
        let epsilon = self.config.exploration_probability;

        for episode in 0..self.config.num_episodes {
            // Uniform start state: no special initial distribution, no
            // absorbing states.
            let start_state = self.rng.gen_range(0..num_states);
            let mut state = start_state;
            let mut cumulative_td_error = 0.0;

            for t in 0..num_times - 1 {
                let action = if self.rng.gen::<f64>() < epsilon {
                    let actions = &admissible[state];
                    actions[self.rng.gen_range(0..actions.len())]
                } else {
                    argmax(&q[t][state])
                };

                let next_state = self.env.sample_next_state(state, action);
                let best_continuation = max_value(&q[t + 1][next_state]);

                let td_error = self.config.running_rewards[state][action]
                    + gamma * best_continuation
                    - q[t][state][action];
                q[t][state][action] += lambda * td_error;
                cumulative_td_error += td_error.abs();

                state = next_state;
            }

            sink.log_episode(&EpisodeRecord {
                episode,
                start_state,
                final_state: state,
                cumulative_td_error,
            });
        }

        let mut value_functions = vec![vec![0.0_f64; num_states]; num_times];
        let mut optimal_actions = vec![vec![0_usize; num_states]; num_times];
        for t in 0..num_times {
            for state in 0..num_states {
                let (value, action) = max_and_argmax(&q[t][state]);
                value_functions[t][state] = value;
                optimal_actions[t][state] = action;
            }
        }

        Ok(TrainedTables {
            q,
            value_functions,
            optimal_actions,
        })
    }
}

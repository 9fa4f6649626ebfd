//! Horizonq core library.
//!
//! Model-free solver for finite-horizon stochastic control problems over
//! discretized state/action spaces, built around a time-dependent tabular
//! Q-learning algorithm.
//!
//! # Architecture
//!
//! The codebase separates the generic learning algorithm from problem
//! semantics:
//!
//! - **Engine** (`engine`): owns the `Q(t, x, a)` table, runs epsilon-greedy
//!   training episodes against an injected environment, and derives the
//!   value function and greedy policy. Training is an explicit one-shot
//!   lifecycle transition, triggered lazily by the first accessor call.
//!
//! - **Environment model** (`env`): capability trait providing the action
//!   space size, the per-state admissible-action subset, and a stochastic
//!   transition sampler. The engine treats all indices opaquely.
//!
//! - **Reference environment** (`investment`): a discretized Merton-type
//!   optimal-investment problem, simulating Euler steps of a controlled
//!   wealth process on a bounded grid.
//!
//! - **Telemetry** (`logging`): per-episode sink trait with no-op and JSONL
//!   file implementations.
//!
//! Determinism: the engine and every stochastic environment take explicit
//! seeds; identical seeds reproduce a training run exactly, which is what
//! the test suite relies on.

pub mod argmax;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod investment;
pub mod logging;

// --- Re-exports for ergonomic external use ---------------------------------

pub use argmax::{argmax, max_and_argmax, max_value};
pub use config::QConfig;
pub use engine::QLearning;
pub use env::EnvironmentModel;
pub use error::HorizonError;
pub use investment::{power_utility, InvestmentConfig, InvestmentModel, TrainParams};
pub use logging::{EpisodeRecord, EpisodeSink, FileSink, NoopSink};

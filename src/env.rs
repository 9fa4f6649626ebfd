// src/env.rs
//
// EnvironmentModel: the capability trait the Q-learning engine is generic
// over. The engine treats state and action indices opaquely; decoding an
// index into a physical quantity (a wealth level, an investment fraction)
// is entirely owned by the environment implementation.

/// A sampleable model of a controlled Markov chain with discrete state and
/// action spaces.
///
/// All three operations are independent of time: the engine models the
/// finite horizon purely through the time index of its Q-table, while the
/// admissible-action structure and the transition law stay fixed.
pub trait EnvironmentModel {
    /// Total number of actions, independent of time and state.
    fn num_actions(&self) -> usize;

    /// Indices of the actions permitted in `state`, a subset of
    /// `0..num_actions()`.
    ///
    /// Must be deterministic given `state`: the engine queries each state
    /// once at training start and caches the result.
    fn admissible_actions(&self, state: usize) -> Vec<usize>;

    /// Draw the next state index from the transition law, given the current
    /// state and the chosen action.
    ///
    /// Takes `&mut self` because implementations own their random source;
    /// the result must lie in the environment's state range.
    fn sample_next_state(&mut self, state: usize, action: usize) -> usize;
}

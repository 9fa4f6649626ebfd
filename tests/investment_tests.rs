//! End-to-end tests of the optimal-investment reference environment driving
//! the Q-learning engine.
//!
//! Grids are kept deliberately small so training converges within a few
//! thousand episodes; all runs are seeded.

use horizonq::{power_utility, EnvironmentModel, InvestmentConfig, InvestmentModel, TrainParams};

fn grid_config() -> InvestmentConfig {
    InvestmentConfig {
        constant_drift: 0.05,
        constant_volatility: 0.4,
        discount_factor: 1.0,
        minimum_wealth: 0.0,
        maximum_wealth: 2.0,
        wealth_step: 0.25,
        time_step: 0.05,
        investment_step: 0.5,
        maximum_investment: 2.0,
    }
}

fn train_params() -> TrainParams {
    TrainParams {
        num_times: 4,
        num_episodes: 5_000,
        learning_rate: 0.3,
        exploration_probability: 0.1,
        engine_seed: 11,
        environment_seed: 12,
    }
}

#[test]
fn test_solver_output_shapes() {
    let env = InvestmentModel::new(grid_config(), 0);
    let num_states = env.num_states();

    let mut solver =
        InvestmentModel::solver(grid_config(), power_utility(0.5), train_params()).unwrap();
    assert_eq!(solver.num_states(), num_states);
    assert_eq!(solver.discount_factor(), 1.0);

    let values = solver.value_functions().unwrap();
    let policy = solver.optimal_action_indices().unwrap();
    assert_eq!(values.len(), 4);
    assert_eq!(policy.len(), 4);
    for t in 0..4 {
        assert_eq!(values[t].len(), num_states);
        assert_eq!(policy[t].len(), num_states);
    }
}

#[test]
fn test_terminal_values_equal_utility_of_wealth() {
    let env = InvestmentModel::new(grid_config(), 0);
    let expected = env.terminal_rewards(power_utility(0.5));

    let mut solver =
        InvestmentModel::solver(grid_config(), power_utility(0.5), train_params()).unwrap();
    let values = solver.value_functions().unwrap();

    assert_eq!(values.last().unwrap(), &expected);
}

#[test]
fn test_value_functions_are_finite_everywhere() {
    // Every wealth state admits at least the zero-investment action, so no
    // -inf row can poison the backups.
    let mut solver =
        InvestmentModel::solver(grid_config(), power_utility(0.5), train_params()).unwrap();
    let values = solver.value_functions().unwrap();

    for (t, row) in values.iter().enumerate() {
        for (state, &value) in row.iter().enumerate() {
            assert!(value.is_finite(), "non-finite value at t={t} state={state}");
        }
    }
}

#[test]
fn test_policy_only_selects_admissible_actions() {
    let probe = InvestmentModel::new(grid_config(), 0);
    let mut solver =
        InvestmentModel::solver(grid_config(), power_utility(0.5), train_params()).unwrap();
    let policy = solver.optimal_action_indices().unwrap();

    for t in 0..3 {
        for state in 0..probe.num_states() {
            let admissible = probe.admissible_actions(state);
            assert!(
                admissible.contains(&policy[t][state]),
                "t={t} state={state}: action {} not admissible",
                policy[t][state]
            );
        }
    }
}

#[test]
fn test_boundary_states_pin_policy_to_zero_investment() {
    let probe = InvestmentModel::new(grid_config(), 0);
    let top = probe.num_states() - 1;
    let mut solver =
        InvestmentModel::solver(grid_config(), power_utility(0.5), train_params()).unwrap();
    let policy = solver.optimal_action_indices().unwrap();

    for t in 0..3 {
        assert_eq!(policy[t][0], 0, "zero wealth admits only the zero action");
        assert_eq!(policy[t][top], 0, "max wealth admits only the zero action");
    }
}

#[test]
fn test_solver_deterministic_given_seeds() {
    let mut a = InvestmentModel::solver(grid_config(), power_utility(0.5), train_params()).unwrap();
    let mut b = InvestmentModel::solver(grid_config(), power_utility(0.5), train_params()).unwrap();

    assert_eq!(a.value_functions().unwrap(), b.value_functions().unwrap());
    assert_eq!(
        a.optimal_action_indices().unwrap(),
        b.optimal_action_indices().unwrap()
    );
}

#[test]
fn test_solver_rejects_degenerate_horizon() {
    let mut params = train_params();
    params.num_times = 1;
    assert!(InvestmentModel::solver(grid_config(), power_utility(0.5), params).is_err());
}

use narwhal_projection::{CancelToken, Error, Solver, SolverParameters, VariableId};

fn solve(solver: &mut Solver) -> narwhal_projection::Solution {
    solver
        .solve(&SolverParameters::default(), &CancelToken::new())
        .unwrap()
}

fn pos(solver: &Solver, id: VariableId) -> f64 {
    solver.position(id).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn solve_without_constraints_keeps_desired_positions() {
    let mut s = Solver::new();
    let a = s.add_variable(3.0, 1.0, 1.0).unwrap();
    let b = s.add_variable(-7.5, 2.0, 1.0).unwrap();
    let solution = solve(&mut s);
    assert_eq!(pos(&s, a), 3.0);
    assert_eq!(pos(&s, b), -7.5);
    assert_eq!(solution.goal_function_value, 0.0);
    assert_eq!(solution.outer_project_iterations, 0);
}

#[test]
fn solve_spaces_a_chain_evenly_around_the_shared_mean() {
    let mut s = Solver::new();
    let x1 = s.add_variable(0.0, 1.0, 1.0).unwrap();
    let x2 = s.add_variable(0.0, 1.0, 1.0).unwrap();
    let x3 = s.add_variable(0.0, 1.0, 1.0).unwrap();
    s.add_constraint(x1, x2, 10.0, false).unwrap();
    s.add_constraint(x2, x3, 10.0, false).unwrap();

    let solution = solve(&mut s);
    assert_close(pos(&s, x1), -10.0);
    assert_close(pos(&s, x2), 0.0);
    assert_close(pos(&s, x3), 10.0);
    assert_eq!(solution.number_of_unsatisfiable_constraints, 0);
    assert_close(solution.goal_function_value, 200.0);
    assert_eq!(s.block_count(), 1);
}

#[test]
fn solve_flags_exactly_one_constraint_of_a_three_cycle() {
    let mut s = Solver::new();
    let a = s.add_variable(0.0, 1.0, 1.0).unwrap();
    let b = s.add_variable(0.0, 1.0, 1.0).unwrap();
    let c = s.add_variable(0.0, 1.0, 1.0).unwrap();
    s.add_constraint(a, b, 10.0, false).unwrap();
    s.add_constraint(b, c, 10.0, false).unwrap();
    let closing = s.add_constraint(c, a, 10.0, false).unwrap();

    let solution = solve(&mut s);
    assert_eq!(solution.number_of_unsatisfiable_constraints, 1);
    assert_eq!(s.unsatisfiable_constraints().collect::<Vec<_>>(), vec![closing]);
    assert!(!solution.execution_limit_exceeded());
    assert_close(pos(&s, a), -10.0);
    assert_close(pos(&s, b), 0.0);
    assert_close(pos(&s, c), 10.0);
}

#[test]
fn solve_gives_up_the_cheapest_path_constraint_when_expanding_a_block() {
    let mut s = Solver::new();
    let a = s.add_variable(0.0, 1.0, 1.0).unwrap();
    let b = s.add_variable(0.0, 1.0, 1.0).unwrap();
    let c = s.add_variable(0.0, 1.0, 1.0).unwrap();
    let ab = s.add_constraint(a, b, 4.0, false).unwrap();
    s.add_constraint(c, b, 4.0, false).unwrap();
    let ac = s.add_constraint(a, c, 1.0, false).unwrap();

    solve(&mut s);
    assert_close(pos(&s, a), -2.0);
    assert_close(pos(&s, b), 3.0);
    assert_close(pos(&s, c), -1.0);
    assert!(!s.constraint(ab).unwrap().is_active());
    assert!(s.constraint(ac).unwrap().is_active());
    assert!(s.constraint(ac).unwrap().lagrangian() > 0.0);
}

#[test]
fn solve_holds_equalities_exactly() {
    let mut s = Solver::new();
    let a = s.add_variable(0.0, 1.0, 1.0).unwrap();
    let b = s.add_variable(0.0, 1.0, 1.0).unwrap();
    let eq = s.add_constraint(a, b, 5.0, true).unwrap();
    solve(&mut s);
    assert_close(pos(&s, a), -2.5);
    assert_close(pos(&s, b), 2.5);
    assert!(s.constraint(eq).unwrap().is_active());
}

#[test]
fn solve_pulls_an_equality_together_when_the_right_side_is_too_far() {
    let mut s = Solver::new();
    let a = s.add_variable(0.0, 1.0, 1.0).unwrap();
    let b = s.add_variable(20.0, 1.0, 1.0).unwrap();
    s.add_constraint(a, b, 4.0, true).unwrap();
    solve(&mut s);
    assert_close(pos(&s, a), 8.0);
    assert_close(pos(&s, b), 12.0);
}

#[test]
fn solve_respects_weights() {
    let mut s = Solver::new();
    let light = s.add_variable(0.0, 1.0, 1.0).unwrap();
    let heavy = s.add_variable(0.0, 3.0, 1.0).unwrap();
    s.add_constraint(light, heavy, 8.0, false).unwrap();
    solve(&mut s);
    assert_close(pos(&s, light), -6.0);
    assert_close(pos(&s, heavy), 2.0);
}

#[test]
fn solve_leaves_satisfied_constraints_inactive() {
    let mut s = Solver::new();
    let a = s.add_variable(0.0, 1.0, 1.0).unwrap();
    let b = s.add_variable(50.0, 1.0, 1.0).unwrap();
    let c = s.add_constraint(a, b, 10.0, false).unwrap();
    let solution = solve(&mut s);
    assert_eq!(pos(&s, a), 0.0);
    assert_eq!(pos(&s, b), 50.0);
    assert!(!s.constraint(c).unwrap().is_active());
    assert_eq!(solution.inner_project_iterations_total, 0);
}

#[test]
fn solve_is_idempotent_on_an_optimal_assignment() {
    let mut s = Solver::new();
    let ids: Vec<_> = [5.0, 1.0, 3.0, 0.0]
        .into_iter()
        .map(|d| s.add_variable(d, 1.0, 1.0).unwrap())
        .collect();
    for w in ids.windows(2) {
        s.add_constraint(w[0], w[1], 6.0, false).unwrap();
    }
    solve(&mut s);
    let first: Vec<f64> = ids.iter().map(|&id| pos(&s, id)).collect();

    let again = solve(&mut s);
    let second: Vec<f64> = ids.iter().map(|&id| pos(&s, id)).collect();
    assert_eq!(first, second);

    for (&id, &p) in ids.iter().zip(&first) {
        s.set_desired_position(id, p).unwrap();
    }
    let fed_back = solve(&mut s);
    let third: Vec<f64> = ids.iter().map(|&id| pos(&s, id)).collect();
    assert_eq!(first, third);
    assert_eq!(fed_back.inner_project_iterations_total, 0);
    assert_eq!(again.number_of_unsatisfiable_constraints, 0);
}

#[test]
fn solve_reports_non_finite_block_sums() {
    let mut s = Solver::new();
    let a = s.add_variable(1e300, 1e300, 1.0).unwrap();
    let b = s.add_variable(0.0, 1.0, 1.0).unwrap();
    s.add_constraint(a, b, 1.0, false).unwrap();
    let err = s
        .solve(&SolverParameters::default(), &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, Error::NonFiniteBlockSums { .. }));
}

#[test]
fn invalid_inputs_are_rejected() {
    let mut s = Solver::new();
    assert!(matches!(
        s.add_variable(f64::NAN, 1.0, 1.0),
        Err(Error::InvalidVariable { field: "desired position", .. })
    ));
    assert!(matches!(
        s.add_variable(0.0, -1.0, 1.0),
        Err(Error::InvalidVariable { field: "weight", .. })
    ));
    assert!(matches!(
        s.add_variable(0.0, 1.0, 0.0),
        Err(Error::InvalidVariable { field: "scale", .. })
    ));

    let a = s.add_variable(0.0, 1.0, 1.0).unwrap();
    assert!(matches!(
        s.add_constraint(a, a, 1.0, false),
        Err(Error::InvalidConstraint { .. })
    ));
    let missing = {
        let mut other = Solver::new();
        other.add_variable(0.0, 1.0, 1.0).unwrap();
        other.add_variable(0.0, 1.0, 1.0).unwrap()
    };
    assert!(matches!(
        s.add_constraint(a, missing, 1.0, false),
        Err(Error::UnknownVariable { index: 1, len: 1 })
    ));
}

#[test]
fn cancelled_solve_returns_a_partial_result() {
    let mut s = Solver::new();
    let ids: Vec<_> = (0..10)
        .map(|_| s.add_variable(0.0, 1.0, 1.0).unwrap())
        .collect();
    for w in ids.windows(2) {
        s.add_constraint(w[0], w[1], 1.0, false).unwrap();
    }
    let cancel = CancelToken::new();
    cancel.cancel();
    let solution = s.solve(&SolverParameters::default(), &cancel).unwrap();
    assert!(solution.cancelled);
    assert_eq!(solution.outer_project_iterations, 1);
}

#[test]
fn scaled_variables_satisfy_scaled_constraints() {
    let mut s = Solver::new();
    let a = s.add_variable(0.0, 1.0, 2.0).unwrap();
    let b = s.add_variable(0.0, 1.0, 1.0).unwrap();
    s.add_constraint(a, b, 10.0, false).unwrap();
    solve(&mut s);
    let (pa, pb) = (pos(&s, a), pos(&s, b));
    assert_close(pb, 2.0 * pa + 10.0);
    // minimise a^2 + (2a + 10)^2
    assert_close(pa, -4.0);
    assert_close(pb, 2.0);
}

#[test]
fn parameters_load_from_partial_json() {
    let params: SolverParameters =
        serde_json::from_str(r#"{ "gapTolerance": 0.5, "outerProjectIterationsLimit": 7 }"#)
            .unwrap();
    assert_eq!(params.gap_tolerance, 0.5);
    assert_eq!(params.outer_project_iterations_limit, Some(7));
    assert_eq!(
        params.min_split_lagrangian_threshold,
        SolverParameters::default().min_split_lagrangian_threshold
    );
}

#[test]
fn iteration_limits_set_flags_instead_of_failing() {
    let mut s = Solver::new();
    let ids: Vec<_> = (0..4)
        .map(|_| s.add_variable(0.0, 1.0, 1.0).unwrap())
        .collect();
    for w in ids.windows(2) {
        s.add_constraint(w[0], w[1], 5.0, false).unwrap();
    }
    let params = SolverParameters {
        outer_project_iterations_limit: Some(1),
        inner_project_iterations_limit: Some(1),
        ..SolverParameters::default()
    };
    let solution = s.solve(&params, &CancelToken::new()).unwrap();
    assert!(solution.inner_project_iterations_limit_exceeded);
    assert!(solution.outer_project_iterations_limit_exceeded);
    assert!(solution.execution_limit_exceeded());
    assert_eq!(solution.outer_project_iterations, 1);
    assert_eq!(solution.inner_project_iterations_total, 1);
}

#[test]
fn set_weight_changes_the_next_solve() {
    let mut s = Solver::new();
    let a = s.add_variable(0.0, 1.0, 1.0).unwrap();
    let b = s.add_variable(0.0, 1.0, 1.0).unwrap();
    s.add_constraint(a, b, 10.0, false).unwrap();
    solve(&mut s);
    assert_close(pos(&s, a), -5.0);

    s.set_weight(b, 3.0).unwrap();
    solve(&mut s);
    // minimise a^2 + 3 (a + 10)^2
    assert_close(pos(&s, a), -7.5);
    assert_close(pos(&s, b), 2.5);
    assert!(s.set_weight(b, -1.0).is_err());
}

#[test]
fn violation_is_reported_per_constraint() {
    let mut s = Solver::new();
    let a = s.add_variable(0.0, 1.0, 1.0).unwrap();
    let b = s.add_variable(4.0, 1.0, 1.0).unwrap();
    let c = s.add_constraint(a, b, 10.0, false).unwrap();
    assert_close(s.violation(c).unwrap(), 6.0);

    solve(&mut s);
    assert!(s.violation(c).unwrap() <= SolverParameters::default().gap_tolerance);

    let empty = Solver::new();
    assert_eq!(empty.violation(c), None);
}

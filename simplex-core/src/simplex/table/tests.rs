use std::collections::HashSet;

use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};
use pretty_assertions::{assert_eq, assert_str_eq};
use proptest::prelude::*;

use super::*;
use crate::simplex::{Constraint, ObjectiveFunction};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn int(n: i64) -> BigRational {
    BigRational::from_integer(n.into())
}

fn frac(numer: i64, denom: i64) -> BigRational {
    BigRational::new(numer.into(), denom.into())
}

fn problem<T: Number>(objective: &[T], constraints: Vec<(Vec<T>, T)>) -> Problem<T> {
    Problem::new(
        ObjectiveFunction::new(RowDVector::from_row_slice(objective)),
        constraints
            .into_iter()
            .map(|(coefficients, rhs)| Constraint::new(RowDVector::from_vec(coefficients), rhs))
            .collect(),
    )
    .unwrap()
}

fn exact_problem(objective: &[i64], constraints: &[(Vec<i64>, i64)]) -> Problem<BigRational> {
    problem(
        &objective.iter().copied().map(int).collect::<Vec<_>>(),
        constraints
            .iter()
            .map(|(coefficients, rhs)| (coefficients.iter().copied().map(int).collect(), int(*rhs)))
            .collect(),
    )
}

/// max 3x1 + 5x2, x1 <= 4, 2x2 <= 12, 3x1 + 2x2 <= 18
fn textbook() -> Problem<f64> {
    problem(
        &[3., 5.],
        vec![(vec![1., 0.], 4.), (vec![0., 2.], 12.), (vec![3., 2.], 18.)],
    )
}

fn exact_textbook() -> Problem<BigRational> {
    exact_problem(&[3, 5], &[(vec![1, 0], 4), (vec![0, 2], 12), (vec![3, 2], 18)])
}

/// Beale's problem: cycles under the Dantzig rule with first-row ratio ties.
fn beale() -> Problem<BigRational> {
    problem(
        &[frac(3, 4), int(-20), frac(1, 2), int(-6)],
        vec![
            (vec![frac(1, 4), int(-8), int(-1), int(9)], int(0)),
            (vec![frac(1, 2), int(-12), frac(-1, 2), int(3)], int(0)),
            (vec![int(0), int(0), int(1), int(0)], int(1)),
        ],
    )
}

/// Describes the first broken tableau invariant, if any.
fn invariant_violation(table: &SimplexTable<BigRational>) -> Option<String> {
    let mut seen = HashSet::new();
    for (i, (row, basic)) in table.rows.iter().zip(&table.basis).enumerate() {
        if row.rhs < BigRational::zero() {
            return Some(format!("row {i} has negative rhs {}", row.rhs));
        }
        if !seen.insert(*basic) {
            return Some(format!("x{} is basic in two rows", basic + 1));
        }
        for (k, other) in table.rows.iter().enumerate() {
            let expected = if k == i {
                BigRational::one()
            } else {
                BigRational::zero()
            };
            if other.coefficients[*basic] != expected {
                return Some(format!(
                    "column of x{} is not an identity column at row {k}",
                    basic + 1
                ));
            }
        }
        if !table.objective.coefficients[*basic].is_zero() {
            return Some(format!("objective is not reduced in column x{}", basic + 1));
        }
    }
    None
}

#[test]
fn new_appends_identity_slack_block() {
    let table = SimplexTable::new(textbook(), SolverSettings::default());

    assert_str_eq!(
        table.constraint_matrix().to_string(),
        DMatrix::from_row_slice(
            3,
            5,
            &[
                1., 0., 1., 0., 0., //
                0., 2., 0., 1., 0., //
                3., 2., 0., 0., 1., //
            ]
        )
        .to_string()
    );
    assert_str_eq!(
        table.rhs().to_string(),
        DVector::from_column_slice(&[4., 12., 18.]).to_string()
    );
    assert_str_eq!(
        table.objective().coefficients().to_string(),
        RowDVector::from_row_slice(&[3., 5., 0., 0., 0.]).to_string()
    );
    assert_eq!(table.basis(), &[2, 3, 4]);
    assert_eq!(table.n_variables(), 2);
    assert_eq!(table.n_columns(), 5);
    assert!(table.status().is_building());
}

#[test]
fn first_step_negates_objective_and_pivots_on_x2() {
    init();
    let mut table = SimplexTable::new(textbook(), SolverSettings::default());

    assert_eq!(table.step(), None);

    assert!(table.status().is_iterating());
    assert_eq!(table.iterations(), 1);
    assert_eq!(table.basis(), &[2, 1, 4]);
    assert_eq!(
        table.objective(),
        &Row::new(RowDVector::from_row_slice(&[-3., 0., 0., 2.5, 0.]), 30.)
    );
    assert_eq!(
        table.rows()[1],
        Row::new(RowDVector::from_row_slice(&[0., 1., 0., 0.5, 0.]), 6.)
    );
    assert_eq!(
        table.rows()[2],
        Row::new(RowDVector::from_row_slice(&[3., 0., 0., -1., 1.]), 6.)
    );
}

#[test]
fn textbook_problem_reaches_known_optimum() {
    init();
    let mut table = SimplexTable::new(exact_textbook(), SolverSettings::default());

    let solution = table.solve().unwrap();

    assert_eq!(solution.vars, DVector::from_vec(vec![int(2), int(6)]));
    assert_eq!(solution.fn_val, int(36));
    assert_eq!(table.iterations(), 2);
    assert_eq!(table.row_for_basic_variable(0), Some(2));
    assert_eq!(table.row_for_basic_variable(1), Some(1));
    assert!(table
        .objective()
        .coefficients()
        .iter()
        .all(|coef| *coef >= BigRational::zero()));
}

#[test]
fn float_arithmetic_agrees_on_the_textbook_problem() {
    let solution = textbook().solve(SolverSettings::default()).unwrap();

    assert!((solution.vars[0] - 2.).abs() < 1e-9);
    assert!((solution.vars[1] - 6.).abs() < 1e-9);
    assert!((solution.fn_val - 36.).abs() < 1e-9);
}

#[test]
fn redundant_constraint_leaves_a_slack_basic_at_zero() {
    let mut table = SimplexTable::new(
        exact_problem(&[2, 3, 4], &[(vec![1, 1, 1], 2), (vec![1, 1, 1], 2)]),
        SolverSettings::default(),
    );

    let solution = table.solve().unwrap();

    assert_eq!(solution.vars, DVector::from_vec(vec![int(0), int(0), int(2)]));
    assert_eq!(solution.fn_val, int(8));
    let slack_row = table.row_for_basic_variable(4).unwrap();
    assert!(table.rows()[slack_row].rhs().is_zero());
}

#[test]
fn negative_entering_column_is_unbounded() {
    init();
    let mut table = SimplexTable::new(problem(&[1.], vec![(vec![-1.], -1.)]), SolverSettings::default());

    assert_eq!(table.solve(), Err(SolutionError::Unbounded));
    assert!(table.status().is_unbounded());
    assert_eq!(table.iterations(), 0);
}

#[test]
fn unboundedness_found_after_a_pivot() {
    let mut table = SimplexTable::new(
        exact_problem(&[1, 1], &[(vec![1, -1], 1)]),
        SolverSettings::default(),
    );

    assert_eq!(table.solve(), Err(SolutionError::Unbounded));
    assert_eq!(table.iterations(), 1);
    let column = table.entering_column().unwrap();
    assert!(table
        .rows()
        .iter()
        .all(|row| row.coefficients()[column] <= BigRational::zero()));
}

#[test]
fn degenerate_optimum_keeps_a_basic_variable_at_zero() {
    let mut table = SimplexTable::new(
        exact_problem(&[2, 1], &[(vec![1, 1], 4), (vec![1, 0], 0)]),
        SolverSettings::default(),
    );

    let solution = table.solve().unwrap();

    assert_eq!(solution.vars, DVector::from_vec(vec![int(0), int(4)]));
    assert_eq!(solution.fn_val, int(4));
    assert!(table.is_basic(0));
    assert_eq!(invariant_violation(&table), None);
}

#[test]
fn terminal_tables_do_not_pivot_again() {
    let mut optimal = SimplexTable::new(exact_textbook(), SolverSettings::default());
    let solution = optimal.solve().unwrap();
    let snapshot = optimal.clone();

    assert_eq!(optimal.step(), Some(Ok(solution)));
    assert_eq!(optimal, snapshot);

    let mut unbounded = SimplexTable::new(
        exact_problem(&[1], &[(vec![-1], 1)]),
        SolverSettings::default(),
    );
    assert_eq!(unbounded.solve(), Err(SolutionError::Unbounded));
    let snapshot = unbounded.clone();

    assert_eq!(unbounded.step(), Some(Err(SolutionError::Unbounded)));
    assert_eq!(unbounded, snapshot);
}

#[test]
fn iteration_cap_reports_non_convergence() {
    let mut capped = SimplexTable::new(
        textbook(),
        SolverSettings::default().with_max_iterations(Some(1)),
    );
    assert_eq!(
        capped.solve(),
        Err(SolutionError::NonConvergent { iterations: 1 })
    );
    assert!(capped.status().is_non_convergent());

    let mut enough = SimplexTable::new(
        textbook(),
        SolverSettings::default().with_max_iterations(Some(2)),
    );
    assert!(enough.solve().is_ok());
}

#[test]
fn exhausted_budget_still_detects_unboundedness() {
    let mut table = SimplexTable::new(
        problem(&[1.], vec![(vec![-1.], -1.)]),
        SolverSettings::default().with_max_iterations(Some(0)),
    );

    assert_eq!(table.solve(), Err(SolutionError::Unbounded));
    assert_eq!(table.iterations(), 0);

    let mut table = SimplexTable::new(
        exact_problem(&[1, 1], &[(vec![1, -1], 1)]),
        SolverSettings::default().with_max_iterations(Some(1)),
    );

    assert_eq!(table.solve(), Err(SolutionError::Unbounded));
    assert_eq!(table.iterations(), 1);
}

#[test]
fn exhausted_budget_still_detects_optimality() {
    let mut table = SimplexTable::new(
        exact_problem(&[-1, -2], &[(vec![1, 1], 3)]),
        SolverSettings::default().with_max_iterations(Some(0)),
    );

    let solution = table.solve().unwrap();

    assert_eq!(solution.vars, DVector::from_vec(vec![int(0), int(0)]));
    assert_eq!(solution.fn_val, int(0));
}

#[test]
fn dantzig_rule_cycles_on_beale_problem() {
    let mut table = SimplexTable::new(
        beale(),
        SolverSettings::default().with_max_iterations(Some(100)),
    );

    assert_eq!(
        table.solve(),
        Err(SolutionError::NonConvergent { iterations: 100 })
    );
}

#[test]
fn bland_rule_terminates_on_beale_problem() {
    let mut table = SimplexTable::new(
        beale(),
        SolverSettings::default().with_pivot_rule(PivotRule::Bland),
    );

    let solution = table.solve().unwrap();

    assert_eq!(solution.fn_val, frac(5, 4));
    assert_eq!(
        solution.vars,
        DVector::from_vec(vec![int(1), int(0), int(1), int(0)])
    );
    assert_eq!(invariant_violation(&table), None);
}

#[test]
fn least_negative_index_prefers_first_of_equal_candidates() {
    let mut table = SimplexTable::new(
        problem(&[5., 5., 1.], vec![(vec![1., 1., 1.], 1.)]),
        SolverSettings::default(),
    );
    assert_eq!(table.least_negative_index(), None);

    table.objective.negate();

    assert_eq!(table.least_negative_index(), Some(0));
}

#[test]
fn least_negative_index_ignores_noise_below_epsilon() {
    let mut table = SimplexTable::new(problem(&[1.], vec![(vec![1.], 1.)]), SolverSettings::default());
    table.objective.coefficients[0] = -1e-12;

    assert_eq!(table.least_negative_index(), None);
}

#[test]
fn leaving_row_skips_non_positive_entries() {
    let mut table = SimplexTable::new(
        problem(
            &[1., 1.],
            vec![(vec![-1., 1.], 1.), (vec![0., 1.], 5.), (vec![2., 1.], 6.)],
        ),
        SolverSettings::default(),
    );
    table.objective.negate();

    assert_eq!(table.leaving_row(0), Some(2));
    assert_eq!(table.leaving_row(1), Some(0));
}

#[test]
fn pivot_rejects_invalid_requests() {
    let mut table = SimplexTable::new(textbook(), SolverSettings::default());

    assert_eq!(
        table.pivot(7, 2),
        Err(PivotError::ColumnOutOfRange {
            column: 7,
            n_columns: 5
        })
    );
    assert_eq!(table.pivot(1, 0), Err(PivotError::NotBasic { variable: 0 }));
    assert_eq!(
        table.pivot(1, 2),
        Err(PivotError::ZeroPivot { row: 0, column: 1 })
    );
}

#[test]
fn pivot_swaps_basic_variable_of_the_row() {
    let mut table = SimplexTable::new(exact_textbook(), SolverSettings::default());

    table.pivot(1, 3).unwrap();

    assert_eq!(table.basis(), &[2, 1, 4]);
    assert_eq!(table.row_for_basic_variable(3), None);
    assert_eq!(table.rows()[1].rhs(), &int(6));
    assert_eq!(invariant_violation(&table), None);
}

#[test]
fn display_names_basic_variables() {
    let table = SimplexTable::new(textbook(), SolverSettings::default());

    assert!(table.to_string().starts_with("basis: [x3, x4, x5]\n"));
}

fn small_problem() -> impl Strategy<Value = (Vec<i64>, Vec<(Vec<i64>, i64)>)> {
    (1usize..=4, 1usize..=4).prop_flat_map(|(n, m)| {
        (
            prop::collection::vec(-5i64..=10, n),
            prop::collection::vec((prop::collection::vec(-5i64..=10, n), 0i64..=20), m),
        )
    })
}

proptest! {
    #[test]
    fn bland_rule_preserves_tableau_invariants((objective, constraints) in small_problem()) {
        let mut table = SimplexTable::new(
            exact_problem(&objective, &constraints),
            SolverSettings::default().with_pivot_rule(PivotRule::Bland),
        );

        let result = loop {
            let violation = invariant_violation(&table);
            prop_assert!(violation.is_none(), "{:?}", violation);
            if let Some(result) = table.step() {
                break result;
            }
        };

        match result {
            Ok(solution) => {
                prop_assert!(table.objective.coefficients.iter().all(|coef| *coef >= BigRational::zero()));
                prop_assert!(solution.vars.iter().all(|value| *value >= BigRational::zero()));
                for (coefficients, rhs) in &constraints {
                    let lhs = coefficients
                        .iter()
                        .zip(solution.vars.iter())
                        .fold(BigRational::zero(), |acc, (coef, value)| acc + int(*coef) * value);
                    prop_assert!(lhs <= int(*rhs));
                }
                let value = objective
                    .iter()
                    .zip(solution.vars.iter())
                    .fold(BigRational::zero(), |acc, (coef, value)| acc + int(*coef) * value);
                prop_assert_eq!(value, solution.fn_val);
            }
            Err(SolutionError::Unbounded) => {
                let column = table.entering_column();
                prop_assert!(column.is_some());
                let column = column.unwrap_or_default();
                prop_assert!(table.rows.iter().all(|row| row.coefficients[column] <= BigRational::zero()));
            }
            Err(err) => {
                prop_assert!(false, "unexpected outcome: {}", err);
            }
        }
    }

    #[test]
    fn dantzig_rule_preserves_tableau_invariants((objective, constraints) in small_problem()) {
        let mut table = SimplexTable::new(
            exact_problem(&objective, &constraints),
            SolverSettings::default().with_max_iterations(Some(50)),
        );

        let result = loop {
            let violation = invariant_violation(&table);
            prop_assert!(violation.is_none(), "{:?}", violation);
            if let Some(result) = table.step() {
                break result;
            }
        };

        match result {
            Ok(_) => {
                prop_assert!(table.objective.coefficients.iter().all(|coef| *coef >= BigRational::zero()));
            }
            Err(SolutionError::Unbounded) => {
                let column = table.entering_column();
                prop_assert!(column.is_some());
                let column = column.unwrap_or_default();
                prop_assert!(table.rows.iter().all(|row| row.coefficients[column] <= BigRational::zero()));
            }
            Err(SolutionError::NonConvergent { iterations }) => {
                prop_assert_eq!(iterations, 50);
            }
            Err(err) => {
                prop_assert!(false, "unexpected outcome: {}", err);
            }
        }
    }

    #[test]
    fn float_and_exact_optima_agree((objective, constraints) in small_problem()) {
        let exact = exact_problem(&objective, &constraints)
            .solve(SolverSettings::default().with_pivot_rule(PivotRule::Bland));
        let float = problem(
            &objective.iter().map(|coef| *coef as f64).collect::<Vec<_>>(),
            constraints
                .iter()
                .map(|(coefficients, rhs)| {
                    (coefficients.iter().map(|coef| *coef as f64).collect(), *rhs as f64)
                })
                .collect(),
        )
        .solve(SolverSettings::default().with_pivot_rule(PivotRule::Bland));

        if let (Ok(exact), Ok(float)) = (exact, float) {
            let exact_value = exact.fn_val.to_f64().unwrap_or(f64::NAN);
            prop_assert!((exact_value - float.fn_val).abs() < 1e-6);
        }
    }
}

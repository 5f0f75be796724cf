//! Cross-check the fixed-point engine against an exact linear solver.
//!
//! The same row of controls is expressed as Cassowary equalities in kasuari.
//! The engine works in whole pixels and hands out the remainder one unit at
//! a time, so each size may differ from the exact answer by less than one.

use std::collections::HashMap;

use formwork::layout::{ControlId, Coord, Form};
use kasuari::{Solver, Strength, Variable, WeightedRelation::*};

/// Exact sizes of `ratios.len()` controls chained edge to edge with `gap`
/// between them, filling `width` in proportion to `ratios`.
fn oracle_sizes(width: f64, gap: f64, ratios: &[f64]) -> Vec<f64> {
    let mut solver = Solver::new();
    let xs: Vec<Variable> = ratios.iter().map(|_| Variable::new()).collect();
    let ws: Vec<Variable> = ratios.iter().map(|_| Variable::new()).collect();

    solver
        .add_constraint(xs[0] | EQ(Strength::REQUIRED) | 0.0)
        .unwrap();
    for i in 1..ratios.len() {
        solver
            .add_constraint(xs[i] | EQ(Strength::REQUIRED) | xs[i - 1] + ws[i - 1] + gap)
            .unwrap();
        solver
            .add_constraint(ratios[0] * ws[i] | EQ(Strength::REQUIRED) | ratios[i] * ws[0])
            .unwrap();
    }
    let last = ratios.len() - 1;
    solver
        .add_constraint(xs[last] + ws[last] | EQ(Strength::REQUIRED) | width)
        .unwrap();

    let values: HashMap<Variable, f64> = solver
        .fetch_changes()
        .iter()
        .map(|(v, val)| (*v, *val))
        .collect();
    ws.iter()
        .map(|w| values.get(w).copied().unwrap_or(0.0))
        .collect()
}

/// The same row laid out by the engine
fn engine_sizes(width: i32, gap: i32, ratios: &[f64]) -> Vec<i32> {
    let mut form = Form::default();
    form.resize(width, 40);
    let root = form.root();
    let tree = form.tree_mut();
    let ids: Vec<ControlId> = (0..ratios.len())
        .map(|i| tree.add_control(root, format!("c{i}")).unwrap())
        .collect();

    tree.fix(ids[0], Coord::X, 0.0).unwrap();
    for pair in ids.windows(2) {
        tree.align(pair[1], Coord::X, pair[0], Coord::XW, gap).unwrap();
    }
    tree.fix(ids[ids.len() - 1], Coord::X2, 0.0).unwrap();
    tree.fill_with_ratios(&ids, Coord::W, ratios).unwrap();
    form.layout().unwrap();

    ids.iter()
        .map(|id| form.snapshot().bounds(*id).unwrap().width)
        .collect()
}

fn assert_matches_oracle(width: i32, gap: i32, ratios: &[f64]) {
    let exact = oracle_sizes(f64::from(width), f64::from(gap), ratios);
    let sizes = engine_sizes(width, gap, ratios);

    let gaps = gap * (ratios.len() as i32 - 1);
    assert_eq!(sizes.iter().sum::<i32>() + gaps, width, "row must fill the parent");
    for (size, expected) in sizes.iter().zip(&exact) {
        assert!(
            (f64::from(*size) - expected).abs() < 1.0,
            "size {} too far from exact {} (width {}, ratios {:?})",
            size,
            expected,
            width,
            ratios
        );
    }
}

#[test]
fn test_even_fill_matches_oracle() {
    assert_matches_oracle(300, 0, &[1.0, 1.0, 1.0]);
    assert_matches_oracle(600, 0, &[1.0, 1.0, 1.0]);
    assert_matches_oracle(120, 0, &[1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn test_fill_with_gaps_matches_oracle() {
    assert_matches_oracle(320, 10, &[1.0, 1.0, 1.0]);
    assert_matches_oracle(500, 20, &[1.0, 1.0]);
}

#[test]
fn test_weighted_fill_matches_oracle() {
    assert_matches_oracle(400, 0, &[1.0, 2.0, 1.0]);
    assert_matches_oracle(330, 15, &[1.0, 1.0, 2.0]);
}

#[test]
fn test_align_chain_matches_oracle() {
    let mut solver = Solver::new();
    let a_x = Variable::new();
    let a_width = Variable::new();
    let b_x = Variable::new();

    solver
        .add_constraint(b_x | EQ(Strength::REQUIRED) | a_x + a_width + 5.0)
        .unwrap();
    solver
        .add_constraint(a_x | EQ(Strength::REQUIRED) | 10.0)
        .unwrap();
    solver
        .add_constraint(a_width | EQ(Strength::REQUIRED) | 20.0)
        .unwrap();
    let values: HashMap<Variable, f64> = solver
        .fetch_changes()
        .iter()
        .map(|(v, val)| (*v, *val))
        .collect();
    let exact = values.get(&b_x).copied().unwrap_or(0.0);

    let mut form = Form::default();
    form.resize(200, 50);
    let root = form.root();
    let tree = form.tree_mut();
    let a = tree.add_control(root, "a").unwrap();
    let b = tree.add_control(root, "b").unwrap();
    tree.fix(a, Coord::X, 10.0).unwrap();
    tree.fix(a, Coord::W, 20.0).unwrap();
    tree.align(b, Coord::X, a, Coord::XW, 5).unwrap();
    form.layout().unwrap();

    let placed = form.snapshot().bounds(b).unwrap().x;
    assert!((f64::from(placed) - exact).abs() < 0.001);
}

use narwhal::position::{PositionSettings, assign_coordinates};
use narwhal::{CancelToken, Error, LayerArrays, LayerEdge, ProperLayeredGraph};

fn graph(node_count: usize, edges: &[(usize, usize)]) -> ProperLayeredGraph {
    let edges = edges.iter().map(|&(s, t)| LayerEdge::new(s, t)).collect();
    ProperLayeredGraph::new(node_count, node_count, edges).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn position_packs_a_single_layer() {
    let g = graph(3, &[]);
    let layers = LayerArrays::from_layers(vec![vec![2, 0, 1]]).unwrap();
    let coords = assign_coordinates(
        &g,
        &layers,
        &[10.0, 10.0, 10.0],
        &PositionSettings::default(),
        &CancelToken::new(),
    )
    .unwrap();
    assert_close(coords.x[2], 0.0);
    assert_close(coords.x[0], 20.0);
    assert_close(coords.x[1], 40.0);
    assert_eq!(coords.solutions.len(), 1);
    assert!(!coords.cancelled());
}

#[test]
fn position_centers_children_under_parents_within_separation() {
    // 0 1 / 2 3 with 0 -> 2, 1 -> 2, 1 -> 3
    let g = graph(4, &[(0, 2), (1, 2), (1, 3)]);
    let layers = LayerArrays::new(vec![0, 0, 1, 1]);
    let coords = assign_coordinates(
        &g,
        &layers,
        &[10.0; 4],
        &PositionSettings::default(),
        &CancelToken::new(),
    )
    .unwrap();

    assert_close(coords.x[0], 0.0);
    assert_close(coords.x[1], 20.0);
    // desired 10 and 20, pushed apart to 20 around their mean
    assert_close(coords.x[2], 5.0);
    assert_close(coords.x[3], 25.0);
    assert_eq!(coords.solutions[1].number_of_unsatisfiable_constraints, 0);
}

#[test]
fn position_respects_node_widths() {
    let g = graph(2, &[]);
    let layers = LayerArrays::from_layers(vec![vec![0, 1]]).unwrap();
    let settings = PositionSettings {
        node_separation: 4.0,
        ..PositionSettings::default()
    };
    let coords =
        assign_coordinates(&g, &layers, &[30.0, 10.0], &settings, &CancelToken::new()).unwrap();
    assert_close(coords.x[1] - coords.x[0], 24.0);
}

#[test]
fn position_requires_a_width_per_node() {
    let g = graph(3, &[]);
    let layers = LayerArrays::new(vec![0, 0, 0]);
    let err = assign_coordinates(
        &g,
        &layers,
        &[1.0, 1.0],
        &PositionSettings::default(),
        &CancelToken::new(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::MissingWidth { node: 2 }));
}

#[test]
fn position_reports_invalid_widths_from_the_solver() {
    let g = graph(2, &[]);
    let layers = LayerArrays::new(vec![0, 0]);
    let err = assign_coordinates(
        &g,
        &layers,
        &[f64::NAN, 1.0],
        &PositionSettings::default(),
        &CancelToken::new(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Projection(_)));
}

#[test]
fn position_stays_feasible_when_cancelled() {
    let g = graph(3, &[(0, 1), (0, 2)]);
    let layers = LayerArrays::new(vec![0, 1, 1]);
    let cancel = CancelToken::new();
    cancel.cancel();
    let coords = assign_coordinates(
        &g,
        &layers,
        &[10.0; 3],
        &PositionSettings::default(),
        &cancel,
    )
    .unwrap();
    assert!(coords.cancelled());
    assert!(coords.x[2] - coords.x[1] >= 20.0 - 1e-6);
}

#[test]
fn position_settings_deserialize_with_defaults() {
    let settings: PositionSettings =
        serde_json::from_str(r#"{"solver": {"gapTolerance": 0.01}}"#).unwrap();
    assert_eq!(settings.node_separation, 10.0);
    assert_eq!(settings.solver.gap_tolerance, 0.01);
    assert_eq!(settings.solver.min_split_lagrangian_threshold, -1e-7);
}

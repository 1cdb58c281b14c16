use narwhal::order::{cross_count, init_order};
use narwhal::{LayerArrays, LayerEdge, ProperLayeredGraph};

fn graph(node_count: usize, edges: &[(usize, usize)]) -> ProperLayeredGraph {
    let edges = edges.iter().map(|&(s, t)| LayerEdge::new(s, t)).collect();
    ProperLayeredGraph::new(node_count, node_count, edges).unwrap()
}

#[test]
fn init_order_assigns_non_overlapping_orders_for_each_rank_in_a_tree() {
    // a; b e; c d f
    let g = graph(6, &[(0, 1), (0, 4), (1, 2), (1, 3), (4, 5)]);
    let mut layers = LayerArrays::from_layers(vec![vec![0], vec![4, 1], vec![5, 3, 2]]).unwrap();
    init_order(&g, &mut layers);
    assert_eq!(layers.layers(), &[vec![0], vec![1, 4], vec![2, 3, 5]]);
    layers.validate().unwrap();
}

#[test]
fn init_order_assigns_non_overlapping_orders_for_each_rank_in_a_dag() {
    // a; b c; d with a -> b -> d, a -> c -> d
    let g = graph(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
    let mut layers = LayerArrays::from_layers(vec![vec![0], vec![2, 1], vec![3]]).unwrap();
    init_order(&g, &mut layers);
    assert_eq!(layers.layers(), &[vec![0], vec![1, 2], vec![3]]);
}

#[test]
fn init_order_visits_sources_top_layer_first() {
    // 2 is a source on layer 1; 0 is a source on layer 0 feeding 1.
    let g = graph(4, &[(0, 1), (2, 3), (1, 3)]);
    let mut layers = LayerArrays::from_layers(vec![vec![0], vec![2, 1], vec![3]]).unwrap();
    init_order(&g, &mut layers);
    assert_eq!(layers.layer(1), &[1, 2]);
}

#[test]
fn init_order_treats_isolated_nodes_as_sources() {
    let g = graph(4, &[(1, 3)]);
    let mut layers = LayerArrays::from_layers(vec![vec![1, 0], vec![2, 3]]).unwrap();
    init_order(&g, &mut layers);
    // 2 has no predecessors, so it is reached after 3 through its own root.
    assert_eq!(layers.layers(), &[vec![0, 1], vec![3, 2]]);
    assert_eq!(cross_count(&g, &layers), 0);
}

use crate::layer_arrays::LayerArrays;
use crate::proper_graph::ProperLayeredGraph;

/// Depth-first initial order.
///
/// Sources (in-degree 0) are visited top layer first, then by node index; every node is appended
/// to its layer the first time the traversal reaches it, so subtrees stay together.
pub fn init_order(g: &ProperLayeredGraph, layers: &mut LayerArrays) {
    let n = g.node_count();
    let y = layers.y().to_vec();
    let mut visited = vec![false; n];
    let mut new_layers: Vec<Vec<usize>> = vec![Vec::new(); layers.layer_count()];

    let mut roots: Vec<usize> = (0..n).filter(|&v| g.in_degree(v) == 0).collect();
    roots.sort_by_key(|&v| (y[v], v));
    // Every node of a DAG is reachable from a source; the tail only guards malformed input.
    roots.extend(0..n);

    let mut stack: Vec<usize> = Vec::new();
    for root in roots {
        stack.push(root);
        while let Some(v) = stack.pop() {
            if visited[v] {
                continue;
            }
            visited[v] = true;
            new_layers[y[v]].push(v);

            let start = stack.len();
            stack.extend(g.successors(v).filter(|&w| !visited[w]));
            stack[start..].reverse();
        }
    }

    for (l, layer) in new_layers.into_iter().enumerate() {
        *layers.layer_mut(l) = layer;
    }
    layers.update_x_from_layers();
}

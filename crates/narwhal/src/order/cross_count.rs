use crate::layer_arrays::LayerArrays;
use crate::proper_graph::ProperLayeredGraph;

/// Weighted number of edge crossings over all pairs of adjacent layers.
///
/// Counted in `u128`: a single pair of `u32` weights already fills 64 bits.
pub fn cross_count(g: &ProperLayeredGraph, layers: &LayerArrays) -> u128 {
    (1..layers.layer_count())
        .map(|l| bilayer_cross_count(g, layers, l - 1))
        .sum()
}

/// Crossings between layer `north` and layer `north + 1`.
///
/// Edges are visited north node by north node, each node's edges sorted by south position, and
/// inserted into an accumulator tree over south positions. An inserted edge crosses every
/// earlier edge that ends further right in the south layer.
pub fn bilayer_cross_count(g: &ProperLayeredGraph, layers: &LayerArrays, north: usize) -> u128 {
    let south = layers.layer(north + 1);
    if south.is_empty() {
        return 0;
    }
    let x = layers.x();
    let y = layers.y();

    #[derive(Debug, Clone, Copy)]
    struct SouthEntry {
        pos: usize,
        weight: u64,
    }

    let mut south_entries: Vec<SouthEntry> = Vec::new();
    for &v in layers.layer(north) {
        let start = south_entries.len();
        south_entries.extend(
            g.out_edges(v)
                .filter(|e| y[e.target] == north + 1)
                .map(|e| SouthEntry {
                    pos: x[e.target],
                    weight: u64::from(e.crossing_weight),
                }),
        );
        south_entries[start..].sort_by_key(|e| e.pos);
    }

    let mut first_index: usize = 1;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<u64> = vec![0; tree_size];

    let mut cc: u128 = 0;
    for entry in south_entries {
        let mut index = entry.pos + first_index;
        tree[index] += entry.weight;
        let mut weight_sum: u64 = 0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += entry.weight;
        }
        cc += u128::from(entry.weight) * u128::from(weight_sum);
    }

    cc
}

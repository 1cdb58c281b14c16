use super::cross_count::cross_count;
use crate::layer_arrays::LayerArrays;
use crate::proper_graph::ProperLayeredGraph;

/// Quality of a layering: crossings first, then the virtual-node spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderingMeasure {
    pub crossings: u128,
    /// Zero unless virtual-node balancing is enabled.
    pub layer_group_disbalance: f64,
}

impl OrderingMeasure {
    pub fn new(g: &ProperLayeredGraph, layers: &LayerArrays, balance: bool) -> Self {
        Self {
            crossings: cross_count(g, layers),
            layer_group_disbalance: if balance {
                layer_group_disbalance(g, layers)
            } else {
                0.0
            },
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.crossings == 0 && self.layer_group_disbalance == 0.0
    }

    /// Strictly better, compared lexicographically.
    pub fn better_than(&self, other: &Self) -> bool {
        self.crossings < other.crossings
            || (self.crossings == other.crossings
                && self.layer_group_disbalance < other.layer_group_disbalance)
    }
}

/// Sum over layers of how far each run of virtual nodes between original nodes is from an
/// even spread of the layer's virtual nodes.
pub fn layer_group_disbalance(g: &ProperLayeredGraph, layers: &LayerArrays) -> f64 {
    layers
        .layers()
        .iter()
        .map(|layer| layer_disbalance(g, layer))
        .sum()
}

fn layer_disbalance(g: &ProperLayeredGraph, layer: &[usize]) -> f64 {
    let virtuals = layer.iter().filter(|&&v| g.is_virtual(v)).count();
    let originals = layer.len() - virtuals;
    if virtuals == 0 || originals == 0 {
        return 0.0;
    }
    let ideal = virtuals as f64 / (originals + 1) as f64;

    let mut total = 0.0;
    let mut run = 0usize;
    for &v in layer {
        if g.is_virtual(v) {
            run += 1;
        } else {
            total += (run as f64 - ideal).abs();
            run = 0;
        }
    }
    total + (run as f64 - ideal).abs()
}

//! Per-node layer and in-layer position bookkeeping.

use crate::error::{Error, Result};

/// `y[n]` is the layer of node `n`, `x[n]` its index inside `layers[y[n]]`.
///
/// Layer 0 is the top layer. Every mutation that permutes a layer must be followed by an `x`
/// refresh for that layer; the crate-internal mutators below do this themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerArrays {
    y: Vec<usize>,
    x: Vec<usize>,
    layers: Vec<Vec<usize>>,
}

impl LayerArrays {
    /// Builds layers from a layering, placing nodes of a layer in index order.
    pub fn new(y: Vec<usize>) -> Self {
        let layer_count = y.iter().max().map_or(0, |&m| m + 1);
        let mut layers: Vec<Vec<usize>> = vec![Vec::new(); layer_count];
        for (node, &layer) in y.iter().enumerate() {
            layers[layer].push(node);
        }
        let mut out = Self {
            x: vec![0; y.len()],
            y,
            layers,
        };
        out.update_x_from_layers();
        out
    }

    /// Builds `y`/`x` from explicit layers. Nodes must be exactly `0..N`, each listed once.
    pub fn from_layers(layers: Vec<Vec<usize>>) -> Result<Self> {
        let node_count: usize = layers.iter().map(|l| l.len()).sum();
        let mut y: Vec<Option<usize>> = vec![None; node_count];
        for (l, layer) in layers.iter().enumerate() {
            for &node in layer {
                let slot = y.get_mut(node).ok_or(Error::NodeOutOfRange { node, node_count })?;
                if slot.is_some() {
                    return Err(Error::DuplicateNode { node });
                }
                *slot = Some(l);
            }
        }
        // With N slots, N entries and no duplicates, every node is present.
        let y: Vec<usize> = y.into_iter().map(|l| l.unwrap_or(0)).collect();
        let mut out = Self {
            x: vec![0; node_count],
            y,
            layers,
        };
        out.update_x_from_layers();
        Ok(out)
    }

    pub fn y(&self) -> &[usize] {
        &self.y
    }

    pub fn x(&self) -> &[usize] {
        &self.x
    }

    pub fn layers(&self) -> &[Vec<usize>] {
        &self.layers
    }

    pub fn layer(&self, l: usize) -> &[usize] {
        self.layers.get(l).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn node_count(&self) -> usize {
        self.y.len()
    }

    pub fn update_x_from_layers(&mut self) {
        for l in 0..self.layers.len() {
            self.update_x_for_layer(l);
        }
    }

    pub(crate) fn update_x_for_layer(&mut self, l: usize) {
        for (i, &node) in self.layers[l].iter().enumerate() {
            self.x[node] = i;
        }
    }

    pub(crate) fn layer_mut(&mut self, l: usize) -> &mut Vec<usize> {
        &mut self.layers[l]
    }

    pub(crate) fn swap_adjacent(&mut self, l: usize, i: usize) {
        let layer = &mut self.layers[l];
        layer.swap(i, i + 1);
        let (u, v) = (layer[i], layer[i + 1]);
        self.x[u] = i;
        self.x[v] = i + 1;
    }

    /// Replaces every layer's order, keeping each layer's node set.
    pub(crate) fn restore(&mut self, layers: &[Vec<usize>]) {
        for (dst, src) in self.layers.iter_mut().zip(layers) {
            dst.clone_from(src);
        }
        self.update_x_from_layers();
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = vec![false; self.y.len()];
        for (l, layer) in self.layers.iter().enumerate() {
            for (i, &node) in layer.iter().enumerate() {
                let Some(flag) = seen.get_mut(node) else {
                    return Err(Error::NodeOutOfRange {
                        node,
                        node_count: self.y.len(),
                    });
                };
                if *flag {
                    return Err(Error::DuplicateNode { node });
                }
                *flag = true;
                if self.y[node] != l {
                    return Err(Error::InconsistentLayers {
                        node,
                        reason: "listed in a layer other than y[node]",
                    });
                }
                if self.x[node] != i {
                    return Err(Error::InconsistentLayers {
                        node,
                        reason: "x[node] is not its index in the layer",
                    });
                }
            }
        }
        if let Some(node) = seen.iter().position(|&s| !s) {
            return Err(Error::InconsistentLayers {
                node,
                reason: "node is missing from its layer",
            });
        }
        Ok(())
    }

    /// Upside-down mirror image: layer `l` becomes `L - 1 - l` and every layer is reversed.
    pub fn reversed(&self) -> Self {
        let last = self.layers.len().saturating_sub(1);
        let layers: Vec<Vec<usize>> = self
            .layers
            .iter()
            .rev()
            .map(|layer| layer.iter().rev().copied().collect())
            .collect();
        let y = self.y.iter().map(|&l| last - l).collect();
        let mut out = Self {
            x: vec![0; self.x.len()],
            y,
            layers,
        };
        out.update_x_from_layers();
        out
    }
}

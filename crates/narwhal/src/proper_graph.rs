//! Proper layered graphs: every edge steps exactly one layer down.
//!
//! Long edges of the structural graph are replaced by chains through virtual nodes, which are
//! numbered after all original nodes.

use crate::error::{Error, Result};
use crate::layer_arrays::LayerArrays;
use serde::{Deserialize, Serialize};

/// An edge between adjacent layers. `crossing_weight` counts how many drawn edges it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerEdge {
    pub source: usize,
    pub target: usize,
    pub crossing_weight: u32,
}

impl LayerEdge {
    pub fn new(source: usize, target: usize) -> Self {
        Self {
            source,
            target,
            crossing_weight: 1,
        }
    }

    pub fn with_crossing_weight(mut self, crossing_weight: u32) -> Self {
        self.crossing_weight = crossing_weight;
        self
    }
}

/// A structural edge before splitting; it may span any positive number of layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntEdge {
    pub source: usize,
    pub target: usize,
    pub crossing_weight: u32,
}

impl IntEdge {
    pub fn new(source: usize, target: usize) -> Self {
        Self {
            source,
            target,
            crossing_weight: 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProperLayeredGraph {
    node_count: usize,
    start_of_virtual_nodes: usize,
    edges: Vec<LayerEdge>,
    out_edges: Vec<Vec<usize>>,
    in_edges: Vec<Vec<usize>>,
}

/// Result of [`ProperLayeredGraph::build`].
#[derive(Debug, Clone)]
pub struct ProperLayering {
    pub graph: ProperLayeredGraph,
    pub layers: LayerArrays,
    /// Node path of each input edge, from source to target through its virtual nodes.
    pub edge_paths: Vec<Vec<usize>>,
}

impl ProperLayeredGraph {
    pub fn new(
        node_count: usize,
        start_of_virtual_nodes: usize,
        edges: Vec<LayerEdge>,
    ) -> Result<Self> {
        let mut out_edges: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        let mut in_edges: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        for (i, e) in edges.iter().enumerate() {
            for node in [e.source, e.target] {
                if node >= node_count {
                    return Err(Error::NodeOutOfRange { node, node_count });
                }
            }
            if e.crossing_weight == 0 {
                return Err(Error::ZeroCrossingWeight {
                    tail: e.source,
                    head: e.target,
                });
            }
            out_edges[e.source].push(i);
            in_edges[e.target].push(i);
        }
        Ok(Self {
            node_count,
            start_of_virtual_nodes: start_of_virtual_nodes.min(node_count),
            edges,
            out_edges,
            in_edges,
        })
    }

    /// Splits `edges` over `layering` (one layer per original node, layer 0 on top).
    pub fn build(
        node_count: usize,
        edges: &[IntEdge],
        layering: &[usize],
    ) -> Result<ProperLayering> {
        if layering.len() != node_count {
            return Err(Error::InconsistentLayers {
                node: layering.len().min(node_count),
                reason: "layering length differs from the node count",
            });
        }

        let mut y = layering.to_vec();
        let mut layer_edges: Vec<LayerEdge> = Vec::with_capacity(edges.len());
        let mut edge_paths: Vec<Vec<usize>> = Vec::with_capacity(edges.len());

        for e in edges {
            for node in [e.source, e.target] {
                if node >= node_count {
                    return Err(Error::NodeOutOfRange { node, node_count });
                }
            }
            let (top, bottom) = (layering[e.source], layering[e.target]);
            if bottom <= top {
                return Err(Error::EdgeSpansLayers {
                    tail: e.source,
                    head: e.target,
                    tail_layer: top,
                    head_layer: bottom,
                });
            }

            let mut path = Vec::with_capacity(bottom - top + 1);
            path.push(e.source);
            for layer in top + 1..bottom {
                let virtual_node = y.len();
                y.push(layer);
                path.push(virtual_node);
            }
            path.push(e.target);

            for w in path.windows(2) {
                layer_edges.push(LayerEdge {
                    source: w[0],
                    target: w[1],
                    crossing_weight: e.crossing_weight,
                });
            }
            edge_paths.push(path);
        }

        let graph = Self::new(y.len(), node_count, layer_edges)?;
        let layers = LayerArrays::new(y);
        Ok(ProperLayering {
            graph,
            layers,
            edge_paths,
        })
    }

    /// Fails on the first edge that does not step exactly one layer down.
    pub fn validate(&self, layers: &LayerArrays) -> Result<()> {
        if layers.node_count() != self.node_count {
            return Err(Error::InconsistentLayers {
                node: layers.node_count().min(self.node_count),
                reason: "layer arrays and graph disagree on the node count",
            });
        }
        let y = layers.y();
        for e in &self.edges {
            if y[e.target] != y[e.source] + 1 {
                return Err(Error::EdgeSpansLayers {
                    tail: e.source,
                    head: e.target,
                    tail_layer: y[e.source],
                    head_layer: y[e.target],
                });
            }
        }
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn start_of_virtual_nodes(&self) -> usize {
        self.start_of_virtual_nodes
    }

    pub fn is_virtual(&self, v: usize) -> bool {
        v >= self.start_of_virtual_nodes
    }

    pub fn edges(&self) -> &[LayerEdge] {
        &self.edges
    }

    pub fn out_edges(&self, v: usize) -> impl Iterator<Item = &LayerEdge> + '_ {
        self.out_edges[v].iter().map(|&i| &self.edges[i])
    }

    pub fn in_edges(&self, v: usize) -> impl Iterator<Item = &LayerEdge> + '_ {
        self.in_edges[v].iter().map(|&i| &self.edges[i])
    }

    pub fn successors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.out_edges(v).map(|e| e.target)
    }

    pub fn predecessors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.in_edges(v).map(|e| e.source)
    }

    pub fn out_degree(&self, v: usize) -> usize {
        self.out_edges[v].len()
    }

    pub fn in_degree(&self, v: usize) -> usize {
        self.in_edges[v].len()
    }

    pub fn has_crossing_weights(&self) -> bool {
        self.edges.iter().any(|e| e.crossing_weight != 1)
    }

    /// Same graph with every edge flipped; pairs with [`LayerArrays::reversed`].
    pub fn reversed(&self) -> Self {
        let edges = self
            .edges
            .iter()
            .map(|e| LayerEdge {
                source: e.target,
                target: e.source,
                crossing_weight: e.crossing_weight,
            })
            .collect();
        Self {
            node_count: self.node_count,
            start_of_virtual_nodes: self.start_of_virtual_nodes,
            edges,
            out_edges: self.in_edges.clone(),
            in_edges: self.out_edges.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "edge {tail} -> {head} goes from layer {tail_layer} to layer {head_layer}; \
         every edge of a proper layered graph must step exactly one layer down"
    )]
    EdgeSpansLayers {
        tail: usize,
        head: usize,
        tail_layer: usize,
        head_layer: usize,
    },

    #[error("node {node} is out of range for a graph with {node_count} nodes")]
    NodeOutOfRange { node: usize, node_count: usize },

    #[error("edge {tail} -> {head} has a crossing weight of zero")]
    ZeroCrossingWeight { tail: usize, head: usize },

    #[error("layer arrays are inconsistent at node {node}: {reason}")]
    InconsistentLayers { node: usize, reason: &'static str },

    #[error("node {node} is listed more than once in the layers")]
    DuplicateNode { node: usize },

    #[error("no width given for node {node}")]
    MissingWidth { node: usize },

    #[error(transparent)]
    Projection(#[from] narwhal_projection::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

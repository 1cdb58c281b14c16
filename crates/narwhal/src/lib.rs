#![forbid(unsafe_code)]

//! Layered graph drawing: crossing minimization and constrained coordinate assignment.
//!
//! Input is a proper layered graph (every edge steps one layer down, long edges routed through
//! virtual nodes) together with its [`LayerArrays`]. [`order::order_layers`] permutes the layers
//! to reduce crossings, and [`position::assign_coordinates`] turns the ordered layers into x
//! coordinates with the separation-constraint solver in [`projection`].

pub use narwhal_projection as projection;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod layer_arrays;
pub mod order;
pub mod position;
pub mod proper_graph;
pub mod rng;

pub use error::{Error, Result};
pub use layer_arrays::LayerArrays;
pub use narwhal_projection::CancelToken;
pub use order::{OrderingMeasure, OrderingOutcome, OrderingSettings, order_layers};
pub use position::{Coordinates, PositionSettings, assign_coordinates};
pub use proper_graph::{IntEdge, LayerEdge, ProperLayeredGraph, ProperLayering};
pub use rng::{Coin, XorShift64Star};

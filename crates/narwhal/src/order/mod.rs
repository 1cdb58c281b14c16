//! Crossing minimization inside the layers of a proper layered graph.
//!
//! A depth-first initial order is improved by alternating weighted-median sweeps and adjacent
//! exchanges; the best layering seen is kept, and optionally the whole run is repeated on the
//! upside-down graph.

mod settings;
pub use settings::OrderingSettings;

mod cross_count;
pub use cross_count::{bilayer_cross_count, cross_count};

mod init_order;
pub use init_order::init_order;

mod median;
pub use median::{NO_MEDIAN, weighted_median};

mod measure;
pub use measure::{OrderingMeasure, layer_group_disbalance};

mod transpose;

mod ordering;
pub use ordering::{OrderingOutcome, order_layers, order_layers_with_coin};

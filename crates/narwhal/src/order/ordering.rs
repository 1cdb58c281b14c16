use super::init_order::init_order;
use super::measure::OrderingMeasure;
use super::median::{NO_MEDIAN, sort_by_medians, weighted_median};
use super::settings::OrderingSettings;
use super::transpose::Transposer;
use crate::error::Result;
use crate::layer_arrays::LayerArrays;
use crate::proper_graph::ProperLayeredGraph;
use crate::rng::{Coin, XorShift64Star};
use narwhal_projection::CancelToken;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderingOutcome {
    /// Weighted crossings of the returned layering.
    pub crossings: u128,
    /// Weighted crossings of the layering passed in.
    pub initial_crossings: u128,
    /// Sweep iterations run, counting the mirror trial.
    pub iterations: usize,
    /// The returned layering came from the upside-down run.
    pub mirrored: bool,
    pub cancelled: bool,
}

/// Reorders every layer of `layers` to reduce edge crossings of `g`.
///
/// The coin is seeded from `settings.random_seed`, so equal inputs give equal outputs.
pub fn order_layers(
    g: &ProperLayeredGraph,
    layers: &mut LayerArrays,
    settings: &OrderingSettings,
    cancel: &CancelToken,
) -> Result<OrderingOutcome> {
    let mut coin = XorShift64Star::new(settings.random_seed);
    order_layers_with_coin(g, layers, settings, cancel, &mut coin)
}

/// [`order_layers`] with a caller-supplied tie-breaking coin.
pub fn order_layers_with_coin<C: Coin>(
    g: &ProperLayeredGraph,
    layers: &mut LayerArrays,
    settings: &OrderingSettings,
    cancel: &CancelToken,
    coin: &mut C,
) -> Result<OrderingOutcome> {
    layers.validate()?;
    g.validate(layers)?;

    let input = settings.mirror_trial.then(|| layers.clone());
    let direct = Ordering::new(g, settings, cancel, coin).run(layers);
    let mut outcome = OrderingOutcome {
        crossings: direct.best.crossings,
        initial_crossings: direct.initial.crossings,
        iterations: direct.iterations,
        mirrored: false,
        cancelled: direct.cancelled,
    };

    let Some(input) = input else {
        return Ok(outcome);
    };
    if direct.cancelled || direct.best.is_perfect() || layers.layer_count() < 2 {
        return Ok(outcome);
    }

    let reversed_graph = g.reversed();
    let mut reversed_layers = input.reversed();
    let mirror = Ordering::new(&reversed_graph, settings, cancel, coin).run(&mut reversed_layers);
    outcome.iterations += mirror.iterations;
    outcome.cancelled = mirror.cancelled;
    if mirror.best.better_than(&direct.best) {
        tracing::debug!(
            crossings = mirror.best.crossings,
            direct_crossings = direct.best.crossings,
            "mirror trial improved ordering"
        );
        *layers = reversed_layers.reversed();
        outcome.crossings = mirror.best.crossings;
        outcome.mirrored = true;
    }
    Ok(outcome)
}

struct RunResult {
    initial: OrderingMeasure,
    best: OrderingMeasure,
    iterations: usize,
    cancelled: bool,
}

struct Ordering<'a, C> {
    g: &'a ProperLayeredGraph,
    settings: &'a OrderingSettings,
    cancel: &'a CancelToken,
    coin: &'a mut C,
    medians: Vec<f64>,
    neighbours: Vec<usize>,
    sorted: Vec<(f64, usize)>,
    transposer: Transposer,
}

impl<'a, C: Coin> Ordering<'a, C> {
    fn new(
        g: &'a ProperLayeredGraph,
        settings: &'a OrderingSettings,
        cancel: &'a CancelToken,
        coin: &'a mut C,
    ) -> Self {
        Self {
            g,
            settings,
            cancel,
            coin,
            medians: vec![NO_MEDIAN; g.node_count()],
            neighbours: Vec::new(),
            sorted: Vec::new(),
            transposer: Transposer::default(),
        }
    }

    fn measure(&self, layers: &LayerArrays) -> OrderingMeasure {
        OrderingMeasure::new(
            self.g,
            layers,
            self.settings.balance_virtual_and_original_nodes,
        )
    }

    fn run(&mut self, layers: &mut LayerArrays) -> RunResult {
        let initial = self.measure(layers);
        let mut result = RunResult {
            initial,
            best: initial,
            iterations: 0,
            cancelled: false,
        };
        if layers.layer_count() < 2 || self.g.edges().is_empty() || initial.is_perfect() {
            return result;
        }

        let mut best_layers = layers.layers().to_vec();
        init_order(self.g, layers);
        let m = self.measure(layers);
        if m.better_than(&result.best) {
            result.best = m;
            best_layers = layers.layers().to_vec();
        } else {
            layers.restore(&best_layers);
        }
        tracing::trace!(
            initial = initial.crossings,
            start = result.best.crossings,
            "ordering start"
        );

        let max_iterations = self.settings.max_of_iterations();
        let no_gain_bound = self.settings.no_gain_steps_bound();
        let mut no_gain_steps = 0usize;
        for i in 0..max_iterations {
            if result.best.is_perfect() {
                break;
            }
            if self.cancel.is_cancelled() {
                result.cancelled = true;
                break;
            }

            self.median_sweep(layers, i % 2 == 0);
            let exchanged = self.transposer.run(
                self.g,
                layers,
                self.settings.max_number_of_adjacent_exchanges,
                self.coin,
            );
            result.iterations += 1;

            let m = self.measure(layers);
            tracing::trace!(
                iteration = i,
                crossings = m.crossings,
                disbalance = m.layer_group_disbalance,
                exchanged,
                "ordering iteration"
            );
            if m.better_than(&result.best) {
                tracing::debug!(
                    iteration = i,
                    crossings = m.crossings,
                    previous = result.best.crossings,
                    "ordering improved"
                );
                result.best = m;
                best_layers.clone_from_slice(layers.layers());
                no_gain_steps = 0;
            } else {
                no_gain_steps += 1;
                if no_gain_steps > no_gain_bound {
                    break;
                }
            }
        }

        layers.restore(&best_layers);
        result
    }

    /// Top-down sweeps use predecessors of each layer, bottom-up sweeps successors.
    fn median_sweep(&mut self, layers: &mut LayerArrays, down: bool) {
        let layer_count = layers.layer_count();
        if down {
            for l in 1..layer_count {
                self.reorder_layer(layers, l, true);
            }
        } else {
            for l in (0..layer_count - 1).rev() {
                self.reorder_layer(layers, l, false);
            }
        }
    }

    fn reorder_layer(&mut self, layers: &mut LayerArrays, l: usize, use_predecessors: bool) {
        let g = self.g;
        for &v in layers.layer(l) {
            self.neighbours.clear();
            if use_predecessors {
                self.neighbours
                    .extend(g.predecessors(v).map(|u| layers.x()[u]));
            } else {
                self.neighbours.extend(g.successors(v).map(|u| layers.x()[u]));
            }
            self.neighbours.sort_unstable();
            self.medians[v] = weighted_median(&self.neighbours);
        }
        sort_by_medians(
            layers.layer_mut(l),
            &self.medians,
            self.coin,
            &mut self.sorted,
        );
        layers.update_x_for_layer(l);
    }
}

//! Adjacent exchange: swap neighbouring nodes of a layer when that removes crossings.

use crate::layer_arrays::LayerArrays;
use crate::proper_graph::ProperLayeredGraph;
use crate::rng::Coin;

#[derive(Debug, Default)]
pub(crate) struct Transposer {
    u_side: Vec<(usize, u64)>,
    v_side: Vec<(usize, u64)>,
}

impl Transposer {
    /// Runs up to `max_exchanges` double passes. Returns whether any swap removed crossings.
    pub(crate) fn run<C: Coin>(
        &mut self,
        g: &ProperLayeredGraph,
        layers: &mut LayerArrays,
        max_exchanges: usize,
        coin: &mut C,
    ) -> bool {
        let mut improved_any = false;
        for _ in 0..max_exchanges {
            let mut improved = false;
            for l in 0..layers.layer_count() {
                improved |= self.exchange_on_layer(g, layers, l, coin);
            }
            for l in (0..layers.layer_count()).rev() {
                improved |= self.exchange_on_layer(g, layers, l, coin);
            }
            improved_any |= improved;
            if !improved {
                break;
            }
        }
        improved_any
    }

    fn exchange_on_layer<C: Coin>(
        &mut self,
        g: &ProperLayeredGraph,
        layers: &mut LayerArrays,
        l: usize,
        coin: &mut C,
    ) -> bool {
        let mut improved = false;
        for i in 0..layers.layer(l).len().saturating_sub(1) {
            let u = layers.layer(l)[i];
            let v = layers.layer(l)[i + 1];
            let (c_uv, c_vu) = self.pair_crossings(g, layers, u, v);
            if c_vu < c_uv {
                layers.swap_adjacent(l, i);
                improved = true;
            } else if c_vu == c_uv && c_uv > 0 && coin.head_of_the_coin() {
                layers.swap_adjacent(l, i);
            }
        }
        improved
    }

    /// Crossings among the edges of `u` and `v` with `u` left of `v`, and after swapping them.
    pub(crate) fn pair_crossings(
        &mut self,
        g: &ProperLayeredGraph,
        layers: &LayerArrays,
        u: usize,
        v: usize,
    ) -> (u128, u128) {
        let x = layers.x();
        let mut c_uv = 0;
        let mut c_vu = 0;

        self.u_side.clear();
        self.v_side.clear();
        self.u_side
            .extend(g.in_edges(u).map(|e| (x[e.source], u64::from(e.crossing_weight))));
        self.v_side
            .extend(g.in_edges(v).map(|e| (x[e.source], u64::from(e.crossing_weight))));
        let (a, b) = inversions(&mut self.u_side, &mut self.v_side);
        c_uv += a;
        c_vu += b;

        self.u_side.clear();
        self.v_side.clear();
        self.u_side
            .extend(g.out_edges(u).map(|e| (x[e.target], u64::from(e.crossing_weight))));
        self.v_side
            .extend(g.out_edges(v).map(|e| (x[e.target], u64::from(e.crossing_weight))));
        let (a, b) = inversions(&mut self.u_side, &mut self.v_side);
        c_uv += a;
        c_vu += b;

        (c_uv, c_vu)
    }
}

/// Weighted pairs `(p, q)` of `left x right` with `p` after `q`, and with `p` before `q`.
/// Pairs sharing a position never cross.
fn inversions(left: &mut [(usize, u64)], right: &mut [(usize, u64)]) -> (u128, u128) {
    if left.is_empty() || right.is_empty() {
        return (0, 0);
    }
    left.sort_unstable_by_key(|&(p, _)| p);
    right.sort_unstable_by_key(|&(p, _)| p);
    let total: u64 = left.iter().map(|&(_, w)| w).sum();

    let mut after: u128 = 0;
    let mut before: u128 = 0;
    let mut i = 0;
    let mut below: u64 = 0;
    for &(q, wq) in right.iter() {
        while i < left.len() && left[i].0 < q {
            below += left[i].1;
            i += 1;
        }
        let equal: u64 = left[i..]
            .iter()
            .take_while(|&&(p, _)| p == q)
            .map(|&(_, w)| w)
            .sum();
        let wq = u128::from(wq);
        after += wq * u128::from(total - below - equal);
        before += wq * u128::from(below);
    }
    (after, before)
}

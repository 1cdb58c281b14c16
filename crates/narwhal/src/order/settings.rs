use serde::{Deserialize, Serialize};

/// Tuning knobs for [`super::order_layers`].
///
/// Iteration bounds are multiplied by `repetition_coefficient_for_ordering`, so a single
/// coefficient scales the whole effort budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderingSettings {
    pub max_number_of_passes_in_ordering: usize,
    pub no_gain_adjacent_swap_steps_bound: usize,
    pub repetition_coefficient_for_ordering: usize,
    /// Double passes (top to bottom, then back) of the adjacent-exchange phase.
    pub max_number_of_adjacent_exchanges: usize,
    /// Use the spread of virtual nodes between original nodes as a secondary measure.
    pub balance_virtual_and_original_nodes: bool,
    /// Also order the upside-down graph and keep the better of the two results.
    pub mirror_trial: bool,
    pub random_seed: u64,
}

impl Default for OrderingSettings {
    fn default() -> Self {
        Self {
            max_number_of_passes_in_ordering: 24,
            no_gain_adjacent_swap_steps_bound: 5,
            repetition_coefficient_for_ordering: 1,
            max_number_of_adjacent_exchanges: 50,
            balance_virtual_and_original_nodes: false,
            mirror_trial: true,
            random_seed: 1,
        }
    }
}

impl OrderingSettings {
    pub(crate) fn max_of_iterations(&self) -> usize {
        self.max_number_of_passes_in_ordering * self.repetition_coefficient_for_ordering
    }

    pub(crate) fn no_gain_steps_bound(&self) -> usize {
        self.no_gain_adjacent_swap_steps_bound * self.repetition_coefficient_for_ordering
    }
}

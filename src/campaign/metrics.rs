//! Derived values: pure functions of the campaign fields, never persisted.

use super::state::CampaignState;

/// Revenue recorded so far.
pub fn current_amount(sales_count: u64, unit_value: f64) -> f64 {
    sales_count as f64 * unit_value
}

/// Progress toward the target in percent, unclamped.
///
/// A zero target divides by 1, so the result is `current * 100`.
pub fn percentage_complete(current: f64, target: f64) -> f64 {
    let total = if target > 0.0 { target } else { 1.0 };
    (current / total) * 100.0
}

/// Sales still required to reach the target.
///
/// A zero unit value divides by 1 instead. Counts beyond `u64::MAX` saturate
/// at `u64::MAX`; the float-to-int cast never wraps.
pub fn sales_needed(target: f64, current: f64, unit_value: f64) -> u64 {
    let remaining = target - current;
    if remaining <= 0.0 {
        return 0;
    }
    let unit = if unit_value > 0.0 { unit_value } else { 1.0 };
    (remaining / unit).ceil() as u64
}

/// Snapshot of every derived value for one campaign state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub current_amount: f64,
    pub percentage_complete: f64,
    pub sales_needed: u64,
}

impl Progress {
    pub fn of(state: &CampaignState) -> Self {
        let current = current_amount(state.sales_count, state.unit_value);
        Self {
            current_amount: current,
            percentage_complete: percentage_complete(current, state.target_amount),
            sales_needed: sales_needed(state.target_amount, current, state.unit_value),
        }
    }

    pub fn target_reached(&self) -> bool {
        self.sales_needed == 0
    }
}

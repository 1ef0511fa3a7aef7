#![forbid(unsafe_code)]

//! Overflow resolution and final rounding.
//!
//! The solver works on fractional pixel widths and only rounds once, at the
//! very end, so error never compounds across passes.
//!
//! # Overflow Passes (contain mode)
//!
//! 1. **Hide**: walk hideable columns in field order, zeroing each, until the
//!    freed width covers the overflow.
//! 2. **Truncate**: shrink every truncatable or no-data column with nonzero
//!    width by `overflow * width / pool`, where `pool` is their combined
//!    width. One exact proportional step; no column goes negative.
//! 3. **Squeeze**: if the pool could not absorb the overflow, scale every
//!    remaining column by `budget / total`.
//!
//! # Rounding
//!
//! Largest remainder: floor everything, then hand the leftover pixels to the
//! largest fractional parts (lower index wins ties). In contain mode the
//! target is capped at `floor(budget)`, so the rounded sum never exceeds the
//! budget.
//!
//! # Invariants
//!
//! - Output length equals input length.
//! - With a budget, `sum(output) <= floor(budget)`; a negative budget yields
//!   all zeros. An infinite budget is unconstrained.
//! - Truncation never runs when hiding alone resolves the overflow.

const EPSILON: f64 = 1e-9;

/// What one column asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnDemand {
    /// Natural width including padding (and margin outside contain mode).
    pub natural: f64,
    pub hideable: bool,
    pub truncatable: bool,
    /// No record carries data for this column.
    pub no_data: bool,
}

impl ColumnDemand {
    #[must_use]
    pub fn new(natural: f64) -> Self {
        Self {
            natural,
            hideable: false,
            truncatable: false,
            no_data: false,
        }
    }

    #[must_use]
    pub fn hideable(mut self) -> Self {
        self.hideable = true;
        self
    }

    #[must_use]
    pub fn truncatable(mut self) -> Self {
        self.truncatable = true;
        self
    }

    #[must_use]
    pub fn no_data(mut self) -> Self {
        self.no_data = true;
        self
    }
}

/// Which overflow passes ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    pub hidden: usize,
    pub truncated: usize,
    pub squeezed: bool,
}

/// Solve column widths. `budget = None` means unconstrained.
#[must_use]
pub fn solve(columns: &[ColumnDemand], budget: Option<f64>) -> Vec<u32> {
    solve_with_resolution(columns, budget).0
}

/// [`solve`], also reporting which passes ran.
#[must_use]
pub fn solve_with_resolution(columns: &[ColumnDemand], budget: Option<f64>) -> (Vec<u32>, Resolution) {
    let mut widths: Vec<f64> = columns
        .iter()
        .map(|c| if c.natural.is_finite() { c.natural.max(0.0) } else { 0.0 })
        .collect();

    let budget = budget.filter(|b| *b != f64::INFINITY);
    let Some(budget) = budget else {
        let rounded = widths.iter().map(|w| w.round() as u32).collect();
        return (rounded, Resolution::default());
    };

    let budget = if budget.is_finite() { budget.max(0.0) } else { 0.0 };
    let resolution = resolve_overflow(columns, &mut widths, budget);
    (round_within(&widths, budget), resolution)
}

fn resolve_overflow(columns: &[ColumnDemand], widths: &mut [f64], budget: f64) -> Resolution {
    let mut resolution = Resolution::default();
    let mut overflow = widths.iter().sum::<f64>() - budget;
    if overflow <= EPSILON {
        return resolution;
    }

    // Hide pass.
    for (column, width) in columns.iter().zip(widths.iter_mut()) {
        if overflow <= EPSILON {
            break;
        }
        if column.hideable && *width > 0.0 {
            overflow -= *width;
            *width = 0.0;
            resolution.hidden += 1;
        }
    }

    // Truncate pass.
    if overflow > EPSILON {
        let pool: f64 = columns
            .iter()
            .zip(widths.iter())
            .filter(|(c, w)| (c.truncatable || c.no_data) && **w > 0.0)
            .map(|(_, w)| *w)
            .sum();
        if pool > 0.0 {
            let shrink = overflow.min(pool);
            for (column, width) in columns.iter().zip(widths.iter_mut()) {
                if (column.truncatable || column.no_data) && *width > 0.0 {
                    *width = (*width - shrink * *width / pool).max(0.0);
                    resolution.truncated += 1;
                }
            }
            overflow -= shrink;
        }
    }

    // Squeeze pass.
    if overflow > EPSILON {
        let total: f64 = widths.iter().sum();
        if total > 0.0 {
            let factor = budget / total;
            for width in widths.iter_mut() {
                *width *= factor;
            }
        }
        resolution.squeezed = true;
    }

    resolution
}

fn round_within(widths: &[f64], budget: f64) -> Vec<u32> {
    let floors: Vec<u32> = widths.iter().map(|w| w.max(0.0).floor() as u32).collect();
    let floor_sum: u64 = floors.iter().map(|&f| u64::from(f)).sum();
    let exact: f64 = widths.iter().sum();
    let target = (exact.round() as u64).min((budget + EPSILON).floor() as u64);

    if floor_sum > target {
        return shed_excess(floors, target);
    }

    let mut priority: Vec<(usize, f64)> = widths
        .iter()
        .zip(floors.iter())
        .enumerate()
        .map(|(i, (w, f))| (i, w - f64::from(*f)))
        .collect();
    priority.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    let mut result = floors;
    let deficit = usize::try_from(target - floor_sum).unwrap_or(usize::MAX);
    for &(i, _) in priority.iter().take(deficit) {
        result[i] = result[i].saturating_add(1);
    }
    result
}

/// Floors can exceed the target only through float noise at the budget
/// edge; take pixels back from the widest columns.
fn shed_excess(mut floors: Vec<u32>, target: u64) -> Vec<u32> {
    let mut sum: u64 = floors.iter().map(|&f| u64::from(f)).sum();
    while sum > target {
        let Some((idx, _)) = floors
            .iter()
            .enumerate()
            .filter(|(_, w)| **w > 0)
            .max_by_key(|(i, w)| (**w, std::cmp::Reverse(*i)))
        else {
            break;
        };
        floors[idx] -= 1;
        sum -= 1;
    }
    floors
}

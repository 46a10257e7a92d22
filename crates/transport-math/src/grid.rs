// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Nonuniform Grid
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Interpolation over tabulated, strictly increasing x → y data.
//!
//! Grids own no data: a `GridRecord` holds index ranges into a shared
//! `RealPool`, and `NonuniformGridCalculator` borrows the pool for the
//! duration of a lookup.

use crate::spline::calc_spline_derivatives;
use serde::{Deserialize, Serialize};
use transport_types::{TransportError, TransportResult};

/// Half-open index range `[start, stop)` into a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemRange {
    pub start: usize,
    pub stop: usize,
}

impl ItemRange {
    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.stop == self.start
    }
}

/// Flat arena of reals shared by all grids of a params object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealPool {
    values: Vec<f64>,
}

impl RealPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append values and return their range.
    pub fn push(&mut self, values: &[f64]) -> ItemRange {
        let start = self.values.len();
        self.values.extend_from_slice(values);
        ItemRange {
            start,
            stop: self.values.len(),
        }
    }

    pub fn get(&self, range: ItemRange) -> &[f64] {
        &self.values[range.start..range.stop]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether a range lies within the pool.
    pub fn contains(&self, range: ItemRange) -> bool {
        range.start <= range.stop && range.stop <= self.values.len()
    }
}

/// Tabulated grid stored in a `RealPool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridRecord {
    pub x: ItemRange,
    pub y: ItemRange,
    /// Second derivatives for spline interpolation; empty for linear
    #[serde(default)]
    pub derivative: ItemRange,
}

impl GridRecord {
    /// At least two points, matching x/y lengths, and a derivative range
    /// that is either empty or the same length.
    pub fn is_valid(&self) -> bool {
        self.x.len() >= 2
            && self.x.len() == self.y.len()
            && (self.derivative.is_empty() || self.derivative.len() == self.x.len())
    }

    pub fn is_valid_in(&self, pool: &RealPool) -> bool {
        self.is_valid()
            && pool.contains(self.x)
            && pool.contains(self.y)
            && pool.contains(self.derivative)
    }

    pub fn has_derivative(&self) -> bool {
        !self.derivative.is_empty()
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Construct validated grids in a pool.
pub struct GridBuilder<'a> {
    pool: &'a mut RealPool,
}

impl<'a> GridBuilder<'a> {
    pub fn new(pool: &'a mut RealPool) -> Self {
        GridBuilder { pool }
    }

    /// Linearly interpolated grid.
    pub fn linear(&mut self, x: &[f64], y: &[f64]) -> TransportResult<GridRecord> {
        validate_grid(x, y)?;
        Ok(GridRecord {
            x: self.pool.push(x),
            y: self.pool.push(y),
            derivative: ItemRange::default(),
        })
    }

    /// Cubic spline grid with natural boundary conditions.
    pub fn spline(&mut self, x: &[f64], y: &[f64]) -> TransportResult<GridRecord> {
        validate_grid(x, y)?;
        let deriv = calc_spline_derivatives(x, y);
        Ok(GridRecord {
            x: self.pool.push(x),
            y: self.pool.push(y),
            derivative: self.pool.push(&deriv),
        })
    }
}

fn validate_grid(x: &[f64], y: &[f64]) -> TransportResult<()> {
    if x.len() < 2 {
        return Err(TransportError::GridError(format!(
            "grid needs at least 2 points, got {}",
            x.len()
        )));
    }
    if x.len() != y.len() {
        return Err(TransportError::GridError(format!(
            "x/y length mismatch: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    if let Some(i) = x.windows(2).position(|w| !(w[1] > w[0])) {
        return Err(TransportError::GridError(format!(
            "x not strictly increasing at index {}: {} >= {}",
            i + 1,
            x[i],
            x[i + 1]
        )));
    }
    if let Some(v) = x.iter().chain(y).find(|v| !v.is_finite()) {
        return Err(TransportError::GridError(format!("non-finite grid value {v}")));
    }
    Ok(())
}

/// Index `i` of the bin with `x[i] <= value < x[i+1]`.
///
/// Requires `x[0] <= value < x[n-1]`.
#[inline]
pub fn find_bin(x: &[f64], value: f64) -> usize {
    debug_assert!(x.len() >= 2 && value >= x[0] && value < x[x.len() - 1]);
    x.partition_point(|&v| v <= value) - 1
}

/// Evaluate y(x) over a non-uniform grid.
///
/// Values outside the grid are extrapolated flat from the end points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonuniformGridCalculator<'a> {
    x: &'a [f64],
    y: &'a [f64],
    deriv: Option<&'a [f64]>,
}

impl<'a> NonuniformGridCalculator<'a> {
    /// Borrow a grid record from its pool.
    pub fn new(grid: &GridRecord, pool: &'a RealPool) -> Self {
        debug_assert!(grid.is_valid_in(pool));
        NonuniformGridCalculator {
            x: pool.get(grid.x),
            y: pool.get(grid.y),
            deriv: grid.has_derivative().then(|| pool.get(grid.derivative)),
        }
    }

    /// Construct with x and y exchanged, for sampling from a CDF.
    pub fn from_inverse(grid: &GridRecord, pool: &'a RealPool) -> Self {
        debug_assert!(!grid.has_derivative(), "spline grids cannot be inverted");
        Self::new(grid, pool).make_inverse()
    }

    /// Construct directly from slices (linear interpolation).
    pub fn from_slices(x: &'a [f64], y: &'a [f64]) -> Self {
        debug_assert!(x.len() >= 2 && x.len() == y.len());
        NonuniformGridCalculator { x, y, deriv: None }
    }

    /// Interpolate at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.x.len();
        if x <= self.x[0] {
            return self.y[0];
        }
        if x >= self.x[n - 1] {
            return self.y[n - 1];
        }

        let i = find_bin(self.x, x);
        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let (y0, y1) = (self.y[i], self.y[i + 1]);
        match self.deriv {
            None => y0 + (x - x0) * (y1 - y0) / (x1 - x0),
            Some(d) => {
                let h = x1 - x0;
                let a = (x1 - x) / h;
                let b = 1.0 - a;
                a * y0 + b * y1 + ((a * a * a - a) * d[i] + (b * b * b - b) * d[i + 1]) * h * h / 6.0
            }
        }
    }

    /// Tabulated value at a grid index, without interpolation.
    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        self.y[index]
    }

    /// Calculator with x and y exchanged.
    ///
    /// The y values must be monotonically increasing; this is checked in
    /// debug builds only.
    pub fn make_inverse(&self) -> Self {
        debug_assert!(self.deriv.is_none(), "spline grids cannot be inverted");
        debug_assert!(
            self.y.windows(2).all(|w| w[1] >= w[0]),
            "inverted grid values must be monotonically increasing"
        );
        NonuniformGridCalculator {
            x: self.y,
            y: self.x,
            deriv: None,
        }
    }

    pub fn grid(&self) -> &'a [f64] {
        self.x
    }

    pub fn values(&self) -> &'a [f64] {
        self.y
    }

    pub fn front(&self) -> f64 {
        self.x[0]
    }

    pub fn back(&self) -> f64 {
        self.x[self.x.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Units
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Unit-tagged scalar quantities.
//!
//! A `Quantity<U>` stores a plain `f64` in the unit named by the zero-sized
//! tag `U`. Quantities of different units cannot be mixed without going
//! through `value()`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Unit tag: MeV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mev {}
/// Unit tag: MeV/c
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MevPerC {}
/// Unit tag: (MeV/c)²
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MevPerCSq {}
/// Unit tag: MeV/c²
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MevPerCSquared {}
/// Unit tag: elementary charge e
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EChargeUnit {}
/// Unit tag: fraction of the speed of light
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CLightUnit {}
/// Unit tag: atomic mass unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmuUnit {}

/// Scalar value carrying a compile-time unit.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity<U> {
    value: f64,
    #[serde(skip)]
    unit: PhantomData<U>,
}

pub type MevEnergy = Quantity<Mev>;
pub type MevMomentum = Quantity<MevPerC>;
pub type MevMomentumSq = Quantity<MevPerCSq>;
pub type MevMass = Quantity<MevPerCSquared>;
pub type ElementaryCharge = Quantity<EChargeUnit>;
pub type LightSpeed = Quantity<CLightUnit>;
pub type AmuMass = Quantity<AmuUnit>;

impl<U> Quantity<U> {
    #[inline]
    pub const fn new(value: f64) -> Self {
        Quantity {
            value,
            unit: PhantomData,
        }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0)
    }

    #[inline]
    pub const fn value(self) -> f64 {
        self.value
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.value.max(other.value))
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.value.min(other.value))
    }
}

impl<U> Clone for Quantity<U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<U> Copy for Quantity<U> {}

impl<U> Default for Quantity<U> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<U> PartialEq for Quantity<U> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<U> PartialOrd for Quantity<U> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<U> fmt::Debug for Quantity<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<U> Add for Quantity<U> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.value + rhs.value)
    }
}

impl<U> Sub for Quantity<U> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.value - rhs.value)
    }
}

impl<U> AddAssign for Quantity<U> {
    fn add_assign(&mut self, rhs: Self) {
        self.value += rhs.value;
    }
}

impl<U> SubAssign for Quantity<U> {
    fn sub_assign(&mut self, rhs: Self) {
        self.value -= rhs.value;
    }
}

impl<U> Neg for Quantity<U> {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.value)
    }
}

impl<U> Mul<f64> for Quantity<U> {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.value * rhs)
    }
}

impl<U> Div<f64> for Quantity<U> {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::new(self.value / rhs)
    }
}

/// Clamp a quantity to be nonnegative.
#[inline]
pub fn clamp_to_nonneg<U>(q: Quantity<U>) -> Quantity<U> {
    Quantity::new(q.value().max(0.0))
}

// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Urban MSC Scatter
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! End-of-step angular deflection and lateral displacement.
//!
//! The polar angle is sampled from a three-term model function
//!
//! g(u) = q [p g₁(u) + (1 - p) g₂(u)] + (1 - q) g₃(u)
//!
//! with g₁ ∝ exp(-a(1 - u)), g₂ ∝ (b - u)^(-d) and g₃ flat. The mixing
//! parameters are fixed by matching the first two moments of the
//! Goudsmit-Saunderson distribution after τ = t/λ₁ mean free paths.

use super::{
    EnergyLossTables, MscAction, MscInteraction, MscStep, UrbanMscData, UrbanMscHelper,
    UrbanMscMaterialData, UrbanMscParameters,
};
use crate::material::MaterialView;
use crate::particle::ParticleTrackView;
use rand::distributions::Distribution;
use rand::Rng;
use std::f64::consts::PI;
use transport_math::array::{from_spherical, rotate, scale};
use transport_math::distributions::{generate_canonical, BernoulliDistribution, UniformRealDistribution};
use transport_math::poly::poly_eval;
use transport_types::units::MevEnergy;
use transport_types::Real3;

/// Highland constant (MeV)
const HIGHLAND: f64 = 13.6;
/// Mean lateral radius over the maximum
const MEAN_RADIUS_FRAC: f64 = 0.73;

/// Large-angle sampling with two model functions reproducing ⟨cos θ⟩ and
/// ⟨cos² θ⟩.
#[derive(Debug, Clone, Copy)]
pub struct UrbanLargeAngleDistribution {
    tau: f64,
}

impl UrbanLargeAngleDistribution {
    pub fn new(tau: f64) -> Self {
        debug_assert!(tau >= 0.0);
        UrbanLargeAngleDistribution { tau }
    }
}

impl Distribution<f64> for UrbanLargeAngleDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let xmean = (-self.tau).exp();
        let x2mean = (1.0 + 2.0 * (-2.5 * self.tau).exp()) / 3.0;
        let a = (2.0 * xmean + 9.0 * x2mean - 3.0) / (2.0 * xmean - 3.0 * x2mean + 1.0);
        let prob = (a + 2.0) * xmean / a;
        if generate_canonical(rng) < prob {
            -1.0 + 2.0 * generate_canonical(rng).powf(1.0 / (a + 1.0))
        } else {
            UniformRealDistribution::new(-1.0, 1.0).sample(rng)
        }
    }
}

/// Correction to the Highland path factor for positrons.
#[derive(Debug, Clone, Copy)]
pub struct UrbanPositronCorrector {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    mult: f64,
}

impl UrbanPositronCorrector {
    const XL: f64 = 0.6;
    const XH: f64 = 0.9;
    const E: f64 = 113.0;

    pub fn new(zeff: f64) -> Self {
        debug_assert!(zeff >= 1.0);
        UrbanPositronCorrector {
            a: 0.994 - 4.08e-3 * zeff,
            b: 7.16 + (52.6 + 365.0 / zeff) / zeff,
            c: 1.0 - 4.47e-3 * zeff,
            d: 1.21e-3 * zeff,
            mult: 1.41125 + zeff * (1.84035e-4 * zeff - 1.86427e-2),
        }
    }

    /// Correction factor at the geometric mean of the scaled energies
    /// (kinetic energy over electron mass).
    pub fn evaluate(&self, y: f64) -> f64 {
        debug_assert!(y > 0.0);
        let x = (y * (y + 2.0) / ((y + 1.0) * (y + 1.0))).sqrt();
        let low = |x: f64| self.a * (1.0 - (-self.b * x).exp());
        let high = |x: f64| self.c + self.d * (Self::E * (x - 1.0)).exp();
        let corr = if x < Self::XL {
            low(x)
        } else if x > Self::XH {
            high(x)
        } else {
            let yl = low(Self::XL);
            let yh = high(Self::XH);
            let slope = (yh - yl) / (Self::XH - Self::XL);
            yl + slope * (x - Self::XL)
        };
        corr * self.mult
    }
}

/// Sample the direction change and lateral displacement after a step.
pub struct UrbanMscScatter<'a> {
    shared: &'a UrbanMscData,
    msc: &'a UrbanMscMaterialData,
    radiation_length: f64,
    inc_energy: f64,
    inc_direction: Real3,
    safety: f64,
    is_displaced: bool,
    geom_path: f64,
    true_path: f64,
    limit_min: f64,
    skip_sampling: bool,
    end_energy: f64,
    lambda: f64,
    tau: f64,
    theta0: f64,
}

impl<'a> UrbanMscScatter<'a> {
    /// Mean lateral displacement for a true and geometric path.
    pub fn calc_displacement(geom_path: f64, true_path: f64) -> f64 {
        debug_assert!(true_path >= geom_path);
        MEAN_RADIUS_FRAC * ((true_path - geom_path) * (true_path + geom_path)).sqrt()
    }

    pub fn new<L: EnergyLossTables>(
        shared: &'a UrbanMscData,
        helper: &UrbanMscHelper<'_, L>,
        material: &MaterialView<'_>,
        inc_direction: &Real3,
        safety: f64,
        input: &MscStep,
    ) -> Self {
        let params = &shared.params;
        let particle = helper.particle();
        debug_assert!(safety >= 0.0);
        debug_assert!(input.geom_path > 0.0 && input.true_path >= input.geom_path);
        debug_assert!(!input.is_displaced || safety > 0.0);

        let mut scatter = UrbanMscScatter {
            shared,
            msc: &shared.material_data[material.material_id().get()],
            radiation_length: material.radiation_length(),
            inc_energy: particle.energy().value(),
            inc_direction: *inc_direction,
            safety,
            is_displaced: input.is_displaced,
            geom_path: input.geom_path,
            true_path: input.true_path,
            limit_min: input.limit_min,
            skip_sampling: true,
            end_energy: 0.0,
            lambda: helper.msc_mfp(),
            tau: 0.0,
            theta0: -1.0,
        };

        // Stopping, tiny, or negligible steps leave the direction alone
        if input.true_path == helper.range() || input.true_path < params.geom_limit {
            return scatter;
        }
        scatter.end_energy = helper.calc_end_energy(input.true_path).value();
        if scatter.end_energy < UrbanMscParameters::MIN_ENDPOINT_ENERGY
            || input.true_path <= scatter.lambda * params.tau_small
        {
            return scatter;
        }
        scatter.skip_sampling = false;

        // Mean free path averaged over the energy loss
        let lambda_end = helper.calc_msc_mfp(MevEnergy::new(scatter.end_energy));
        let lambda = scatter.lambda;
        let mean_lambda = if (lambda - lambda_end).abs() < lambda * 0.01 {
            lambda
        } else {
            (lambda - lambda_end) / (lambda / lambda_end).ln()
        };
        scatter.tau = input.true_path / mean_lambda;

        if scatter.tau < params.tau_big {
            if scatter.limit_min == 0.0 {
                debug_assert!(!scatter.is_displaced);
                scatter.limit_min = UrbanMscParameters::MIN_STEP_FALLBACK;
            }
            scatter.limit_min = scatter.limit_min.min(params.lambda_limit);
            scatter.theta0 = scatter.compute_theta0(particle, material);
            if scatter.theta0 < 1e-8 {
                if scatter.is_displaced {
                    scatter.theta0 = 0.0;
                } else {
                    scatter.skip_sampling = true;
                }
            }
        }
        scatter
    }

    /// Sample the scattering of one step.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> MscInteraction {
        if self.skip_sampling {
            return MscInteraction {
                direction: self.inc_direction,
                displacement: [0.0; 3],
                action: MscAction::Unchanged,
            };
        }

        let costheta = if self.theta0 <= 0.0 {
            1.0
        } else if self.tau >= self.shared.params.tau_big {
            UniformRealDistribution::new(-1.0, 1.0).sample(rng)
        } else if 2.0 * self.end_energy < self.inc_energy || self.theta0 > PI / 6.0 {
            UrbanLargeAngleDistribution::new(self.tau).sample(rng)
        } else {
            self.sample_cos_theta(rng)
        };
        debug_assert!(costheta.abs() <= 1.0);

        let phi = UniformRealDistribution::new(0.0, 2.0 * PI).sample(rng);
        let mut result = MscInteraction {
            direction: rotate(&from_spherical(costheta, phi), &self.inc_direction),
            displacement: [0.0; 3],
            action: MscAction::Scattered,
        };

        if self.is_displaced {
            let length = Self::calc_displacement(self.geom_path, self.true_path)
                .min((1.0 - self.shared.params.safety_tol) * self.safety);
            if length >= self.shared.params.geom_limit {
                result.displacement = scale(&self.sample_displacement_dir(rng, phi), length);
                result.action = MscAction::Displaced;
            }
        }
        result
    }

    /// Polar angle from the moment-matched three-term model function.
    fn sample_cos_theta<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        // Tail parameter
        let xsi = {
            let maxtau = if self.true_path < self.limit_min {
                self.limit_min / self.lambda
            } else {
                self.tau
            };
            let u = maxtau.powf(1.0 / 6.0);
            let radlen_mfp = self.true_path / (self.tau * self.radiation_length);
            (poly_eval(&self.msc.tail_coeff, u) + self.msc.tail_corr * radlen_mfp.ln()).max(1.9)
        };

        let x = {
            let s = 2.0 * (0.5 * self.theta0).sin();
            s * s
        };
        // Mean of the central part and the theoretical mean
        let xmean_1 = 1.0 - x * (1.0 - xsi / xsi.exp_m1());
        let xmean = (-self.tau).exp();
        if xmean_1 <= 0.999 * xmean {
            return UrbanLargeAngleDistribution::new(self.tau).sample(rng);
        }

        // Avoid the singular exponents of the tail normalization
        let c = if (xsi - 3.0).abs() < 0.001 {
            3.001
        } else if (xsi - 2.0).abs() < 0.001 {
            2.001
        } else {
            xsi
        };
        let b1 = 2.0 + (c - xsi) * x;
        let d = (c * x / b1).powf(c - 1.0);
        let x0 = 1.0 - xsi * x;
        let xmean_2 = (x0 + d - (c * x - b1 * d) / (c - 2.0)) / (1.0 - d);

        let prob = {
            let f2x0 = (c - 1.0) / (c * (1.0 - d));
            1.0 / (1.0 + 1.0 / (f2x0 * xsi.exp_m1()))
        };
        let qprob = xmean / (prob * xmean_1 + (1.0 - prob) * xmean_2);

        if generate_canonical(rng) >= qprob {
            return UniformRealDistribution::new(-1.0, 1.0).sample(rng);
        }
        if generate_canonical(rng) < prob {
            let inner = UniformRealDistribution::new((-xsi).exp(), 1.0).sample(rng);
            return (1.0 + inner.ln() * x).max(-1.0);
        }
        let var = (1.0 - d) * generate_canonical(rng);
        let costheta = if var < 0.01 * d {
            // Series expansion where the power form loses precision
            let var = var / (d * (c - 1.0));
            -1.0 + var * (1.0 - 0.5 * var * c) * (2.0 + (c - xsi) * x)
        } else {
            x * (c - xsi - c * (var + d).powf(-1.0 / (c - 1.0))) + 1.0
        };
        costheta.clamp(-1.0, 1.0)
    }

    /// Modified Highland width of the projected angular distribution.
    fn compute_theta0(&self, particle: &ParticleTrackView<'_>, material: &MaterialView<'_>) -> f64 {
        let mass = self.shared.electron_mass;
        let true_path = self.limit_min.max(self.true_path);
        let mut y = true_path / self.radiation_length;
        if particle.particle_id() == self.shared.ids.positron {
            let corrector = UrbanPositronCorrector::new(material.zeff().max(1.0));
            y *= corrector.evaluate((self.inc_energy * self.end_energy).sqrt() / mass);
        }
        debug_assert!(y > 0.0);

        let (e0, e1) = (self.inc_energy, self.end_energy);
        let invbetacp = ((e0 + mass) * (e1 + mass) / (e0 * (e0 + 2.0 * mass) * e1 * (e1 + 2.0 * mass))).sqrt();
        let mut theta0 = HIGHLAND * particle.charge().value().abs() * y.sqrt() * invbetacp;
        theta0 *= poly_eval(&self.msc.theta_coeff, y.ln());
        if self.true_path < self.limit_min {
            theta0 *= (self.true_path / self.limit_min).sqrt();
        }
        theta0.max(0.0)
    }

    /// Lateral direction around the azimuth, smeared by an exponential
    /// fitted to single-scattering results.
    fn sample_displacement_dir<R: Rng + ?Sized>(&self, rng: &mut R, phi: f64) -> Real3 {
        const CBETA: f64 = 2.160;
        const CBETA1: f64 = 0.9988703417569197;
        let psi = -(1.0 - generate_canonical(rng) * CBETA1).ln() / CBETA;
        let phi = if BernoulliDistribution::new(0.5).sample(rng) {
            phi + psi
        } else {
            phi - psi
        };
        rotate(&[phi.cos(), phi.sin(), 0.0], &self.inc_direction)
    }

    pub fn end_energy(&self) -> f64 {
        self.end_energy
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn theta0(&self) -> f64 {
        self.theta0
    }
}

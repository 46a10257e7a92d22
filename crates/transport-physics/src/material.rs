// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Materials
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Elements, isotopes and materials.
//!
//! Derived per-element quantities (cube roots, logarithms, Coulomb
//! correction, radiation-length terms) are computed once at setup.

use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use transport_math::Selector;
use transport_types::constants::{ALPHA_FINE_STRUCTURE, ATOMIC_MASS_UNIT, AVOGADRO, R_ELECTRON};
use transport_types::ids::{ElementComponentId, ElementId, IsotopeComponentId, MaterialId};
use transport_types::units::{AmuMass, MevMass};
use transport_types::{TransportError, TransportResult};

/// Radiation logarithms for light elements (Z = 1..4), Tsai table B.2
const LRAD_LIGHT: [f64; 4] = [5.31, 4.79, 4.74, 4.71];
const LRAD_PRIME_LIGHT: [f64; 4] = [6.144, 5.621, 5.805, 5.924];

/// Isotope of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsotopeRecord {
    /// Number of nucleons
    pub mass_number: u32,
    pub nuclear_mass: MevMass,
    /// Natural abundance (fraction)
    pub abundance: f64,
}

/// User-facing element definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementInput {
    pub atomic_number: u32,
    pub atomic_mass: AmuMass,
    #[serde(default)]
    pub isotopes: Vec<IsotopeRecord>,
}

/// Element with cached derived quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub atomic_number: u32,
    pub atomic_mass: AmuMass,
    pub isotopes: Vec<IsotopeRecord>,
    pub cbrt_z: f64,
    pub cbrt_zzp: f64,
    pub log_z: f64,
    pub coulomb_correction: f64,
    /// Radiation logarithm L_rad
    pub lrad: f64,
    /// Inelastic radiation logarithm L'_rad
    pub lrad_prime: f64,
}

impl ElementRecord {
    fn from_input(input: &ElementInput) -> Self {
        let z = input.atomic_number as f64;
        let cbrt_z = z.cbrt();
        let (lrad, lrad_prime) = if input.atomic_number <= 4 {
            let i = (input.atomic_number as usize).saturating_sub(1);
            (LRAD_LIGHT[i], LRAD_PRIME_LIGHT[i])
        } else {
            ((184.15 / cbrt_z).ln(), (1194.0 / (cbrt_z * cbrt_z)).ln())
        };
        ElementRecord {
            atomic_number: input.atomic_number,
            atomic_mass: input.atomic_mass,
            isotopes: input.isotopes.clone(),
            cbrt_z,
            cbrt_zzp: (z * (z + 1.0)).cbrt(),
            log_z: z.ln(),
            coulomb_correction: calc_coulomb_correction(input.atomic_number),
            lrad,
            lrad_prime,
        }
    }
}

/// Coulomb correction f_c(Z) (Davies, Bethe, Maximon).
pub fn calc_coulomb_correction(atomic_number: u32) -> f64 {
    let az2 = (ALPHA_FINE_STRUCTURE * atomic_number as f64).powi(2);
    let az4 = az2 * az2;
    az2 * (1.0 / (1.0 + az2) + 0.20206 - 0.0369 * az2 + 0.0083 * az4 - 0.002 * az2 * az4)
}

/// Element fraction within a material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatElementComponent {
    pub element: ElementId,
    /// Number fraction of atoms
    pub fraction: f64,
}

/// User-facing material definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialInput {
    pub name: String,
    /// Mass density (g/cm³)
    pub density: f64,
    pub components: Vec<MatElementComponent>,
}

/// Material with derived densities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub name: String,
    pub density: f64,
    /// Atoms per cm³
    pub number_density: f64,
    /// Electrons per cm³
    pub electron_density: f64,
    /// Radiation length (cm)
    pub radiation_length: f64,
    pub components: Vec<MatElementComponent>,
}

/// Owning element and material tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialParams {
    elements: Vec<ElementRecord>,
    materials: Vec<MaterialRecord>,
}

impl MaterialParams {
    pub fn new(elements: &[ElementInput], materials: &[MaterialInput]) -> TransportResult<Self> {
        let mut result = MaterialParams {
            elements: Vec::with_capacity(elements.len()),
            materials: Vec::with_capacity(materials.len()),
        };
        for el in elements {
            if el.atomic_number == 0 || el.atomic_number > 120 || el.atomic_mass.value() <= 0.0 {
                return Err(TransportError::invalid(
                    "elements",
                    format!("invalid element Z={} A={:?}", el.atomic_number, el.atomic_mass),
                ));
            }
            let total: f64 = el.isotopes.iter().map(|i| i.abundance).sum();
            if !el.isotopes.is_empty() && (total - 1.0).abs() > 1e-6 {
                return Err(TransportError::invalid(
                    "elements",
                    format!("isotope abundances of Z={} sum to {total}", el.atomic_number),
                ));
            }
            result.elements.push(ElementRecord::from_input(el));
        }
        for mat in materials {
            let record = result.build_material(mat)?;
            result.materials.push(record);
        }
        tracing::debug!(
            "Constructed {} elements and {} materials",
            result.elements.len(),
            result.materials.len()
        );
        Ok(result)
    }

    fn build_material(&self, input: &MaterialInput) -> TransportResult<MaterialRecord> {
        if input.components.is_empty() || !(input.density > 0.0) {
            return Err(TransportError::invalid(
                "materials",
                format!("'{}' needs a positive density and elements", input.name),
            ));
        }
        let total: f64 = input.components.iter().map(|c| c.fraction).sum();
        if input.components.iter().any(|c| c.fraction <= 0.0) || (total - 1.0).abs() > 1e-6 {
            return Err(TransportError::invalid(
                "materials",
                format!("'{}' fractions must be positive and sum to 1", input.name),
            ));
        }
        if let Some(c) = input.components.iter().find(|c| c.element.get() >= self.elements.len()) {
            return Err(TransportError::invalid(
                "materials",
                format!("'{}' references unknown element {}", input.name, c.element),
            ));
        }

        let mean_mass: f64 = input
            .components
            .iter()
            .map(|c| c.fraction * self.elements[c.element.get()].atomic_mass.value())
            .sum();
        let number_density = input.density * AVOGADRO / mean_mass;

        let mut electron_density = 0.0;
        let mut inv_rad_length = 0.0;
        for c in &input.components {
            let el = &self.elements[c.element.get()];
            let z = el.atomic_number as f64;
            let n = number_density * c.fraction;
            electron_density += n * z;
            inv_rad_length += n
                * 4.0
                * ALPHA_FINE_STRUCTURE
                * R_ELECTRON
                * R_ELECTRON
                * (z * z * (el.lrad - el.coulomb_correction) + z * el.lrad_prime);
        }

        Ok(MaterialRecord {
            name: input.name.clone(),
            density: input.density,
            number_density,
            electron_density,
            radiation_length: 1.0 / inv_rad_length,
            components: input.components.clone(),
        })
    }

    pub fn find_material(&self, name: &str) -> Option<MaterialId> {
        self.materials
            .iter()
            .position(|m| m.name == name)
            .map(MaterialId::new)
    }

    pub fn num_materials(&self) -> usize {
        self.materials.len()
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    pub fn element(&self, id: ElementId) -> ElementView<'_> {
        ElementView {
            id,
            record: &self.elements[id.get()],
        }
    }

    pub fn material(&self, id: MaterialId) -> MaterialView<'_> {
        MaterialView {
            id,
            params: self,
            record: &self.materials[id.get()],
        }
    }
}

/// Read-only view of one element.
#[derive(Debug, Clone, Copy)]
pub struct ElementView<'a> {
    id: ElementId,
    record: &'a ElementRecord,
}

impl<'a> ElementView<'a> {
    pub fn element_id(&self) -> ElementId {
        self.id
    }

    pub fn atomic_number(&self) -> u32 {
        self.record.atomic_number
    }

    pub fn atomic_mass(&self) -> AmuMass {
        self.record.atomic_mass
    }

    /// Mass of the element in MeV/c² (mean over isotopes).
    pub fn mass(&self) -> MevMass {
        MevMass::new(self.record.atomic_mass.value() * ATOMIC_MASS_UNIT)
    }

    pub fn cbrt_z(&self) -> f64 {
        self.record.cbrt_z
    }

    pub fn cbrt_zzp(&self) -> f64 {
        self.record.cbrt_zzp
    }

    pub fn log_z(&self) -> f64 {
        self.record.log_z
    }

    pub fn coulomb_correction(&self) -> f64 {
        self.record.coulomb_correction
    }

    pub fn record(&self) -> &'a ElementRecord {
        self.record
    }

    pub fn num_isotopes(&self) -> usize {
        self.record.isotopes.len()
    }

    pub fn isotope(&self, id: IsotopeComponentId) -> &'a IsotopeRecord {
        &self.record.isotopes[id.get()]
    }
}

/// Read-only view of one material.
#[derive(Debug, Clone, Copy)]
pub struct MaterialView<'a> {
    id: MaterialId,
    params: &'a MaterialParams,
    record: &'a MaterialRecord,
}

impl<'a> MaterialView<'a> {
    pub fn material_id(&self) -> MaterialId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.record.name
    }

    pub fn number_density(&self) -> f64 {
        self.record.number_density
    }

    pub fn electron_density(&self) -> f64 {
        self.record.electron_density
    }

    pub fn radiation_length(&self) -> f64 {
        self.record.radiation_length
    }

    pub fn num_elements(&self) -> usize {
        self.record.components.len()
    }

    pub fn elements(&self) -> &'a [MatElementComponent] {
        &self.record.components
    }

    pub fn element_id(&self, comp: ElementComponentId) -> ElementId {
        self.record.components[comp.get()].element
    }

    pub fn element_record(&self, comp: ElementComponentId) -> ElementView<'a> {
        self.params.element(self.element_id(comp))
    }

    /// Number density of one element component (atoms per cm³).
    pub fn element_density(&self, comp: ElementComponentId) -> f64 {
        self.record.number_density * self.record.components[comp.get()].fraction
    }

    /// Number-fraction weighted atomic number.
    pub fn zeff(&self) -> f64 {
        self.record
            .components
            .iter()
            .map(|c| c.fraction * self.params.element(c.element).atomic_number() as f64)
            .sum()
    }

    /// Number-fraction weighted mean of 1/A^(2/3), used for nuclear angle limits.
    pub fn inv_mass_cbrt_sq(&self) -> f64 {
        self.record
            .components
            .iter()
            .map(|c| {
                let a = self.params.element(c.element).atomic_mass().value();
                c.fraction / (a.cbrt() * a.cbrt())
            })
            .sum()
    }
}

/// Select an element component weighted by number density times a
/// per-element microscopic cross section.
pub struct ElementSelector<'a, F> {
    material: MaterialView<'a>,
    micro_xs: F,
}

impl<'a, F: Fn(ElementView<'a>) -> f64> ElementSelector<'a, F> {
    pub fn new(material: MaterialView<'a>, micro_xs: F) -> Self {
        ElementSelector { material, micro_xs }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ElementComponentId {
        let n = self.material.num_elements();
        if n == 1 {
            return ElementComponentId::new(0);
        }
        let weight = |i: usize| {
            let comp = ElementComponentId::new(i);
            self.material.element_density(comp) * (self.micro_xs)(self.material.element_record(comp))
        };
        ElementComponentId::new(Selector::with_total(weight, n).sample(rng))
    }
}

/// Select an isotope weighted by natural abundance.
#[derive(Debug, Clone, Copy)]
pub struct IsotopeSelector<'a> {
    element: ElementView<'a>,
}

impl<'a> IsotopeSelector<'a> {
    pub fn new(element: ElementView<'a>) -> Self {
        debug_assert!(element.num_isotopes() > 0, "element has no isotopes");
        IsotopeSelector { element }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> IsotopeComponentId {
        let isotopes = &self.element.record().isotopes;
        let select = Selector::new(|i| isotopes[i].abundance, isotopes.len(), 1.0);
        IsotopeComponentId::new(select.sample(rng))
    }
}

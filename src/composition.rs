// composition.rs
// IonVector math, salt composition resolution, and target translation.
// Everything downstream (solver, optimizer, reports) works in grams on
// vectors laid out in Ion::ALL order.

use crate::catalog::{CatalogError, Salt, YieldKind};
use crate::elements::Ion;
use crate::units;
use serde::{Deserialize, Serialize};

/// Dense per-ion vector in [`Ion::ALL`] order. Units depend on context:
/// grams of ion per gram of salt for compositions, grams for requirements
/// and deliveries, mg/L for concentration targets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IonVector([f64; Ion::COUNT]);

impl IonVector {
    pub const fn zero() -> Self {
        IonVector([0.0; Ion::COUNT])
    }

    pub fn from_entries(entries: &[(Ion, f64)]) -> Self {
        let mut v = IonVector::zero();
        for (ion, value) in entries {
            v.0[ion.index()] += value;
        }
        v
    }

    pub fn get(&self, ion: Ion) -> f64 {
        self.0[ion.index()]
    }

    pub fn set(&mut self, ion: Ion, value: f64) {
        self.0[ion.index()] = value;
    }

    pub fn as_array(&self) -> &[f64; Ion::COUNT] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ion, f64)> + '_ {
        Ion::ALL.iter().map(move |&ion| (ion, self.0[ion.index()]))
    }

    pub fn dot(&self, other: &IonVector) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Add `other * factor` component-wise.
    pub fn add_scaled(&mut self, other: &IonVector, factor: f64) {
        for (dst, src) in self.0.iter_mut().zip(other.0.iter()) {
            *dst += src * factor;
        }
    }

    pub fn scaled(&self, factor: f64) -> IonVector {
        let mut out = *self;
        for value in out.0.iter_mut() {
            *value *= factor;
        }
        out
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0.0)
    }

    /// True when no component asks for a positive amount, which lets the
    /// mix pipeline skip the solver entirely.
    pub fn has_no_demand(&self) -> bool {
        self.0.iter().all(|&v| v <= 0.0)
    }
}

/// Resolve a salt's stoichiometry into grams of each ion delivered per gram
/// of salt dissolved.
///
/// `MoleCount` entries follow mass-balance chemistry: a count of c ions per
/// formula unit yields c * atomic_weight / molar_mass grams per gram.
/// `MassFraction` entries (trace blends specified by datasheet) are already
/// grams per gram and pass through after a range check.
pub fn resolve_composition(salt: &Salt) -> Result<IonVector, CatalogError> {
    if salt.molar_mass <= 0.0 {
        return Err(CatalogError::NonPositiveMolarMass {
            id: salt.id.clone(),
            value: salt.molar_mass,
        });
    }
    let mut composition = IonVector::zero();
    for &(ion, count) in salt.stoichiometry.iter() {
        if count < 0.0 {
            return Err(CatalogError::NegativeCount {
                id: salt.id.clone(),
                symbol: ion.symbol(),
                count,
            });
        }
        if count == 0.0 {
            continue;
        }
        let grams_per_gram = match salt.yield_kind {
            YieldKind::MoleCount => count * ion.atomic_weight() / salt.molar_mass,
            YieldKind::MassFraction => {
                if count > 1.0 {
                    return Err(CatalogError::FractionTooLarge {
                        id: salt.id.clone(),
                        symbol: ion.symbol(),
                        count,
                    });
                }
                count
            }
        };
        composition.set(ion, composition.get(ion) + grams_per_gram);
    }
    Ok(composition)
}

/// Translate concentration targets (mg/L) into the total grams of each ion
/// the tank needs. Volume is floored to [`units::MIN_VOLUME_L`].
pub fn requirement_grams(targets_mg_l: &IonVector, volume_l: f64) -> IonVector {
    let mut requirement = IonVector::zero();
    for (ion, target) in targets_mg_l.iter() {
        requirement.set(ion, units::mg_per_l_to_grams(target, volume_l));
    }
    requirement
}

// catalog.rs
// Builtin fertilizer salt catalog, per-salt overrides, and the candidate
// list handed to the solver. The builtin table is immutable; overrides are
// merged into effective copies at read time and never written back.

use crate::composition::{resolve_composition, IonVector};
use crate::elements::Ion;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("salt '{id}': molar mass must be positive (got {value})")]
    NonPositiveMolarMass { id: String, value: f64 },
    #[error("salt '{id}': negative stoichiometric count {count} for {symbol}")]
    NegativeCount {
        id: String,
        symbol: &'static str,
        count: f64,
    },
    #[error("salt '{id}': mass fraction {count} for {symbol} exceeds 1.0")]
    FractionTooLarge {
        id: String,
        symbol: &'static str,
        count: f64,
    },
    #[error("override references unknown salt id '{0}'")]
    UnknownSalt(String),
}

/// How a salt's stoichiometry entries are interpreted.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum YieldKind {
    /// Entries are ions per formula unit; yield is count * AW / molar mass.
    #[default]
    MoleCount,
    /// Entries are grams of ion per gram of product, straight off a
    /// datasheet. Used for commercial trace blends.
    MassFraction,
}

/// Concentrated stock solutions are split in two so calcium never shares a
/// tank with sulfate or phosphate.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum TankGroup {
    A,
    B,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Salt {
    pub id: String,
    pub name: String,
    /// g/mol of the full formula unit, hydration water included.
    pub molar_mass: f64,
    pub stoichiometry: SmallVec<[(Ion, f64); 4]>,
    #[serde(default)]
    pub yield_kind: YieldKind,
    pub tank: TankGroup,
    pub cost_per_kg: f64,
    pub source_notes: String,
}

impl Salt {
    /// A salt that only supplies micronutrients. These are excluded from the
    /// candidate list when the caller plans to dose traces separately.
    pub fn is_micronutrient_only(&self) -> bool {
        !self.stoichiometry.is_empty()
            && self
                .stoichiometry
                .iter()
                .all(|(ion, _)| ion.is_micronutrient())
    }

    /// Copy of this salt with override fields applied; the receiver is not
    /// modified.
    pub fn with_override(&self, ov: &SaltOverride) -> Salt {
        let mut salt = self.clone();
        if let Some(molar_mass) = ov.molar_mass {
            salt.molar_mass = molar_mass;
        }
        if let Some(cost_per_kg) = ov.cost_per_kg {
            salt.cost_per_kg = cost_per_kg;
        }
        salt
    }
}

/// User correction for one catalog salt, e.g. a product-specific molar mass
/// or a local price. Absent fields keep the builtin value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SaltOverride {
    #[serde(default)]
    pub molar_mass: Option<f64>,
    #[serde(default)]
    pub cost_per_kg: Option<f64>,
}

/// Overrides keyed by salt id.
pub type OverrideMap = HashMap<String, SaltOverride>;

/// One solver input: an effective salt with its composition resolved.
#[derive(Clone, Debug, Serialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub molar_mass: f64,
    pub cost_per_kg: f64,
    pub tank: TankGroup,
    /// Grams of each ion per gram of this salt.
    pub composition: IonVector,
}

impl Candidate {
    pub fn cost_per_gram(&self) -> f64 {
        self.cost_per_kg / crate::units::G_PER_KG
    }
}

/// Build the candidate list in catalog order: merge overrides, optionally
/// drop micronutrient-only salts, and resolve every composition up front so
/// bad data fails here instead of inside the solver.
pub fn candidates(
    catalog: &[Salt],
    overrides: &OverrideMap,
    include_micros: bool,
) -> Result<Vec<Candidate>, CatalogError> {
    for id in overrides.keys() {
        if !catalog.iter().any(|salt| salt.id == *id) {
            return Err(CatalogError::UnknownSalt(id.clone()));
        }
    }

    let mut out = Vec::with_capacity(catalog.len());
    for salt in catalog {
        if !include_micros && salt.is_micronutrient_only() {
            continue;
        }
        let effective = match overrides.get(&salt.id) {
            Some(ov) => salt.with_override(ov),
            None => salt.clone(),
        };
        let composition = resolve_composition(&effective)?;
        out.push(Candidate {
            id: effective.id,
            name: effective.name,
            molar_mass: effective.molar_mass,
            cost_per_kg: effective.cost_per_kg,
            tank: effective.tank,
            composition,
        });
    }
    Ok(out)
}

fn salt(
    id: &str,
    name: &str,
    molar_mass: f64,
    stoichiometry: &[(Ion, f64)],
    tank: TankGroup,
    cost_per_kg: f64,
    source_notes: &str,
) -> Salt {
    Salt {
        id: id.to_string(),
        name: name.to_string(),
        molar_mass,
        stoichiometry: stoichiometry.iter().copied().collect(),
        yield_kind: YieldKind::MoleCount,
        tank,
        cost_per_kg,
        source_notes: source_notes.to_string(),
    }
}

fn blend(
    id: &str,
    name: &str,
    molar_mass: f64,
    fractions: &[(Ion, f64)],
    tank: TankGroup,
    cost_per_kg: f64,
    source_notes: &str,
) -> Salt {
    Salt {
        yield_kind: YieldKind::MassFraction,
        ..salt(id, name, molar_mass, fractions, tank, cost_per_kg, source_notes)
    }
}

/// Builtin catalog. Order is load-bearing: candidate indices, elimination
/// scan order, and therefore tie-breaks between equally priced salts all
/// follow it.
pub static SALT_CATALOG: Lazy<Vec<Salt>> = Lazy::new(|| {
    vec![
        salt(
            "ca_no3_4h2o",
            "Calcium nitrate tetrahydrate (Ca(NO3)2·4H2O)",
            236.15,
            &[(Ion::Ca, 1.0), (Ion::N, 2.0)],
            TankGroup::A,
            1.8,
            "Common horticultural grade; check product label for water of crystallization.",
        ),
        salt(
            "k_no3",
            "Potassium nitrate (KNO3)",
            101.1032,
            &[(Ion::K, 1.0), (Ion::N, 1.0)],
            TankGroup::A,
            1.2,
            "Widely available; high solubility.",
        ),
        salt(
            "map",
            "Monoammonium phosphate (NH4H2PO4)",
            115.027,
            &[(Ion::N, 1.0), (Ion::P, 1.0)],
            TankGroup::B,
            0.9,
            "Acidifying phosphate source; may lower pH.",
        ),
        salt(
            "kh2po4",
            "Potassium dihydrogen phosphate (KH2PO4)",
            136.086,
            &[(Ion::K, 1.0), (Ion::P, 1.0)],
            TankGroup::B,
            1.1,
            "Good P and K source, can acidify solution.",
        ),
        salt(
            "k2so4",
            "Potassium sulfate (K2SO4)",
            174.259,
            &[(Ion::K, 2.0), (Ion::S, 1.0)],
            TankGroup::B,
            0.8,
            "Sulfate source; keep away from Ca in concentrated mixes.",
        ),
        salt(
            "mg_so4_7h2o",
            "Magnesium sulfate heptahydrate (MgSO4·7H2O)",
            246.474,
            &[(Ion::Mg, 1.0), (Ion::S, 1.0)],
            TankGroup::B,
            0.6,
            "Epsom salt; highly soluble.",
        ),
        salt(
            "mg_no3_6h2o",
            "Magnesium nitrate hexahydrate (Mg(NO3)2·6H2O)",
            256.41,
            &[(Ion::Mg, 1.0), (Ion::N, 2.0)],
            TankGroup::A,
            2.0,
            "Useful when more nitrate is desired.",
        ),
        salt(
            "urea",
            "Urea (CO(NH2)2)",
            60.055,
            &[(Ion::N, 2.0)],
            TankGroup::A,
            0.7,
            "Non-ionic; requires conversion to nitrate/ammonium, use with caution in hydroponics.",
        ),
        salt(
            "ammonium_sulfate",
            "Ammonium sulfate ((NH4)2SO4)",
            132.14,
            &[(Ion::N, 2.0), (Ion::S, 1.0)],
            TankGroup::B,
            0.65,
            "Acidifying; provides sulfate.",
        ),
        salt(
            "kcl",
            "Potassium chloride (KCl)",
            74.5513,
            &[(Ion::K, 1.0)],
            TankGroup::A,
            0.5,
            "Cheap K source but adds chloride, useful if chloride tolerance is high.",
        ),
        salt(
            "ca_cl2",
            "Calcium chloride (CaCl2)",
            110.98,
            &[(Ion::Ca, 1.0)],
            TankGroup::A,
            0.9,
            "Highly soluble; provides quick Ca but also chloride.",
        ),
        salt(
            "ssp",
            "Single superphosphate (SSP)",
            300.0,
            &[(Ion::P, 1.0), (Ion::Ca, 1.0), (Ion::S, 1.0)],
            TankGroup::B,
            0.4,
            "Variable composition, use product datasheet to set exact P content.",
        ),
        salt(
            "tsp",
            "Triple superphosphate (TSP)",
            252.0,
            &[(Ion::P, 1.0)],
            TankGroup::B,
            0.6,
            "Concentrated P source; often granular, dissolution rate varies.",
        ),
        salt(
            "fe_edta",
            "Fe-EDTA (iron chelate)",
            367.9,
            &[(Ion::Fe, 1.0)],
            TankGroup::B,
            18.0,
            "Common chelate; stable at pH up to about 6.5. Check product label for %Fe.",
        ),
        salt(
            "fe_dtpa",
            "Fe-DTPA (iron chelate)",
            404.0,
            &[(Ion::Fe, 1.0)],
            TankGroup::B,
            22.0,
            "More stable than EDTA up to pH about 7.5; good for slightly alkaline water.",
        ),
        salt(
            "fe_eddha",
            "Fe-EDDHA (iron chelate)",
            600.0,
            &[(Ion::Fe, 1.0)],
            TankGroup::B,
            45.0,
            "Most stable chelate for high-pH solutions (pH 7-9); often used in alkaline soils.",
        ),
        salt(
            "zn_edta",
            "Zn-EDTA (zinc chelate)",
            349.5,
            &[(Ion::Zn, 1.0)],
            TankGroup::B,
            10.0,
            "Chelated zinc; better retention than sulfate at neutral pH.",
        ),
        salt(
            "mn_edta",
            "Mn-EDTA (manganese chelate)",
            331.0,
            &[(Ion::Mn, 1.0)],
            TankGroup::B,
            9.0,
            "Chelated manganese; prevents precipitation with phosphates.",
        ),
        salt(
            "zn_so4",
            "Zinc sulfate (ZnSO4)",
            161.47,
            &[(Ion::Zn, 1.0)],
            TankGroup::B,
            6.0,
            "Inexpensive but less stable in alkaline conditions.",
        ),
        salt(
            "cu_so4",
            "Copper sulfate (CuSO4)",
            159.61,
            &[(Ion::Cu, 1.0)],
            TankGroup::B,
            7.0,
            "Useful but phytotoxic if overdosed.",
        ),
        salt(
            "mn_so4",
            "Manganese sulfate (MnSO4)",
            169.01,
            &[(Ion::Mn, 1.0)],
            TankGroup::B,
            6.5,
            "Inexpensive source of Mn; can precipitate with phosphates at high concentration.",
        ),
        salt(
            "boric_acid",
            "Boric acid (H3BO3)",
            61.83,
            &[(Ion::B, 1.0)],
            TankGroup::B,
            4.0,
            "Primary B source; low solubility but sufficient for ppm-level dosing.",
        ),
        salt(
            "na2mo",
            "Sodium molybdate (Na2MoO4)",
            205.95,
            &[(Ion::Mo, 1.0)],
            TankGroup::B,
            30.0,
            "Mo required at very low ppm; use sparingly.",
        ),
        blend(
            "trace_mix",
            "Trace element mix (commercial concentrate)",
            100.0,
            &[
                (Ion::Fe, 0.15),
                (Ion::Mn, 0.05),
                (Ion::Zn, 0.03),
                (Ion::Cu, 0.01),
                (Ion::B, 0.03),
                (Ion::Mo, 0.005),
            ],
            TankGroup::B,
            25.0,
            "Commercial trace mixes vary; enter datasheet values for accuracy.",
        ),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    #[test]
    fn builtin_catalog_shape() {
        assert_eq!(SALT_CATALOG.len(), 24);
        let ids: HashSet<&str> = SALT_CATALOG.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), SALT_CATALOG.len(), "duplicate salt ids");
        assert_eq!(SALT_CATALOG[0].id, "ca_no3_4h2o");
        assert_eq!(SALT_CATALOG[SALT_CATALOG.len() - 1].id, "trace_mix");
    }

    #[test]
    fn trace_blend_is_mass_fraction_and_under_unity() {
        let trace = SALT_CATALOG.iter().find(|s| s.id == "trace_mix").unwrap();
        assert_eq!(trace.yield_kind, YieldKind::MassFraction);
        let total: f64 = trace.stoichiometry.iter().map(|(_, f)| f).sum();
        assert!(total <= 1.0, "fractions sum to {total}");
    }

    #[test]
    fn micronutrient_only_detection() {
        let trace = SALT_CATALOG.iter().find(|s| s.id == "trace_mix").unwrap();
        assert!(trace.is_micronutrient_only());
        let kno3 = SALT_CATALOG.iter().find(|s| s.id == "k_no3").unwrap();
        assert!(!kno3.is_micronutrient_only());
        // SSP carries macro ions alongside Ca, so it stays in
        let ssp = SALT_CATALOG.iter().find(|s| s.id == "ssp").unwrap();
        assert!(!ssp.is_micronutrient_only());
    }

    #[test]
    fn candidate_list_respects_micro_filter_and_order() {
        let all = candidates(&SALT_CATALOG, &OverrideMap::new(), true).unwrap();
        assert_eq!(all.len(), 24);

        let macros_only = candidates(&SALT_CATALOG, &OverrideMap::new(), false).unwrap();
        assert_eq!(macros_only.len(), 13);
        assert!(macros_only.iter().all(|c| c.id != "trace_mix"));
        assert!(macros_only.iter().any(|c| c.id == "ssp"));

        // Relative order follows the catalog
        let positions: Vec<usize> = macros_only
            .iter()
            .map(|c| {
                SALT_CATALOG
                    .iter()
                    .position(|s| s.id == c.id)
                    .unwrap()
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn overrides_merge_without_mutating_builtins() {
        let mut overrides = OverrideMap::new();
        overrides.insert(
            "k_no3".to_string(),
            SaltOverride {
                molar_mass: None,
                cost_per_kg: Some(9.9),
            },
        );
        overrides.insert(
            "kh2po4".to_string(),
            SaltOverride {
                molar_mass: Some(140.0),
                cost_per_kg: None,
            },
        );

        let list = candidates(&SALT_CATALOG, &overrides, true).unwrap();
        let kno3 = list.iter().find(|c| c.id == "k_no3").unwrap();
        assert_relative_eq!(kno3.cost_per_kg, 9.9);
        let kh2po4 = list.iter().find(|c| c.id == "kh2po4").unwrap();
        assert_relative_eq!(kh2po4.composition.get(Ion::K), 39.0983 / 140.0);

        // Builtins untouched
        let builtin_kno3 = SALT_CATALOG.iter().find(|s| s.id == "k_no3").unwrap();
        assert_relative_eq!(builtin_kno3.cost_per_kg, 1.2);
        let builtin_kh2po4 = SALT_CATALOG.iter().find(|s| s.id == "kh2po4").unwrap();
        assert_relative_eq!(builtin_kh2po4.molar_mass, 136.086);
    }

    #[test]
    fn same_overrides_give_same_candidates() {
        let mut overrides = OverrideMap::new();
        overrides.insert(
            "mg_so4_7h2o".to_string(),
            SaltOverride {
                molar_mass: Some(250.0),
                cost_per_kg: Some(0.7),
            },
        );
        let a = candidates(&SALT_CATALOG, &overrides, false).unwrap();
        let b = candidates(&SALT_CATALOG, &overrides, false).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.composition, y.composition);
            assert_eq!(x.cost_per_kg, y.cost_per_kg);
        }
    }

    #[test]
    fn unknown_override_id_is_rejected() {
        let mut overrides = OverrideMap::new();
        overrides.insert("unobtainium".to_string(), SaltOverride::default());
        let err = candidates(&SALT_CATALOG, &overrides, true).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownSalt(id) if id == "unobtainium"));
    }

    #[test]
    fn bad_override_molar_mass_fails_resolution() {
        let mut overrides = OverrideMap::new();
        overrides.insert(
            "k_no3".to_string(),
            SaltOverride {
                molar_mass: Some(0.0),
                cost_per_kg: None,
            },
        );
        let err = candidates(&SALT_CATALOG, &overrides, true).unwrap_err();
        assert!(matches!(err, CatalogError::NonPositiveMolarMass { id, .. } if id == "k_no3"));
    }

    #[test]
    fn tank_groups_split_calcium_from_sulfate_and_phosphate() {
        for salt in SALT_CATALOG.iter() {
            let has_ca = salt.stoichiometry.iter().any(|&(i, c)| i == Ion::Ca && c > 0.0);
            if has_ca && salt.id != "ssp" {
                assert_eq!(salt.tank, TankGroup::A, "{} should sit in tank A", salt.id);
            }
        }
        let k2so4 = SALT_CATALOG.iter().find(|s| s.id == "k2so4").unwrap();
        assert_eq!(k2so4.tank, TankGroup::B);
    }

    #[test]
    fn cost_per_gram_is_cost_per_kg_scaled() {
        let list = candidates(&SALT_CATALOG, &OverrideMap::new(), true).unwrap();
        let kno3 = list.iter().find(|c| c.id == "k_no3").unwrap();
        assert_relative_eq!(kno3.cost_per_gram(), 1.2 / 1000.0);
    }
}

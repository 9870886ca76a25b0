// elements.rs
// The tracked nutrient ions and their standard atomic weights

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Ion {
    N,
    P,
    K,
    Ca,
    Mg,
    S,
    Fe,
    B,
    Mn,
    Zn,
    Cu,
    Mo,
}

impl Ion {
    pub const COUNT: usize = 12;

    /// Canonical ordering. Vectors indexed by ion use this order everywhere,
    /// and catalog scans walk it left to right.
    pub const ALL: [Ion; Ion::COUNT] = [
        Ion::N,
        Ion::P,
        Ion::K,
        Ion::Ca,
        Ion::Mg,
        Ion::S,
        Ion::Fe,
        Ion::B,
        Ion::Mn,
        Ion::Zn,
        Ion::Cu,
        Ion::Mo,
    ];

    /// Position of this ion in [`Ion::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Ion::N => 0,
            Ion::P => 1,
            Ion::K => 2,
            Ion::Ca => 3,
            Ion::Mg => 4,
            Ion::S => 5,
            Ion::Fe => 6,
            Ion::B => 7,
            Ion::Mn => 8,
            Ion::Zn => 9,
            Ion::Cu => 10,
            Ion::Mo => 11,
        }
    }

    /// Standard atomic weight in g/mol (IUPAC 2021 values).
    pub fn atomic_weight(&self) -> f64 {
        match self {
            Ion::N => 14.0067,
            Ion::P => 30.973761,
            Ion::K => 39.0983,
            Ion::Ca => 40.078,
            Ion::Mg => 24.305,
            Ion::S => 32.065,
            Ion::Fe => 55.845,
            Ion::B => 10.811,
            Ion::Mn => 54.938045,
            Ion::Zn => 65.38,
            Ion::Cu => 63.546,
            Ion::Mo => 95.95,
        }
    }

    /// Micronutrients are dosed at ppm level and typically supplied by
    /// chelates or trace blends rather than bulk fertilizer salts.
    pub fn is_micronutrient(&self) -> bool {
        matches!(
            self,
            Ion::Fe | Ion::B | Ion::Mn | Ion::Zn | Ion::Cu | Ion::Mo
        )
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Ion::N => "N",
            Ion::P => "P",
            Ion::K => "K",
            Ion::Ca => "Ca",
            Ion::Mg => "Mg",
            Ion::S => "S",
            Ion::Fe => "Fe",
            Ion::B => "B",
            Ion::Mn => "Mn",
            Ion::Zn => "Zn",
            Ion::Cu => "Cu",
            Ion::Mo => "Mo",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Ion> {
        Ion::ALL.iter().copied().find(|ion| ion.symbol() == symbol)
    }
}

impl fmt::Display for Ion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

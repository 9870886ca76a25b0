//! Unit definitions and conversions.
//!
//! Base units:
//! - Mass: gram (g)
//! - Volume: liter (L)
//! - Concentration: milligram per liter (mg/L, equivalent to ppm in water)
//! - Cost: currency units per kilogram of salt

/// Milligrams in one gram.
pub const MG_PER_G: f64 = 1_000.0;
/// Grams in one kilogram.
pub const G_PER_KG: f64 = 1_000.0;
/// Smallest tank volume used in any volume-scaled computation.
/// Requirements and per-liter readouts both divide by volume, so the
/// floor is applied here once instead of at every call site.
pub const MIN_VOLUME_L: f64 = 1.0;

/// Tank volume with the floor applied.
pub fn effective_volume(volume_l: f64) -> f64 {
    volume_l.max(MIN_VOLUME_L)
}

/// Convert a concentration target into a total mass requirement.
/// mg/L times liters gives milligrams; divide by 1000 for grams.
pub fn mg_per_l_to_grams(target_mg_l: f64, volume_l: f64) -> f64 {
    target_mg_l * effective_volume(volume_l) / MG_PER_G
}

/// Convert a dissolved mass back into a concentration readout.
pub fn grams_to_mg_per_l(grams: f64, volume_l: f64) -> f64 {
    grams * MG_PER_G / effective_volume(volume_l)
}

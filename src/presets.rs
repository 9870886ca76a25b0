// presets.rs
// Builtin crop target profiles in mg/L. Values are middle-of-road
// recirculating-hydroponics numbers; growers tune from here.

use crate::composition::IonVector;
use crate::elements::Ion;
use once_cell::sync::Lazy;

/// Name/targets pairs in menu order.
pub static CROP_PRESETS: Lazy<Vec<(&'static str, IonVector)>> = Lazy::new(|| {
    vec![
        (
            "Lettuce",
            IonVector::from_entries(&[
                (Ion::N, 150.0),
                (Ion::P, 40.0),
                (Ion::K, 200.0),
                (Ion::Ca, 160.0),
                (Ion::Mg, 40.0),
                (Ion::S, 60.0),
                (Ion::Fe, 2.0),
                (Ion::B, 0.5),
                (Ion::Mn, 0.5),
                (Ion::Zn, 0.05),
                (Ion::Cu, 0.05),
                (Ion::Mo, 0.05),
            ]),
        ),
        (
            "Tomato",
            IonVector::from_entries(&[
                (Ion::N, 200.0),
                (Ion::P, 50.0),
                (Ion::K, 300.0),
                (Ion::Ca, 200.0),
                (Ion::Mg, 50.0),
                (Ion::S, 80.0),
                (Ion::Fe, 2.5),
                (Ion::B, 0.4),
                (Ion::Mn, 0.5),
                (Ion::Zn, 0.1),
                (Ion::Cu, 0.05),
                (Ion::Mo, 0.05),
            ]),
        ),
        (
            "Strawberry",
            IonVector::from_entries(&[
                (Ion::N, 160.0),
                (Ion::P, 50.0),
                (Ion::K, 250.0),
                (Ion::Ca, 180.0),
                (Ion::Mg, 60.0),
                (Ion::S, 80.0),
                (Ion::Fe, 2.0),
                (Ion::B, 0.6),
                (Ion::Mn, 0.6),
                (Ion::Zn, 0.06),
                (Ion::Cu, 0.04),
                (Ion::Mo, 0.05),
            ]),
        ),
        (
            "Cucumber",
            IonVector::from_entries(&[
                (Ion::N, 180.0),
                (Ion::P, 45.0),
                (Ion::K, 250.0),
                (Ion::Ca, 170.0),
                (Ion::Mg, 45.0),
                (Ion::S, 70.0),
                (Ion::Fe, 2.0),
                (Ion::B, 0.5),
                (Ion::Mn, 0.5),
                (Ion::Zn, 0.06),
                (Ion::Cu, 0.04),
                (Ion::Mo, 0.03),
            ]),
        ),
        (
            "Pepper",
            IonVector::from_entries(&[
                (Ion::N, 180.0),
                (Ion::P, 50.0),
                (Ion::K, 280.0),
                (Ion::Ca, 190.0),
                (Ion::Mg, 50.0),
                (Ion::S, 75.0),
                (Ion::Fe, 2.2),
                (Ion::B, 0.5),
                (Ion::Mn, 0.5),
                (Ion::Zn, 0.06),
                (Ion::Cu, 0.04),
                (Ion::Mo, 0.04),
            ]),
        ),
        (
            "Basil",
            IonVector::from_entries(&[
                (Ion::N, 160.0),
                (Ion::P, 40.0),
                (Ion::K, 200.0),
                (Ion::Ca, 150.0),
                (Ion::Mg, 40.0),
                (Ion::S, 60.0),
                (Ion::Fe, 1.8),
                (Ion::B, 0.4),
                (Ion::Mn, 0.4),
                (Ion::Zn, 0.04),
                (Ion::Cu, 0.03),
                (Ion::Mo, 0.02),
            ]),
        ),
        (
            "Spinach",
            IonVector::from_entries(&[
                (Ion::N, 180.0),
                (Ion::P, 50.0),
                (Ion::K, 220.0),
                (Ion::Ca, 170.0),
                (Ion::Mg, 45.0),
                (Ion::S, 70.0),
                (Ion::Fe, 3.0),
                (Ion::B, 0.6),
                (Ion::Mn, 0.6),
                (Ion::Zn, 0.08),
                (Ion::Cu, 0.05),
                (Ion::Mo, 0.06),
            ]),
        ),
        (
            "CannabisVeg",
            IonVector::from_entries(&[
                (Ion::N, 180.0),
                (Ion::P, 50.0),
                (Ion::K, 250.0),
                (Ion::Ca, 170.0),
                (Ion::Mg, 50.0),
                (Ion::S, 80.0),
                (Ion::Fe, 2.5),
                (Ion::B, 0.5),
                (Ion::Mn, 0.5),
                (Ion::Zn, 0.06),
                (Ion::Cu, 0.04),
                (Ion::Mo, 0.05),
            ]),
        ),
        (
            "CannabisBloom",
            IonVector::from_entries(&[
                (Ion::N, 120.0),
                (Ion::P, 60.0),
                (Ion::K, 300.0),
                (Ion::Ca, 160.0),
                (Ion::Mg, 60.0),
                (Ion::S, 90.0),
                (Ion::Fe, 2.5),
                (Ion::B, 0.6),
                (Ion::Mn, 0.6),
                (Ion::Zn, 0.06),
                (Ion::Cu, 0.04),
                (Ion::Mo, 0.05),
            ]),
        ),
    ]
});

pub fn preset_targets(name: &str) -> Option<&'static IonVector> {
    CROP_PRESETS
        .iter()
        .find(|(preset_name, _)| *preset_name == name)
        .map(|(_, targets)| targets)
}

pub fn preset_names() -> Vec<&'static str> {
    CROP_PRESETS.iter().map(|(name, _)| *name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_presets_in_menu_order() {
        let names = preset_names();
        assert_eq!(names.len(), 9);
        assert_eq!(names[0], "Lettuce");
        assert_eq!(names[8], "CannabisBloom");
    }

    #[test]
    fn lookup_is_exact_match() {
        assert!(preset_targets("Tomato").is_some());
        assert!(preset_targets("tomato").is_none());
        assert!(preset_targets("Orchid").is_none());
    }

    #[test]
    fn all_targets_are_positive_and_complete() {
        for (name, targets) in CROP_PRESETS.iter() {
            for (ion, mg_l) in targets.iter() {
                assert!(mg_l > 0.0, "{name} has non-positive target for {ion}");
            }
        }
    }

    #[test]
    fn bloom_profile_shifts_nitrogen_down_and_potassium_up() {
        let veg = preset_targets("CannabisVeg").unwrap();
        let bloom = preset_targets("CannabisBloom").unwrap();
        assert!(bloom.get(Ion::N) < veg.get(Ion::N));
        assert!(bloom.get(Ion::K) > veg.get(Ion::K));
        assert!(bloom.get(Ion::P) > veg.get(Ion::P));
    }
}

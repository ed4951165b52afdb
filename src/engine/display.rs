// Copyright 2023 Remi Bernotavicius

use super::convert::{
    from_base_unit, GRAMS_PER_POUND, ML_PER_CUP, ML_PER_TABLESPOON, ML_PER_TEASPOON,
};
use super::Family;
use crate::database::models::{Unit, UnitSystem};

/// A base-unit quantity re-expressed in a human-legible unit. `unit` is
/// `None` when no conversion applies (identity-only family, or a catalog
/// with no convertible unit for the family) and the caller should keep the
/// quantity in whatever unit it already had.
#[derive(Debug)]
pub struct DisplayQuantity<'a> {
    pub quantity: f64,
    pub unit: Option<&'a Unit>,
}

/// One step of a display cascade: use `unit_name` once the base quantity
/// reaches `min_base` (grams or milliliters). Rungs are ordered largest
/// unit first and the last rung of every cascade has a zero threshold.
struct Rung {
    unit_name: &'static str,
    min_base: f64,
    inclusive: bool,
}

const US_VOLUME: [Rung; 5] = [
    Rung {
        unit_name: "Gallon",
        min_base: 4.0 * ML_PER_CUP,
        inclusive: true,
    },
    Rung {
        unit_name: "Cup",
        min_base: ML_PER_CUP,
        inclusive: true,
    },
    Rung {
        unit_name: "Fluid Ounce",
        min_base: 2.0 * ML_PER_TABLESPOON,
        inclusive: false,
    },
    Rung {
        unit_name: "Tablespoon",
        min_base: 3.0 * ML_PER_TEASPOON,
        inclusive: false,
    },
    Rung {
        unit_name: "Teaspoon",
        min_base: 0.0,
        inclusive: true,
    },
];

const METRIC_VOLUME: [Rung; 2] = [
    Rung {
        unit_name: "Liter",
        min_base: 1000.0,
        inclusive: true,
    },
    Rung {
        unit_name: "Milliliter",
        min_base: 0.0,
        inclusive: true,
    },
];

const US_WEIGHT: [Rung; 2] = [
    Rung {
        unit_name: "Pound",
        min_base: GRAMS_PER_POUND,
        inclusive: true,
    },
    Rung {
        unit_name: "Ounce",
        min_base: 0.0,
        inclusive: true,
    },
];

const METRIC_WEIGHT: [Rung; 3] = [
    Rung {
        unit_name: "Kilogram",
        min_base: 1000.0,
        inclusive: true,
    },
    Rung {
        unit_name: "Gram",
        min_base: 1.0,
        inclusive: true,
    },
    Rung {
        unit_name: "Milligram",
        min_base: 0.0,
        inclusive: true,
    },
];

fn cascade(family: Family, system: UnitSystem) -> &'static [Rung] {
    match (family, system) {
        (Family::Volume, UnitSystem::UsCustomary) => &US_VOLUME,
        (Family::Volume, _) => &METRIC_VOLUME,
        (Family::Weight, UnitSystem::UsCustomary) => &US_WEIGHT,
        (Family::Weight, _) => &METRIC_WEIGHT,
        (Family::Item | Family::Temperature, _) => &[],
    }
}

/// Pick the unit a cook would naturally read `base_quantity` (grams or
/// milliliters) in, preferring `system`. This never fails: a rung whose unit
/// is missing from the catalog is skipped, and if the whole cascade comes up
/// empty the smallest convertible unit of the family is used regardless of
/// system, so display degrades rather than erroring.
pub fn select_display_unit<'a>(
    base_quantity: f64,
    family: Family,
    system: UnitSystem,
    catalog: &'a [Unit],
) -> DisplayQuantity<'a> {
    let find_unit = |name: &str| {
        catalog.iter().find(|u| {
            Family::from(u.category) == family
                && u.base_conversion_factor.is_some()
                && u.name.eq_ignore_ascii_case(name)
        })
    };

    for rung in cascade(family, system) {
        let reached = if rung.inclusive {
            base_quantity >= rung.min_base
        } else {
            base_quantity > rung.min_base
        };
        if !reached {
            continue;
        }
        if let Some(unit) = find_unit(rung.unit_name) {
            if let Ok(quantity) = from_base_unit(base_quantity, unit) {
                return DisplayQuantity {
                    quantity,
                    unit: Some(unit),
                };
            }
        }
    }

    let smallest = catalog
        .iter()
        .filter(|u| Family::from(u.category) == family)
        .filter_map(|u| u.base_conversion_factor.map(|f| (u, f)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b));
    if let Some((unit, factor)) = smallest {
        return DisplayQuantity {
            quantity: base_quantity / factor,
            unit: Some(unit),
        };
    }

    DisplayQuantity {
        quantity: base_quantity,
        unit: None,
    }
}

#[cfg(test)]
use super::test_fixtures::assert_close;

#[cfg(test)]
fn display(base_quantity: f64, family: Family, system: UnitSystem) -> (f64, String) {
    let catalog = crate::import::standard_units();
    let selected = select_display_unit(base_quantity, family, system, &catalog);
    (
        selected.quantity,
        selected.unit.map(|u| u.name.clone()).unwrap_or_default(),
    )
}

#[test]
fn us_volume_thresholds() {
    use Family::Volume;
    use UnitSystem::UsCustomary;

    // Exactly three teaspoons still reads as teaspoons; past it, tablespoons.
    let (q, u) = display(3.0 * ML_PER_TEASPOON, Volume, UsCustomary);
    assert_eq!(u, "Teaspoon");
    assert_close(q, 3.0);
    let (q, u) = display(3.01 * ML_PER_TEASPOON, Volume, UsCustomary);
    assert_eq!(u, "Tablespoon");
    assert_close(q, 3.01 / 3.0);

    // Exactly two tablespoons is still tablespoons; past it, fluid ounces.
    let (q, u) = display(2.0 * ML_PER_TABLESPOON, Volume, UsCustomary);
    assert_eq!(u, "Tablespoon");
    assert_close(q, 2.0);
    let (_, u) = display(2.01 * ML_PER_TABLESPOON, Volume, UsCustomary);
    assert_eq!(u, "Fluid Ounce");

    // Eight fluid ounces worth is a cup, four cups worth a gallon.
    let (q, u) = display(ML_PER_CUP, Volume, UsCustomary);
    assert_eq!(u, "Cup");
    assert_close(q, 1.0);
    let (q, u) = display(4.0 * ML_PER_CUP, Volume, UsCustomary);
    assert_eq!(u, "Gallon");
    assert_close(q, 0.25);
}

#[test]
fn metric_volume_thresholds() {
    let (q, u) = display(999.0, Family::Volume, UnitSystem::Metric);
    assert_eq!(u, "Milliliter");
    assert_close(q, 999.0);
    let (q, u) = display(1000.0, Family::Volume, UnitSystem::Metric);
    assert_eq!(u, "Liter");
    assert_close(q, 1.0);
}

#[test]
fn weight_thresholds() {
    let (q, u) = display(GRAMS_PER_POUND, Family::Weight, UnitSystem::UsCustomary);
    assert_eq!(u, "Pound");
    assert_close(q, 1.0);
    let (q, u) = display(GRAMS_PER_POUND / 2.0, Family::Weight, UnitSystem::UsCustomary);
    assert_eq!(u, "Ounce");
    assert_close(q, 8.0);

    let (q, u) = display(1500.0, Family::Weight, UnitSystem::Metric);
    assert_eq!(u, "Kilogram");
    assert_close(q, 1.5);
    let (_, u) = display(42.0, Family::Weight, UnitSystem::Metric);
    assert_eq!(u, "Gram");
    let (q, u) = display(0.5, Family::Weight, UnitSystem::Metric);
    assert_eq!(u, "Milligram");
    assert_close(q, 500.0);
}

#[test]
fn missing_system_falls_back_to_smallest_family_unit() {
    let catalog: Vec<_> = crate::import::standard_units()
        .into_iter()
        .filter(|u| u.system == UnitSystem::Metric)
        .collect();
    let selected = select_display_unit(
        10.0,
        Family::Volume,
        UnitSystem::UsCustomary,
        &catalog,
    );
    assert_eq!(selected.unit.unwrap().name, "Milliliter");
    assert_close(selected.quantity, 10.0);
}

#[test]
fn empty_family_degrades_to_no_conversion() {
    let (q, u) = display(7.0, Family::Item, UnitSystem::Metric);
    assert_eq!(u, "");
    assert_close(q, 7.0);

    let selected = select_display_unit(250.0, Family::Weight, UnitSystem::Metric, &[]);
    assert!(selected.unit.is_none());
    assert_close(selected.quantity, 250.0);
}

// Copyright 2023 Remi Bernotavicius

use super::{EngineError, Family};
use crate::database::models::Unit;

/// Factors the seed catalog and the display thresholds both derive from, so
/// that quantities sitting exactly on a threshold compare equal.
pub const ML_PER_TEASPOON: f64 = 4.92892159375;
pub const ML_PER_TABLESPOON: f64 = 3.0 * ML_PER_TEASPOON;
pub const ML_PER_FLUID_OUNCE: f64 = 2.0 * ML_PER_TABLESPOON;
pub const ML_PER_CUP: f64 = 8.0 * ML_PER_FLUID_OUNCE;
pub const ML_PER_GALLON: f64 = 16.0 * ML_PER_CUP;
pub const GRAMS_PER_OUNCE: f64 = 28.349523125;
pub const GRAMS_PER_POUND: f64 = 16.0 * GRAMS_PER_OUNCE;

/// Express `quantity` of `unit` in the unit's family base unit (grams or
/// milliliters). Errors for units that carry no conversion factor.
pub fn to_base_unit(quantity: f64, unit: &Unit) -> Result<f64, EngineError> {
    let factor = unit
        .base_conversion_factor
        .ok_or_else(|| EngineError::NotConvertible(unit.name.clone()))?;
    Ok(quantity * factor)
}

/// Express a base-unit quantity (grams or milliliters) in `unit`.
pub fn from_base_unit(base_quantity: f64, unit: &Unit) -> Result<f64, EngineError> {
    let factor = unit
        .base_conversion_factor
        .ok_or_else(|| EngineError::NotConvertible(unit.name.clone()))?;
    Ok(base_quantity / factor)
}

/// Convert `quantity` from one unit to another within a convertibility
/// family. The conversion always pivots through the family base unit so the
/// result is independent of which non-base units are involved. Item and
/// Temperature units only convert to themselves.
pub fn convert(quantity: f64, from: &Unit, to: &Unit) -> Result<f64, EngineError> {
    let family = Family::from(from.category);
    if family != Family::from(to.category) {
        return Err(EngineError::CategoryMismatch {
            from: from.name.clone(),
            to: to.name.clone(),
        });
    }
    if !family.is_convertible() {
        if from.id != to.id {
            return Err(EngineError::CategoryMismatch {
                from: from.name.clone(),
                to: to.name.clone(),
            });
        }
        return Ok(quantity);
    }
    from_base_unit(to_base_unit(quantity, from)?, to)
}

#[cfg(test)]
use super::test_fixtures::{assert_close, unit};

#[test]
fn conversion_within_weight_family() {
    let catalog = crate::import::standard_units();
    let pound = unit(&catalog, "Pound");
    let gram = unit(&catalog, "Gram");
    let kilogram = unit(&catalog, "Kilogram");

    assert_close(convert(1.0, pound, gram).unwrap(), GRAMS_PER_POUND);
    assert_close(convert(2.0, kilogram, gram).unwrap(), 2000.0);
    assert_close(convert(500.0, gram, kilogram).unwrap(), 0.5);
    assert_close(convert(1.0, pound, pound).unwrap(), 1.0);
}

#[test]
fn conversion_within_volume_family() {
    let catalog = crate::import::standard_units();
    let cup = unit(&catalog, "Cup");
    let tablespoon = unit(&catalog, "Tablespoon");
    let teaspoon = unit(&catalog, "Teaspoon");
    let liter = unit(&catalog, "Liter");

    assert_close(convert(1.0, cup, tablespoon).unwrap(), 16.0);
    assert_close(convert(1.0, tablespoon, teaspoon).unwrap(), 3.0);
    assert_close(convert(1.0, liter, teaspoon).unwrap(), 1000.0 / ML_PER_TEASPOON);
}

#[test]
fn cross_subcategory_volume_is_compatible() {
    use crate::database::models::{UnitCategory, UnitSystem};

    let mut id = crate::database::models::UnitId::INITIAL;
    let mut volume_unit = |name: &str, category, factor| {
        let u = Unit {
            id,
            name: name.into(),
            abbreviation: name.into(),
            category,
            system: UnitSystem::UsCustomary,
            base_conversion_factor: Some(factor),
        };
        id = id.next();
        u
    };

    let dry_cup = volume_unit("dry cup", UnitCategory::DryVolume, ML_PER_CUP);
    let liquid_cup = volume_unit("liquid cup", UnitCategory::LiquidVolume, ML_PER_CUP);
    let plain_quart = volume_unit("quart", UnitCategory::Volume, 4.0 * ML_PER_CUP);

    assert_close(convert(1.0, &dry_cup, &liquid_cup).unwrap(), 1.0);
    assert_close(convert(8.0, &liquid_cup, &plain_quart).unwrap(), 2.0);
}

#[test]
fn category_mismatch_is_rejected() {
    let catalog = crate::import::standard_units();
    let each = unit(&catalog, "Each");
    let gram = unit(&catalog, "Gram");
    let cup = unit(&catalog, "Cup");

    assert!(matches!(
        convert(1.0, each, gram),
        Err(EngineError::CategoryMismatch { .. })
    ));
    assert!(matches!(
        convert(1.0, cup, gram),
        Err(EngineError::CategoryMismatch { .. })
    ));
}

#[test]
fn item_and_temperature_units_are_identity_only() {
    let catalog = crate::import::standard_units();
    let each = unit(&catalog, "Each");
    let slice = unit(&catalog, "Slice");
    let celsius = unit(&catalog, "Degree Celsius");
    let fahrenheit = unit(&catalog, "Degree Fahrenheit");

    assert_close(convert(3.0, each, each).unwrap(), 3.0);
    assert_close(convert(180.0, celsius, celsius).unwrap(), 180.0);
    assert!(matches!(
        convert(1.0, each, slice),
        Err(EngineError::CategoryMismatch { .. })
    ));
    assert!(matches!(
        convert(1.0, celsius, fahrenheit),
        Err(EngineError::CategoryMismatch { .. })
    ));
}

#[test]
fn base_unit_round_trip() {
    let catalog = crate::import::standard_units();
    for u in &catalog {
        if u.base_conversion_factor.is_none() {
            continue;
        }
        for quantity in [0.25, 1.0, 3.0, 48.0, 1234.5] {
            let base = to_base_unit(quantity, u).unwrap();
            assert_close(from_base_unit(base, u).unwrap(), quantity);
        }
    }
}

#[test]
fn conversion_composition_round_trips() {
    let catalog = crate::import::standard_units();
    let convertible: Vec<_> = catalog
        .iter()
        .filter(|u| u.base_conversion_factor.is_some())
        .collect();
    for a in &convertible {
        for b in &convertible {
            if Family::from(a.category) != Family::from(b.category) {
                continue;
            }
            let there = convert(7.5, a, b).unwrap();
            assert_close(convert(there, b, a).unwrap(), 7.5);
        }
    }
}

#[test]
fn missing_factor_fails_loudly() {
    let catalog = crate::import::standard_units();
    let each = unit(&catalog, "Each");
    assert_eq!(
        to_base_unit(1.0, each),
        Err(EngineError::NotConvertible("Each".into()))
    );
    assert_eq!(
        from_base_unit(1.0, each),
        Err(EngineError::NotConvertible("Each".into()))
    );
}

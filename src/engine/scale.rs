// Copyright 2023 Remi Bernotavicius

use super::EngineError;
use crate::database::models::RecipeIngredient;

/// Scale every ingredient quantity by `target_servings / base_servings`.
/// Rows with a non-positive quantity are descriptive-only ("salt to taste")
/// and pass through untouched. Scaling happens before any unit conversion,
/// so it commutes with conversion and composes multiplicatively.
pub fn scale_recipe(
    ingredients: &[RecipeIngredient],
    target_servings: f64,
    base_servings: f64,
) -> Result<Vec<RecipeIngredient>, EngineError> {
    if !(target_servings > 0.0) || !(base_servings > 0.0) {
        return Err(EngineError::InvalidScale {
            target: target_servings,
            base: base_servings,
        });
    }
    let factor = target_servings / base_servings;
    Ok(ingredients
        .iter()
        .map(|row| {
            let mut scaled = row.clone();
            if scaled.quantity > 0.0 {
                scaled.quantity *= factor;
            }
            scaled
        })
        .collect())
}

#[cfg(test)]
use crate::database::models::{IngredientId, RecipeId, UnitId};

#[cfg(test)]
fn rows(quantities: &[f64]) -> Vec<RecipeIngredient> {
    let mut ingredient_id = IngredientId::INITIAL;
    quantities
        .iter()
        .map(|&quantity| {
            let row = RecipeIngredient {
                recipe_id: RecipeId::INITIAL,
                ingredient_id,
                quantity,
                unit_id: UnitId::INITIAL,
                item_group: None,
            };
            ingredient_id = ingredient_id.next();
            row
        })
        .collect()
}

#[test]
fn scales_by_servings_ratio() {
    let scaled = scale_recipe(&rows(&[2.0, 0.5]), 6.0, 4.0).unwrap();
    assert_eq!(scaled[0].quantity, 3.0);
    assert_eq!(scaled[1].quantity, 0.75);
}

#[test]
fn zero_quantity_rows_pass_through() {
    let scaled = scale_recipe(&rows(&[0.0, 1.0]), 8.0, 4.0).unwrap();
    assert_eq!(scaled[0].quantity, 0.0);
    assert_eq!(scaled[1].quantity, 2.0);
}

#[test]
fn invalid_servings_are_rejected() {
    for (target, base) in [(0.0, 4.0), (-1.0, 4.0), (4.0, 0.0), (4.0, -2.0), (f64::NAN, 4.0)] {
        assert!(matches!(
            scale_recipe(&rows(&[1.0]), target, base),
            Err(EngineError::InvalidScale { .. })
        ));
    }
}

#[test]
fn scaling_composes_multiplicatively() {
    let original = rows(&[1.5, 4.0, 0.25]);
    let twice = scale_recipe(&scale_recipe(&original, 3.0, 4.0).unwrap(), 10.0, 3.0).unwrap();
    let once = scale_recipe(&original, 10.0, 4.0).unwrap();
    for (a, b) in twice.iter().zip(&once) {
        super::test_fixtures::assert_close(a.quantity, b.quantity);
    }
}

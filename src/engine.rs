// Copyright 2023 Remi Bernotavicius

//! Pure unit-conversion and recipe-scaling engine. Every operation is a
//! deterministic function of its arguments; nothing here touches the
//! database or any shared state.

use crate::database::models::{
    Ingredient, IngredientId, IngredientPrice, Unit, UnitCategory, UnitId,
};
use std::collections::HashMap;

mod aggregate;
mod convert;
mod display;
mod scale;

pub use aggregate::{recipe_cost, recipe_weight, Aggregate};
pub use convert::{
    convert, from_base_unit, to_base_unit, GRAMS_PER_OUNCE, GRAMS_PER_POUND, ML_PER_CUP,
    ML_PER_FLUID_OUNCE, ML_PER_GALLON, ML_PER_TABLESPOON, ML_PER_TEASPOON,
};
pub use display::{select_display_unit, DisplayQuantity};
pub use scale::scale_recipe;

/// A convertibility family: the largest set of unit categories whose
/// quantities can be converted into one another. The three volume
/// categories share one family on purpose: for this application a cup of
/// flour and a cup of milk are the same cup, by convention rather than by
/// physics. Item and Temperature are identity-only.
#[derive(Debug, Hash, Copy, Clone, PartialEq, Eq)]
pub enum Family {
    Weight,
    Volume,
    Item,
    Temperature,
}

impl From<UnitCategory> for Family {
    fn from(c: UnitCategory) -> Self {
        match c {
            UnitCategory::Weight => Self::Weight,
            UnitCategory::Volume => Self::Volume,
            UnitCategory::DryVolume => Self::Volume,
            UnitCategory::LiquidVolume => Self::Volume,
            UnitCategory::Item => Self::Item,
            UnitCategory::Temperature => Self::Temperature,
        }
    }
}

impl Family {
    /// Whether units of this family convert through a shared base unit.
    /// Item and Temperature quantities only ever stay in their own unit.
    pub fn is_convertible(&self) -> bool {
        match self {
            Self::Weight | Self::Volume => true,
            Self::Item | Self::Temperature => false,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EngineError {
    #[error("cannot convert {from:?} to {to:?}")]
    CategoryMismatch { from: String, to: String },

    #[error("invalid scale: target servings {target}, base servings {base}")]
    InvalidScale { target: f64, base: f64 },

    #[error("unit {0:?} has no base conversion factor")]
    NotConvertible(String),
}

/// Read-only view of the ingredient data a cost or weight aggregation needs,
/// keyed for lookup. Built once per computation from plain rows.
pub struct IngredientCatalog {
    units: HashMap<UnitId, Unit>,
    ingredients: HashMap<IngredientId, Ingredient>,
    prices: HashMap<IngredientId, Vec<IngredientPrice>>,
}

impl IngredientCatalog {
    pub fn new(
        units: Vec<Unit>,
        ingredients: Vec<Ingredient>,
        prices: Vec<IngredientPrice>,
    ) -> Self {
        let mut prices_by_ingredient: HashMap<IngredientId, Vec<IngredientPrice>> = HashMap::new();
        for price in prices {
            prices_by_ingredient
                .entry(price.ingredient_id)
                .or_default()
                .push(price);
        }
        Self {
            units: units.into_iter().map(|u| (u.id, u)).collect(),
            ingredients: ingredients.into_iter().map(|i| (i.id, i)).collect(),
            prices: prices_by_ingredient,
        }
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn ingredient(&self, id: IngredientId) -> Option<&Ingredient> {
        self.ingredients.get(&id)
    }

    pub fn prices(&self, id: IngredientId) -> &[IngredientPrice] {
        self.prices.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use crate::database::models::Unit;

    pub fn unit<'a>(catalog: &'a [Unit], name: &str) -> &'a Unit {
        catalog
            .iter()
            .find(|u| u.name == name)
            .unwrap_or_else(|| panic!("no unit named {name:?} in catalog"))
    }

    pub fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "{actual} != {expected}"
        );
    }
}

// Copyright 2023 Remi Bernotavicius

use derive_more::Display;
use diesel::associations::{Associations, Identifiable};
use diesel::deserialize::Queryable;
use diesel::expression::Selectable;
use diesel::prelude::Insertable;
use diesel_derive_enum::DbEnum;
use diesel_derive_newtype::DieselNewType;
use strum::EnumIter;

#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct UnitId(i32);

impl UnitId {
    pub const INITIAL: Self = Self(1);

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

/// What a unit measures. Weight is its own convertibility family; the three
/// volume categories are mutually convertible ("a cup is a cup" whether the
/// ingredient is dry or liquid); Item and Temperature units never convert
/// to anything but themselves.
#[derive(Debug, Display, EnumIter, Hash, Copy, Clone, PartialEq, Eq, DbEnum)]
pub enum UnitCategory {
    #[display("weight")]
    Weight,
    #[display("volume")]
    Volume,
    #[display("dry volume")]
    DryVolume,
    #[display("liquid volume")]
    LiquidVolume,
    #[display("item")]
    Item,
    #[display("temperature")]
    Temperature,
}

#[derive(Debug, Display, EnumIter, Hash, Copy, Clone, PartialEq, Eq, DbEnum)]
pub enum UnitSystem {
    #[display("metric")]
    Metric,
    #[display("US customary")]
    UsCustomary,
    #[display("other")]
    Other,
}

/// One row of the unit catalog. `base_conversion_factor` is how much of the
/// family's base unit (grams for weight, milliliters for volume) one of this
/// unit is; it is `None` exactly for Item and Temperature units.
#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::database::schema::units)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub abbreviation: String,
    pub category: UnitCategory,
    pub system: UnitSystem,
    pub base_conversion_factor: Option<f64>,
}

#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct IngredientId(i32);

impl IngredientId {
    pub const INITIAL: Self = Self(1);

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

/// `weight` is grams per one `default_unit_id` and only meaningful when that
/// unit's category is not Weight (a weight unit already carries grams per
/// unit in its own conversion factor).
#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::database::schema::ingredients)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub default_unit_id: UnitId,
    pub weight: Option<f64>,
}

/// Price of one `unit_id` of an ingredient. The composite primary key keeps
/// prices unique per (ingredient, unit) pair.
#[derive(Associations, Queryable, Selectable, Identifiable, Insertable, Debug, Clone)]
#[diesel(belongs_to(Ingredient))]
#[diesel(belongs_to(Unit))]
#[diesel(primary_key(ingredient_id, unit_id))]
#[diesel(table_name = crate::database::schema::ingredient_prices)]
pub struct IngredientPrice {
    pub ingredient_id: IngredientId,
    pub unit_id: UnitId,
    pub price: f64,
    pub note: Option<String>,
}

#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct RecipeId(i32);

impl RecipeId {
    pub const INITIAL: Self = Self(1);

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::database::schema::recipes)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub base_servings: i32,
    pub parent_recipe_id: Option<RecipeId>,
    pub variant_notes: Option<String>,
}

#[derive(Queryable, Selectable, Identifiable, Insertable, Clone)]
#[diesel(table_name = crate::database::schema::recipes)]
pub struct RecipeHandle {
    pub id: RecipeId,
    pub name: String,
}

/// One line of a recipe. `item_group` is a display-grouping hint (e.g.
/// "Marinade") and never participates in any arithmetic.
#[derive(Associations, Queryable, Selectable, Identifiable, Insertable, Debug, Clone)]
#[diesel(belongs_to(Recipe))]
#[diesel(belongs_to(Ingredient))]
#[diesel(primary_key(recipe_id, ingredient_id))]
#[diesel(table_name = crate::database::schema::recipe_ingredients)]
pub struct RecipeIngredient {
    pub recipe_id: RecipeId,
    pub ingredient_id: IngredientId,
    pub quantity: f64,
    pub unit_id: UnitId,
    pub item_group: Option<String>,
}

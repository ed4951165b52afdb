// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{
    Ingredient, IngredientId, IngredientPrice, Recipe, RecipeHandle, RecipeId, RecipeIngredient,
    Unit,
};
use diesel::prelude::OptionalExtension as _;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use std::collections::HashMap;

pub fn get_units(conn: &mut database::Connection) -> crate::Result<Vec<Unit>> {
    use database::schema::units::dsl::*;

    Ok(units.select(Unit::as_select()).load(conn)?)
}

pub fn get_ingredients(conn: &mut database::Connection) -> crate::Result<Vec<Ingredient>> {
    use database::schema::ingredients::dsl::*;

    Ok(ingredients.select(Ingredient::as_select()).load(conn)?)
}

pub fn get_prices(conn: &mut database::Connection) -> crate::Result<Vec<IngredientPrice>> {
    use database::schema::ingredient_prices::dsl::*;

    Ok(ingredient_prices
        .select(IngredientPrice::as_select())
        .load(conn)?)
}

pub fn get_ingredient_names(
    conn: &mut database::Connection,
) -> crate::Result<HashMap<IngredientId, String>> {
    use database::schema::ingredients::dsl::*;

    Ok(ingredients
        .select((id, name))
        .load::<(IngredientId, String)>(conn)?
        .into_iter()
        .collect())
}

pub fn get_recipes(conn: &mut database::Connection) -> crate::Result<Vec<RecipeHandle>> {
    use database::schema::recipes::dsl::*;

    Ok(recipes
        .select(RecipeHandle::as_select())
        .order_by(name.asc())
        .load(conn)?)
}

pub fn get_recipe_name(
    conn: &mut database::Connection,
    recipe_id: RecipeId,
) -> crate::Result<String> {
    use database::schema::recipes::dsl::*;

    Ok(recipes.select(name).filter(id.eq(recipe_id)).get_result(conn)?)
}

/// A recipe and its ingredient rows, rows ordered so that grouped lines
/// (e.g. "Marinade") come out together.
pub fn get_recipe_by_name(
    conn: &mut database::Connection,
    recipe_name: &str,
) -> crate::Result<Option<(Recipe, Vec<RecipeIngredient>)>> {
    let recipe = {
        use database::schema::recipes::dsl::*;
        recipes
            .select(Recipe::as_select())
            .filter(name.eq(recipe_name))
            .get_result(conn)
            .optional()?
    };
    let Some(recipe) = recipe else {
        return Ok(None);
    };

    use database::schema::recipe_ingredients::dsl::*;
    let rows = recipe_ingredients
        .select(RecipeIngredient::as_select())
        .filter(recipe_id.eq(recipe.id))
        .order_by((item_group.asc(), ingredient_id.asc()))
        .load(conn)?;
    Ok(Some((recipe, rows)))
}

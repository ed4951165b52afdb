// Copyright 2023 Remi Bernotavicius

//! Serde types for the JSON import files. Units and ingredients are
//! referenced by name; ids are assigned at insert time.

use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize, Debug)]
pub struct Price {
    pub unit: String,
    pub price: f64,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct Ingredient {
    pub name: String,
    pub default_unit: String,
    /// grams per one `default_unit`; omit for weight-unit defaults
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub prices: Vec<Price>,
}

#[derive(Deserialize, Debug)]
pub struct RecipeIngredient {
    pub ingredient: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct Recipe {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: String,
    pub base_servings: i32,
    #[serde(default)]
    pub variant_of: Option<String>,
    #[serde(default)]
    pub variant_notes: Option<String>,
    pub ingredients: Vec<RecipeIngredient>,
}

pub fn decode_ingredients_from_path(path: impl AsRef<Path>) -> crate::Result<Vec<Ingredient>> {
    let file = std::fs::File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

pub fn decode_recipes_from_path(path: impl AsRef<Path>) -> crate::Result<Vec<Recipe>> {
    let file = std::fs::File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

#[test]
fn decode_ingredient_file() {
    let ingredients: Vec<Ingredient> = serde_json::from_str(
        r#"[
            {
                "name": "flour",
                "default_unit": "Cup",
                "weight": 125.0,
                "prices": [{ "unit": "Kilogram", "price": 3.99, "note": "bulk bin" }]
            },
            { "name": "salt", "default_unit": "Teaspoon" }
        ]"#,
    )
    .unwrap();
    assert_eq!(ingredients.len(), 2);
    assert_eq!(ingredients[0].prices[0].unit, "Kilogram");
    assert_eq!(ingredients[1].weight, None);
    assert!(ingredients[1].prices.is_empty());
}

#[test]
fn decode_recipe_file() {
    let recipes: Vec<Recipe> = serde_json::from_str(
        r#"[
            {
                "name": "Pancakes",
                "base_servings": 6,
                "ingredients": [
                    { "ingredient": "flour", "quantity": 2.0, "unit": "Cup", "group": "Batter" },
                    { "ingredient": "salt", "quantity": 0.0, "unit": "Teaspoon" }
                ]
            },
            {
                "name": "Crepes",
                "base_servings": 4,
                "variant_of": "Pancakes",
                "variant_notes": "thinner batter",
                "ingredients": []
            }
        ]"#,
    )
    .unwrap();
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0].ingredients[0].group.as_deref(), Some("Batter"));
    assert_eq!(recipes[1].variant_of.as_deref(), Some("Pancakes"));
}

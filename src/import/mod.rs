// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{
    Ingredient, IngredientId, IngredientPrice, Recipe, RecipeId, RecipeIngredient, Unit,
    UnitCategory, UnitId, UnitSystem,
};
use crate::engine::{
    GRAMS_PER_OUNCE, GRAMS_PER_POUND, ML_PER_CUP, ML_PER_FLUID_OUNCE, ML_PER_GALLON,
    ML_PER_TABLESPOON, ML_PER_TEASPOON,
};
use diesel::prelude::OptionalExtension as _;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use std::collections::HashMap;
use std::path::Path;

mod json;

/// The built-in unit catalog: metric and US customary weight and volume
/// units sharing base units of grams and milliliters, plus the
/// non-convertible item and temperature units.
pub fn standard_units() -> Vec<Unit> {
    use UnitCategory::*;
    use UnitSystem::*;

    let defs: &[(&str, &str, UnitCategory, UnitSystem, Option<f64>)] = &[
        ("Milligram", "mg", Weight, Metric, Some(0.001)),
        ("Gram", "g", Weight, Metric, Some(1.0)),
        ("Kilogram", "kg", Weight, Metric, Some(1000.0)),
        ("Ounce", "oz", Weight, UsCustomary, Some(GRAMS_PER_OUNCE)),
        ("Pound", "lb", Weight, UsCustomary, Some(GRAMS_PER_POUND)),
        ("Milliliter", "mL", Volume, Metric, Some(1.0)),
        ("Liter", "L", Volume, Metric, Some(1000.0)),
        ("Teaspoon", "tsp", Volume, UsCustomary, Some(ML_PER_TEASPOON)),
        ("Tablespoon", "tbsp", Volume, UsCustomary, Some(ML_PER_TABLESPOON)),
        (
            "Fluid Ounce",
            "fl oz",
            LiquidVolume,
            UsCustomary,
            Some(ML_PER_FLUID_OUNCE),
        ),
        ("Cup", "c", DryVolume, UsCustomary, Some(ML_PER_CUP)),
        ("Gallon", "gal", LiquidVolume, UsCustomary, Some(ML_PER_GALLON)),
        ("Each", "ea", Item, Other, None),
        ("Slice", "slice", Item, Other, None),
        ("Degree Celsius", "°C", Temperature, Metric, None),
        ("Degree Fahrenheit", "°F", Temperature, UsCustomary, None),
    ];

    let mut next_id = UnitId::INITIAL;
    defs.iter()
        .map(|&(unit_name, abbreviation, category, system, factor)| {
            let unit = Unit {
                id: next_id,
                name: unit_name.into(),
                abbreviation: abbreviation.into(),
                category,
                system,
                base_conversion_factor: factor,
            };
            next_id = next_id.next();
            unit
        })
        .collect()
}

pub fn seed_units(conn: &mut database::Connection) -> crate::Result<()> {
    use database::schema::units::dsl::*;

    let existing: i64 = units.count().get_result(conn)?;
    if existing > 0 {
        log::info!("unit catalog already has {existing} units, not seeding");
        return Ok(());
    }
    let catalog = standard_units();
    let count = catalog.len();
    diesel::insert_into(units).values(catalog).execute(conn)?;
    log::info!("seeded {count} units");
    Ok(())
}

fn unit_ids_by_name(conn: &mut database::Connection) -> crate::Result<HashMap<String, UnitId>> {
    use database::schema::units::dsl::*;

    Ok(units
        .select((name, id))
        .load::<(String, UnitId)>(conn)?
        .into_iter()
        .map(|(unit_name, unit_id)| (unit_name.to_lowercase(), unit_id))
        .collect())
}

fn lookup_unit(units_by_name: &HashMap<String, UnitId>, unit_name: &str) -> crate::Result<UnitId> {
    units_by_name
        .get(&unit_name.to_lowercase())
        .copied()
        .ok_or_else(|| format!("unknown unit {unit_name:?}").into())
}

fn next_ingredient_id(conn: &mut database::Connection) -> crate::Result<IngredientId> {
    use database::schema::ingredients::dsl::*;

    let highest: Option<IngredientId> =
        ingredients.select(diesel::dsl::max(id)).get_result(conn)?;
    Ok(highest.map(|i| i.next()).unwrap_or(IngredientId::INITIAL))
}

fn next_recipe_id(conn: &mut database::Connection) -> crate::Result<RecipeId> {
    use database::schema::recipes::dsl::*;

    let highest: Option<RecipeId> = recipes.select(diesel::dsl::max(id)).get_result(conn)?;
    Ok(highest.map(|r| r.next()).unwrap_or(RecipeId::INITIAL))
}

fn find_or_insert_ingredient(
    conn: &mut database::Connection,
    new_name: &str,
    new_default_unit_id: UnitId,
    new_weight: Option<f64>,
    next_id: &mut IngredientId,
) -> crate::Result<IngredientId> {
    use database::schema::ingredients::dsl::*;

    let new_name = new_name.to_lowercase();
    let existing = ingredients
        .select(Ingredient::as_select())
        .filter(name.eq(&new_name))
        .get_result(conn)
        .optional()?;
    if let Some(existing) = existing {
        return Ok(existing.id);
    }

    let new_id = *next_id;
    diesel::insert_into(ingredients)
        .values(Ingredient {
            id: new_id,
            name: new_name,
            default_unit_id: new_default_unit_id,
            weight: new_weight,
        })
        .execute(conn)?;
    *next_id = next_id.next();
    Ok(new_id)
}

fn upsert_price(conn: &mut database::Connection, new_price: IngredientPrice) -> crate::Result<()> {
    use database::schema::ingredient_prices::dsl::*;

    diesel::insert_into(ingredient_prices)
        .values(&new_price)
        .on_conflict((ingredient_id, unit_id))
        .do_update()
        .set((price.eq(new_price.price), note.eq(new_price.note.clone())))
        .execute(conn)?;
    Ok(())
}

pub fn import_ingredients(
    conn: &mut database::Connection,
    path: impl AsRef<Path>,
) -> crate::Result<()> {
    insert_ingredients(conn, json::decode_ingredients_from_path(path)?)
}

fn insert_ingredients(
    conn: &mut database::Connection,
    entries: Vec<json::Ingredient>,
) -> crate::Result<()> {
    let units_by_name = unit_ids_by_name(conn)?;
    let mut next_id = next_ingredient_id(conn)?;

    let mut num_imported = 0;
    for entry in entries {
        let default_unit_id = lookup_unit(&units_by_name, &entry.default_unit)?;
        let ingredient_id =
            find_or_insert_ingredient(conn, &entry.name, default_unit_id, entry.weight, &mut next_id)?;
        for price in entry.prices {
            let price_unit_id = lookup_unit(&units_by_name, &price.unit)?;
            upsert_price(
                conn,
                IngredientPrice {
                    ingredient_id,
                    unit_id: price_unit_id,
                    price: price.price,
                    note: price.note,
                },
            )?;
        }
        num_imported += 1;
    }
    log::info!("imported {num_imported} ingredients");
    Ok(())
}

fn recipe_id_by_name(conn: &mut database::Connection, recipe_name: &str) -> crate::Result<RecipeId> {
    use database::schema::recipes::dsl::*;

    recipes
        .select(id)
        .filter(name.eq(recipe_name))
        .get_result(conn)
        .optional()?
        .ok_or_else(|| format!("unknown parent recipe {recipe_name:?}").into())
}

pub fn import_recipes(
    conn: &mut database::Connection,
    path: impl AsRef<Path>,
) -> crate::Result<()> {
    insert_recipes(conn, json::decode_recipes_from_path(path)?)
}

fn insert_recipes(conn: &mut database::Connection, entries: Vec<json::Recipe>) -> crate::Result<()> {
    let units_by_name = unit_ids_by_name(conn)?;
    let mut next_ingredient = next_ingredient_id(conn)?;
    let mut next_recipe = next_recipe_id(conn)?;

    let mut num_imported = 0;
    for entry in entries {
        if entry.base_servings < 1 {
            return Err(format!(
                "recipe {:?}: base_servings must be at least 1",
                entry.name
            )
            .into());
        }
        // A variant's parent has to exist already, either from an earlier
        // import or earlier in the same file.
        let parent_recipe_id = entry
            .variant_of
            .as_deref()
            .map(|parent| recipe_id_by_name(conn, parent))
            .transpose()?;

        let recipe_id = next_recipe;
        diesel::insert_into(database::schema::recipes::dsl::recipes)
            .values(Recipe {
                id: recipe_id,
                name: entry.name.clone(),
                description: entry.description,
                instructions: entry.instructions,
                base_servings: entry.base_servings,
                parent_recipe_id,
                variant_notes: entry.variant_notes,
            })
            .execute(conn)?;
        next_recipe = next_recipe.next();

        for row in entry.ingredients {
            if row.quantity < 0.0 {
                return Err(format!(
                    "recipe {:?}: negative quantity for {:?}",
                    entry.name, row.ingredient
                )
                .into());
            }
            let unit_id = lookup_unit(&units_by_name, &row.unit)?;
            let ingredient_id = find_or_insert_ingredient(
                conn,
                &row.ingredient,
                unit_id,
                None,
                &mut next_ingredient,
            )?;
            diesel::insert_into(database::schema::recipe_ingredients::dsl::recipe_ingredients)
                .values(RecipeIngredient {
                    recipe_id,
                    ingredient_id,
                    quantity: row.quantity,
                    unit_id,
                    item_group: row.group,
                })
                .execute(conn)?;
        }
        num_imported += 1;
    }
    log::info!("imported {num_imported} recipes");
    Ok(())
}

#[cfg(test)]
use crate::engine::Family;

#[test]
fn standard_catalog_covers_every_category_and_system() {
    use strum::IntoEnumIterator as _;

    let catalog = standard_units();
    for category in UnitCategory::iter() {
        assert!(catalog.iter().any(|u| u.category == category), "{category}");
    }
    for system in UnitSystem::iter() {
        assert!(catalog.iter().any(|u| u.system == system), "{system}");
    }
}

#[test]
fn standard_catalog_has_one_base_unit_per_convertible_family() {
    let catalog = standard_units();
    for family in [Family::Weight, Family::Volume] {
        let base_units: Vec<_> = catalog
            .iter()
            .filter(|u| Family::from(u.category) == family)
            .filter(|u| u.base_conversion_factor == Some(1.0))
            .collect();
        assert_eq!(base_units.len(), 1, "family {family:?}");
    }
    for unit in &catalog {
        let convertible = Family::from(unit.category).is_convertible();
        assert_eq!(unit.base_conversion_factor.is_some(), convertible, "{}", unit.name);
    }
}

#[test]
fn seeding_twice_keeps_one_catalog() {
    use database::schema::units::dsl::*;

    let mut conn = database::establish_in_memory_connection();
    seed_units(&mut conn).unwrap();
    seed_units(&mut conn).unwrap();
    let count: i64 = units.count().get_result(&mut conn).unwrap();
    assert_eq!(count as usize, standard_units().len());
}

#[test]
fn importing_wires_up_ingredients_prices_and_recipes() {
    let mut conn = database::establish_in_memory_connection();
    seed_units(&mut conn).unwrap();

    insert_ingredients(
        &mut conn,
        vec![json::Ingredient {
            name: "Flour".into(),
            default_unit: "cup".into(),
            weight: Some(125.0),
            prices: vec![json::Price {
                unit: "kilogram".into(),
                price: 3.99,
                note: None,
            }],
        }],
    )
    .unwrap();

    insert_recipes(
        &mut conn,
        vec![
            json::Recipe {
                name: "Pancakes".into(),
                description: String::new(),
                instructions: String::new(),
                base_servings: 6,
                variant_of: None,
                variant_notes: None,
                ingredients: vec![json::RecipeIngredient {
                    ingredient: "flour".into(),
                    quantity: 2.0,
                    unit: "Cup".into(),
                    group: Some("Batter".into()),
                }],
            },
            json::Recipe {
                name: "Crepes".into(),
                description: String::new(),
                instructions: String::new(),
                base_servings: 4,
                variant_of: Some("Pancakes".into()),
                variant_notes: Some("thinner batter".into()),
                ingredients: vec![],
            },
        ],
    )
    .unwrap();

    // The existing flour row is reused rather than duplicated.
    use database::schema::ingredients::dsl::*;
    let count: i64 = ingredients.count().get_result(&mut conn).unwrap();
    assert_eq!(count, 1);

    let (pancakes, rows) = crate::report::query::get_recipe_by_name(&mut conn, "Pancakes")
        .unwrap()
        .unwrap();
    assert_eq!(pancakes.base_servings, 6);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].quantity, 2.0);

    let (crepes, _) = crate::report::query::get_recipe_by_name(&mut conn, "Crepes")
        .unwrap()
        .unwrap();
    assert_eq!(crepes.parent_recipe_id, Some(pancakes.id));
}

#[test]
fn repeated_price_import_updates_in_place() {
    use database::schema::ingredient_prices::dsl::*;

    let mut conn = database::establish_in_memory_connection();
    seed_units(&mut conn).unwrap();

    let entry = |amount| json::Ingredient {
        name: "butter".into(),
        default_unit: "Pound".into(),
        weight: None,
        prices: vec![json::Price {
            unit: "Pound".into(),
            price: amount,
            note: None,
        }],
    };
    insert_ingredients(&mut conn, vec![entry(4.50)]).unwrap();
    insert_ingredients(&mut conn, vec![entry(5.25)]).unwrap();

    let prices: Vec<f64> = ingredient_prices.select(price).load(&mut conn).unwrap();
    assert_eq!(prices, vec![5.25]);
}

#[test]
fn unknown_unit_is_an_import_error() {
    let mut conn = database::establish_in_memory_connection();
    seed_units(&mut conn).unwrap();
    let result = insert_ingredients(
        &mut conn,
        vec![json::Ingredient {
            name: "saffron".into(),
            default_unit: "pinch".into(),
            weight: None,
            prices: vec![],
        }],
    );
    assert!(result.is_err());
}

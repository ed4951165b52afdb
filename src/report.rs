// Copyright 2023 Remi Bernotavicius

//! Terminal rendering of scaled recipes and their cost/weight totals. All
//! the arithmetic lives in [`crate::engine`]; this module loads rows,
//! invokes the engine, and formats.

use crate::database;
use crate::database::models::{IngredientId, Recipe, RecipeIngredient, Unit, UnitSystem};
use crate::engine::{self, Aggregate, Family, IngredientCatalog};
use std::collections::HashMap;

pub mod query;

struct RecipeReport {
    recipe: Recipe,
    parent_name: Option<String>,
    scaled: Vec<RecipeIngredient>,
    units: Vec<Unit>,
    catalog: IngredientCatalog,
    ingredient_names: HashMap<IngredientId, String>,
    servings: f64,
}

impl RecipeReport {
    fn load(
        conn: &mut database::Connection,
        recipe_name: &str,
        servings: Option<f64>,
    ) -> crate::Result<Self> {
        let Some((recipe, rows)) = query::get_recipe_by_name(conn, recipe_name)? else {
            return Err(format!("no recipe named {recipe_name:?}").into());
        };
        let parent_name = recipe
            .parent_recipe_id
            .map(|parent_id| query::get_recipe_name(conn, parent_id))
            .transpose()?;

        let servings = servings.unwrap_or(recipe.base_servings as f64);
        let scaled = engine::scale_recipe(&rows, servings, recipe.base_servings as f64)?;

        let units = query::get_units(conn)?;
        let catalog = IngredientCatalog::new(
            units.clone(),
            query::get_ingredients(conn)?,
            query::get_prices(conn)?,
        );
        Ok(Self {
            recipe,
            parent_name,
            scaled,
            units,
            catalog,
            ingredient_names: query::get_ingredient_names(conn)?,
            servings,
        })
    }

    fn ingredient_name(&self, row: &RecipeIngredient) -> &str {
        self.ingredient_names
            .get(&row.ingredient_id)
            .map(String::as_str)
            .unwrap_or("(unknown ingredient)")
    }

    fn cost(&self) -> Aggregate {
        engine::recipe_cost(&self.scaled, &self.catalog)
    }

    fn weight(&self) -> Aggregate {
        engine::recipe_weight(&self.scaled, &self.catalog)
    }

    fn cost_line(&self) -> String {
        match self.cost().total {
            Some(total) => format!("cost: ${total:.2}"),
            None => "cost information incomplete".into(),
        }
    }

    fn weight_line(&self, system: UnitSystem) -> String {
        match self.weight().total {
            Some(grams) => format!(
                "weight: {}",
                rendered_base_quantity(grams, Family::Weight, system, &self.units)
            ),
            None => "weight information incomplete".into(),
        }
    }
}

pub fn list_recipes(conn: &mut database::Connection) -> crate::Result<()> {
    for handle in query::get_recipes(conn)? {
        println!("{}", handle.name);
    }
    Ok(())
}

pub fn show_recipe(
    conn: &mut database::Connection,
    recipe_name: &str,
    servings: Option<f64>,
    system: UnitSystem,
) -> crate::Result<()> {
    let report = RecipeReport::load(conn, recipe_name, servings)?;

    println!("{}", report.recipe.name);
    if let Some(parent) = &report.parent_name {
        match &report.recipe.variant_notes {
            Some(notes) => println!("variant of {parent} ({notes})"),
            None => println!("variant of {parent}"),
        }
    }
    if !report.recipe.description.is_empty() {
        println!("{}", report.recipe.description);
    }
    if report.servings == report.recipe.base_servings as f64 {
        println!("serves {}", format_quantity(report.servings));
    } else {
        println!(
            "serves {} (scaled from {})",
            format_quantity(report.servings),
            report.recipe.base_servings
        );
    }

    println!();
    let mut current_group: Option<&str> = None;
    for row in &report.scaled {
        if row.item_group.as_deref() != current_group {
            current_group = row.item_group.as_deref();
            if let Some(group) = current_group {
                println!("{group}:");
            }
        }
        println!(
            "  {}",
            rendered_row(row, &report.units, &report.catalog, system, report.ingredient_name(row))
        );
    }

    println!();
    println!("{}", report.cost_line());
    println!("{}", report.weight_line(system));

    if !report.recipe.instructions.is_empty() {
        println!();
        println!("{}", report.recipe.instructions);
    }
    Ok(())
}

pub fn show_cost(
    conn: &mut database::Connection,
    recipe_name: &str,
    servings: Option<f64>,
) -> crate::Result<()> {
    let report = RecipeReport::load(conn, recipe_name, servings)?;
    println!("{}", report.cost_line());
    Ok(())
}

pub fn show_weight(
    conn: &mut database::Connection,
    recipe_name: &str,
    servings: Option<f64>,
    system: UnitSystem,
) -> crate::Result<()> {
    let report = RecipeReport::load(conn, recipe_name, servings)?;
    println!("{}", report.weight_line(system));
    Ok(())
}

/// One ingredient line: quantity re-expressed in a legible unit for the
/// preferred system, falling back to the row's own unit when no conversion
/// applies. Descriptive-only rows render without a quantity.
fn rendered_row(
    row: &RecipeIngredient,
    units: &[Unit],
    catalog: &IngredientCatalog,
    system: UnitSystem,
    ingredient_name: &str,
) -> String {
    if row.quantity <= 0.0 {
        return format!("{ingredient_name} (to taste)");
    }
    let Some(unit) = catalog.unit(row.unit_id) else {
        return format!("{} {ingredient_name}", format_quantity(row.quantity));
    };

    let family = Family::from(unit.category);
    if family.is_convertible() {
        if let Ok(base) = engine::to_base_unit(row.quantity, unit) {
            return format!(
                "{} {ingredient_name}",
                rendered_base_quantity(base, family, system, units)
            );
        }
    }
    format!(
        "{} {} {ingredient_name}",
        format_quantity(row.quantity),
        unit.abbreviation
    )
}

fn rendered_base_quantity(
    base_quantity: f64,
    family: Family,
    system: UnitSystem,
    units: &[Unit],
) -> String {
    let selected = engine::select_display_unit(base_quantity, family, system, units);
    match selected.unit {
        Some(unit) => format!("{} {}", format_quantity(selected.quantity), unit.abbreviation),
        None => format_quantity(selected.quantity),
    }
}

fn format_quantity(quantity: f64) -> String {
    let formatted = format!("{quantity:.2}");
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[test]
fn quantity_formatting() {
    assert_eq!(format_quantity(2.0), "2");
    assert_eq!(format_quantity(1.5), "1.5");
    assert_eq!(format_quantity(1.0 / 3.0), "0.33");
    assert_eq!(format_quantity(0.75), "0.75");
    assert_eq!(format_quantity(1000.0), "1000");
}

#[cfg(test)]
fn render_fixture_row(quantity: f64, unit_name: &str, system: UnitSystem) -> String {
    use crate::database::models::RecipeId;
    use crate::engine::test_fixtures::unit;

    let units = crate::import::standard_units();
    let row = RecipeIngredient {
        recipe_id: RecipeId::INITIAL,
        ingredient_id: IngredientId::INITIAL,
        quantity,
        unit_id: unit(&units, unit_name).id,
        item_group: None,
    };
    let catalog = IngredientCatalog::new(units.clone(), vec![], vec![]);
    rendered_row(&row, &units, &catalog, system, "flour")
}

#[test]
fn rows_render_in_the_preferred_system() {
    assert_eq!(
        render_fixture_row(2.0, "Cup", UnitSystem::Metric),
        "473.18 mL flour"
    );
    assert_eq!(
        render_fixture_row(2.0, "Cup", UnitSystem::UsCustomary),
        "2 c flour"
    );
    assert_eq!(
        render_fixture_row(48.0, "Teaspoon", UnitSystem::UsCustomary),
        "1 c flour"
    );
    assert_eq!(
        render_fixture_row(3.0, "Each", UnitSystem::Metric),
        "3 ea flour"
    );
    assert_eq!(
        render_fixture_row(0.0, "Teaspoon", UnitSystem::Metric),
        "flour (to taste)"
    );
}

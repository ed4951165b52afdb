// Copyright 2023 Remi Bernotavicius

use super::{convert, Family, IngredientCatalog};
use crate::database::models::RecipeIngredient;

/// A cost or weight total over a whole recipe. `total` is `None` exactly
/// when `complete` is false: a partial sum is never presented as if it
/// covered every ingredient.
#[derive(Debug, PartialEq)]
pub struct Aggregate {
    pub total: Option<f64>,
    pub complete: bool,
}

impl Aggregate {
    fn complete(total: f64) -> Self {
        Self {
            total: Some(total),
            complete: true,
        }
    }

    fn incomplete() -> Self {
        Self {
            total: None,
            complete: false,
        }
    }
}

fn sum_contributions(
    ingredients: &[RecipeIngredient],
    catalog: &IngredientCatalog,
    contribution: impl Fn(&RecipeIngredient, &IngredientCatalog) -> Option<f64>,
    what: &str,
) -> Aggregate {
    let mut total = 0.0;
    for row in ingredients {
        if row.quantity <= 0.0 {
            // descriptive-only line ("salt to taste"), contributes nothing
            continue;
        }
        match contribution(row, catalog) {
            Some(value) => total += value,
            None => {
                log::debug!(
                    "no compatible {what} for ingredient {:?}, total incomplete",
                    row.ingredient_id
                );
                return Aggregate::incomplete();
            }
        }
    }
    Aggregate::complete(total)
}

/// Total monetary cost of the (already scaled) ingredient list. Returns an
/// incomplete aggregate if any priceable row has no resolvable price.
pub fn recipe_cost(ingredients: &[RecipeIngredient], catalog: &IngredientCatalog) -> Aggregate {
    sum_contributions(ingredients, catalog, cost_contribution, "price")
}

/// Total physical weight in grams of the (already scaled) ingredient list.
pub fn recipe_weight(ingredients: &[RecipeIngredient], catalog: &IngredientCatalog) -> Aggregate {
    sum_contributions(ingredients, catalog, weight_in_grams, "weight")
}

/// Resolve one row against the ingredient's stored prices. Preference
/// order: a price in the row's own unit, then a price in any unit of the
/// same convertibility family, then a weight-family price reached through
/// the ingredient's grams mapping (an ingredient measured by volume or
/// by count is often priced per kilogram).
fn cost_contribution(row: &RecipeIngredient, catalog: &IngredientCatalog) -> Option<f64> {
    let unit = catalog.unit(row.unit_id)?;
    let prices = catalog.prices(row.ingredient_id);

    if let Some(price) = prices.iter().find(|p| p.unit_id == row.unit_id) {
        return Some(row.quantity * price.price);
    }

    for price in prices {
        let Some(price_unit) = catalog.unit(price.unit_id) else {
            continue;
        };
        if let Ok(quantity) = convert::convert(row.quantity, unit, price_unit) {
            return Some(quantity * price.price);
        }
    }

    if let Some(grams) = weight_in_grams(row, catalog) {
        for price in prices {
            let Some(price_unit) = catalog.unit(price.unit_id) else {
                continue;
            };
            if Family::from(price_unit.category) != Family::Weight {
                continue;
            }
            if let Ok(quantity) = convert::from_base_unit(grams, price_unit) {
                return Some(quantity * price.price);
            }
        }
    }

    None
}

/// Weight of one row in grams. A row measured in a weight unit converts
/// directly; anything else goes through the ingredient's grams-per-default-
/// unit mapping, which requires the row's unit to be convertible into the
/// default unit.
fn weight_in_grams(row: &RecipeIngredient, catalog: &IngredientCatalog) -> Option<f64> {
    let unit = catalog.unit(row.unit_id)?;
    if Family::from(unit.category) == Family::Weight {
        return convert::to_base_unit(row.quantity, unit).ok();
    }

    let ingredient = catalog.ingredient(row.ingredient_id)?;
    let default_unit = catalog.unit(ingredient.default_unit_id)?;
    if Family::from(default_unit.category) == Family::Weight {
        // The default unit's own factor is the grams mapping, and that is
        // unreachable from a non-weight row unit.
        return None;
    }
    let grams_per_default_unit = ingredient.weight?;
    let in_default_units = convert::convert(row.quantity, unit, default_unit).ok()?;
    Some(in_default_units * grams_per_default_unit)
}

#[cfg(test)]
use super::test_fixtures::{assert_close, unit};
#[cfg(test)]
use crate::database::models::{Ingredient, IngredientId, IngredientPrice, RecipeId, Unit, UnitId};

#[cfg(test)]
struct Fixture {
    units: Vec<Unit>,
    ingredients: Vec<Ingredient>,
    prices: Vec<IngredientPrice>,
    rows: Vec<RecipeIngredient>,
    next_id: IngredientId,
}

#[cfg(test)]
impl Fixture {
    fn new() -> Self {
        Self {
            units: crate::import::standard_units(),
            ingredients: vec![],
            prices: vec![],
            rows: vec![],
            next_id: IngredientId::INITIAL,
        }
    }

    fn unit_id(&self, name: &str) -> UnitId {
        unit(&self.units, name).id
    }

    /// Add an ingredient plus one recipe row using it. `prices` are
    /// (unit name, price per unit) pairs.
    fn add(
        &mut self,
        default_unit: &str,
        weight: Option<f64>,
        prices: &[(&str, f64)],
        quantity: f64,
        row_unit: &str,
    ) -> IngredientId {
        let id = self.next_id;
        self.next_id = self.next_id.next();
        self.ingredients.push(Ingredient {
            id,
            name: format!("ingredient {id:?}"),
            default_unit_id: self.unit_id(default_unit),
            weight,
        });
        for (unit_name, price) in prices {
            self.prices.push(IngredientPrice {
                ingredient_id: id,
                unit_id: self.unit_id(unit_name),
                price: *price,
                note: None,
            });
        }
        self.rows.push(RecipeIngredient {
            recipe_id: RecipeId::INITIAL,
            ingredient_id: id,
            quantity,
            unit_id: self.unit_id(row_unit),
            item_group: None,
        });
        id
    }

    fn aggregate(self) -> (Aggregate, Aggregate) {
        let rows = self.rows;
        let catalog = IngredientCatalog::new(self.units, self.ingredients, self.prices);
        (
            recipe_cost(&rows, &catalog),
            recipe_weight(&rows, &catalog),
        )
    }
}

#[test]
fn direct_price_match_is_preferred() {
    let mut f = Fixture::new();
    // Priced both per cup and per liter; the row is in cups so the cup
    // price applies even though the liter price would also convert.
    f.add("Cup", None, &[("Cup", 0.50), ("Liter", 99.0)], 2.0, "Cup");
    let (cost, _) = f.aggregate();
    assert_eq!(cost, Aggregate::complete(1.0));
}

#[test]
fn price_converts_within_family() {
    let mut f = Fixture::new();
    // Milk priced per liter, measured in cups.
    f.add("Liter", None, &[("Liter", 1.20)], 2.0, "Cup");
    let (cost, _) = f.aggregate();
    let expected = 2.0 * convert::ML_PER_CUP / 1000.0 * 1.20;
    assert_close(cost.total.unwrap(), expected);
    assert!(cost.complete);
}

#[test]
fn weight_priced_ingredient_bridges_through_grams_mapping() {
    let mut f = Fixture::new();
    // Flour: 125 g per cup, priced per kilogram, measured in cups.
    f.add("Cup", Some(125.0), &[("Kilogram", 3.99)], 2.0, "Cup");
    let (cost, weight) = f.aggregate();
    assert_close(cost.total.unwrap(), 2.0 * 125.0 / 1000.0 * 3.99);
    assert_close(weight.total.unwrap(), 250.0);
}

#[test]
fn counted_ingredient_bridges_through_grams_mapping() {
    let mut f = Fixture::new();
    // Eggs: 50 g each, priced per kilogram, measured by count.
    f.add("Each", Some(50.0), &[("Kilogram", 8.0)], 3.0, "Each");
    let (cost, weight) = f.aggregate();
    assert_close(cost.total.unwrap(), 0.15 * 8.0);
    assert_close(weight.total.unwrap(), 150.0);
}

#[test]
fn item_prices_require_the_exact_unit() {
    let mut f = Fixture::new();
    // Priced per slice, measured in "each" -- items never cross-convert.
    f.add("Each", None, &[("Slice", 0.25)], 2.0, "Each");
    let (cost, _) = f.aggregate();
    assert_eq!(cost, Aggregate::incomplete());
}

#[test]
fn any_unresolved_ingredient_makes_the_total_incomplete() {
    let mut f = Fixture::new();
    f.add("Cup", None, &[("Cup", 0.50)], 1.0, "Cup");
    // Priced only in a weight unit, no grams mapping, so unresolvable from
    // a volume row.
    f.add("Cup", None, &[("Kilogram", 2.0)], 1.0, "Cup");
    // No stored price at all.
    f.add("Cup", None, &[], 1.0, "Cup");
    let (cost, _) = f.aggregate();
    assert_eq!(cost, Aggregate::incomplete());
}

#[test]
fn weight_unit_rows_weigh_themselves() {
    let mut f = Fixture::new();
    // Sugar measured in pounds weighs a pound, whatever its default unit.
    f.add("Cup", Some(200.0), &[], 2.0, "Pound");
    let (_, weight) = f.aggregate();
    assert_close(weight.total.unwrap(), 2.0 * convert::GRAMS_PER_POUND);
}

#[test]
fn missing_weight_mapping_makes_weight_incomplete() {
    let mut f = Fixture::new();
    f.add("Cup", None, &[], 1.0, "Cup");
    let (_, weight) = f.aggregate();
    assert_eq!(weight, Aggregate::incomplete());

    // A weight-category default unit does not help a volume row.
    let mut f = Fixture::new();
    f.add("Gram", None, &[], 1.0, "Cup");
    let (_, weight) = f.aggregate();
    assert_eq!(weight, Aggregate::incomplete());
}

#[test]
fn descriptive_rows_are_skipped() {
    let mut f = Fixture::new();
    f.add("Cup", Some(125.0), &[("Cup", 0.50)], 2.0, "Cup");
    // "to taste": no quantity, no price, no weight -- still a complete total.
    f.add("Each", None, &[], 0.0, "Each");
    let (cost, weight) = f.aggregate();
    assert_eq!(cost, Aggregate::complete(1.0));
    assert_close(weight.total.unwrap(), 250.0);
}

#[test]
fn empty_recipe_totals_to_zero() {
    let f = Fixture::new();
    let (cost, weight) = f.aggregate();
    assert_eq!(cost, Aggregate::complete(0.0));
    assert_eq!(weight, Aggregate::complete(0.0));
}

#[test]
fn scaled_recipe_end_to_end() {
    use crate::database::models::UnitSystem;

    // Two cups of an ingredient priced $3.99/kg with 125 g/cup, recipe for
    // six servings scaled down to one.
    let mut f = Fixture::new();
    f.add("Cup", Some(125.0), &[("Kilogram", 3.99)], 2.0, "Cup");

    let scaled = super::scale_recipe(&f.rows, 1.0, 6.0).unwrap();
    assert_close(scaled[0].quantity, 2.0 / 6.0);

    let units = f.units.clone();
    let row_unit = unit(&units, "Cup").clone();
    f.rows = scaled.clone();
    let (cost, weight) = f.aggregate();

    let grams = 2.0 / 6.0 * 125.0;
    assert_close(weight.total.unwrap(), grams);
    assert_close(cost.total.unwrap(), grams / 1000.0 * 3.99);

    // A third of a cup reads in fluid ounces on screen.
    let base = convert::to_base_unit(scaled[0].quantity, &row_unit).unwrap();
    let display =
        super::select_display_unit(base, Family::Volume, UnitSystem::UsCustomary, &units);
    assert_eq!(display.unit.unwrap().name, "Fluid Ounce");
    assert_close(display.quantity, 2.0 / 6.0 * 8.0);
}

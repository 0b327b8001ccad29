use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::plans::repo_types::{
    ingredients_key, IngredientLine, PlanField, PlanFields, WeekKey, ADDITIONAL_INGREDIENTS,
};

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub week: Option<String>,
}

lazy_static! {
    static ref LIST_FIELD_RE: Regex = Regex::new(
        r"^(monday|tuesday|wednesday|thursday|friday|saturday|sunday|additional)_(ingredients|quantities)\[\]$"
    )
    .unwrap();
    static ref MEAL_FIELD_RE: Regex = Regex::new(
        r"^(monday|tuesday|wednesday|thursday|friday|saturday|sunday)_[a-z0-9_]+$"
    )
    .unwrap();
}

fn is_meal_text_field(key: &str) -> bool {
    key == "notes"
        || (MEAL_FIELD_RE.is_match(key)
            && !key.ends_with("_ingredients")
            && !key.ends_with("_quantities"))
}

#[derive(Default)]
struct ListInput {
    ids: Vec<String>,
    quantities: Vec<String>,
}

/// A `save_week` form checked against the plan schema: the week key plus
/// only the fields this save touches.
#[derive(Debug, PartialEq)]
pub struct SaveWeekInput {
    pub week: WeekKey,
    pub fields: PlanFields,
}

impl SaveWeekInput {
    /// Parse raw urlencoded pairs. Repeated `…[]` keys keep their order;
    /// unknown keys are rejected.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> AppResult<Self> {
        let mut week = None;
        let mut fields = PlanFields::new();
        let mut lists: BTreeMap<String, ListInput> = BTreeMap::new();

        for (key, value) in pairs {
            let list_field = LIST_FIELD_RE
                .captures(&key)
                .map(|caps| (caps[1].to_string(), &caps[2] == "ingredients"));

            if key == "week" {
                week = Some(value);
            } else if let Some((prefix, is_ids)) = list_field {
                let list = lists.entry(prefix).or_default();
                if is_ids {
                    list.ids.push(value);
                } else {
                    list.quantities.push(value);
                }
            } else if is_meal_text_field(&key) {
                fields.insert(key, PlanField::Text(value));
            } else {
                return Err(AppError::invalid(key, "not a meal plan field"));
            }
        }

        let week = WeekKey::parse(week.as_deref().unwrap_or_default())?;

        for (prefix, list) in lists {
            let lines = ingredient_lines(&prefix, list)?;
            if lines.is_empty() {
                // nothing selected: leave any stored list alone
                continue;
            }
            let key = if prefix == "additional" {
                ADDITIONAL_INGREDIENTS.to_string()
            } else {
                ingredients_key(&prefix)
            };
            fields.insert(key, PlanField::Ingredients(lines));
        }

        Ok(Self { week, fields })
    }
}

/// Pair each id with the quantity at the same position; a missing or blank
/// quantity means 1 and a blank id is an unused row.
fn ingredient_lines(prefix: &str, list: ListInput) -> AppResult<Vec<IngredientLine>> {
    let mut lines = Vec::with_capacity(list.ids.len());
    for (i, raw_id) in list.ids.iter().enumerate() {
        let raw_id = raw_id.trim();
        if raw_id.is_empty() {
            continue;
        }
        let id = raw_id.parse::<i64>().map_err(|_| {
            AppError::invalid(format!("{prefix}_ingredients[]"), format!("{raw_id:?} is not an item id"))
        })?;
        let qty = match list.quantities.get(i).map(|q| q.trim()) {
            None | Some("") => 1,
            Some(q) => q
                .parse::<u32>()
                .ok()
                .filter(|q| *q > 0)
                .ok_or_else(|| {
                    AppError::invalid(
                        format!("{prefix}_quantities[]"),
                        format!("{q:?} is not a positive quantity"),
                    )
                })?,
        };
        lines.push(IngredientLine { id, qty });
    }
    Ok(lines)
}

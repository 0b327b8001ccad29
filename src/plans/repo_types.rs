use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, AppResult};

/// Day keys in planning order.
pub const DAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

pub const ADDITIONAL_INGREDIENTS: &str = "additional_ingredients";

pub fn ingredients_key(day: &str) -> String {
    format!("{day}_ingredients")
}

/// Key of a week plan, e.g. `2025-W07`. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WeekKey(String);

impl WeekKey {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::MissingParameter("week"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    #[serde(deserialize_with = "lenient_id")]
    pub id: i64,
    #[serde(default = "default_qty")]
    pub qty: u32,
}

fn default_qty() -> u32 {
    1
}

/// Rows saved by older clients carry the id as a numeric string.
fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(i64),
        Text(String),
    }
    match RawId::deserialize(d)? {
        RawId::Num(n) => Ok(n),
        RawId::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Value of one plan field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanField {
    Text(String),
    Ingredients(Vec<IngredientLine>),
    /// Anything else found in storage; kept so a bad row cannot make the
    /// whole plan unreadable.
    Other(serde_json::Value),
}

pub type PlanFields = BTreeMap<String, PlanField>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekPlan {
    pub week: WeekKey,
    #[serde(flatten)]
    pub fields: PlanFields,
}

impl WeekPlan {
    fn lines(&self, key: &str) -> &[IngredientLine] {
        match self.fields.get(key) {
            Some(PlanField::Ingredients(lines)) => lines,
            _ => &[],
        }
    }

    /// Ingredient lines of `day` in stored order; empty when absent.
    pub fn ingredients_for(&self, day: &str) -> &[IngredientLine] {
        self.lines(&ingredients_key(day))
    }

    pub fn additional(&self) -> &[IngredientLine] {
        self.lines(ADDITIONAL_INGREDIENTS)
    }
}

/// Key-wise overlay: keys in `partial` win, the rest of `base` survives.
pub fn merge_fields(base: &mut PlanFields, partial: &PlanFields) {
    base.extend(partial.iter().map(|(k, v)| (k.clone(), v.clone())));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn week_key_rejects_blank() {
        assert!(matches!(WeekKey::parse("  "), Err(AppError::MissingParameter("week"))));
        assert_eq!(WeekKey::parse(" 2025-W07 ").unwrap().as_str(), "2025-W07");
    }

    #[test]
    fn reads_legacy_string_ids_and_default_qty() {
        let fields: PlanFields = serde_json::from_value(json!({
            "monday_dinner": "Lasagna",
            "monday_ingredients": [{"id": "1234567890", "qty": 2}, {"id": 42}],
        }))
        .unwrap();
        assert_eq!(fields["monday_dinner"], PlanField::Text("Lasagna".into()));
        assert_eq!(
            fields["monday_ingredients"],
            PlanField::Ingredients(vec![
                IngredientLine { id: 1_234_567_890, qty: 2 },
                IngredientLine { id: 42, qty: 1 },
            ])
        );
    }

    #[test]
    fn malformed_lists_are_kept_but_read_as_empty() {
        let fields: PlanFields = serde_json::from_value(json!({
            "tuesday_ingredients": [{"id": "not-a-number"}],
        }))
        .unwrap();
        let plan = WeekPlan {
            week: WeekKey::parse("w").unwrap(),
            fields,
        };
        assert!(matches!(plan.fields["tuesday_ingredients"], PlanField::Other(_)));
        assert!(plan.ingredients_for("tuesday").is_empty());
        assert!(plan.ingredients_for("friday").is_empty());
    }

    #[test]
    fn plan_serializes_flat() {
        let mut fields = PlanFields::new();
        fields.insert("notes".into(), PlanField::Text("busy week".into()));
        let plan = WeekPlan {
            week: WeekKey::parse("2025-W07").unwrap(),
            fields,
        };
        assert_eq!(
            serde_json::to_value(&plan).unwrap(),
            json!({"week": "2025-W07", "notes": "busy week"})
        );
    }
}

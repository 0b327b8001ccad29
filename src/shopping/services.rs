use std::collections::{BTreeSet, HashMap};

use bytes::Bytes;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::plans::repo_types::{WeekKey, WeekPlan, DAYS};
use crate::plans::services::get_week;
use crate::shopping::dto::ShoppingList;
use crate::state::AppState;

/// Directory names and pantry counts for the ids a plan references.
/// Ids missing from `names` are dangling references.
#[derive(Debug, Default, Clone)]
pub struct StockSnapshot {
    pub names: HashMap<i64, String>,
    pub counts: HashMap<i64, u64>,
}

impl StockSnapshot {
    fn count(&self, id: i64) -> u64 {
        self.counts.get(&id).copied().unwrap_or(0)
    }
}

/// Split a week's ingredients into what must be bought and what should be
/// checked.
///
/// Days are walked monday to sunday, each in stored line order. A line
/// whose stock falls short goes to `buy`; one that would use up exactly
/// the stock on hand goes to `check`; anything with surplus is dropped.
/// `additional_ingredients` are always bought. Unknown ids are skipped and
/// repeated names are kept, one entry per occurrence.
pub fn derive(plan: &WeekPlan, stock: &StockSnapshot) -> ShoppingList {
    let mut list = ShoppingList::default();

    for day in DAYS {
        for line in plan.ingredients_for(day) {
            let Some(name) = stock.names.get(&line.id) else {
                debug!(day, id = line.id, "skipping unknown ingredient");
                continue;
            };
            let shortfall = stock.count(line.id) as i64 - i64::from(line.qty);
            if shortfall < 0 {
                list.buy.push(name.clone());
            } else if shortfall == 0 {
                list.check.push(name.clone());
            }
        }
    }

    for line in plan.additional() {
        match stock.names.get(&line.id) {
            Some(name) => list.buy.push(name.clone()),
            None => debug!(id = line.id, "skipping unknown additional item"),
        }
    }

    list
}

/// Look up every id the plan references, once each.
pub async fn load_snapshot(state: &AppState, plan: &WeekPlan) -> AppResult<StockSnapshot> {
    let ids: BTreeSet<i64> = DAYS
        .iter()
        .flat_map(|day| plan.ingredients_for(day))
        .chain(plan.additional())
        .map(|line| line.id)
        .collect();

    let mut snapshot = StockSnapshot::default();
    for id in ids {
        if let Some(item) = state.directory.get(id).await? {
            snapshot.names.insert(id, item.name);
            snapshot.counts.insert(id, state.pantry.count(id).await?);
        }
    }
    Ok(snapshot)
}

pub async fn shopping_list(state: &AppState, week: &WeekKey) -> AppResult<ShoppingList> {
    let plan = get_week(state, week).await?;
    let stock = load_snapshot(state, &plan).await?;
    let list = derive(&plan, &stock);
    info!(%week, buy = list.buy.len(), check = list.check.len(), "shopping list derived");
    Ok(list)
}

pub async fn shopping_list_document(state: &AppState, week: &WeekKey) -> AppResult<Bytes> {
    let list = shopping_list(state, week).await?;
    state
        .documents
        .render(week.as_str(), &list.check, &list.buy)
        .map_err(AppError::Render)
}

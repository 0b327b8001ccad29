use serde::Serialize;

/// Derived lists, in append order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingList {
    pub buy: Vec<String>,
    pub check: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ShoppingListResponse {
    pub week: String,
    #[serde(flatten)]
    pub list: ShoppingList,
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SerialForm {
    pub serial: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ItemIdForm {
    pub item_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IntakeForm {
    pub item_id: Option<String>,
    pub expiration_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ItemCountResponse {
    pub item_id: i64,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct IntakeResponse {
    pub serial: i64,
    pub label_url: String,
}

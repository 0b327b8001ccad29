use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LabelQuery {
    pub serial: Option<String>,
    pub item_id: Option<String>,
    pub expiration_date: Option<String>,
}

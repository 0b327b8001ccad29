use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("APP_PORT") {
            Some(v) => v.parse::<u16>().context("APP_PORT must be a port number")?,
            None => 8080,
        };

        let store = match lookup("STORE_BACKEND").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => anyhow::bail!("unknown STORE_BACKEND {other:?}"),
        };

        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let database = match database_url(&lookup)? {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections,
            }),
            None if store == StoreBackend::Postgres => {
                anyhow::bail!("DATABASE_URL (or DB_HOST/DB_NAME/DB_USER/DB_PASSWORD) is required")
            }
            None => None,
        };

        Ok(Self {
            host,
            port,
            store,
            database,
        })
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            store: StoreBackend::Memory,
            database: None,
        }
    }
}

/// `DATABASE_URL` wins; otherwise the URL is composed from the discrete
/// `DB_*` variables, all of which must be present except the port.
fn database_url(lookup: &impl Fn(&str) -> Option<String>) -> anyhow::Result<Option<String>> {
    if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
        return Ok(Some(url));
    }
    let Some(host) = lookup("DB_HOST").filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let name = lookup("DB_NAME").context("No database name specified")?;
    let user = lookup("DB_USER").context("No database user specified")?;
    let password = lookup("DB_PASSWORD").context("No database password specified")?;
    let port = match lookup("DB_PORT") {
        Some(v) => v.parse::<u16>().context("DB_PORT must be a port number")?,
        None => 5432,
    };
    Ok(Some(format!(
        "postgres://{user}:{password}@{host}:{port}/{name}"
    )))
}

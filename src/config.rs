// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{db::DashboardRepository, services::DashboardService};

// Configuração lida do ambiente (.env em desenvolvimento)
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            bind_addr: "0.0.0.0:3000".to_string(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(3),
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or(defaults.bind_addr);

        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: {raw}"))?,
            Err(_) => defaults.max_connections,
        };

        let acquire_timeout = match env::var("DB_ACQUIRE_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse()
                    .with_context(|| format!("DB_ACQUIRE_TIMEOUT_SECS inválido: {raw}"))?,
            ),
            Err(_) => defaults.acquire_timeout,
        };

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            acquire_timeout,
        })
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }

    pub async fn connect_pool(&self) -> anyhow::Result<PgPool> {
        let pool = self
            .pool_options()
            .connect(&self.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(pool)
    }

    /// Pool que só conecta no primeiro uso.
    #[cfg(test)]
    pub fn lazy_pool(&self) -> anyhow::Result<PgPool> {
        Ok(self.pool_options().connect_lazy(&self.database_url)?)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let db_pool = settings.connect_pool().await?;

        // --- Monta o gráfico de dependências ---
        let dashboard_repo = DashboardRepository::new(db_pool.clone());
        let dashboard_service = DashboardService::new(Arc::new(dashboard_repo));

        Ok(Self {
            db_pool,
            dashboard_service,
        })
    }
}

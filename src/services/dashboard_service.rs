// src/services/dashboard_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::StatsReader,
    models::dashboard::{DashboardStats, DateRange, StatsPeriod},
    services::stats,
};

#[derive(Clone)]
pub struct DashboardService {
    reader: Arc<dyn StatsReader>,
}

impl DashboardService {
    pub fn new(reader: Arc<dyn StatsReader>) -> Self {
        Self { reader }
    }

    /// Indicadores da loja no período. Nunca falha: se a leitura der erro,
    /// o dashboard recebe tudo zerado (e o erro vai para o log).
    pub async fn compute_stats(
        &self,
        store_id: Uuid,
        period: StatsPeriod,
        now: DateTime<Utc>,
    ) -> DashboardStats {
        match self.try_compute_stats(store_id, period, now).await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::error!(
                    %store_id,
                    period = period.as_str(),
                    "Falha ao calcular estatísticas do dashboard, retornando zeros: {}",
                    e
                );
                DashboardStats::default()
            }
        }
    }

    async fn try_compute_stats(
        &self,
        store_id: Uuid,
        period: StatsPeriod,
        now: DateTime<Utc>,
    ) -> Result<DashboardStats, AppError> {
        let range = DateRange::ending_at(now, period);

        // 1. Tickets da janela
        let tickets = self.reader.fetch_tickets(store_id, range).await?;

        // 2. Despesas só dos concluídos (depende da lista acima)
        let completed_ids: Vec<Uuid> = tickets
            .iter()
            .filter(|t| t.is_completed())
            .map(|t| t.id)
            .collect();

        let expenses = if completed_ids.is_empty() {
            Vec::new()
        } else {
            self.reader.fetch_expenses(store_id, &completed_ids).await?
        };

        tracing::debug!(
            %store_id,
            tickets = tickets.len(),
            expenses = expenses.len(),
            "Calculando estatísticas do dashboard"
        );

        Ok(stats::compute_stats(&tickets, &expenses, period, now.date_naive()))
    }
}

// src/db/dashboard_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::dashboard::{DateRange, ExpenseRecord, TicketRecord},
};

/// Leituras que o dashboard precisa. Implementado pelo Postgres em produção
/// e por fakes em memória nos testes.
#[async_trait]
pub trait StatsReader: Send + Sync {
    /// Tickets da loja criados dentro da janela (qualquer status).
    async fn fetch_tickets(
        &self,
        store_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<TicketRecord>, AppError>;

    /// Despesas lançadas nos tickets informados.
    async fn fetch_expenses(
        &self,
        store_id: Uuid,
        ticket_ids: &[Uuid],
    ) -> Result<Vec<ExpenseRecord>, AppError>;
}

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsReader for DashboardRepository {
    async fn fetch_tickets(
        &self,
        store_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<TicketRecord>, AppError> {
        let tickets = sqlx::query_as::<_, TicketRecord>(
            r#"
            SELECT id, status, actual_cost, estimated_cost, actual_completion_date, created_at
            FROM tickets
            WHERE store_id = $1
              AND created_at >= $2
              AND created_at <= $3
            "#,
        )
            .bind(store_id)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool)
            .await?;

        Ok(tickets)
    }

    async fn fetch_expenses(
        &self,
        store_id: Uuid,
        ticket_ids: &[Uuid],
    ) -> Result<Vec<ExpenseRecord>, AppError> {
        // ANY($2) com array vazio não retorna nada, mas evitamos a ida ao banco
        if ticket_ids.is_empty() {
            return Ok(Vec::new());
        }

        let expenses = sqlx::query_as::<_, ExpenseRecord>(
            r#"
            SELECT e.quantity, e.price, e.created_at, e.ticket_id
            FROM ticket_expenses e
            JOIN tickets t ON e.ticket_id = t.id
            WHERE t.store_id = $1
              AND e.ticket_id = ANY($2)
            "#,
        )
            .bind(store_id)
            .bind(ticket_ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(expenses)
    }
}

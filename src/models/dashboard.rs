// src/models/dashboard.rs

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "ticket_status", rename_all = "snake_case")]
pub enum TicketStatus {
    Pending,
    InProgress,
    WaitingParts,
    Completed,
    Cancelled,
}

// --- Visões de leitura (só o que o dashboard consome) ---

// 1. Ticket de reparo
#[derive(Debug, Clone, FromRow)]
pub struct TicketRecord {
    pub id: Uuid,
    pub status: TicketStatus,
    pub actual_cost: Option<Decimal>,
    pub estimated_cost: Option<Decimal>,
    pub actual_completion_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TicketRecord {
    pub fn is_completed(&self) -> bool {
        self.status == TicketStatus::Completed
    }

    /// Valor faturado: custo real, senão o estimado, senão zero.
    pub fn billed_amount(&self) -> Decimal {
        self.actual_cost
            .or(self.estimated_cost)
            .unwrap_or(Decimal::ZERO)
    }

    /// Data usada para posicionar a receita no gráfico.
    pub fn income_date(&self) -> DateTime<Utc> {
        self.actual_completion_date.unwrap_or(self.created_at)
    }
}

// 2. Despesa (peça/material) lançada num ticket
#[derive(Debug, Clone, FromRow)]
pub struct ExpenseRecord {
    pub quantity: Decimal,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub ticket_id: Uuid,
}

impl ExpenseRecord {
    pub fn amount(&self) -> Decimal {
        self.quantity * self.price
    }
}

// --- Período do relatório ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsPeriod {
    Week,
    #[default]
    Month,
    HalfYear,
    Year,
}

impl StatsPeriod {
    /// Valores desconhecidos (ou ausentes) caem no padrão de 30 dias.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("7d") => Self::Week,
            Some("30d") => Self::Month,
            Some("180d") => Self::HalfYear,
            Some("360d") => Self::Year,
            _ => Self::Month,
        }
    }

    pub fn days(self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::HalfYear => 180,
            Self::Year => 360,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Week => "7d",
            Self::Month => "30d",
            Self::HalfYear => "180d",
            Self::Year => "360d",
        }
    }
}

// Janela [now - dias, now] usada na consulta de tickets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn ending_at(now: DateTime<Utc>, period: StatsPeriod) -> Self {
        Self {
            start: now - Duration::days(period.days()),
            end: now,
        }
    }
}

// Query string do endpoint (?period=30d)
#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// 7d, 30d, 180d ou 360d (padrão: 30d)
    #[param(example = "30d")]
    pub period: Option<String>,
}

impl StatsQuery {
    /// Monta a partir dos pares crus da query string. Chave repetida não é
    /// erro: vale a primeira ocorrência.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let period = pairs
            .into_iter()
            .find(|(key, _)| key == "period")
            .map(|(_, value)| value);

        Self { period }
    }

    pub fn period(&self) -> StatsPeriod {
        StatsPeriod::parse(self.period.as_deref())
    }
}

// --- Respostas ---

// Um ponto do gráfico de receita x despesa
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataPoint {
    #[schema(example = "2025-03-10")]
    pub date: String,
    #[schema(example = 350.0)]
    pub income: f64,
    #[schema(example = 95.0)]
    pub expenses: f64,
    #[schema(example = 255.0)]
    pub profit: f64,
    #[schema(example = 72.86)]
    pub profit_percentage: f64,
}

// Cards do topo + série do gráfico
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[schema(example = 42)]
    pub total_repairs: u64,
    #[schema(example = 5)]
    pub in_progress_repairs: u64,
    #[schema(example = 3)]
    pub waiting_repairs: u64,
    #[schema(example = 3500.0)]
    pub income: f64,
    #[schema(example = 950.0)]
    pub expenses: f64,
    #[schema(example = 2550.0)]
    pub gross_profit: f64,
    #[schema(example = 72.86)]
    pub gross_profit_percentage: f64,
    #[schema(example = 2.5)]
    pub average_repair_time: f64,
    #[schema(example = 80.95)]
    pub completion_rate: f64,
    pub chart_data: Vec<ChartDataPoint>,
}

// src/services/stats.rs

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::models::dashboard::{
    ChartDataPoint, DashboardStats, ExpenseRecord, StatsPeriod, TicketRecord, TicketStatus,
};

const MILLIS_PER_DAY: i64 = 86_400_000;

// Granularidade do gráfico, escolhida pelo tamanho do período
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketInterval {
    Daily,
    Weekly,
    Monthly,
}

impl BucketInterval {
    pub fn for_days(days: i64) -> Self {
        match days {
            d if d <= 30 => Self::Daily,
            d if d <= 180 => Self::Weekly,
            _ => Self::Monthly,
        }
    }

    fn step_back(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Daily => date.checked_sub_signed(Duration::days(1)),
            Self::Weekly => date.checked_sub_signed(Duration::days(7)),
            // Mês de calendário: 30 dias fixos pulariam fevereiro
            Self::Monthly => date.checked_sub_months(Months::new(1)),
        }
    }
}

/// Chave do bucket que contém `date`.
///
/// Diário: `YYYY-MM-DD`. Semanal: segunda-feira da semana ISO, `YYYY-MM-DD`.
/// Mensal: `YYYY-MM`. As chaves são zero-padded, então a ordem lexicográfica
/// é a ordem cronológica.
pub fn bucket_key_for(date: NaiveDate, interval: BucketInterval) -> String {
    match interval {
        BucketInterval::Daily => date.format("%Y-%m-%d").to_string(),
        BucketInterval::Weekly => {
            let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
            monday.format("%Y-%m-%d").to_string()
        }
        BucketInterval::Monthly => date.format("%Y-%m").to_string(),
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Bucket {
    income: Decimal,
    expenses: Decimal,
}

// Pré-cria todos os buckets de [today - days, today] para o gráfico não ter buracos
fn seed_buckets(today: NaiveDate, days: i64, interval: BucketInterval) -> BTreeMap<String, Bucket> {
    let start = today - Duration::days(days);
    let mut buckets = BTreeMap::new();
    let mut cursor = today;

    loop {
        buckets
            .entry(bucket_key_for(cursor, interval))
            .or_insert_with(Bucket::default);

        if cursor <= start {
            break;
        }

        cursor = match interval.step_back(cursor) {
            Some(prev) if prev > start => prev,
            _ => start,
        };
    }

    buckets
}

fn round_to(value: Decimal, dp: u32) -> f64 {
    value
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

fn round2(value: Decimal) -> f64 {
    round_to(value, 2)
}

fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole > Decimal::ZERO {
        part / whole * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// Calcula os indicadores do dashboard e a série do gráfico.
///
/// `tickets` são todos os tickets da loja criados na janela do período;
/// `expenses` são as despesas dos tickets concluídos. Função pura: mesma
/// entrada, mesma saída.
pub fn compute_stats(
    tickets: &[TicketRecord],
    expenses: &[ExpenseRecord],
    period: StatsPeriod,
    today: NaiveDate,
) -> DashboardStats {
    let interval = BucketInterval::for_days(period.days());
    let mut buckets = seed_buckets(today, period.days(), interval);

    let mut in_progress_repairs = 0u64;
    let mut waiting_repairs = 0u64;
    let mut completed_repairs = 0u64;
    let mut income = Decimal::ZERO;
    let mut repair_days = Decimal::ZERO;
    let mut timed_repairs = 0u64;

    for ticket in tickets {
        match ticket.status {
            TicketStatus::InProgress => in_progress_repairs += 1,
            TicketStatus::Pending | TicketStatus::WaitingParts => waiting_repairs += 1,
            TicketStatus::Cancelled => {}
            TicketStatus::Completed => {
                completed_repairs += 1;

                let amount = ticket.billed_amount();
                income += amount;
                if !amount.is_zero() {
                    let key = bucket_key_for(ticket.income_date().date_naive(), interval);
                    if let Some(bucket) = buckets.get_mut(&key) {
                        bucket.income += amount;
                    }
                }

                // Duração zero ou negativa (mesmo timestamp, relógio torto) fica de fora
                if let Some(done) = ticket.actual_completion_date {
                    let millis = (done - ticket.created_at).num_milliseconds();
                    if millis > 0 {
                        repair_days += Decimal::from(millis) / Decimal::from(MILLIS_PER_DAY);
                        timed_repairs += 1;
                    }
                }
            }
        }
    }

    let mut total_expenses = Decimal::ZERO;
    for expense in expenses {
        let amount = expense.amount();
        total_expenses += amount;

        let key = bucket_key_for(expense.created_at.date_naive(), interval);
        if let Some(bucket) = buckets.get_mut(&key) {
            bucket.expenses += amount;
        }
    }

    let total_repairs = tickets.len() as u64;
    let gross_profit = income - total_expenses;
    let average_repair_time = if timed_repairs > 0 {
        repair_days / Decimal::from(timed_repairs)
    } else {
        Decimal::ZERO
    };

    let chart_data = buckets
        .into_iter()
        .map(|(date, bucket)| {
            let profit = bucket.income - bucket.expenses;
            ChartDataPoint {
                date,
                income: round2(bucket.income),
                expenses: round2(bucket.expenses),
                profit: round2(profit),
                profit_percentage: round2(percentage(profit, bucket.income)),
            }
        })
        .collect();

    DashboardStats {
        total_repairs,
        in_progress_repairs,
        waiting_repairs,
        income: round2(income),
        expenses: round2(total_expenses),
        gross_profit: round2(gross_profit),
        gross_profit_percentage: round2(percentage(gross_profit, income)),
        average_repair_time: round_to(average_repair_time, 1),
        completion_rate: round2(percentage(
            Decimal::from(completed_repairs),
            Decimal::from(total_repairs),
        )),
        chart_data,
    }
}

// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Dashboard ---
        handlers::dashboard::get_stats,
    ),
    components(
        schemas(
            // --- DASHBOARD ---
            models::dashboard::ChartDataPoint,
            models::dashboard::DashboardStats,
        )
    ),
    tags(
        (name = "Dashboard", description = "Indicadores de reparos, receita e despesas por loja")
    )
)]
pub struct ApiDoc;

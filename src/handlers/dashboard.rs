// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid; // Importante para o Swagger params

use crate::{
    config::AppState,
    middleware::tenancy::StoreContext,
    models::dashboard::{DashboardStats, StatsQuery},
};

// GET /api/dashboard/stats?period=30d
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores de reparos e financeiro do período (zerados se a leitura falhar)", body = DashboardStats),
        (status = 400, description = "Cabeçalho x-store-id ausente ou inválido")
    ),
    params(
        StatsQuery,
        ("x-store-id" = Uuid, Header, description = "ID da Loja")
    )
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    store: StoreContext,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {

    // Pares crus: ?period=7d&period=30d não pode virar 400
    let period = StatsQuery::from_pairs(pairs).period();

    let stats = app_state.dashboard_service
        .compute_stats(store.0, period, Utc::now())
        .await;

    (StatusCode::OK, Json(stats))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use chrono::Duration;
    use rust_decimal::Decimal;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{
        config::{AppState, Settings},
        models::dashboard::{TicketRecord, TicketStatus},
        services::{
            dashboard_service::tests::{FailingReader, MemoryReader},
            DashboardService,
        },
    };

    fn build_app(service: DashboardService) -> Router {
        let settings = Settings {
            database_url: "postgres://localhost/repair_dashboard_test".into(),
            ..Settings::default()
        };
        // Pool preguiçoso: nunca conecta, o leitor é o fake
        let db_pool = settings.lazy_pool().unwrap();
        crate::app(AppState { db_pool, dashboard_service: service })
    }

    async fn do_get(app: Router, uri: &str, store: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().uri(uri);
        if let Some(store) = store {
            request = request.header("x-store-id", store);
        }
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_stats_response_shape() {
        let now = chrono::Utc::now();
        let reader = MemoryReader {
            tickets: vec![TicketRecord {
                id: Uuid::new_v4(),
                status: TicketStatus::Completed,
                actual_cost: Some(Decimal::new(8000, 2)),
                estimated_cost: None,
                actual_completion_date: Some(now - Duration::hours(1)),
                created_at: now - Duration::days(2),
            }],
            ..Default::default()
        };
        let app = build_app(DashboardService::new(Arc::new(reader)));
        let store = Uuid::new_v4().to_string();

        let (status, json) = do_get(app, "/api/dashboard/stats?period=7d", Some(&store)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["totalRepairs"], 1);
        assert_eq!(json["income"], 80.0);
        assert_eq!(json["completionRate"], 100.0);
        assert_eq!(json["chartData"].as_array().unwrap().len(), 8);
        assert!(json["chartData"][0]["profitPercentage"].is_number());
    }

    #[tokio::test]
    async fn test_unknown_period_falls_back_to_30_days() {
        let app = build_app(DashboardService::new(Arc::new(MemoryReader::default())));
        let store = Uuid::new_v4().to_string();

        let (status, json) = do_get(app, "/api/dashboard/stats?period=2y", Some(&store)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["chartData"].as_array().unwrap().len(), 31);
    }

    #[tokio::test]
    async fn test_repeated_period_uses_first_value() {
        let app = build_app(DashboardService::new(Arc::new(MemoryReader::default())));
        let store = Uuid::new_v4().to_string();

        let (status, json) = do_get(app, "/api/dashboard/stats?period=7d&period=30d", Some(&store)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["chartData"].as_array().unwrap().len(), 8);
        assert_eq!(json["completionRate"], 0.0);
    }

    #[tokio::test]
    async fn test_store_failure_is_still_ok_with_zeros() {
        let app = build_app(DashboardService::new(Arc::new(FailingReader { fail_on_expenses: false })));
        let store = Uuid::new_v4().to_string();

        let (status, json) = do_get(app, "/api/dashboard/stats", Some(&store)).await;

        assert_eq!(status, StatusCode::OK);
        for field in [
            "totalRepairs",
            "inProgressRepairs",
            "waitingRepairs",
            "income",
            "expenses",
            "grossProfit",
            "grossProfitPercentage",
            "averageRepairTime",
            "completionRate",
        ] {
            assert_eq!(json[field].as_f64(), Some(0.0), "{field}");
        }
        assert_eq!(json["chartData"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_missing_store_header_is_bad_request() {
        let app = build_app(DashboardService::new(Arc::new(MemoryReader::default())));

        let (status, json) = do_get(app, "/api/dashboard/stats", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }
}

/*
 * REST API module for the yield aggregation service
 */

use crate::models::{AprSnapshot, DexPoolStats, LendingPoolStats};
use crate::service::YieldService;
use chrono::Utc;
use rocket::http::{ContentType, Status};
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{get, routes, State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

pub struct ApiState {
    pub service: Arc<YieldService>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
    pub timestamp: i64,
}

impl<T> DataResponse<T> {
    fn now(data: T) -> Self {
        Self {
            data,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiResult<T> = std::result::Result<Json<T>, Custom<Json<ErrorBody>>>;

fn failure(status: Status, message: impl Into<String>) -> Custom<Json<ErrorBody>> {
    Custom(
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

#[get("/api/v1/apr")]
pub async fn get_all_apr(state: &State<ApiState>) -> ApiResult<AprSnapshot> {
    let snapshot = state.service.all_pool_stats().await.map_err(|e| {
        error!("Error fetching APR data: {e}");
        failure(Status::InternalServerError, "Failed to fetch APR data")
    })?;
    Ok(Json(snapshot))
}

#[get("/api/v1/apr/ekubo")]
pub async fn get_ekubo_apr(state: &State<ApiState>) -> ApiResult<DataResponse<Vec<DexPoolStats>>> {
    let pools = state.service.dex_pool_stats().await.map_err(|e| {
        error!("Error fetching Ekubo data: {e}");
        failure(Status::InternalServerError, "Failed to fetch Ekubo data")
    })?;
    Ok(Json(DataResponse::now(pools)))
}

#[get("/api/v1/apr/zklend")]
pub async fn get_zklend_apr(
    state: &State<ApiState>,
) -> ApiResult<DataResponse<Vec<LendingPoolStats>>> {
    let markets = state.service.lending_pool_stats().await.map_err(|e| {
        error!("Error fetching zkLend data: {e}");
        failure(Status::InternalServerError, "Failed to fetch zkLend data")
    })?;
    Ok(Json(DataResponse::now(markets)))
}

#[get("/api/v1/apr/zklend/<symbol>")]
pub async fn get_zklend_market(
    symbol: &str,
    state: &State<ApiState>,
) -> ApiResult<DataResponse<LendingPoolStats>> {
    let market = state
        .service
        .lending_pool_stats_by_token(symbol)
        .await
        .map_err(|e| {
            error!("Error fetching zkLend market {symbol}: {e}");
            failure(Status::InternalServerError, "Failed to fetch zkLend data")
        })?
        .ok_or_else(|| {
            failure(
                Status::NotFound,
                format!("No zkLend market for {}", symbol.to_uppercase()),
            )
        })?;
    Ok(Json(DataResponse::now(market)))
}

#[get("/metrics")]
pub async fn render_metrics(state: &State<ApiState>) -> std::result::Result<(ContentType, String), Status> {
    state
        .service
        .metrics()
        .render()
        .map(|text| (ContentType::Plain, text))
        .map_err(|e| {
            error!("Error rendering metrics: {e}");
            Status::InternalServerError
        })
}

#[get("/health")]
pub async fn health_check() -> &'static str {
    "OK"
}

#[must_use]
pub fn create_rocket(state: ApiState) -> rocket::Rocket<rocket::Build> {
    rocket::build().manage(state).mount(
        "/",
        routes![
            get_all_apr,
            get_ekubo_apr,
            get_zklend_apr,
            get_zklend_market,
            render_metrics,
            health_check
        ],
    )
}

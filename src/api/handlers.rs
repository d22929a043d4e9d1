use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::cache::{EntityKind, QueryCache};
use crate::db::source::{DateRange, RecordSource};
use crate::error::ReportError;
use crate::models::SettlementType;
use crate::service::products::write_product_rows_csv;
use crate::service::{ReportService, SalesFilter};

/// 共享状态: 报表服务 + 其来源使用的缓存
pub struct AppState<S> {
    pub reports: Arc<ReportService<S>>,
    pub cache: Arc<QueryCache>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            reports: self.reports.clone(),
            cache: self.cache.clone(),
        }
    }
}

/// 失败响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

/// 缓存失效响应体
#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    pub success: bool,
    pub message: String,
    pub invalidated: Vec<EntityKind>,
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = match &self {
            ReportError::InvalidIdFormat(_) | ReportError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ReportError::Database(_) | ReportError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("report failed: {}", self);
        }
        let body = ErrorResponse {
            success: false,
            message: format!("Error: {}", self),
        };
        (status, Json(body)).into_response()
    }
}

/// 区间参数, 缺省为本月 1 日至今天
#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl RangeParams {
    fn resolve(&self, today: NaiveDate) -> Result<DateRange, ReportError> {
        resolve_range(self.start, self.end, today)
    }
}

fn resolve_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<DateRange, ReportError> {
    let end = end.unwrap_or(today);
    let start = match start {
        Some(start) => start,
        None => end.with_day(1).unwrap_or(end),
    };
    if start > end {
        return Err(ReportError::InvalidArgument(format!(
            "start {} is after end {}",
            start, end
        )));
    }
    Ok(DateRange::days(start, end))
}

#[derive(Debug, Default, Deserialize)]
pub struct SalesParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub customer_id: Option<String>,
    pub salesperson_id: Option<String>,
    pub settlement_type: Option<SettlementType>,
}

impl SalesParams {
    fn filter(&self, today: NaiveDate) -> Result<SalesFilter, ReportError> {
        Ok(SalesFilter {
            range: resolve_range(self.start, self.end, today)?,
            customer_id: self.customer_id.clone(),
            salesperson_id: self.salesperson_id.clone(),
            settlement_type: self.settlement_type,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DateParams {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InactivityParams {
    pub days: Option<i64>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReceivableParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub date: Option<NaiveDate>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn dashboard<S: RecordSource>(
    State(state): State<AppState<S>>,
    Query(params): Query<DateParams>,
) -> Result<Response, ReportError> {
    let report = state.reports.dashboard(params.date.unwrap_or_else(today)).await?;
    Ok(Json(report).into_response())
}

pub async fn product_sales<S: RecordSource>(
    State(state): State<AppState<S>>,
    Query(params): Query<SalesParams>,
) -> Result<Response, ReportError> {
    let split = state.reports.product_sales(&params.filter(today())?).await?;
    Ok(Json(split).into_response())
}

/// 全部销售商品表导出为 CSV
pub async fn product_sales_csv<S: RecordSource>(
    State(state): State<AppState<S>>,
    Query(params): Query<SalesParams>,
) -> Result<Response, ReportError> {
    let split = state.reports.product_sales(&params.filter(today())?).await?;

    let mut body = Vec::new();
    write_product_rows_csv(&split.all_sales, &mut body)?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"product-sales.csv\""),
        ],
        body,
    )
        .into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct ReturnParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub customer_id: Option<String>,
}

pub async fn product_returns<S: RecordSource>(
    State(state): State<AppState<S>>,
    Query(params): Query<ReturnParams>,
) -> Result<Response, ReportError> {
    let range = resolve_range(params.start, params.end, today())?;
    let rows = state.reports.product_returns(range, params.customer_id).await?;
    Ok(Json(rows).into_response())
}

pub async fn inactive_customers<S: RecordSource>(
    State(state): State<AppState<S>>,
    Query(params): Query<InactivityParams>,
) -> Result<Response, ReportError> {
    let now = match params.date {
        Some(date) => date.and_time(NaiveTime::MIN),
        None => Local::now().naive_local(),
    };
    let rows = state.reports.inactive_customers(now, params.days).await?;
    Ok(Json(rows).into_response())
}

pub async fn receivables<S: RecordSource>(
    State(state): State<AppState<S>>,
    Query(params): Query<ReceivableParams>,
) -> Result<Response, ReportError> {
    let reference = params.date.unwrap_or_else(today);
    let range = resolve_range(params.start, params.end, reference)?;
    let rows = state.reports.receivables(range, reference).await?;
    Ok(Json(rows).into_response())
}

pub async fn customer_summaries<S: RecordSource>(
    State(state): State<AppState<S>>,
    Query(params): Query<RangeParams>,
) -> Result<Response, ReportError> {
    let rows = state.reports.customer_summaries(params.resolve(today())?).await?;
    Ok(Json(rows).into_response())
}

pub async fn salesperson_summaries<S: RecordSource>(
    State(state): State<AppState<S>>,
    Query(params): Query<RangeParams>,
) -> Result<Response, ReportError> {
    let rows = state.reports.salesperson_summaries(params.resolve(today())?).await?;
    Ok(Json(rows).into_response())
}

pub async fn inventory_movements<S: RecordSource>(
    State(state): State<AppState<S>>,
    Query(params): Query<RangeParams>,
) -> Result<Response, ReportError> {
    let rows = state.reports.inventory_movements(params.resolve(today())?).await?;
    Ok(Json(rows).into_response())
}

/// 某类实体被修改后, 失效其自身及下游类别的缓存
pub async fn invalidate_cache<S: RecordSource>(
    State(state): State<AppState<S>>,
    Path(entity): Path<String>,
) -> Result<Response, ReportError> {
    let kind: EntityKind = entity.parse().map_err(ReportError::InvalidArgument)?;
    let invalidated = state.cache.invalidate(kind);

    let response = InvalidateResponse {
        success: true,
        message: format!("Invalidated {} entity kinds", invalidated.len()),
        invalidated,
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn missing_range_defaults_to_month_to_date() {
        let range = RangeParams::default().resolve(day(2024, 5, 17)).unwrap();
        assert_eq!(range, DateRange::days(day(2024, 5, 1), day(2024, 5, 17)));
    }

    #[test]
    fn reversed_range_is_rejected() {
        let params = RangeParams {
            start: Some(day(2024, 5, 20)),
            end: Some(day(2024, 5, 1)),
        };
        assert!(matches!(
            params.resolve(day(2024, 5, 31)),
            Err(ReportError::InvalidArgument(_))
        ));
    }

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let response = ReportError::InvalidIdFormat("abc".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ReportError::Export("disk full".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

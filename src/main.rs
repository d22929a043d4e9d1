use std::sync::Arc;

use beverage_reports::{
    api::{self, AppState},
    cache::{CachedSource, QueryCache},
    create_pool,
    db::PgRecordSource,
    AppConfig, ReportService,
};
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 创建数据库连接池
    let pool = create_pool(&config.database).await?;
    info!("Database pool created");

    // 数据来源: Postgres + 请求缓存
    let cache = Arc::new(QueryCache::new());
    let source = CachedSource::new(PgRecordSource::new(pool), cache.clone(), config.cache.enabled);
    let reports = Arc::new(ReportService::new(source, config.reports.clone()));

    let app = api::router(AppState { reports, cache });

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /api/reports/dashboard            - revenue overview and rankings");
    info!("  GET  /api/reports/product-sales[.csv]  - product sales, all vs fully paid");
    info!("  GET  /api/reports/product-returns      - returned products");
    info!("  GET  /api/reports/inactive-customers   - customers without recent orders");
    info!("  GET  /api/reports/receivables          - outstanding invoices");
    info!("  GET  /api/reports/customers            - per-customer summary");
    info!("  GET  /api/reports/salespersons         - per-salesperson summary");
    info!("  GET  /api/reports/inventory-movements  - stock movements");
    info!("  POST /api/cache/invalidate/:entity     - drop cached results");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

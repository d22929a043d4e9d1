use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::service::inactivity::NO_RECENT_ORDER_DAYS;

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub reports: ReportsConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

/// 报表参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// 近期未下单报表的默认天数
    pub inactivity_days: i64,
    /// 查找最近下单日期的回看天数
    pub lookback_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/beverage".to_string(),
            max_connections: 20,
            acquire_timeout_secs: 10,
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            inactivity_days: 7,
            lookback_days: 180,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl AppConfig {
    /// 加载配置: config/default.toml (可选) -> APP__ 前缀环境变量 -> DATABASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"));

        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", url)?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.reports.validate()?;
        Ok(config)
    }
}

impl ReportsConfig {
    /// 回看天数必须小于 999 占位天数, 否则无订单客户不再排在最后
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inactivity_days <= 0 {
            return Err(ConfigError::Message(format!(
                "reports.inactivity_days must be positive, got {}",
                self.inactivity_days
            )));
        }
        if self.lookback_days <= 0 || self.lookback_days >= NO_RECENT_ORDER_DAYS {
            return Err(ConfigError::Message(format!(
                "reports.lookback_days must be in 1..{}, got {}",
                NO_RECENT_ORDER_DAYS, self.lookback_days
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_report_windows() {
        let config = AppConfig::default();
        assert_eq!(config.reports.inactivity_days, 7);
        assert_eq!(config.reports.lookback_days, 180);
        assert!(config.cache.enabled);
    }

    #[test]
    fn lookback_must_stay_below_no_order_sentinel() {
        assert!(ReportsConfig::default().validate().is_ok());

        let near = ReportsConfig { lookback_days: NO_RECENT_ORDER_DAYS - 1, ..Default::default() };
        assert!(near.validate().is_ok());

        for lookback_days in [NO_RECENT_ORDER_DAYS, 5000, 0] {
            let config = ReportsConfig { lookback_days, ..Default::default() };
            assert!(matches!(config.validate(), Err(ConfigError::Message(_))));
        }

        let config = ReportsConfig { inactivity_days: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_sources_fall_back_to_defaults() {
        let config: AppConfig = Config::builder()
            .set_override("server.port", 9090)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.max_connections, 20);
    }
}

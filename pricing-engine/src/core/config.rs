use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};
use shared::models::Address;
use std::str::FromStr;
use std::time::Duration;

/// Which customer address determines the tax jurisdiction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxBasedOn {
    #[default]
    BillingAddress,
    ShippingAddress,
    DefaultAddress,
}

impl FromStr for TaxBasedOn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "billing" | "billing_address" => Ok(Self::BillingAddress),
            "shipping" | "shipping_address" => Ok(Self::ShippingAddress),
            "default" | "default_address" => Ok(Self::DefaultAddress),
            other => Err(format!("unknown tax basis: {other}")),
        }
    }
}

/// Midpoint rounding mode for computed prices
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MidpointRounding {
    /// Banker's rounding
    ToEven,
    #[default]
    AwayFromZero,
}

impl MidpointRounding {
    pub fn strategy(&self) -> RoundingStrategy {
        match self {
            MidpointRounding::ToEven => RoundingStrategy::MidpointNearestEven,
            MidpointRounding::AwayFromZero => RoundingStrategy::MidpointAwayFromZero,
        }
    }
}

impl FromStr for MidpointRounding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "to_even" | "even" | "bankers" => Ok(Self::ToEven),
            "away_from_zero" | "away" => Ok(Self::AwayFromZero),
            other => Err(format!("unknown midpoint rounding: {other}")),
        }
    }
}

/// 税务设置 - one instance per store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaxSettings {
    pub tax_based_on: TaxBasedOn,
    /// Used when the selected customer address is missing
    pub default_tax_address: Option<Address>,
    /// Stored catalog prices already include tax
    pub prices_include_tax: bool,
    pub active_tax_provider_system_name: Option<String>,

    pub shipping_is_taxable: bool,
    pub shipping_price_includes_tax: bool,
    pub shipping_tax_category_id: Option<i64>,

    pub payment_method_additional_fee_is_taxable: bool,
    pub payment_method_additional_fee_includes_tax: bool,
    pub payment_method_additional_fee_tax_category_id: Option<i64>,

    /// Decimal places computed prices are rounded to
    pub calculate_round_price: u32,
    pub midpoint_rounding: MidpointRounding,

    pub eu_vat_enabled: bool,
    pub eu_vat_shop_country_id: Option<i64>,
    pub eu_vat_allow_vat_exemption: bool,
    pub eu_vat_use_web_service: bool,
    pub eu_vat_assume_valid: bool,
    /// Resolve the customer country from its IP when no address is known
    pub get_country_by_ip_address: bool,
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self {
            tax_based_on: TaxBasedOn::BillingAddress,
            default_tax_address: None,
            prices_include_tax: false,
            active_tax_provider_system_name: None,
            shipping_is_taxable: false,
            shipping_price_includes_tax: false,
            shipping_tax_category_id: None,
            payment_method_additional_fee_is_taxable: false,
            payment_method_additional_fee_includes_tax: false,
            payment_method_additional_fee_tax_category_id: None,
            calculate_round_price: 2,
            midpoint_rounding: MidpointRounding::AwayFromZero,
            eu_vat_enabled: false,
            eu_vat_shop_country_id: None,
            eu_vat_allow_vat_exemption: true,
            eu_vat_use_web_service: false,
            eu_vat_assume_valid: false,
            get_country_by_ip_address: false,
        }
    }
}

impl TaxSettings {
    /// 从环境变量加载税务设置
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tax_based_on: env_parse("TAX_BASED_ON", defaults.tax_based_on),
            default_tax_address: env_opt::<i64>("DEFAULT_TAX_COUNTRY_ID").map(|country_id| {
                Address {
                    country_id: Some(country_id),
                    ..Default::default()
                }
            }),
            prices_include_tax: env_parse("PRICES_INCLUDE_TAX", defaults.prices_include_tax),
            active_tax_provider_system_name: std::env::var("ACTIVE_TAX_PROVIDER").ok(),
            shipping_is_taxable: env_parse("SHIPPING_IS_TAXABLE", defaults.shipping_is_taxable),
            shipping_price_includes_tax: env_parse(
                "SHIPPING_PRICE_INCLUDES_TAX",
                defaults.shipping_price_includes_tax,
            ),
            shipping_tax_category_id: env_opt("SHIPPING_TAX_CATEGORY_ID"),
            payment_method_additional_fee_is_taxable: env_parse(
                "PAYMENT_FEE_IS_TAXABLE",
                defaults.payment_method_additional_fee_is_taxable,
            ),
            payment_method_additional_fee_includes_tax: env_parse(
                "PAYMENT_FEE_INCLUDES_TAX",
                defaults.payment_method_additional_fee_includes_tax,
            ),
            payment_method_additional_fee_tax_category_id: env_opt("PAYMENT_FEE_TAX_CATEGORY_ID"),
            calculate_round_price: env_parse("CALCULATE_ROUND_PRICE", defaults.calculate_round_price),
            midpoint_rounding: env_parse("MIDPOINT_ROUNDING", defaults.midpoint_rounding),
            eu_vat_enabled: env_parse("EU_VAT_ENABLED", defaults.eu_vat_enabled),
            eu_vat_shop_country_id: env_opt("EU_VAT_SHOP_COUNTRY_ID"),
            eu_vat_allow_vat_exemption: env_parse(
                "EU_VAT_ALLOW_VAT_EXEMPTION",
                defaults.eu_vat_allow_vat_exemption,
            ),
            eu_vat_use_web_service: env_parse(
                "EU_VAT_USE_WEB_SERVICE",
                defaults.eu_vat_use_web_service,
            ),
            eu_vat_assume_valid: env_parse("EU_VAT_ASSUME_VALID", defaults.eu_vat_assume_valid),
            get_country_by_ip_address: env_parse(
                "GET_COUNTRY_BY_IP_ADDRESS",
                defaults.get_country_by_ip_address,
            ),
        }
    }
}

/// 目录设置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CatalogSettings {
    /// Kill switch: no discount applies anywhere in the store
    pub ignore_discounts: bool,
}

impl CatalogSettings {
    pub fn from_env() -> Self {
        Self {
            ignore_discounts: env_parse("IGNORE_DISCOUNTS", false),
        }
    }
}

/// 引擎配置 - pricing engine configuration for a single store
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | STORE_ID | 0 | 当前店铺 |
/// | PROVIDER_TIMEOUT_MS | 10000 | 外部税率/VAT 服务超时(毫秒) |
/// | VIES_URL | EU VIES REST endpoint | VAT 校验服务地址 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (none) | 日志目录 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// Tax and catalog settings are read by [`TaxSettings::from_env`] and
/// [`CatalogSettings::from_env`].
///
/// # 示例
///
/// ```ignore
/// STORE_ID=7 PRICES_INCLUDE_TAX=true EU_VAT_ENABLED=true cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub store_id: i64,
    pub tax: TaxSettings,
    pub catalog: CatalogSettings,
    /// Upper bound for remote tax provider and VAT checker calls
    pub provider_timeout_ms: u64,
    pub vies_url: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// 运行环境: development | staging | production
    pub environment: String,
}

pub const DEFAULT_VIES_URL: &str =
    "https://ec.europa.eu/taxation_customs/vies/rest-api/check-vat-number";

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            store_id: env_parse("STORE_ID", 0),
            tax: TaxSettings::from_env(),
            catalog: CatalogSettings::from_env(),
            provider_timeout_ms: env_parse("PROVIDER_TIMEOUT_MS", 10_000),
            vies_url: std::env::var("VIES_URL").unwrap_or_else(|_| DEFAULT_VIES_URL.into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(store_id: i64, tax: TaxSettings, catalog: CatalogSettings) -> Self {
        let mut config = Self::from_env();
        config.store_id = store_id;
        config.tax = tax;
        config.catalog = catalog;
        config
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_opt<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

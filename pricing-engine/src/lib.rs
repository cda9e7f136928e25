//! Pricing Engine - 店铺税费、价格换算与折扣计算
//!
//! # 架构概述
//!
//! - **税务** (`tax`): 税务提供者注册表、税率解析、EU-VAT 规则、VAT 号码校验
//! - **价格换算** (`pricing`): 含税 / 不含税价格互换
//! - **折扣** (`discounts`): 折扣校验、优惠券、使用记录、累计 vs 最优
//! - **数据库** (`db`): 实体仓储 (内存实现)
//! - **服务** (`services`): 缓存、实体变更通知、IP 定位
//!
//! # 模块结构
//!
//! ```text
//! pricing-engine/src/
//! ├── core/          # 配置、上下文、引擎状态
//! ├── utils/         # 日志、金额工具
//! ├── db/            # 仓储层
//! ├── services/      # 缓存、通知
//! ├── pricing/       # 价格换算
//! ├── tax/           # 税务
//! └── discounts/     # 折扣
//! ```

pub mod core;
pub mod db;
pub mod discounts;
pub mod pricing;
pub mod services;
pub mod tax;
pub mod utils;

// Re-export 公共类型
pub use core::{CatalogSettings, Config, EngineState, TaxSettings, WorkContext};
pub use discounts::{DiscountHandlerService, DiscountService};
pub use pricing::{PriceCalculator, TaxProductPrice, TaxedPrice};
pub use tax::{TaxService, VatService};
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: 加载 `.env`，初始化日志
///
/// Returns the loaded configuration.
pub fn setup_environment() -> Config {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.is_production()),
        config.log_dir.as_deref(),
    );
    config
}

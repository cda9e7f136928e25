//! 核心模块 - 引擎配置与上下文
//!
//! # 模块结构
//!
//! - [`Config`] - 引擎配置 (store, timeouts, logging)
//! - [`TaxSettings`] / [`CatalogSettings`] - 店铺级设置
//! - [`WorkContext`] - 当前请求的客户与店铺
//! - [`EngineState`] - 组装好的服务集合

pub mod config;
pub mod context;
pub mod state;

pub use config::{CatalogSettings, Config, MidpointRounding, TaxBasedOn, TaxSettings};
pub use context::WorkContext;
pub use state::{EngineBuilder, EngineState};

//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - 金额换算与舍入
//! - 日志初始化

pub mod logger;
pub mod money;

pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};

//! # Container Common
//!
//! 容器基础层，定义错误分类和类型元数据。
//!
//! ## 核心内容
//!
//! - [`ConfigError`] / [`ContextError`] - 错误分类
//! - [`TypeInfo`] - 类型元数据

pub mod errors;
pub mod metadata;

pub use errors::*;
pub use metadata::*;

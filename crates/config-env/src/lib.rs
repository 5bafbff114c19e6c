//! # Config Env
//!
//! 配置环境层，负责将多个属性源合并为统一的层级化命名空间。
//!
//! ## 核心内容
//!
//! - [`PropertySource`] - 属性源抽象接口
//! - [`MapPropertySource`] / [`EnvironmentPropertySource`] - 内置属性源实现
//! - [`MergedNamespace`] - 合并后的只读命名空间
//! - [`NamespaceView`] - 以某前缀为根的子命名空间视图
//! - [`NamespaceExpander`] - 配置命名空间展开器

pub mod expander;
pub mod namespace;
pub mod source;

pub use expander::*;
pub use namespace::*;
pub use source::*;

//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },

    #[error("配置类型转换失败: {key}, 原因: {message}")]
    TypeConversion { key: String, message: String },

    #[error("配置序列化失败: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// 容器错误类型
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("配置错误: {source}")]
    Configuration {
        #[from]
        source: ConfigError,
    },

    #[error("组件未找到: {type_name}{}", .qualifier.as_deref().map(|q| format!(", 限定符: {q}")).unwrap_or_default())]
    NoSuchBean {
        type_name: String,
        qualifier: Option<String>,
    },

    #[error("组件解析不唯一: {type_name}, 候选: [{}]", .candidates.join(", "))]
    AmbiguousBean {
        type_name: String,
        candidates: Vec<String>,
    },

    #[error("检测到循环依赖: {chain}")]
    CircularDependency { chain: String },

    #[error("容器已关闭")]
    ContextClosed,

    #[error("组件创建失败: {name}, 原因: {message}")]
    BeanCreationFailed { name: String, message: String },
}

impl ContextError {
    /// 创建组件未找到错误
    pub fn no_such_bean(type_name: impl Into<String>, qualifier: Option<&str>) -> Self {
        Self::NoSuchBean {
            type_name: type_name.into(),
            qualifier: qualifier.map(str::to_string),
        }
    }

    /// 创建组件创建失败错误
    pub fn creation_failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BeanCreationFailed {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ContextResult<T> = Result<T, ContextError>;

//! # Bean Context
//!
//! 组件容器层，从声明式定义图解析应用组件。
//!
//! 核心机制: 一个标注了展开基路径的组件模板，在上下文构建时按合并
//! 命名空间中该路径下的子段数量展开为 N 个独立配置、独立限定的组件
//! 定义，依赖查找通过限定符在展开后的定义集中消歧。
//!
//! ## 核心内容
//!
//! - [`ComponentTemplate`] - 组件模板（展开前的声明式描述）
//! - [`BeanDefinition`] - 可实例化的具体组件定义
//! - [`BeanDefinitionRegistry`] - 定义注册表
//! - [`Qualifier`] - 定义筛选谓词
//! - [`ApplicationContext`] - 应用上下文（组件的所有者）
//! - [`Injector`] - 构造函数注入句柄

pub mod context;
pub mod definition;
pub mod qualifier;
pub mod registry;
pub mod template;

pub use context::*;
pub use definition::*;
pub use qualifier::*;
pub use registry::*;
pub use template::*;

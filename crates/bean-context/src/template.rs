//! 组件模板定义
//!
//! 模板是组件的声明式描述，由外部构建步骤以显式静态类型值的形式提供，
//! 容器自身不做任何源码级的模板发现。

use crate::context::Injector;
use container_common::{ContextResult, TypeInfo};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// 组件实例句柄
pub type BeanHandle = Arc<dyn Any + Send + Sync>;

/// 组件构造函数类型
///
/// 构造函数通过 [`Injector`] 递归解析依赖并读取本实例的子命名空间。
pub type BeanConstructor =
    Arc<dyn Fn(&mut Injector<'_>) -> ContextResult<BeanHandle> + Send + Sync>;

/// 组件模板
///
/// 携带展开基路径的模板是可展开的: 基路径下每个子段产出一个组件定义。
/// 不携带的模板恰好产出一个单例定义。
pub struct ComponentTemplate {
    /// 组件名称
    name: String,
    /// 目标类型信息
    type_info: TypeInfo,
    /// 能力集合: 该组件可按哪些类型身份被解析
    provides: Vec<TypeInfo>,
    /// 字符串属性元数据，供属性限定符匹配
    properties: HashMap<String, String>,
    /// 展开基路径（存在则模板可展开）
    base_path: Option<String>,
    /// 单例模板的配置根路径
    config_path: Option<String>,
    /// 构造函数
    constructor: BeanConstructor,
}

impl ComponentTemplate {
    /// 创建单例组件模板
    pub fn singleton<T, F>(name: impl Into<String>, constructor: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&mut Injector<'_>) -> ContextResult<T> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            type_info: TypeInfo::of::<T>(),
            provides: vec![TypeInfo::of::<T>()],
            properties: HashMap::new(),
            base_path: None,
            config_path: None,
            constructor: Self::erase(constructor),
        }
    }

    /// 创建按配置组展开的组件模板
    ///
    /// 上下文构建时基路径下每个不同的直接子段产出一个定义，
    /// 子段名即该定义的名称限定符。
    pub fn each_property<T, F>(
        name: impl Into<String>,
        base_path: impl Into<String>,
        constructor: F,
    ) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&mut Injector<'_>) -> ContextResult<T> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            type_info: TypeInfo::of::<T>(),
            provides: vec![TypeInfo::of::<T>()],
            properties: HashMap::new(),
            base_path: Some(base_path.into()),
            config_path: None,
            constructor: Self::erase(constructor),
        }
    }

    /// 声明额外的能力类型
    ///
    /// 查找按能力集合的成员关系匹配，而非运行时类型内省。
    pub fn provides<U: 'static>(mut self) -> Self {
        self.provides.push(TypeInfo::of::<U>());
        self
    }

    /// 添加属性元数据
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// 设置单例模板的配置根路径
    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// 获取组件名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 获取目标类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 获取能力集合
    pub fn provided_types(&self) -> &[TypeInfo] {
        &self.provides
    }

    /// 获取属性元数据
    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }

    /// 获取展开基路径
    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    /// 获取单例配置根路径
    pub fn config_path(&self) -> Option<&str> {
        self.config_path.as_deref()
    }

    /// 模板是否可展开
    pub fn is_expandable(&self) -> bool {
        self.base_path.is_some()
    }

    pub(crate) fn constructor(&self) -> &BeanConstructor {
        &self.constructor
    }

    /// 擦除构造函数的具体返回类型
    fn erase<T, F>(constructor: F) -> BeanConstructor
    where
        T: Send + Sync + 'static,
        F: Fn(&mut Injector<'_>) -> ContextResult<T> + Send + Sync + 'static,
    {
        Arc::new(move |injector| {
            constructor(injector).map(|component| Arc::new(component) as BeanHandle)
        })
    }
}

impl std::fmt::Debug for ComponentTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentTemplate")
            .field("name", &self.name)
            .field("type_info", &self.type_info)
            .field("base_path", &self.base_path)
            .field("config_path", &self.config_path)
            .field("constructor", &"<function>")
            .finish()
    }
}

//! 组件限定符
//!
//! 限定符是纯值谓词，用于在多个候选定义中挑选唯一的一个。

use crate::definition::BeanDefinition;
use container_common::TypeInfo;

/// 组件限定符
///
/// 所有变体无副作用，调用之间无顺序依赖。
#[derive(Debug, Clone)]
pub enum Qualifier {
    /// 按名称精确匹配（区分大小写）
    ByName(String),
    /// 按能力类型匹配
    ByType(TypeInfo),
    /// 按属性元数据键值匹配
    ByAttribute {
        /// 属性键
        key: String,
        /// 期望的属性值
        value: String,
    },
    /// 逻辑与组合
    AllOf(Vec<Qualifier>),
}

impl Qualifier {
    /// 按名称匹配
    ///
    /// 名称即展开键，如 `by_name("one")` 在展开出的实例集中挑选
    /// 键为 `one` 的那一个；对非展开定义则匹配模板的组件名称。
    pub fn by_name(name: impl Into<String>) -> Self {
        Self::ByName(name.into())
    }

    /// 按类型匹配
    pub fn by_type<T: 'static>() -> Self {
        Self::ByType(TypeInfo::of::<T>())
    }

    /// 按属性元数据匹配
    pub fn by_attribute(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ByAttribute {
            key: key.into(),
            value: value.into(),
        }
    }

    /// 组合多个限定符（全部满足才匹配）
    pub fn all_of(qualifiers: Vec<Self>) -> Self {
        Self::AllOf(qualifiers)
    }

    /// 检查定义是否满足限定符
    pub fn matches(&self, definition: &BeanDefinition) -> bool {
        match self {
            Self::ByName(name) => definition.name() == name,
            Self::ByType(type_info) => definition.provides_type(type_info.id),
            Self::ByAttribute { key, value } => definition.property(key) == Some(value.as_str()),
            Self::AllOf(qualifiers) => qualifiers.iter().all(|q| q.matches(definition)),
        }
    }

    /// 获取用于错误信息的描述
    pub fn description(&self) -> String {
        match self {
            Self::ByName(name) => format!("name={name}"),
            Self::ByType(type_info) => format!("type={}", type_info.short_name()),
            Self::ByAttribute { key, value } => format!("{key}={value}"),
            Self::AllOf(qualifiers) => qualifiers
                .iter()
                .map(Self::description)
                .collect::<Vec<_>>()
                .join(" & "),
        }
    }
}

//! 组件定义
//!
//! 定义是模板经展开后得到的可实例化单元。

use crate::template::{BeanConstructor, ComponentTemplate};
use container_common::TypeInfo;
use std::any::TypeId;
use std::collections::HashMap;

/// 组件定义
///
/// 不可展开模板产出一个定义；可展开模板每个展开键产出一个定义，
/// 定义携带 (a) 展开键作为名称限定符，(b) 根为 `基路径.键` 的配置子视图。
pub struct BeanDefinition {
    /// 定义在构建顺序中的序号，同时作为实例缓存索引
    ordinal: usize,
    /// 所属模板的组件名称
    template_name: String,
    /// 目标类型信息
    type_info: TypeInfo,
    /// 能力集合
    provides: Vec<TypeInfo>,
    /// 属性元数据
    properties: HashMap<String, String>,
    /// 展开键（仅展开产出的定义携带）
    qualifier_name: Option<String>,
    /// 配置根路径
    config_root: Option<String>,
    /// 构造函数（与模板共享）
    constructor: BeanConstructor,
}

impl BeanDefinition {
    pub(crate) fn from_template(
        ordinal: usize,
        template: &ComponentTemplate,
        qualifier_name: Option<String>,
        config_root: Option<String>,
    ) -> Self {
        Self {
            ordinal,
            template_name: template.name().to_string(),
            type_info: template.type_info().clone(),
            provides: template.provided_types().to_vec(),
            properties: template.properties().clone(),
            qualifier_name,
            config_root,
            constructor: template.constructor().clone(),
        }
    }

    /// 获取定义序号
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// 获取定义名称
    ///
    /// 展开产出的定义以展开键为名，其余定义沿用模板的组件名称。
    pub fn name(&self) -> &str {
        self.qualifier_name.as_deref().unwrap_or(&self.template_name)
    }

    /// 获取展开键
    pub fn qualifier_name(&self) -> Option<&str> {
        self.qualifier_name.as_deref()
    }

    /// 获取目标类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 检查能力集合是否包含指定类型
    pub fn provides_type(&self, type_id: TypeId) -> bool {
        self.provides.iter().any(|info| info.id == type_id)
    }

    /// 获取属性元数据值
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// 获取配置根路径
    pub fn config_root(&self) -> Option<&str> {
        self.config_root.as_deref()
    }

    /// 获取用于日志和错误信息的显示名称
    pub fn display_name(&self) -> String {
        match &self.qualifier_name {
            Some(key) => format!("{}[{}]", self.template_name, key),
            None => self.template_name.clone(),
        }
    }

    pub(crate) fn constructor(&self) -> &BeanConstructor {
        &self.constructor
    }
}

impl std::fmt::Debug for BeanDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanDefinition")
            .field("ordinal", &self.ordinal)
            .field("template_name", &self.template_name)
            .field("type_info", &self.type_info)
            .field("qualifier_name", &self.qualifier_name)
            .field("config_root", &self.config_root)
            .finish()
    }
}

//! 组件定义注册表
//!
//! 持有组件模板并在上下文构建时将其物化为具体定义。

use crate::definition::BeanDefinition;
use crate::qualifier::Qualifier;
use crate::template::ComponentTemplate;
use config_env::{MergedNamespace, NamespaceExpander};
use container_common::{ContextError, ContextResult};
use std::any::TypeId;
use tracing::{debug, info};

/// 组件定义注册表
///
/// 模板按注册顺序物化，可展开模板再按展开键的字典序物化，
/// 因此定义集的构建顺序对固定的命名空间快照是确定的。
#[derive(Debug, Default)]
pub struct BeanDefinitionRegistry {
    templates: Vec<ComponentTemplate>,
    definitions: Vec<BeanDefinition>,
    expander: NamespaceExpander,
}

impl BeanDefinitionRegistry {
    /// 创建新的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册组件模板
    pub fn register(&mut self, template: ComponentTemplate) {
        debug!(
            "注册组件模板: {} ({})",
            template.name(),
            template.type_info().short_name()
        );
        self.templates.push(template);
    }

    /// 按合并命名空间构建定义集
    ///
    /// 不可展开模板产出一个定义；可展开模板每个展开键产出一个定义。
    /// 任一模板物化失败则整个构建失败，不产出部分可用的定义集。
    pub fn build(&mut self, namespace: &MergedNamespace) -> ContextResult<()> {
        let mut definitions = Vec::new();

        for template in &self.templates {
            match template.base_path() {
                None => {
                    let config_root = template.config_path().map(str::to_string);
                    definitions.push(BeanDefinition::from_template(
                        definitions.len(),
                        template,
                        None,
                        config_root,
                    ));
                }
                Some(base_path) => {
                    Self::validate_base_path(template, base_path)?;
                    let keys = self.expander.expand(namespace, base_path);
                    debug!(
                        "模板 {} 展开为 {} 个实例",
                        template.name(),
                        keys.len()
                    );
                    for key in keys {
                        let config_root = format!("{base_path}.{key}");
                        definitions.push(BeanDefinition::from_template(
                            definitions.len(),
                            template,
                            Some(key),
                            Some(config_root),
                        ));
                    }
                }
            }
        }

        info!("定义图构建完成，共 {} 个组件定义", definitions.len());
        self.definitions = definitions;
        Ok(())
    }

    /// 获取构建顺序中的全部定义
    pub fn definitions(&self) -> &[BeanDefinition] {
        &self.definitions
    }

    /// 查找能力集合包含指定类型的全部定义
    pub fn find_by_type(&self, type_id: TypeId) -> Vec<&BeanDefinition> {
        self.definitions
            .iter()
            .filter(|definition| definition.provides_type(type_id))
            .collect()
    }

    /// 查找恰好一个满足类型与限定符的定义
    ///
    /// 多于一个匹配且限定符未能收窄到唯一时返回 `AmbiguousBean`，
    /// 无匹配时返回 `NoSuchBean`。
    pub fn find_one(
        &self,
        type_id: TypeId,
        type_name: &str,
        qualifier: Option<&Qualifier>,
    ) -> ContextResult<&BeanDefinition> {
        let mut matched: Vec<&BeanDefinition> = self
            .find_by_type(type_id)
            .into_iter()
            .filter(|definition| qualifier.map_or(true, |q| q.matches(definition)))
            .collect();

        match matched.len() {
            0 => Err(ContextError::no_such_bean(
                type_name,
                qualifier.map(Qualifier::description).as_deref(),
            )),
            1 => Ok(matched.remove(0)),
            _ => Err(ContextError::AmbiguousBean {
                type_name: type_name.to_string(),
                candidates: matched
                    .iter()
                    .map(|definition| definition.display_name())
                    .collect(),
            }),
        }
    }

    /// 校验展开基路径格式
    fn validate_base_path(template: &ComponentTemplate, base_path: &str) -> ContextResult<()> {
        if base_path.is_empty() || base_path.starts_with('.') || base_path.ends_with('.') {
            return Err(ContextError::creation_failed(
                template.name(),
                format!("无效的展开基路径: {base_path:?}"),
            ));
        }
        Ok(())
    }
}

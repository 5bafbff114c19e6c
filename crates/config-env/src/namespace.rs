//! 合并命名空间实现
//!
//! 将多个属性源按优先级合并为单一的层级化只读视图。

use crate::source::PropertySource;
use container_common::{ConfigError, ConfigResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info};

/// 合并后的配置命名空间
///
/// 合并策略: 属性源按优先级升序依次写入，精确路径冲突时后写入者覆盖，
/// 因此最高优先级的属性源胜出；优先级相同时后注册者胜出。
/// 只有叶子值参与覆盖，路径前缀本身不参与比较。
#[derive(Debug, Default)]
pub struct MergedNamespace {
    values: BTreeMap<String, Value>,
}

impl MergedNamespace {
    /// 合并属性源序列
    pub fn merge(sources: Vec<Box<dyn PropertySource>>) -> Self {
        let mut ordered: Vec<(usize, Box<dyn PropertySource>)> =
            sources.into_iter().enumerate().collect();
        // 稳定排序: 优先级升序，同优先级保持注册顺序，后写入者覆盖
        ordered.sort_by_key(|(index, source)| (source.priority(), *index));

        let mut values = BTreeMap::new();
        for (_, source) in &ordered {
            let entries = source.entries();
            debug!(
                "合并属性源: {} (优先级: {}, 条目: {})",
                source.name(),
                source.priority(),
                entries.len()
            );
            for (key, value) in entries {
                values.insert(key, value);
            }
        }

        info!("命名空间合并完成，共 {} 个有效路径", values.len());
        Self { values }
    }

    /// 解析点分路径对应的值
    pub fn resolve(&self, path: &str) -> Option<&Value> {
        self.values.get(path)
    }

    /// 检查路径是否存在
    pub fn contains(&self, path: &str) -> bool {
        self.values.contains_key(path)
    }

    /// 解析路径并转换为目标类型
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> ConfigResult<T> {
        let value = self.resolve(path).ok_or_else(|| ConfigError::KeyNotFound {
            key: path.to_string(),
        })?;

        serde_json::from_value(value.clone()).map_err(|e| ConfigError::TypeConversion {
            key: path.to_string(),
            message: e.to_string(),
        })
    }

    /// 枚举前缀下的直接子段名称集合
    ///
    /// 返回值按字典序排列，对同一命名空间快照重复调用结果恒定。
    /// 前缀无后代时返回空集。
    pub fn child_segments(&self, prefix: &str) -> BTreeSet<String> {
        let mut segments = BTreeSet::new();
        let prefix_dot = format!("{prefix}.");

        for key in self.values.keys().skip_while(|k| k.as_str() < prefix_dot.as_str()) {
            let Some(rest) = key.strip_prefix(&prefix_dot) else {
                break;
            };
            if let Some(segment) = rest.split('.').next() {
                if !segment.is_empty() {
                    segments.insert(segment.to_string());
                }
            }
        }

        segments
    }

    /// 获取有效路径数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 命名空间是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }
}

/// 以某前缀为根的子命名空间视图
///
/// 展开出的每个组件实例只能看到自己的子命名空间。
#[derive(Debug, Clone)]
pub struct NamespaceView {
    namespace: Arc<MergedNamespace>,
    root: String,
}

impl NamespaceView {
    /// 创建新的子命名空间视图
    pub fn new(namespace: Arc<MergedNamespace>, root: impl Into<String>) -> Self {
        Self {
            namespace,
            root: root.into(),
        }
    }

    /// 获取视图根路径
    pub fn root(&self) -> &str {
        &self.root
    }

    /// 解析相对路径对应的值
    pub fn resolve(&self, relative: &str) -> Option<&Value> {
        self.namespace.resolve(&self.absolute(relative))
    }

    /// 解析相对路径并转换为目标类型
    pub fn get<T: DeserializeOwned>(&self, relative: &str) -> ConfigResult<T> {
        self.namespace.get(&self.absolute(relative))
    }

    /// 将整个子树绑定到目标类型
    ///
    /// 先从平铺的点分路径重建嵌套对象，再交给 serde 反序列化。
    pub fn bind<T: DeserializeOwned>(&self) -> ConfigResult<T> {
        let mut tree = Value::Object(serde_json::Map::new());

        if self.root.is_empty() {
            for (key, value) in self.namespace.values() {
                insert_nested(&mut tree, key, value.clone());
            }
        } else {
            let prefix_dot = format!("{}.", self.root);
            for (key, value) in self
                .namespace
                .values()
                .iter()
                .skip_while(|(k, _)| k.as_str() < prefix_dot.as_str())
            {
                let Some(rest) = key.strip_prefix(&prefix_dot) else {
                    break;
                };
                insert_nested(&mut tree, rest, value.clone());
            }
        }

        serde_json::from_value(tree).map_err(|e| ConfigError::TypeConversion {
            key: self.root.clone(),
            message: e.to_string(),
        })
    }

    fn absolute(&self, relative: &str) -> String {
        if self.root.is_empty() {
            relative.to_string()
        } else {
            format!("{}.{}", self.root, relative)
        }
    }
}

/// 按点分路径将叶子值插入嵌套对象
fn insert_nested(tree: &mut Value, path: &str, value: Value) {
    let mut current = tree;
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        let Value::Object(obj) = current else {
            return;
        };

        if segments.peek().is_none() {
            obj.insert(segment.to_string(), value);
            return;
        }

        let entry = obj
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        if !entry.is_object() {
            // 叶子与子树冲突时结构化路径胜出
            *entry = Value::Object(serde_json::Map::new());
        }
        current = entry;
    }
}

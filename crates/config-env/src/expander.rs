//! 配置命名空间展开器
//!
//! 枚举可展开组件模板基路径下的实例组键。

use crate::namespace::MergedNamespace;
use std::collections::BTreeSet;
use tracing::debug;

/// 命名空间展开器
///
/// 给定模板的基路径，枚举合并命名空间中该路径下的所有直接子段，
/// 每个子段成为一个实例组键。基路径无子段时返回空集，不视为错误。
#[derive(Debug, Default)]
pub struct NamespaceExpander;

impl NamespaceExpander {
    /// 创建新的展开器
    pub fn new() -> Self {
        Self
    }

    /// 展开基路径下的实例组键集合
    ///
    /// 返回键按字典序排列，对同一命名空间快照重复展开结果恒定。
    pub fn expand(&self, namespace: &MergedNamespace, base_path: &str) -> BTreeSet<String> {
        let keys = namespace.child_segments(base_path);
        debug!("展开配置命名空间: {} -> {} 个键", base_path, keys.len());
        keys
    }
}

//! 属性源定义
//!
//! 属性源以点分路径到值的有序映射形式提供配置数据。

use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// 属性源 trait
///
/// 定义向合并器提供配置数据的统一接口。属性源一旦交给合并器即视为不可变。
pub trait PropertySource: Send + Sync {
    /// 获取属性源名称
    fn name(&self) -> &str;

    /// 获取属性源优先级，数值越高优先级越高
    fn priority(&self) -> i32 {
        0
    }

    /// 按声明顺序获取所有 (路径, 值) 条目
    fn entries(&self) -> Vec<(String, Value)>;
}

/// 内存属性源
///
/// 保留条目的声明顺序。同一属性源内后声明的同名键覆盖先声明的。
#[derive(Debug, Clone)]
pub struct MapPropertySource {
    name: String,
    priority: i32,
    entries: Vec<(String, Value)>,
}

impl MapPropertySource {
    /// 从键值对序列创建属性源
    ///
    /// 对应原始 `of(k1, v1, k2, v2, ...)` 的平铺形式，声明顺序即优先顺序。
    pub fn of<K, V, I>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            name: name.into(),
            priority: 0,
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 从嵌套映射创建属性源
    ///
    /// 嵌套对象被展平为点分路径，数组和标量作为叶子值保留。
    pub fn from_nested(name: impl Into<String>, value: &Value) -> Self {
        let mut entries = Vec::new();
        if let Value::Object(obj) = value {
            Self::collect_entries(obj, String::new(), &mut entries);
        }
        Self {
            name: name.into(),
            priority: 0,
            entries,
        }
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 递归收集所有叶子条目
    fn collect_entries(
        obj: &serde_json::Map<String, Value>,
        prefix: String,
        entries: &mut Vec<(String, Value)>,
    ) {
        for (key, value) in obj {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };

            if let Value::Object(nested) = value {
                Self::collect_entries(nested, full_key, entries);
            } else {
                entries.push((full_key, value.clone()));
            }
        }
    }
}

impl PropertySource for MapPropertySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn entries(&self) -> Vec<(String, Value)> {
        self.entries.clone()
    }
}

/// 环境变量属性源
///
/// 在构造时对进程环境做一次快照，保证合并后的命名空间不可变。
/// 键映射规则: 去掉前缀后把分隔符替换为点并转为小写，
/// 如 `APP_DATASOURCE_ONE_URL` -> `datasource.one.url`。
#[derive(Debug, Clone)]
pub struct EnvironmentPropertySource {
    prefix: String,
    separator: String,
    priority: i32,
    env_vars: HashMap<String, String>,
}

impl EnvironmentPropertySource {
    /// 创建新的环境变量属性源
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let separator = "_".to_string();
        let mut env_vars = HashMap::new();

        for (key, value) in std::env::vars() {
            if key.starts_with(&prefix) {
                let config_key = Self::env_key_to_config_key(&key, &prefix, &separator);
                env_vars.insert(config_key, value);
            }
        }

        debug!("加载了 {} 个环境变量, 前缀: {}", env_vars.len(), prefix);

        Self {
            prefix,
            separator,
            priority: 200, // 环境变量最高优先级
            env_vars,
        }
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 获取环境变量前缀
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// 获取分隔符
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// 将环境变量键转换为配置键
    fn env_key_to_config_key(env_key: &str, prefix: &str, separator: &str) -> String {
        let key = env_key
            .strip_prefix(prefix)
            .unwrap_or(env_key)
            .trim_start_matches(separator);

        key.replace(separator, ".").to_lowercase()
    }

    /// 将环境变量字符串值解析为类型化的值
    fn parse_value(value: &str) -> Value {
        if let Ok(bool_val) = value.parse::<bool>() {
            Value::Bool(bool_val)
        } else if let Ok(int_val) = value.parse::<i64>() {
            Value::Number(serde_json::Number::from(int_val))
        } else if let Ok(float_val) = value.parse::<f64>() {
            serde_json::Number::from_f64(float_val)
                .map_or_else(|| Value::String(value.to_string()), Value::Number)
        } else {
            Value::String(value.to_string())
        }
    }
}

impl PropertySource for EnvironmentPropertySource {
    fn name(&self) -> &str {
        "environment"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn entries(&self) -> Vec<(String, Value)> {
        let mut entries: Vec<(String, Value)> = self
            .env_vars
            .iter()
            .map(|(k, v)| (k.clone(), Self::parse_value(v)))
            .collect();
        // 快照本身无序，按键排序保证重复展开结果一致
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

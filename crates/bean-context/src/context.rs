//! 应用上下文实现
//!
//! 上下文负责编排启动（合并属性源、构建定义图）并服务组件查找请求。

use crate::definition::BeanDefinition;
use crate::qualifier::Qualifier;
use crate::registry::BeanDefinitionRegistry;
use crate::template::{BeanHandle, ComponentTemplate};
use config_env::{MergedNamespace, NamespaceView, PropertySource};
use container_common::{ContextError, ContextResult, TypeInfo};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// 应用上下文
///
/// 每次 [`ApplicationContext::run`] 产出一个独立的上下文实例，
/// 不存在跨上下文共享的进程级状态。
///
/// 并发语义: 同一定义的首次并发访问采用阻塞式单赋值单元
/// （`OnceCell::get_or_try_init`）——第一个调用者执行构造，
/// 其余调用者阻塞至构造完成，任何时刻同一定义至多存在一个活实例。
/// 构造失败不写入单元，后续调用者可以重试构造。
pub struct ApplicationContext {
    namespace: Arc<MergedNamespace>,
    registry: BeanDefinitionRegistry,
    state: RwLock<ContextState>,
}

/// 上下文运行状态
enum ContextState {
    /// 运行中，按定义序号持有实例单元
    Running { cells: Vec<OnceCell<BeanHandle>> },
    /// 已关闭，所有实例已释放
    Closed,
}

impl ApplicationContext {
    /// 合并属性源并构建定义图，返回已启动的上下文
    ///
    /// 任一模板的展开或定义物化失败都会使整个调用失败，
    /// 不会返回部分可用的上下文。
    pub fn run(
        mut registry: BeanDefinitionRegistry,
        sources: Vec<Box<dyn PropertySource>>,
    ) -> ContextResult<Self> {
        info!("启动应用上下文，{} 个属性源", sources.len());

        let namespace = Arc::new(MergedNamespace::merge(sources));
        registry.build(&namespace)?;

        let cells = (0..registry.definitions().len())
            .map(|_| OnceCell::new())
            .collect();

        info!(
            "应用上下文启动完成，{} 个组件定义",
            registry.definitions().len()
        );

        Ok(Self {
            namespace,
            registry,
            state: RwLock::new(ContextState::Running { cells }),
        })
    }

    /// 创建上下文构建器
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    /// 解析唯一的指定类型组件
    pub fn get_bean<T: Send + Sync + 'static>(&self) -> ContextResult<Arc<T>> {
        self.lookup_one(None)
    }

    /// 按限定符解析唯一的指定类型组件
    pub fn get_bean_with<T: Send + Sync + 'static>(
        &self,
        qualifier: &Qualifier,
    ) -> ContextResult<Arc<T>> {
        self.lookup_one(Some(qualifier))
    }

    /// 解析指定类型的全部组件
    ///
    /// 按定义图的确定构建顺序返回，可展开模板恰好为每个展开键返回一个实例。
    pub fn get_beans_of_type<T: Send + Sync + 'static>(&self) -> ContextResult<Vec<Arc<T>>> {
        let state = self.state.read();
        let ContextState::Running { cells } = &*state else {
            return Err(ContextError::ContextClosed);
        };

        let type_info = TypeInfo::of::<T>();
        let mut instances = Vec::new();

        for definition in self.registry.definitions() {
            if !definition.provides_type(type_info.id) {
                continue;
            }
            let mut injector = Injector::new(&self.registry, cells, &self.namespace);
            let handle = injector.resolve_ordinal(definition.ordinal())?;
            instances.push(downcast_handle(handle, definition)?);
        }

        Ok(instances)
    }

    /// 检查是否存在指定类型的组件定义
    pub fn contains_bean<T: 'static>(&self) -> bool {
        !self
            .registry
            .find_by_type(std::any::TypeId::of::<T>())
            .is_empty()
    }

    /// 按构建顺序获取全部定义名称
    pub fn bean_names(&self) -> Vec<String> {
        self.registry
            .definitions()
            .iter()
            .map(|definition| definition.name().to_string())
            .collect()
    }

    /// 获取合并后的命名空间
    pub fn namespace(&self) -> &Arc<MergedNamespace> {
        &self.namespace
    }

    /// 关闭上下文并释放所有已实例化的组件
    ///
    /// 之后的查找都会失败。重复关闭无副作用。
    pub fn close(&self) {
        let mut state = self.state.write();
        if matches!(&*state, ContextState::Closed) {
            return;
        }
        info!("关闭应用上下文");
        *state = ContextState::Closed;
    }

    fn lookup_one<T: Send + Sync + 'static>(
        &self,
        qualifier: Option<&Qualifier>,
    ) -> ContextResult<Arc<T>> {
        let state = self.state.read();
        let ContextState::Running { cells } = &*state else {
            return Err(ContextError::ContextClosed);
        };

        let type_info = TypeInfo::of::<T>();
        let definition = self
            .registry
            .find_one(type_info.id, &type_info.name, qualifier)?;
        let mut injector = Injector::new(&self.registry, cells, &self.namespace);
        let handle = injector.resolve_ordinal(definition.ordinal())?;
        downcast_handle(handle, definition)
    }
}

/// 构造函数注入句柄
///
/// 组件构造期间通过注入器递归解析依赖并读取本实例的子命名空间。
/// 循环依赖检测状态（解析链）随注入器在递归调用间显式传递，
/// 不依赖任何容器级共享可变状态。
pub struct Injector<'a> {
    registry: &'a BeanDefinitionRegistry,
    cells: &'a [OnceCell<BeanHandle>],
    namespace: &'a Arc<MergedNamespace>,
    /// 当前解析链，用于检测循环依赖
    chain: Vec<usize>,
}

impl<'a> Injector<'a> {
    fn new(
        registry: &'a BeanDefinitionRegistry,
        cells: &'a [OnceCell<BeanHandle>],
        namespace: &'a Arc<MergedNamespace>,
    ) -> Self {
        Self {
            registry,
            cells,
            namespace,
            chain: Vec::new(),
        }
    }

    /// 解析唯一的指定类型依赖
    pub fn bean<T: Send + Sync + 'static>(&mut self) -> ContextResult<Arc<T>> {
        self.bean_internal(None)
    }

    /// 按限定符解析唯一的指定类型依赖
    pub fn bean_with<T: Send + Sync + 'static>(
        &mut self,
        qualifier: &Qualifier,
    ) -> ContextResult<Arc<T>> {
        self.bean_internal(Some(qualifier))
    }

    /// 将本定义的子命名空间绑定到配置类型
    pub fn config<C: serde::de::DeserializeOwned>(&self) -> ContextResult<C> {
        let definition = self.current_definition()?;
        let view = self.view_for(definition)?;
        Ok(view.bind()?)
    }

    /// 读取本定义子命名空间中的单个属性
    pub fn property<C: serde::de::DeserializeOwned>(&self, relative: &str) -> ContextResult<C> {
        let definition = self.current_definition()?;
        let view = self.view_for(definition)?;
        Ok(view.get(relative)?)
    }

    /// 获取本定义的展开键
    pub fn qualifier_name(&self) -> Option<&str> {
        self.current_definition()
            .ok()
            .and_then(BeanDefinition::qualifier_name)
    }

    pub(crate) fn resolve_ordinal(&mut self, ordinal: usize) -> ContextResult<BeanHandle> {
        let cells = self.cells;
        if let Some(handle) = cells[ordinal].get() {
            return Ok(Arc::clone(handle));
        }

        if self.chain.contains(&ordinal) {
            return Err(ContextError::CircularDependency {
                chain: self.describe_chain(ordinal),
            });
        }

        let registry = self.registry;
        let definition = &registry.definitions()[ordinal];
        debug!("实例化组件: {}", definition.display_name());

        let constructor = Arc::clone(definition.constructor());
        self.chain.push(ordinal);
        let result = cells[ordinal].get_or_try_init(|| (*constructor)(&mut *self));
        self.chain.pop();

        result.map(Arc::clone)
    }

    fn bean_internal<T: Send + Sync + 'static>(
        &mut self,
        qualifier: Option<&Qualifier>,
    ) -> ContextResult<Arc<T>> {
        let type_info = TypeInfo::of::<T>();
        let registry = self.registry;
        let definition = registry.find_one(type_info.id, &type_info.name, qualifier)?;
        let handle = self.resolve_ordinal(definition.ordinal())?;
        downcast_handle(handle, definition)
    }

    fn current_definition(&self) -> ContextResult<&'a BeanDefinition> {
        let ordinal = self.chain.last().copied().ok_or_else(|| {
            ContextError::creation_failed("injector", "当前没有正在构造的组件")
        })?;
        Ok(&self.registry.definitions()[ordinal])
    }

    fn view_for(&self, definition: &BeanDefinition) -> ContextResult<NamespaceView> {
        let root = definition.config_root().ok_or_else(|| {
            ContextError::creation_failed(definition.display_name(), "模板未声明配置路径")
        })?;
        Ok(NamespaceView::new(Arc::clone(self.namespace), root))
    }

    fn describe_chain(&self, revisited: usize) -> String {
        let definitions = self.registry.definitions();
        let mut names: Vec<String> = self
            .chain
            .iter()
            .map(|&ordinal| definitions[ordinal].display_name())
            .collect();
        names.push(definitions[revisited].display_name());
        names.join(" -> ")
    }
}

/// 上下文构建器
#[derive(Default)]
pub struct ContextBuilder {
    registry: BeanDefinitionRegistry,
    sources: Vec<Box<dyn PropertySource>>,
}

impl std::fmt::Debug for ContextBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextBuilder")
            .field("registry", &self.registry)
            .field("sources_count", &self.sources.len())
            .finish()
    }
}

impl ContextBuilder {
    /// 创建新的上下文构建器
    pub fn new() -> Self {
        Self {
            registry: BeanDefinitionRegistry::new(),
            sources: Vec::new(),
        }
    }

    /// 注册组件模板
    pub fn register(mut self, template: ComponentTemplate) -> Self {
        self.registry.register(template);
        self
    }

    /// 添加属性源
    pub fn with_source<S: PropertySource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// 添加已装箱的属性源
    pub fn with_boxed_source(mut self, source: Box<dyn PropertySource>) -> Self {
        self.sources.push(source);
        self
    }

    /// 构建并启动上下文
    pub fn run(self) -> ContextResult<ApplicationContext> {
        ApplicationContext::run(self.registry, self.sources)
    }
}

/// 将类型擦除的实例句柄还原为具体类型
fn downcast_handle<T: Send + Sync + 'static>(
    handle: BeanHandle,
    definition: &BeanDefinition,
) -> ContextResult<Arc<T>> {
    handle
        .downcast::<T>()
        .map_err(|_| ContextError::creation_failed(definition.display_name(), "类型转换失败"))
}

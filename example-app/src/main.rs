//! # 示例应用程序
//!
//! 演示按配置组展开的组件实例化: 同一个数据源模板按配置中
//! `app.datasource` 下的子段数量展开为多个独立配置的实例。

use bean_context::{ApplicationContext, ComponentTemplate, Injector, Qualifier};
use clap::Parser;
use config_env::{EnvironmentPropertySource, MapPropertySource};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Canister 容器示例应用")]
struct Args {
    /// 环境变量前缀
    #[arg(long, default_value = "CANISTER")]
    env_prefix: String,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// 数据源配置
#[derive(Debug, Clone, Deserialize)]
struct DataSourceSettings {
    /// 连接地址
    url: String,
    /// 最大连接数
    #[serde(default = "default_max_connections")]
    max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

/// 数据源组件，每个配置组一个实例
#[derive(Debug)]
struct DataSource {
    name: String,
    settings: DataSourceSettings,
}

/// 依赖主数据源的仓储组件
#[derive(Debug)]
struct OrderRepository {
    datasource: Arc<DataSource>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(parse_log_level(&args.log_level))
        .init();

    info!("启动 Canister 示例应用");

    let datasource_template = ComponentTemplate::each_property::<DataSource, _>(
        "dataSource",
        "app.datasource",
        |injector: &mut Injector<'_>| {
            let name = injector.qualifier_name().unwrap_or_default().to_string();
            let settings: DataSourceSettings = injector.config()?;
            Ok(DataSource { name, settings })
        },
    );

    let repository_template = ComponentTemplate::singleton::<OrderRepository, _>(
        "orderRepository",
        |injector: &mut Injector<'_>| {
            let datasource = injector.bean_with::<DataSource>(&Qualifier::by_name("primary"))?;
            Ok(OrderRepository { datasource })
        },
    );

    // 默认配置，可被环境变量覆盖（如 CANISTER_APP_DATASOURCE_REPLICA_URL）
    let defaults = MapPropertySource::of(
        "defaults",
        [
            (
                "app.datasource.primary.url",
                serde_json::json!("jdbc:mysql://localhost/primary"),
            ),
            ("app.datasource.primary.max_connections", serde_json::json!(20)),
            (
                "app.datasource.replica.url",
                serde_json::json!("jdbc:mysql://localhost/replica"),
            ),
        ],
    );

    let context = ApplicationContext::builder()
        .register(datasource_template)
        .register(repository_template)
        .with_source(defaults)
        .with_source(EnvironmentPropertySource::new(args.env_prefix))
        .run()?;

    info!("已注册组件: {:?}", context.bean_names());

    for datasource in context.get_beans_of_type::<DataSource>()? {
        info!(
            "数据源 {} -> {} (最大连接数: {})",
            datasource.name, datasource.settings.url, datasource.settings.max_connections
        );
    }

    let repository = context.get_bean::<OrderRepository>()?;
    info!(
        "仓储使用数据源: {}",
        repository.datasource.settings.url
    );

    context.close();
    info!("应用已关闭");
    Ok(())
}

/// 解析日志级别
fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}

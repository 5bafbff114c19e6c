//! Centralized integration tests for context lifecycle and dependency resolution (migrated)

use bean_context::{ApplicationContext, ComponentTemplate, Injector, Qualifier};
use config_env::MapPropertySource;
use container_common::ContextError;
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};

/// 数据源配置组件
#[derive(Debug)]
struct DataSourceConfiguration {
    url: String,
}

/// 依赖指定数据源的仓储组件
#[derive(Debug)]
struct OrderRepository {
    datasource: Arc<DataSourceConfiguration>,
}

fn datasource_template() -> ComponentTemplate {
    ComponentTemplate::each_property::<DataSourceConfiguration, _>(
        "dataSourceConfiguration",
        "test.datasource",
        |injector: &mut Injector<'_>| {
            let url: String = injector.property("url")?;
            Ok(DataSourceConfiguration { url })
        },
    )
}

#[test]
fn constructor_injection_resolves_expanded_dependency_by_name() {
    let repository_template = ComponentTemplate::singleton::<OrderRepository, _>(
        "orderRepository",
        |injector: &mut Injector<'_>| {
            let datasource = injector
                .bean_with::<DataSourceConfiguration>(&Qualifier::by_name("one"))?;
            Ok(OrderRepository { datasource })
        },
    );

    let context = ApplicationContext::builder()
        .register(datasource_template())
        .register(repository_template)
        .with_source(MapPropertySource::of(
            "test",
            [
                ("test.datasource.one.url", "jdbc:mysql://localhost/one"),
                ("test.datasource.two.url", "jdbc:mysql://localhost/two"),
            ],
        ))
        .run()
        .unwrap();

    let repository = context.get_bean::<OrderRepository>().unwrap();
    assert_eq!(repository.datasource.url, "jdbc:mysql://localhost/one");

    // 注入的依赖与直接查找得到的是同一个实例
    let direct = context
        .get_bean_with::<DataSourceConfiguration>(&Qualifier::by_name("one"))
        .unwrap();
    assert!(Arc::ptr_eq(&repository.datasource, &direct));
}

/// 服务器配置
#[derive(Debug, Deserialize)]
struct ServerSettings {
    host: String,
    port: u16,
}

/// 持有类型化配置的组件
#[derive(Debug)]
struct HttpServer {
    settings: ServerSettings,
}

fn http_server_template() -> ComponentTemplate {
    ComponentTemplate::singleton::<HttpServer, _>("httpServer", |injector: &mut Injector<'_>| {
        Ok(HttpServer {
            settings: injector.config()?,
        })
    })
    .with_config_path("app.server")
}

#[test]
fn singleton_template_binds_typed_config_section() {
    let context = ApplicationContext::builder()
        .register(http_server_template())
        .with_source(MapPropertySource::of(
            "test",
            [
                ("app.server.host", json!("localhost")),
                ("app.server.port", json!(8080)),
            ],
        ))
        .run()
        .unwrap();

    let server = context.get_bean::<HttpServer>().unwrap();
    assert_eq!(server.settings.host, "localhost");
    assert_eq!(server.settings.port, 8080);
}

#[test]
fn unconvertible_property_fails_with_configuration_error() {
    let context = ApplicationContext::builder()
        .register(http_server_template())
        .with_source(MapPropertySource::of(
            "test",
            [
                ("app.server.host", json!("localhost")),
                ("app.server.port", json!("not-a-number")),
            ],
        ))
        .run()
        .unwrap();

    assert!(matches!(
        context.get_bean::<HttpServer>(),
        Err(ContextError::Configuration { .. })
    ));
}

#[test]
fn wrong_qualifier_on_singleton_is_no_such_bean() {
    let context = ApplicationContext::builder()
        .register(http_server_template())
        .with_source(MapPropertySource::of(
            "test",
            [
                ("app.server.host", json!("localhost")),
                ("app.server.port", json!(8080)),
            ],
        ))
        .run()
        .unwrap();

    assert!(matches!(
        context.get_bean_with::<HttpServer>(&Qualifier::by_name("other")),
        Err(ContextError::NoSuchBean { .. })
    ));
}

#[derive(Debug)]
struct ServiceA;

#[derive(Debug)]
struct ServiceB;

#[test]
fn mutual_constructor_injection_is_reported_as_circular() {
    let template_a = ComponentTemplate::singleton::<ServiceA, _>(
        "serviceA",
        |injector: &mut Injector<'_>| {
            let _b: Arc<ServiceB> = injector.bean()?;
            Ok(ServiceA)
        },
    );
    let template_b = ComponentTemplate::singleton::<ServiceB, _>(
        "serviceB",
        |injector: &mut Injector<'_>| {
            let _a: Arc<ServiceA> = injector.bean()?;
            Ok(ServiceB)
        },
    );

    let context = ApplicationContext::builder()
        .register(template_a)
        .register(template_b)
        .run()
        .unwrap();

    let result = context.get_bean::<ServiceA>();
    match result {
        Err(ContextError::CircularDependency { chain }) => {
            assert!(chain.contains("serviceA"));
            assert!(chain.contains("serviceB"));
        }
        other => panic!("期望循环依赖错误, 实际: {other:?}"),
    }
}

#[test]
fn lookups_after_close_fail_with_context_closed() {
    let context = ApplicationContext::builder()
        .register(datasource_template())
        .with_source(MapPropertySource::of(
            "test",
            [("test.datasource.one.url", "jdbc:mysql://localhost/one")],
        ))
        .run()
        .unwrap();

    assert!(context
        .get_bean_with::<DataSourceConfiguration>(&Qualifier::by_name("one"))
        .is_ok());

    context.close();
    // 重复关闭无副作用
    context.close();

    assert!(matches!(
        context.get_bean_with::<DataSourceConfiguration>(&Qualifier::by_name("one")),
        Err(ContextError::ContextClosed)
    ));
    assert!(matches!(
        context.get_beans_of_type::<DataSourceConfiguration>(),
        Err(ContextError::ContextClosed)
    ));
}

/// 记录构造次数的组件
#[derive(Debug)]
struct CountedService;

#[test]
fn concurrent_first_access_constructs_exactly_once() {
    let constructions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&constructions);

    let template = ComponentTemplate::singleton::<CountedService, _>(
        "countedService",
        move |_injector: &mut Injector<'_>| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(CountedService)
        },
    );

    let context = ApplicationContext::builder().register(template).run().unwrap();

    let thread_count = 8;
    let barrier = Barrier::new(thread_count);

    std::thread::scope(|scope| {
        let mut handles = Vec::new();
        for _ in 0..thread_count {
            handles.push(scope.spawn(|| {
                barrier.wait();
                context.get_bean::<CountedService>().unwrap()
            }));
        }

        let instances: Vec<Arc<CountedService>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        for instance in &instances[1..] {
            assert!(Arc::ptr_eq(&instances[0], instance));
        }
    });

    assert_eq!(constructions.load(Ordering::SeqCst), 1);
}

#[test]
fn bean_names_follow_deterministic_build_order() {
    let context = ApplicationContext::builder()
        .register(datasource_template())
        .register(http_server_template())
        .with_source(MapPropertySource::of(
            "test",
            [
                ("test.datasource.two.url", json!("jdbc:mysql://localhost/two")),
                ("test.datasource.one.url", json!("jdbc:mysql://localhost/one")),
                ("app.server.host", json!("localhost")),
                ("app.server.port", json!(8080)),
            ],
        ))
        .run()
        .unwrap();

    // 模板按注册顺序、展开键按字典序
    assert_eq!(context.bean_names(), vec!["one", "two", "httpServer"]);
    assert!(context.contains_bean::<HttpServer>());
    assert!(!context.contains_bean::<OrderRepository>());
}

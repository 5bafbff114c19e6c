//! Centralized integration tests for per-configuration-group expansion (migrated)

use bean_context::{ApplicationContext, ComponentTemplate, Injector, Qualifier};
use config_env::MapPropertySource;
use container_common::ContextError;
use std::sync::Arc;

/// 数据源配置组件
#[derive(Debug)]
struct DataSourceConfiguration {
    name: String,
    url: String,
}

impl DataSourceConfiguration {
    fn get_url(&self) -> &str {
        &self.url
    }
}

fn datasource_template() -> ComponentTemplate {
    ComponentTemplate::each_property::<DataSourceConfiguration, _>(
        "dataSourceConfiguration",
        "test.datasource",
        |injector: &mut Injector<'_>| {
            let name = injector.qualifier_name().unwrap_or_default().to_string();
            let url: String = injector.property("url")?;
            Ok(DataSourceConfiguration { name, url })
        },
    )
}

#[test]
fn test_each_property() {
    let context = ApplicationContext::builder()
        .register(datasource_template())
        .with_source(MapPropertySource::of(
            "test",
            [
                ("test.datasource.one.url", "jdbc:mysql://localhost/one"),
                ("test.datasource.two.url", "jdbc:mysql://localhost/two"),
            ],
        ))
        .run()
        .unwrap();

    let beans_of_type = context
        .get_beans_of_type::<DataSourceConfiguration>()
        .unwrap();
    assert_eq!(beans_of_type.len(), 2);

    let first_config = context
        .get_bean_with::<DataSourceConfiguration>(&Qualifier::by_name("one"))
        .unwrap();

    assert_eq!(first_config.get_url(), "jdbc:mysql://localhost/one");
    assert_eq!(first_config.name, "one");
}

#[test]
fn expansion_keys_cover_all_segments_without_duplicates() {
    let context = ApplicationContext::builder()
        .register(datasource_template())
        .with_source(MapPropertySource::of(
            "test",
            [
                ("test.datasource.one.url", "jdbc:mysql://localhost/one"),
                ("test.datasource.one.username", "root"),
                ("test.datasource.two.url", "jdbc:mysql://localhost/two"),
                ("test.datasource.three.url", "jdbc:mysql://localhost/three"),
            ],
        ))
        .run()
        .unwrap();

    let beans = context
        .get_beans_of_type::<DataSourceConfiguration>()
        .unwrap();

    let mut names: Vec<&str> = beans.iter().map(|b| b.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["one", "three", "two"]);
}

#[test]
fn adding_a_segment_adds_an_instance() {
    let base_pairs = vec![("test.datasource.one.url", "jdbc:mysql://localhost/one")];
    let context = ApplicationContext::builder()
        .register(datasource_template())
        .with_source(MapPropertySource::of("test", base_pairs.clone()))
        .run()
        .unwrap();
    assert_eq!(
        context
            .get_beans_of_type::<DataSourceConfiguration>()
            .unwrap()
            .len(),
        1
    );

    let mut extended = base_pairs;
    extended.push(("test.datasource.two.url", "jdbc:mysql://localhost/two"));
    let context = ApplicationContext::builder()
        .register(datasource_template())
        .with_source(MapPropertySource::of("test", extended))
        .run()
        .unwrap();
    assert_eq!(
        context
            .get_beans_of_type::<DataSourceConfiguration>()
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn zero_children_yield_zero_instances_without_error() {
    let context = ApplicationContext::builder()
        .register(datasource_template())
        .with_source(MapPropertySource::of("test", [("unrelated.key", "value")]))
        .run()
        .unwrap();

    let beans = context
        .get_beans_of_type::<DataSourceConfiguration>()
        .unwrap();
    assert!(beans.is_empty());

    assert!(matches!(
        context.get_bean::<DataSourceConfiguration>(),
        Err(ContextError::NoSuchBean { .. })
    ));
}

#[test]
fn unqualified_lookup_of_expanded_instances_is_ambiguous() {
    let context = ApplicationContext::builder()
        .register(datasource_template())
        .with_source(MapPropertySource::of(
            "test",
            [
                ("test.datasource.one.url", "jdbc:mysql://localhost/one"),
                ("test.datasource.two.url", "jdbc:mysql://localhost/two"),
            ],
        ))
        .run()
        .unwrap();

    assert!(matches!(
        context.get_bean::<DataSourceConfiguration>(),
        Err(ContextError::AmbiguousBean { .. })
    ));

    assert!(context
        .get_bean_with::<DataSourceConfiguration>(&Qualifier::by_name("two"))
        .is_ok());

    assert!(matches!(
        context.get_bean_with::<DataSourceConfiguration>(&Qualifier::by_name("missing")),
        Err(ContextError::NoSuchBean { .. })
    ));
}

#[test]
fn sequential_lookups_return_the_identical_instance() {
    let context = ApplicationContext::builder()
        .register(datasource_template())
        .with_source(MapPropertySource::of(
            "test",
            [("test.datasource.one.url", "jdbc:mysql://localhost/one")],
        ))
        .run()
        .unwrap();

    let first = context
        .get_bean_with::<DataSourceConfiguration>(&Qualifier::by_name("one"))
        .unwrap();
    let second = context
        .get_bean_with::<DataSourceConfiguration>(&Qualifier::by_name("one"))
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn independent_contexts_share_no_state() {
    let run = |url: &str| {
        ApplicationContext::builder()
            .register(datasource_template())
            .with_source(MapPropertySource::of(
                "test",
                [("test.datasource.one.url", url.to_string())],
            ))
            .run()
            .unwrap()
    };

    let first = run("jdbc:mysql://localhost/a");
    let second = run("jdbc:mysql://localhost/b");

    let bean_a = first
        .get_bean_with::<DataSourceConfiguration>(&Qualifier::by_name("one"))
        .unwrap();
    let bean_b = second
        .get_bean_with::<DataSourceConfiguration>(&Qualifier::by_name("one"))
        .unwrap();

    assert_eq!(bean_a.get_url(), "jdbc:mysql://localhost/a");
    assert_eq!(bean_b.get_url(), "jdbc:mysql://localhost/b");
    assert!(!Arc::ptr_eq(&bean_a, &bean_b));
}

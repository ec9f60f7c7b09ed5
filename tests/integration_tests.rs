use anyhow::Result;
use podcompose::test_support::{MockComposer, MockExecutor};
use podcompose::{ExecContext, ExecError, ExecOptions, ExecService, Invocation, RuntimeClient};
use std::sync::Arc;

fn setup() -> (Arc<MockComposer>, Arc<MockExecutor>, ExecService) {
    let composer = Arc::new(MockComposer::new());
    let executor = Arc::new(MockExecutor::new());
    let service = ExecService::new(composer.clone(), executor.clone());
    (composer, executor, service)
}

fn invocation(args: &[&str]) -> Invocation {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    Invocation::new(&args, ExecOptions::default()).unwrap()
}

#[test]
fn test_double_dash_single_container_dispatches() -> Result<()> {
    let (composer, executor, service) = setup();
    composer.add_service("web");
    composer.add_container("web", "c0ffee");

    let ctx = ExecContext::default();
    let client = RuntimeClient::new("podman", &ctx);
    service.run(&ctx, &invocation(&["web", "--", "sh"]), &client)?;

    let runs = executor.get_runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].args, vec!["web", "sh"]);
    assert_eq!(runs[0].container.id, "c0ffee");
    assert_eq!(runs[0].container.name, "web-1");

    Ok(())
}

#[test]
fn test_no_running_container() {
    let (composer, executor, service) = setup();
    composer.add_service("web");

    let ctx = ExecContext::default();
    let client = RuntimeClient::new("podman", &ctx);
    let err = service
        .run(&ctx, &invocation(&["web", "sh", "-c", "echo hi"]), &client)
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ExecError>(),
        Some(ExecError::NoMatchingContainer { .. })
    ));
    assert!(err.to_string().contains("web"));
    assert!(executor.get_runs().is_empty());
}

#[test]
fn test_scaled_service_is_ambiguous() {
    let (composer, executor, service) = setup();
    composer.add_service("web");
    composer.add_container("web", "aaa111");
    composer.add_container("web", "bbb222");

    let ctx = ExecContext::default();
    let client = RuntimeClient::new("podman", &ctx);
    let err = service
        .run(&ctx, &invocation(&["web", "sh"]), &client)
        .unwrap_err();

    match err.downcast_ref::<ExecError>() {
        Some(ExecError::AmbiguousTarget { services, count }) => {
            assert_eq!(services.to_string(), "[web]");
            assert_eq!(*count, 2);
        }
        other => panic!("expected AmbiguousTarget, got {other:?}"),
    }
    assert!(err.to_string().contains("web"));
    assert!(executor.get_runs().is_empty());
}

#[test]
fn test_unknown_service_yields_empty_set() {
    // the mock matches nothing for unknown names instead of failing
    let (composer, executor, service) = setup();
    composer.add_service("web");
    composer.add_container("web", "c0ffee");

    let ctx = ExecContext::default();
    let err = service.resolve(&ctx, "api").unwrap_err();

    assert_eq!(err.to_string(), "no containers found for []");
    assert_eq!(composer.get_calls(), vec!["service_names:api", "containers:[]"]);
    assert!(executor.get_runs().is_empty());
}

#[test]
fn test_other_services_do_not_count() -> Result<()> {
    let (composer, _executor, service) = setup();
    composer.add_service("web");
    composer.add_service("db");
    composer.add_container("web", "c0ffee");
    composer.add_container("db", "d00d01");
    composer.add_container("db", "d00d02");

    let ctx = ExecContext::default();
    let container = service.resolve(&ctx, "web")?;
    assert_eq!(container.id, "c0ffee");

    Ok(())
}

#[test]
fn test_options_reach_executor_untouched() -> Result<()> {
    let (composer, executor, service) = setup();
    composer.add_service("web");
    composer.add_container("web", "c0ffee");

    let options = ExecOptions {
        tty: true,
        interactive: true,
        env: vec!["LIST=a,b,c".into()],
        user: Some("www-data".into()),
        ..Default::default()
    };
    let args = vec!["web".to_string(), "bash".into()];
    let invocation = Invocation::new(&args, options.clone())?;

    let ctx = ExecContext::default();
    let client = RuntimeClient::new("podman", &ctx);
    service.run(&ctx, &invocation, &client)?;

    assert_eq!(executor.get_runs()[0].options, options);
    Ok(())
}

#[test]
fn test_resolution_is_repeatable() -> Result<()> {
    let (composer, executor, service) = setup();
    composer.add_service("web");
    composer.add_container("web", "c0ffee");

    let ctx = ExecContext::default();
    let client = RuntimeClient::new("podman", &ctx);
    let inv = invocation(&["web", "true"]);

    service.run(&ctx, &inv, &client)?;
    service.run(&ctx, &inv, &client)?;

    let runs = executor.get_runs();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].container, runs[1].container);
    assert_eq!(runs[0].args, runs[1].args);

    // same for failures
    composer.add_container("web", "c0ffee2");
    let first = service.resolve(&ctx, "web").unwrap_err().to_string();
    let second = service.resolve(&ctx, "web").unwrap_err().to_string();
    assert_eq!(first, second);

    Ok(())
}

use compy::dependencies::{DependencyError, remove_dependencies};

use crate::common::{CompyControl, EnvironmentCall, FakeEnvironment, ScriptedInterface};
use crate::setup_tracing;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_remove_by_requirement_name() {
    setup_tracing();
    let control = CompyControl::new(&["requests>=2.31", "numpy", "PyYAML==6.0.1"]);
    let environment = FakeEnvironment::default();

    let removed = remove_dependencies(
        &mut control.project(),
        &strings(&["requests", "pyyaml"]),
        Some(&environment),
        &ScriptedInterface::default(),
    )
    .await
    .unwrap();

    assert_eq!(removed, ["requests>=2.31", "PyYAML==6.0.1"]);
    assert_eq!(
        environment.calls(),
        [EnvironmentCall::Uninstall(strings(&["requests", "pyyaml"]))]
    );
    assert_eq!(control.declared(), ["numpy"]);
}

#[tokio::test]
async fn test_remove_unknown_dependency() {
    setup_tracing();
    let control = CompyControl::new(&["requests"]);
    let before = control.manifest_contents();
    let environment = FakeEnvironment::default();
    let interface = ScriptedInterface::default();

    let removed = remove_dependencies(
        &mut control.project(),
        &strings(&["flask"]),
        Some(&environment),
        &interface,
    )
    .await
    .unwrap();

    assert!(removed.is_empty());
    assert!(environment.calls().is_empty());
    assert_eq!(interface.warnings(), ["flask is not a dependency"]);
    assert_eq!(control.manifest_contents(), before);
}

#[tokio::test]
async fn test_remove_failed_uninstall_keeps_manifest() {
    setup_tracing();
    let control = CompyControl::new(&["requests", "numpy"]);
    let before = control.manifest_contents();
    let environment = FakeEnvironment::default().failing_uninstall();

    let err = remove_dependencies(
        &mut control.project(),
        &strings(&["numpy"]),
        Some(&environment),
        &ScriptedInterface::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DependencyError>(),
        Some(DependencyError::Uninstall(..))
    ));
    assert_eq!(control.manifest_contents(), before);
}

#[tokio::test]
async fn test_remove_without_environment() {
    setup_tracing();
    let control = CompyControl::new(&["requests", "numpy"]);
    let interface = ScriptedInterface::default();

    remove_dependencies(
        &mut control.project(),
        &strings(&["numpy"]),
        None::<&FakeEnvironment>,
        &interface,
    )
    .await
    .unwrap();

    assert!(
        interface
            .warnings()
            .iter()
            .any(|w| w.contains("skipping uninstallation"))
    );
    assert_eq!(control.declared(), ["requests"]);
}

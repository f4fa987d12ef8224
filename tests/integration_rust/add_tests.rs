use compy::dependencies::{DependencyError, add_dependencies};

use crate::common::{CompyControl, EnvironmentCall, FakeEnvironment, ScriptedInterface};
use crate::setup_tracing;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_add_installs_then_declares() {
    setup_tracing();
    let control = CompyControl::new(&["requests"]);
    let environment = FakeEnvironment::default();

    let added = add_dependencies(
        &mut control.project(),
        &strings(&["numpy>=2", "rich[jupyter]~=13.0"]),
        Some(&environment),
        &ScriptedInterface::default(),
    )
    .await
    .unwrap();

    assert_eq!(added, ["numpy>=2", "rich[jupyter]~=13.0"]);
    assert_eq!(
        environment.calls(),
        [EnvironmentCall::Install(strings(&[
            "numpy>=2",
            "rich[jupyter]~=13.0"
        ]))]
    );
    assert_eq!(
        control.declared(),
        ["requests", "numpy>=2", "rich[jupyter]~=13.0"]
    );
}

#[tokio::test]
async fn test_add_rejects_invalid_requirement() {
    setup_tracing();
    let control = CompyControl::new(&["requests"]);
    let before = control.manifest_contents();
    let environment = FakeEnvironment::default();

    let err = add_dependencies(
        &mut control.project(),
        &strings(&["numpy", "==1.0"]),
        Some(&environment),
        &ScriptedInterface::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DependencyError>(),
        Some(DependencyError::InvalidRequirement { requirement, .. }) if requirement == "==1.0"
    ));
    assert!(environment.calls().is_empty());
    assert_eq!(control.manifest_contents(), before);
}

#[tokio::test]
async fn test_add_failed_install_keeps_manifest() {
    setup_tracing();
    let control = CompyControl::new(&[]);
    let before = control.manifest_contents();
    let environment = FakeEnvironment::default().failing_install();

    let err = add_dependencies(
        &mut control.project(),
        &strings(&["numpy"]),
        Some(&environment),
        &ScriptedInterface::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DependencyError>(),
        Some(DependencyError::Install(..))
    ));
    assert_eq!(control.manifest_contents(), before);
}

#[tokio::test]
async fn test_add_without_environment() {
    setup_tracing();
    let control = CompyControl::new(&[]);
    let interface = ScriptedInterface::default();

    add_dependencies(
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
            .any(|w| w.contains("skipping installation"))
    );
    assert_eq!(control.declared(), ["numpy"]);
}

#[tokio::test]
async fn test_add_existing_dependency() {
    setup_tracing();
    let control = CompyControl::new(&["requests"]);
    let before = control.manifest_contents();
    let environment = FakeEnvironment::default();
    let interface = ScriptedInterface::default();

    let added = add_dependencies(
        &mut control.project(),
        &strings(&["requests"]),
        Some(&environment),
        &interface,
    )
    .await
    .unwrap();

    assert!(added.is_empty());
    assert!(environment.calls().is_empty());
    assert_eq!(interface.warnings(), ["requests is already a dependency"]);
    assert_eq!(control.manifest_contents(), before);
}

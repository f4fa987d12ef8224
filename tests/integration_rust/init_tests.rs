use compy::{
    Project,
    init::{InitOptions, init_project},
};
use compy_config::{Author, License};
use compy_consts::consts;

use crate::common::ScriptedInterface;
use crate::setup_tracing;

fn options(path: std::path::PathBuf) -> InitOptions {
    InitOptions {
        path,
        name: None,
        author: Author {
            name: "Ada Lovelace".to_string(),
            email: Some("ada@example.com".to_string()),
        },
        license: License::Mit,
        version: "0.1.0".to_string(),
        description: "Analytical engine tooling".to_string(),
        python_executable: "python3".to_string(),
        create_venv: false,
        init_git: false,
    }
}

#[tokio::test]
async fn test_init_creates_project() {
    setup_tracing();
    let tmp = tempfile::tempdir().unwrap();
    let interface = ScriptedInterface::default();

    let root = init_project(options(tmp.path().join("engine")), &interface)
        .await
        .unwrap();

    assert!(root.join("engine").join(consts::INIT_FILE).is_file());
    assert!(!root.join(consts::VENV_DIR).exists());
    assert!(!root.join(consts::GIT_DIR).exists());
    assert_eq!(
        fs_err::read_to_string(root.join(consts::README_FILE)).unwrap(),
        "# engine\n"
    );
    assert!(
        fs_err::read_to_string(root.join(consts::LICENSE_FILE))
            .unwrap()
            .starts_with("MIT License")
    );
    assert!(
        fs_err::read_to_string(root.join(consts::GITIGNORE_FILE))
            .unwrap()
            .contains(".venv/")
    );
    assert!(interface.warnings().is_empty());

    let project = Project::load(&root).unwrap();
    assert_eq!(project.manifest().name(), "engine");
    assert!(project.manifest().dependencies().is_empty());
    assert_eq!(
        project.manifest().package_layout().keys().collect::<Vec<_>>(),
        ["engine"]
    );
}

#[tokio::test]
async fn test_init_keeps_existing_files() {
    setup_tracing();
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("engine");
    fs_err::create_dir_all(&path).unwrap();
    fs_err::write(path.join(consts::README_FILE), "my notes\n").unwrap();

    let interface = ScriptedInterface::default();
    let mut opts = options(path.clone());
    opts.name = Some("difference_engine".to_string());
    let root = init_project(opts, &interface).await.unwrap();

    assert_eq!(
        fs_err::read_to_string(root.join(consts::README_FILE)).unwrap(),
        "my notes\n"
    );
    assert_eq!(interface.warnings(), ["README.md already exists"]);
    assert!(root.join("difference_engine").join(consts::INIT_FILE).is_file());

    let interface = ScriptedInterface::default();
    init_project(options(path), &interface).await.unwrap();
    assert_eq!(
        interface.warnings(),
        [
            "pyproject.toml already exists",
            "README.md already exists",
            "LICENSE already exists",
            ".gitignore already exists",
        ]
    );
}

//! Rendering of the manifest of a new project.

use minijinja::{Environment, context};

use compy_consts::consts;

/// The pyproject.toml template
///
/// Strings go through the `toml_string` and `toml_key` filters so that any
/// name or description renders as valid TOML.
const PYPROJECT_TEMPLATE: &str = r#"[project]
name = {{ name|toml_string }}
authors = [{ name = {{ author|toml_string }}{% if email %}, email = {{ email|toml_string }}{% endif %} }]
version = {{ version|toml_string }}
description = {{ description|toml_string }}
license = { file = "LICENSE" }
dependencies = []

[build-system]
requires = ["setuptools >= 61.0"]
build-backend = "setuptools.build_meta"

[tool.setuptools.package-dir]
{{ name|toml_key }} = {{ name|toml_string }}
"#;

/// The values that end up in a new `pyproject.toml`.
#[derive(Debug, Clone)]
pub struct PyProjectTemplate<'a> {
    pub name: &'a str,
    pub author: &'a str,
    pub email: Option<&'a str>,
    pub version: &'a str,
    pub description: &'a str,
}

fn toml_string(value: String) -> String {
    toml_edit::Value::from(value).to_string()
}

fn toml_key(value: String) -> String {
    toml_edit::Key::new(value).to_string()
}

impl PyProjectTemplate<'_> {
    pub fn render(&self) -> Result<String, minijinja::Error> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.add_filter("toml_string", toml_string);
        env.add_filter("toml_key", toml_key);
        env.render_named_str(
            consts::PYPROJECT_MANIFEST,
            PYPROJECT_TEMPLATE,
            context! {
                name => self.name,
                author => self.author,
                email => self.email,
                version => self.version,
                description => self.description,
            },
        )
    }
}

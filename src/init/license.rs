use compy_config::License;
use minijinja::{Environment, context};

const MIT_TEMPLATE: &str = include_str!("licenses/MIT.txt");
const GPL3_TEMPLATE: &str = include_str!("licenses/GPL3.txt");

/// Renders the text of the license file of a new project.
pub fn render_license(
    license: License,
    project: &str,
    holder: &str,
    year: i32,
) -> Result<String, minijinja::Error> {
    let template = match license {
        License::Mit => MIT_TEMPLATE,
        License::Gpl3 => GPL3_TEMPLATE,
    };

    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.render_named_str(
        license.as_str(),
        template,
        context! {
            project,
            holder,
            year,
        },
    )
}

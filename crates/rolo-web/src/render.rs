//! Page templates.
//!
//! Templates live as standalone files under `src/templates/` — separating
//! them from code keeps them easy to edit and diff — and are included as
//! string constants, compiled into one shared [`Environment`] at startup.
//! Template names end in `.html`, which switches minijinja's auto-escaping
//! on for every value they interpolate.

use minijinja::Environment;

pub const CONTACT_LIST: &str = include_str!("templates/contact_list.html");
pub const CONTACT_DETAIL: &str = include_str!("templates/contact_detail.html");
pub const CONTACT_FORM: &str = include_str!("templates/contact_form.html");
pub const CONTACT_CONFIRM_DELETE: &str =
  include_str!("templates/contact_confirm_delete.html");
pub const STATUS_LIST: &str = include_str!("templates/status_list.html");
pub const STATUS_DETAIL: &str = include_str!("templates/status_detail.html");
pub const STATUS_FORM: &str = include_str!("templates/status_form.html");
pub const STATUS_CONFIRM_DELETE: &str =
  include_str!("templates/status_confirm_delete.html");

/// Build the template environment shared by every page handler.
pub fn environment() -> Environment<'static> {
  let mut env = Environment::new();
  for (name, source) in [
    ("contact_list.html", CONTACT_LIST),
    ("contact_detail.html", CONTACT_DETAIL),
    ("contact_form.html", CONTACT_FORM),
    ("contact_confirm_delete.html", CONTACT_CONFIRM_DELETE),
    ("status_list.html", STATUS_LIST),
    ("status_detail.html", STATUS_DETAIL),
    ("status_form.html", STATUS_FORM),
    ("status_confirm_delete.html", STATUS_CONFIRM_DELETE),
  ] {
    env
      .add_template(name, source)
      .expect("bundled template parses");
  }
  env
}

/// Render one named template with the given context.
pub fn page(
  env: &Environment<'static>,
  name: &str,
  context: minijinja::Value,
) -> Result<String, minijinja::Error> {
  env.get_template(name)?.render(context)
}

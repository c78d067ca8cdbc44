mod template;

pub use template::{container_name, render_template};

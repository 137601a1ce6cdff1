use handlebars::{Handlebars, TemplateError};

/// All pages are embedded at compile time and share the `layout` partial.
pub fn build_registry() -> Result<Handlebars<'static>, TemplateError> {
    let mut registry = Handlebars::new();

    // Registered templates double as partials; pages pull in `layout`
    registry.register_template_string("layout", include_str!("../../templates/layout.hbs"))?;
    registry.register_template_string("login", include_str!("../../templates/login.hbs"))?;
    registry.register_template_string("register", include_str!("../../templates/register.hbs"))?;
    registry.register_template_string(
        "board_list",
        include_str!("../../templates/board_list.hbs"),
    )?;
    registry.register_template_string(
        "board_detail",
        include_str!("../../templates/board_detail.hbs"),
    )?;
    registry.register_template_string(
        "board_form",
        include_str!("../../templates/board_form.hbs"),
    )?;
    registry.register_template_string(
        "board_delete",
        include_str!("../../templates/board_delete.hbs"),
    )?;

    Ok(registry)
}

//! Embedded starter policy templates.
//!
//! Templates are baked into the binary at compile time so `purview init`
//! works without any external files. Template prose is opaque data to the
//! resolver; nothing here interprets it.

/// Macro to embed starter templates at compile time as text.
///
/// Generates:
/// - Public constants for each embedded template
/// - `get_template(name)` function for lookup
/// - `list_templates()` function for discovery
macro_rules! embedded_templates {
    ($($name:expr => $const_name:ident),* $(,)?) => {
        $(
            pub const $const_name: &str =
                include_str!(concat!("../../templates/", $name));
        )*

        pub fn get_template(name: &str) -> Option<String> {
            match name {
                $( $name => Some($const_name.to_string()), )*
                _ => None,
            }
        }

        pub fn list_templates() -> Vec<String> {
            vec![ $( $name.to_string(), )* ]
        }
    };
}

embedded_templates! {
    "AGENTS.md" => TEMPLATE_GENERIC,
    "AGENTS.django.md" => TEMPLATE_DJANGO,
    "AGENTS.react.md" => TEMPLATE_REACT,
}

/// Map a CLI template variant to its embedded content.
pub fn template_for_variant(variant: &str) -> Option<String> {
    match variant {
        "generic" => get_template("AGENTS.md"),
        "django" => get_template("AGENTS.django.md"),
        "react" => get_template("AGENTS.react.md"),
        _ => None,
    }
}

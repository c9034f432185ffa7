use caddyext_config::Layout;

/// Framework packages every Caddy directives file imports
const FRAMEWORK_PACKAGES: &[&str] = &["caddy/https", "caddy/parse", "caddy/setup", "middleware"];

/// Minimal directives file with the framework imports and an empty order list
pub fn skeleton(layout: &Layout) -> String {
    let root = layout.framework_root().trim_end_matches('/');
    let imports: String = FRAMEWORK_PACKAGES
        .iter()
        .map(|package| format!("\t\"{}/{}\"\n", root, package))
        .collect();
    format!(
        "package caddy\n\nimport (\n{imports})\n\nvar {} = []directive{{}}\n",
        layout.list_name
    )
}

//! License header rendering.
//!
//! Placeholders: `{name}`, `{version}`, `{license}` (one ` * ` line per
//! license entry).

/// Default header block.
pub const DEFAULT_TEMPLATE: &str = "/*\n * {name} {version}\n *\n{license} *\n */\n";

/// Render a header from a template.
pub fn render_header(template: &str, name: &str, version: &str, license: &[String]) -> String {
    let license_block: String = license
        .iter()
        .map(|line| {
            if line.is_empty() {
                " *\n".to_string()
            } else {
                format!(" * {line}\n")
            }
        })
        .collect();

    template
        .replace("{name}", name)
        .replace("{version}", version)
        .replace("{license}", &license_block)
}

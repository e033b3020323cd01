//! Show-only listing of detected handler types.

use analysis::Model;
use unicode_width::UnicodeWidthStr;

/// Printed when the package has no annotated handler types.
pub const NO_HANDLERS: &str = "(No handler types detected)";

/// Width of `s` in a monospace terminal.
///
/// East Asian wide and fullwidth characters take two columns.
pub fn monospace_width(s: &str) -> usize { UnicodeWidthStr::width(s) }

/// One line per event: kind, handler name, flags and position, in columns.
pub fn render_summary(model: &Model) -> String {
    let rows: Vec<(&str, &str, String, String)> = model
        .events
        .iter()
        .map(|e| (e.kind.tag(), e.handler.as_str(), e.flags.to_string(), e.position.to_string()))
        .collect();

    let name_width = rows.iter().map(|(_, name, _, _)| monospace_width(name)).max().unwrap_or(0);
    let flags_width = rows.iter().map(|(_, _, flags, _)| flags.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (kind, name, flags, position) in &rows {
        let name_pad = " ".repeat(name_width - monospace_width(name));
        let flags_pad = " ".repeat(flags_width - flags.len());
        out.push_str(&format!("{} {}{} {}{} {}\n", kind, name, name_pad, flags, flags_pad, position));
    }
    out
}

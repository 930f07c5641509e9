//! Toolbar markup.
//!
//! Each group becomes a `div.math-entry-toolgroup`, each enabled tool a
//! `div.math-entry-tool` carrying the attributes the delegated press handler
//! reads back: `data-identifier`, `data-latex`, `data-fn`.

use markdown_weaver_escape::{StrWrite, escape_html};

use math_entry_core::Toolbar;

pub const TOOLGROUP_CLASS: &str = "math-entry-toolgroup";
pub const TOOL_CLASS: &str = "math-entry-tool";

/// Render the toolbar buttons as HTML.
pub fn toolbar_html(toolbar: &Toolbar) -> String {
    let mut html = String::new();
    if write_toolbar(&mut html, toolbar).is_err() {
        tracing::warn!("failed to write toolbar markup");
    }
    html
}

/// Write the toolbar buttons into `w`.
///
/// Labels are trusted catalog markup (entities) and are not escaped.
pub fn write_toolbar<W: StrWrite>(w: &mut W, toolbar: &Toolbar) -> Result<(), W::Error> {
    for group in toolbar.groups() {
        write!(w, r#"<div class="{TOOLGROUP_CLASS}" data-identifier=""#)?;
        escape_html(&mut *w, group.id)?;
        w.write_str("\">")?;

        for tool in &group.tools {
            write!(w, r#"<div class="{TOOL_CLASS}" data-identifier="{}" data-latex=""#, tool.id)?;
            escape_html(&mut *w, tool.latex)?;
            write!(w, r#"" data-fn="{}" title=""#, tool.kind.as_str())?;
            escape_html(&mut *w, tool.description)?;
            write!(w, r#"">{}</div>"#, tool.label)?;
        }
        w.write_str("</div>")?;
    }
    Ok(())
}

//! Rendering Mode Selector.
//!
//! Two independent booleans (gap mode, authoring context) select one of four
//! rendering behaviours. The mode is derived on every render, never cached.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Authoring + gap: editable field seeded with the gap expression,
    /// gaps shown as embed widgets.
    AuthoringGapEditor,
    /// Authoring + plain: no field, a placeholder stands in for it.
    AuthoringPlaceholder,
    /// Runtime + gap: static field, one editable inner field per gap.
    RuntimeGapStatic,
    /// Runtime + plain: empty editable field.
    RuntimePlainEditor,
}

impl RenderMode {
    pub fn select(use_gap_expression: bool, authoring: bool) -> Self {
        match (use_gap_expression, authoring) {
            (true, true) => RenderMode::AuthoringGapEditor,
            (false, true) => RenderMode::AuthoringPlaceholder,
            (true, false) => RenderMode::RuntimeGapStatic,
            (false, false) => RenderMode::RuntimePlainEditor,
        }
    }

    pub fn is_gap_mode(self) -> bool {
        matches!(
            self,
            RenderMode::AuthoringGapEditor | RenderMode::RuntimeGapStatic
        )
    }

    pub fn is_authoring(self) -> bool {
        matches!(
            self,
            RenderMode::AuthoringGapEditor | RenderMode::AuthoringPlaceholder
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::AuthoringGapEditor => "authoring-gap-editor",
            RenderMode::AuthoringPlaceholder => "authoring-placeholder",
            RenderMode::RuntimeGapStatic => "runtime-gap-static",
            RenderMode::RuntimePlainEditor => "runtime-plain-editor",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_table() {
        let cases = [
            (true, true, RenderMode::AuthoringGapEditor),
            (false, true, RenderMode::AuthoringPlaceholder),
            (true, false, RenderMode::RuntimeGapStatic),
            (false, false, RenderMode::RuntimePlainEditor),
        ];
        for (gap, authoring, expected) in cases {
            let mode = RenderMode::select(gap, authoring);
            assert_eq!(mode, expected);
            assert_eq!(mode.is_gap_mode(), gap);
            assert_eq!(mode.is_authoring(), authoring);
        }
    }
}

//! Tool catalog and toolbar layout.
//!
//! The catalog is fixed: 17 tools, each inserting a LaTeX payload into the
//! active field either as a structural command (`cmd`) or as literal LaTeX
//! (`write`). Tools are laid out in 5 ordered groups. A group with no enabled
//! tool is dropped from the toolbar entirely.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::config::ToolsStatus;

/// Identifier of a toolbar tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolId {
    Frac,
    Sqrt,
    Exp,
    Log,
    Ln,
    E,
    Infinity,
    Lbrack,
    Rbrack,
    Pi,
    Cos,
    Sin,
    Lte,
    Gte,
    Times,
    Divide,
    Plusminus,
}

impl ToolId {
    /// Number of tools in the catalog.
    pub const COUNT: usize = 17;

    /// Every tool, in catalog order.
    pub const ALL: [ToolId; Self::COUNT] = [
        ToolId::Frac,
        ToolId::Sqrt,
        ToolId::Exp,
        ToolId::Log,
        ToolId::Ln,
        ToolId::E,
        ToolId::Infinity,
        ToolId::Lbrack,
        ToolId::Rbrack,
        ToolId::Pi,
        ToolId::Cos,
        ToolId::Sin,
        ToolId::Lte,
        ToolId::Gte,
        ToolId::Times,
        ToolId::Divide,
        ToolId::Plusminus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolId::Frac => "frac",
            ToolId::Sqrt => "sqrt",
            ToolId::Exp => "exp",
            ToolId::Log => "log",
            ToolId::Ln => "ln",
            ToolId::E => "e",
            ToolId::Infinity => "infinity",
            ToolId::Lbrack => "lbrack",
            ToolId::Rbrack => "rbrack",
            ToolId::Pi => "pi",
            ToolId::Cos => "cos",
            ToolId::Sin => "sin",
            ToolId::Lte => "lte",
            ToolId::Gte => "gte",
            ToolId::Times => "times",
            ToolId::Divide => "divide",
            ToolId::Plusminus => "plusminus",
        }
    }

    /// Key of the enable flag in the host configuration.
    pub fn config_key(self) -> &'static str {
        match self {
            ToolId::Frac => "tool_frac",
            ToolId::Sqrt => "tool_sqrt",
            ToolId::Exp => "tool_exp",
            ToolId::Log => "tool_log",
            ToolId::Ln => "tool_ln",
            ToolId::E => "tool_e",
            ToolId::Infinity => "tool_infinity",
            ToolId::Lbrack => "tool_lbrack",
            ToolId::Rbrack => "tool_rbrack",
            ToolId::Pi => "tool_pi",
            ToolId::Cos => "tool_cos",
            ToolId::Sin => "tool_sin",
            ToolId::Lte => "tool_lte",
            ToolId::Gte => "tool_gte",
            ToolId::Times => "tool_times",
            ToolId::Divide => "tool_divide",
            ToolId::Plusminus => "tool_plusminus",
        }
    }

    /// Parse a tool identifier as it appears in markup.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }

    /// Position in `ALL`.
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Catalog entry for this tool.
    pub fn tool(self) -> &'static Tool {
        &TOOLS[self.index()]
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a tool's payload is applied to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertKind {
    /// Structural command, e.g. `\frac` builds a fraction template.
    Cmd,
    /// Literal LaTeX insertion.
    Write,
}

impl InsertKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InsertKind::Cmd => "cmd",
            InsertKind::Write => "write",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cmd" => Some(InsertKind::Cmd),
            "write" => Some(InsertKind::Write),
            _ => None,
        }
    }
}

/// A catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tool {
    pub id: ToolId,
    /// Button label. May contain HTML entities.
    pub label: &'static str,
    pub latex: &'static str,
    pub kind: InsertKind,
    pub description: &'static str,
}

impl Tool {
    /// The insertion this tool dispatches when pressed.
    pub fn insertion(&self) -> ToolInsertion {
        ToolInsertion::new(self.kind, self.latex)
    }
}

const fn tool(
    id: ToolId,
    label: &'static str,
    latex: &'static str,
    kind: InsertKind,
    description: &'static str,
) -> Tool {
    Tool {
        id,
        label,
        latex,
        kind,
        description,
    }
}

/// The catalog, indexed by `ToolId`.
static TOOLS: [Tool; ToolId::COUNT] = [
    tool(ToolId::Frac, "x/y", r"\frac", InsertKind::Cmd, "Fraction"),
    tool(ToolId::Sqrt, "&radic;", r"\sqrt", InsertKind::Cmd, "Square root"),
    tool(ToolId::Exp, "x&#8319;", "^", InsertKind::Cmd, "Exponent"),
    tool(ToolId::Log, "log", r"\log", InsertKind::Write, "Log"),
    tool(ToolId::Ln, "ln", r"\ln", InsertKind::Write, "Ln"),
    tool(ToolId::E, "&#8494;", r"\mathrm{e}", InsertKind::Write, "Euler's constant"),
    tool(ToolId::Infinity, "&#8734;", r"\infty", InsertKind::Write, "Infinity"),
    tool(ToolId::Lbrack, "[", r"\lbrack", InsertKind::Write, "Left bracket"),
    tool(ToolId::Rbrack, "]", r"\rbrack", InsertKind::Write, "Right bracket"),
    tool(ToolId::Pi, "&pi;", r"\pi", InsertKind::Write, "Pi"),
    tool(ToolId::Cos, "cos", r"\cos", InsertKind::Write, "Cosinus"),
    tool(ToolId::Sin, "sin", r"\sin", InsertKind::Write, "Sinus"),
    tool(ToolId::Lte, "&le;", r"\le", InsertKind::Write, "Lower than or equal"),
    tool(ToolId::Gte, "&ge;", r"\ge", InsertKind::Write, "Greater than or equal"),
    tool(ToolId::Times, "&times;", r"\times", InsertKind::Cmd, "Multiply"),
    tool(ToolId::Divide, "&divide;", r"\div", InsertKind::Cmd, "Divide"),
    tool(ToolId::Plusminus, "&#177;", r"\pm", InsertKind::Write, "Plus/minus"),
];

/// A named, ordered group of tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolGroup {
    pub id: &'static str,
    pub tools: &'static [ToolId],
}

/// Toolbar groups in display order.
pub const TOOL_GROUPS: [ToolGroup; 5] = [
    ToolGroup {
        id: "functions",
        tools: &[ToolId::Sqrt, ToolId::Frac, ToolId::Exp, ToolId::Log, ToolId::Ln],
    },
    ToolGroup {
        id: "symbols",
        tools: &[ToolId::E, ToolId::Infinity, ToolId::Lbrack, ToolId::Rbrack],
    },
    ToolGroup {
        id: "trigo",
        tools: &[ToolId::Pi, ToolId::Sin, ToolId::Cos],
    },
    ToolGroup {
        id: "comparison",
        tools: &[ToolId::Lte, ToolId::Gte],
    },
    ToolGroup {
        id: "operands",
        tools: &[ToolId::Times, ToolId::Divide, ToolId::Plusminus],
    },
];

/// What a toolbar press asks the active field to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInsertion {
    pub kind: InsertKind,
    pub latex: SmolStr,
}

impl ToolInsertion {
    pub fn new(kind: InsertKind, latex: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            latex: latex.into(),
        }
    }

    /// Rebuild an insertion from button attributes (`data-fn`, `data-latex`).
    pub fn from_attributes(kind: &str, latex: &str) -> Option<Self> {
        InsertKind::parse(kind).map(|kind| Self::new(kind, latex))
    }
}

/// A group as it appears on a built toolbar: only enabled tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarGroup {
    pub id: &'static str,
    pub tools: Vec<&'static Tool>,
}

/// The toolbar built for one render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toolbar {
    groups: Vec<ToolbarGroup>,
}

impl Toolbar {
    /// Build the toolbar for the given tool flags.
    pub fn build(status: &ToolsStatus) -> Self {
        let groups = TOOL_GROUPS
            .iter()
            .filter_map(|group| {
                let tools: Vec<&'static Tool> = group
                    .tools
                    .iter()
                    .filter(|id| status.is_enabled(**id))
                    .map(|id| id.tool())
                    .collect();
                (!tools.is_empty()).then_some(ToolbarGroup {
                    id: group.id,
                    tools,
                })
            })
            .collect();
        Self { groups }
    }

    pub fn groups(&self) -> &[ToolbarGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// One line per group: `group: tool tool ...`.
impl fmt::Display for Toolbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}:", group.id)?;
            for tool in &group.tools {
                write!(f, " {}", tool.id)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_indexed_by_id() {
        for id in ToolId::ALL {
            assert_eq!(id.tool().id, id);
        }
    }

    #[test]
    fn test_parse_roundtrips_names() {
        for id in ToolId::ALL {
            assert_eq!(ToolId::parse(id.as_str()), Some(id));
            assert_eq!(id.config_key(), format!("tool_{}", id.as_str()));
        }
        assert_eq!(ToolId::parse("cosh"), None);
    }

    #[test]
    fn test_every_tool_belongs_to_one_group() {
        for id in ToolId::ALL {
            let owners = TOOL_GROUPS
                .iter()
                .filter(|g| g.tools.contains(&id))
                .count();
            assert_eq!(owners, 1, "{id} should be in exactly one group");
        }
    }

    #[test]
    fn test_insert_kinds() {
        assert_eq!(ToolId::Frac.tool().kind, InsertKind::Cmd);
        assert_eq!(ToolId::Times.tool().kind, InsertKind::Cmd);
        assert_eq!(ToolId::Pi.tool().kind, InsertKind::Write);
        assert_eq!(ToolId::E.tool().latex, r"\mathrm{e}");
    }

    #[test]
    fn test_full_toolbar_layout() {
        let toolbar = Toolbar::build(&ToolsStatus::default());
        insta::assert_snapshot!(toolbar.to_string(), @r"
        functions: sqrt frac exp log ln
        symbols: e infinity lbrack rbrack
        trigo: pi sin cos
        comparison: lte gte
        operands: times divide plusminus
        ");
    }

    #[test]
    fn test_empty_group_is_omitted() {
        let mut status = ToolsStatus::default();
        status.set(ToolId::Lte, false);
        status.set(ToolId::Gte, false);
        status.set(ToolId::Sin, false);

        let toolbar = Toolbar::build(&status);
        let ids: Vec<_> = toolbar.groups().iter().map(|g| g.id).collect();
        assert_eq!(ids, ["functions", "symbols", "trigo", "operands"]);
        let trigo: Vec<_> = toolbar.groups()[2].tools.iter().map(|t| t.id).collect();
        assert_eq!(trigo, [ToolId::Pi, ToolId::Cos]);
    }

    #[test]
    fn test_all_disabled_gives_empty_toolbar() {
        let status = ToolsStatus::all(false);
        assert!(Toolbar::build(&status).is_empty());
    }

    #[test]
    fn test_insertion_from_attributes() {
        assert_eq!(
            ToolInsertion::from_attributes("cmd", r"\sqrt"),
            Some(ToolInsertion::new(InsertKind::Cmd, r"\sqrt"))
        );
        assert_eq!(ToolInsertion::from_attributes("click", r"\sqrt"), None);
    }
}

//! Descriptor names and expression rendering.
//!
//! Names are built only from the tree's own content (locations, signal
//! names, structure), never from memory addresses or allocation order, so
//! two processes tagging the same design produce byte-identical names.

use vigil_tree::{Arena, Expr, Signal, SignalId, SrcLoc};

/// Builds descriptor names.
#[derive(Debug, Clone, Default)]
pub struct Namer {
    anchor: Option<String>,
}

impl Namer {
    /// A namer that keeps only the last component of source paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// A namer that keeps source paths from `anchor` onwards.
    pub fn with_anchor(anchor: impl Into<String>) -> Self {
        Self {
            anchor: Some(anchor.into()),
        }
    }

    /// `file:line`, or `unknown`.
    pub fn loc(&self, loc: Option<&SrcLoc>) -> String {
        match loc {
            Some(loc) if !loc.file.is_empty() => loc.short(self.anchor.as_deref()),
            _ => "unknown".to_string(),
        }
    }
}

/// Renders an expression with signal names.
pub fn render_expr(signals: &Arena<SignalId, Signal>, expr: &Expr) -> String {
    render(signals, expr, false)
}

fn render(signals: &Arena<SignalId, Signal>, expr: &Expr, nested: bool) -> String {
    let wrap = |s: String| if nested { format!("({s})") } else { s };
    match expr {
        Expr::Signal(id) => signals
            .get(*id)
            .map_or_else(|| id.to_string(), |s| s.name.clone()),
        Expr::Const(v) => v.to_string(),
        Expr::Unary { op, operand } => {
            format!("{}{}", op.symbol(), render(signals, operand, true))
        }
        Expr::Binary { op, lhs, rhs } => wrap(format!(
            "{} {} {}",
            render(signals, lhs, true),
            op.symbol(),
            render(signals, rhs, true)
        )),
        Expr::Mux {
            sel,
            if_true,
            if_false,
        } => wrap(format!(
            "{} ? {} : {}",
            render(signals, sel, true),
            render(signals, if_true, true),
            render(signals, if_false, true)
        )),
        Expr::Slice { expr, start, stop } => {
            let base = render(signals, expr, true);
            if stop - start == 1 {
                format!("{base}[{start}]")
            } else {
                format!("{base}[{start}:{stop}]")
            }
        }
        Expr::Concat(parts) => {
            let inner: Vec<String> = parts.iter().map(|p| render(signals, p, false)).collect();
            format!("{{{}}}", inner.join(", "))
        }
    }
}

/// Name of an assignment.
pub fn assign_name(loc: &str, domain: &str, lhs: &str, rhs: &str) -> String {
    format!("{loc} | {domain}:{lhs} = {rhs}")
}

/// Name of a construct qualified by its hierarchical path, e.g.
/// `core.py:12 | top/phy | sync:switch(state)`.
pub fn scoped_name(loc: &str, path: &str, domain: &str, kind: &str, detail: &str) -> String {
    format!("{loc} | {path} | {domain}:{kind}({detail})")
}

/// Name of an expression-facet decision.
pub fn decision_name(loc: &str, domain: &str, role: &str, detail: &str) -> String {
    format!("{loc} | {domain}:{role}({detail})")
}

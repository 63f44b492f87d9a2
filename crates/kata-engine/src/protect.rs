//! Loop guard instrumentation.
//!
//! Rewrites source text so every loop body calls `_checkLoop()` before
//! anything else, giving the sandbox a hook on every single iteration.
//! The rewrite is a string splice keyed off AST byte offsets, which keeps
//! all unrelated formatting (and offsets in diagnostics) intact.
//!
//! Splice contract: collected loops are processed in **descending** start
//! offset order, so each insertion only shifts text after the loops that
//! remain to be processed. Block bodies get the guard inserted directly
//! after the opening brace; single-statement bodies are wrapped in a new
//! block with the guard first.

use kata_types::ast::{Stmt, StmtKind};
use kata_types::visit::{walk, Node};
use kata_types::Span;

/// Name of the guard binding the sandbox installs.
pub const GUARD_NAME: &str = "_checkLoop";

/// One loop found in the tree: where the loop starts and what its body
/// looks like.
#[derive(Debug, Clone, Copy)]
struct LoopSite {
    loop_start: usize,
    body_span: Span,
    body_is_block: bool,
}

/// Instrument every loop in `source` with a leading guard call.
///
/// If the source does not parse, it is returned unchanged; the execution
/// stage re-surfaces the syntax error with a proper diagnostic.
pub fn instrument(source: &str) -> String {
    let program = match kata_parser::parse(source) {
        Ok(program) => program,
        Err(e) => {
            tracing::debug!(error = %e, "instrumentation skipped, source does not parse");
            return source.to_string();
        }
    };

    let mut sites = Vec::new();
    walk(&program, &mut |node| {
        let Node::Stmt(stmt) = node else { return };
        if let Some(body) = loop_body(stmt) {
            sites.push(LoopSite {
                loop_start: stmt.span.start,
                body_span: body.span,
                body_is_block: matches!(body.kind, StmtKind::Block { .. }),
            });
        }
    });

    // descending start order keeps earlier offsets valid across splices
    sites.sort_by(|a, b| b.loop_start.cmp(&a.loop_start));

    // Splices never move a pending site's start (every edit lands strictly
    // after it), but an edit inside a pending body span grows that span, so
    // each applied edit is recorded against its original offset and the
    // body end is shifted by the deltas that fall inside it. Without this,
    // wrapping an outer single-statement body would truncate a guard
    // already inserted into a nested loop.
    let mut out = source.to_string();
    let mut edits: Vec<(usize, usize)> = Vec::new();
    for site in sites {
        let grown_by: usize = edits
            .iter()
            .filter(|&&(at, _)| at < site.body_span.end)
            .map(|&(_, delta)| delta)
            .sum();
        if site.body_is_block {
            // body span starts at '{'; the guard goes right after it
            let insert_at = site.body_span.start + 1;
            let guard = format!("{GUARD_NAME}();");
            edits.push((insert_at, guard.len()));
            out.insert_str(insert_at, &guard);
        } else {
            let body_end = site.body_span.end + grown_by;
            let body_text = &out[site.body_span.start..body_end];
            let wrapped = format!("{{{GUARD_NAME}();{body_text}}}");
            edits.push((site.body_span.start, wrapped.len() - body_text.len()));
            out.replace_range(site.body_span.start..body_end, &wrapped);
        }
    }
    out
}

fn loop_body(stmt: &Stmt) -> Option<&Stmt> {
    match &stmt.kind {
        StmtKind::While { body, .. }
        | StmtKind::DoWhile { body, .. }
        | StmtKind::For { body, .. }
        | StmtKind::ForIn { body, .. }
        | StmtKind::ForOf { body, .. } => Some(body),
        _ => None,
    }
}

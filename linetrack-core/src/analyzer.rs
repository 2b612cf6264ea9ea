//! Static analysis for lattice files
//!
//! This module performs static checks on parsed lattices to catch
//! errors before the line is built.

use crate::ast::{ElementDecl, Expr, Lattice, Param, GRID_PARAMS, PARTICLE_PARAMS};
use crate::diagnostics::{Diagnostic, Diagnostics, Span};
use std::collections::{HashMap, HashSet};

/// Analyze a lattice and return diagnostics
pub fn analyze_lattice(lattice: &Lattice) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    // Let bindings: duplicates, and references must point at earlier lets
    let mut defined = HashSet::new();
    for let_decl in &lattice.lets {
        diagnostics.extend(check_expr(&let_decl.expr, &defined, let_decl.span));
        if !defined.insert(let_decl.name.as_str()) {
            diagnostics.push(Diagnostic::error(
                format!("duplicate let binding '{}'", let_decl.name),
                let_decl.span,
            ));
        }
    }

    // Elements: parameter sets and expressions
    let mut element_names: HashMap<&str, usize> = HashMap::new();
    for element in &lattice.elements {
        *element_names.entry(element.name.as_str()).or_insert(0) += 1;
        diagnostics.extend(check_element(element, &defined));
    }

    let mut reported = HashSet::new();
    for element in &lattice.elements {
        let count = element_names[element.name.as_str()];
        if count > 1 && reported.insert(element.name.as_str()) {
            diagnostics.push(Diagnostic::warning(
                format!(
                    "element name '{}' is used {} times; its loss labels will be ambiguous",
                    element.name, count
                ),
                element.span,
            ));
        }
    }

    if lattice.elements.is_empty() {
        diagnostics.push(Diagnostic::warning("lattice declares no elements", None));
    }

    if let Some(grid) = &lattice.grid {
        diagnostics.extend(check_params(
            "grid",
            &grid.params,
            &GRID_PARAMS,
            &[],
            &defined,
            grid.span,
        ));
    }

    for particle in &lattice.particles {
        diagnostics.extend(check_params(
            "particle",
            &particle.params,
            &PARTICLE_PARAMS,
            &[],
            &defined,
            particle.span,
        ));
    }

    diagnostics
}

fn check_element(element: &ElementDecl, defined: &HashSet<&str>) -> Vec<Diagnostic> {
    let context = format!("{} '{}'", element.kind.keyword(), element.name);
    check_params(
        &context,
        &element.params,
        element.kind.required_params(),
        element.kind.optional_params(),
        defined,
        element.span,
    )
}

/// Check one declaration's parameters against the keys it accepts
fn check_params(
    context: &str,
    params: &[Param],
    required: &[&str],
    optional: &[&str],
    defined: &HashSet<&str>,
    span: Option<Span>,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut seen = HashSet::new();

    for param in params {
        let key = param.key.as_str();
        if !required.contains(&key) && !optional.contains(&key) {
            diagnostics.push(Diagnostic::error(
                format!("{}: unknown parameter '{}'", context, key),
                span,
            ));
        }
        if !seen.insert(key) {
            diagnostics.push(Diagnostic::error(
                format!("{}: parameter '{}' given more than once", context, key),
                span,
            ));
        }
        diagnostics.extend(check_expr(&param.value, defined, span));
    }

    for key in required {
        if !seen.contains(key) {
            diagnostics.push(Diagnostic::error(
                format!("{}: missing parameter '{}'", context, key),
                span,
            ));
        }
    }

    diagnostics
}

/// Check that every variable an expression uses is defined
fn check_expr(expr: &Expr, defined: &HashSet<&str>, span: Option<Span>) -> Vec<Diagnostic> {
    expr.variables()
        .into_iter()
        .filter(|name| !defined.contains(name))
        .map(|name| Diagnostic::error(format!("unknown variable '{}'", name), span))
        .collect()
}

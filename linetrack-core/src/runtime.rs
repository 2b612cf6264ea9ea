use crate::analyzer::analyze_lattice;
use crate::ast::{ElementDecl, ElementKind, Lattice, Param};
use crate::diagnostics::Diagnostics;
use crate::elements::{
    ConfigError, DoubleApertureDrift, Drift, Element, Kicker, QuadHole, Quadrupole, Septum,
};
use crate::eval::{evaluate_lets, EvalContext, EvalError, ParamValues};
use crate::parser::{parse_lattice, ParseError};
use crate::tracking::{GridSpec, TrackGrid, TrackList};
use thiserror::Error;

/// Anything that can go wrong between lattice text and a built line
#[derive(Debug, Error)]
pub enum LatticeError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("{context}: {source}")]
    Eval {
        context: String,
        #[source]
        source: EvalError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("lattice is invalid:\n{0}")]
    Invalid(Diagnostics),
}

/// A built line plus the tracking directives from the same file
#[derive(Debug, Clone)]
pub struct LatticeContext {
    pub line: Vec<Element>,
    pub grid: Option<GridSpec>,
    pub particles: Vec<(f64, f64)>,
    pub diagnostics: Diagnostics,
}

/// Results of running the tracking directives of a lattice
#[derive(Debug)]
pub struct TrackingResult {
    pub grid: Option<TrackGrid>,
    pub list: Option<TrackList>,
}

/// Main entry point: parse a lattice, build its line and run its directives
pub fn run_lattice(source: &str) -> Result<TrackingResult, LatticeError> {
    let ctx = load_lattice(source)?;
    Ok(run_context(&ctx))
}

pub fn run_context(ctx: &LatticeContext) -> TrackingResult {
    let grid = ctx.grid.map(|spec| TrackGrid::new(&ctx.line, spec));
    let list = if ctx.particles.is_empty() {
        None
    } else {
        Some(TrackList::new(&ctx.line, &ctx.particles))
    };
    TrackingResult { grid, list }
}

/// Parse and build a lattice from source text
pub fn load_lattice(source: &str) -> Result<LatticeContext, LatticeError> {
    let lattice = parse_lattice(source)?;
    build_lattice(&lattice)
}

/// Build the line and directives of a parsed lattice.
///
/// Analysis errors abort the build; warnings are logged and kept on the
/// returned context.
pub fn build_lattice(lattice: &Lattice) -> Result<LatticeContext, LatticeError> {
    let mut diagnostics = analyze_lattice(lattice);
    let (ctx, let_diagnostics) = evaluate_lets(&lattice.lets);
    diagnostics.extend(let_diagnostics);

    if diagnostics.has_errors() {
        return Err(LatticeError::Invalid(diagnostics));
    }
    for warning in diagnostics.warnings() {
        tracing::warn!("{}", warning.message);
    }

    let line = lattice
        .elements
        .iter()
        .map(|decl| build_element(decl, &ctx))
        .collect::<Result<Vec<_>, _>>()?;

    let grid = match &lattice.grid {
        Some(decl) => {
            let values = evaluate(&decl.params, &ctx, "grid")?;
            let get = |key: &str| require(&values, key, "grid");
            Some(GridSpec {
                x_min: get("xmin")?,
                x_max: get("xmax")?,
                x_res: get("xres")?,
                px_min: get("pxmin")?,
                px_max: get("pxmax")?,
                px_res: get("pxres")?,
            })
        }
        None => None,
    };

    let particles = lattice
        .particles
        .iter()
        .map(|decl| {
            let values = evaluate(&decl.params, &ctx, "particle")?;
            Ok((
                require(&values, "x", "particle")?,
                require(&values, "px", "particle")?,
            ))
        })
        .collect::<Result<Vec<_>, LatticeError>>()?;

    tracing::debug!(
        elements = line.len(),
        particles = particles.len(),
        grid = grid.is_some(),
        "lattice built"
    );

    Ok(LatticeContext {
        line,
        grid,
        particles,
        diagnostics,
    })
}

fn evaluate<'p>(
    params: &'p [Param],
    ctx: &EvalContext<'_>,
    context: &str,
) -> Result<ParamValues<'p>, LatticeError> {
    ParamValues::evaluate(params, ctx).map_err(|source| LatticeError::Eval {
        context: context.to_string(),
        source,
    })
}

fn require(values: &ParamValues<'_>, key: &str, context: &str) -> Result<f64, LatticeError> {
    values.require(key).map_err(|source| LatticeError::Eval {
        context: context.to_string(),
        source,
    })
}

/// Build a single element from its declaration
pub fn build_element(decl: &ElementDecl, ctx: &EvalContext<'_>) -> Result<Element, LatticeError> {
    let context = format!("{} '{}'", decl.kind.keyword(), decl.name);
    let values = evaluate(&decl.params, ctx, &context)?;
    let get = |key: &str| require(&values, key, &context);
    let opt = |key: &str| values.or_zero(key);
    let name = decl.name.as_str();

    let element: Element = match decl.kind {
        ElementKind::Drift => Drift::with_offsets(
            name,
            get("length")?,
            get("radius")?,
            opt("offset_up"),
            opt("offset_down"),
        )?
        .into(),
        ElementKind::Kicker => {
            Kicker::new(name, get("length")?, get("angle")?, get("radius")?)?.into()
        }
        ElementKind::Quadrupole => Quadrupole::with_offsets(
            name,
            get("length")?,
            get("k")?,
            get("radius")?,
            opt("offset_field"),
            opt("offset_up"),
            opt("offset_down"),
        )?
        .into(),
        ElementKind::DoubleDrift => DoubleApertureDrift::new(
            name,
            get("length")?,
            get("blade_up")?,
            get("blade_down")?,
            get("thickness")?,
            opt("d_circ"),
            opt("d_extr"),
        )?
        .into(),
        ElementKind::Septum => Septum::new(
            name,
            get("length")?,
            get("angle")?,
            get("blade_up")?,
            get("blade_down")?,
            get("thickness")?,
            opt("d_circ"),
            opt("d_extr"),
        )?
        .into(),
        ElementKind::QuadHole => QuadHole::new(
            name,
            get("length")?,
            get("k")?,
            get("hole_k")?,
            get("radius")?,
            get("hole_radius")?,
            get("hole_field")?,
            get("hole_up")?,
            get("hole_down")?,
        )?
        .into(),
    };

    Ok(element)
}

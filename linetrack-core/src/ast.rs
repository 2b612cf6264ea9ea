use crate::diagnostics::Span;

// ============================================================================
// Expressions
// ============================================================================

/// Expression AST node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(f64),
    Var(String),
    UnaryMinus(Box<Expr>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        func: FuncName,
        args: Vec<Expr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Built-in function names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuncName {
    Sin,
    Cos,
    Sqrt,
    Clamp,
}

impl Expr {
    /// Variables referenced anywhere in the expression
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Literal(_) => {}
            Expr::Var(name) => out.push(name),
            Expr::UnaryMinus(inner) => inner.collect_variables(out),
            Expr::Binary { left, right, .. } => {
                left.collect_variables(out);
                right.collect_variables(out);
            }
            Expr::Call { args, .. } => {
                for arg in args {
                    arg.collect_variables(out);
                }
            }
        }
    }
}

/// Let binding declaration: `let name = expr`
#[derive(Debug, Clone, PartialEq)]
pub struct LetDecl {
    pub name: String,
    pub expr: Expr,
    pub span: Option<Span>,
}

// ============================================================================
// Declarations
// ============================================================================

/// `key = expr` pair inside a declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub key: String,
    pub value: Expr,
}

/// Element kinds and the keyword that declares each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Drift,
    Kicker,
    Quadrupole,
    DoubleDrift,
    Septum,
    QuadHole,
}

impl ElementKind {
    pub const ALL: [ElementKind; 6] = [
        ElementKind::Drift,
        ElementKind::Kicker,
        ElementKind::Quadrupole,
        ElementKind::DoubleDrift,
        ElementKind::Septum,
        ElementKind::QuadHole,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            ElementKind::Drift => "drift",
            ElementKind::Kicker => "kicker",
            ElementKind::Quadrupole => "quadrupole",
            ElementKind::DoubleDrift => "double_drift",
            ElementKind::Septum => "septum",
            ElementKind::QuadHole => "quadhole",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == word)
    }

    /// Parameters that must be given
    pub fn required_params(&self) -> &'static [&'static str] {
        match self {
            ElementKind::Drift => &["length", "radius"],
            ElementKind::Kicker => &["length", "angle", "radius"],
            ElementKind::Quadrupole => &["length", "k", "radius"],
            ElementKind::DoubleDrift => &["length", "blade_up", "blade_down", "thickness"],
            ElementKind::Septum => &["length", "angle", "blade_up", "blade_down", "thickness"],
            ElementKind::QuadHole => &[
                "length",
                "k",
                "hole_k",
                "radius",
                "hole_radius",
                "hole_field",
                "hole_up",
                "hole_down",
            ],
        }
    }

    /// Parameters that default to 0 when omitted
    pub fn optional_params(&self) -> &'static [&'static str] {
        match self {
            ElementKind::Drift => &["offset_up", "offset_down"],
            ElementKind::Kicker => &[],
            ElementKind::Quadrupole => &["offset_field", "offset_up", "offset_down"],
            ElementKind::DoubleDrift | ElementKind::Septum => &["d_circ", "d_extr"],
            ElementKind::QuadHole => &[],
        }
    }
}

/// Element declaration: `<kind> <name> key = expr ...`
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDecl {
    pub kind: ElementKind,
    pub name: String,
    pub params: Vec<Param>,
    pub span: Option<Span>,
}

pub const GRID_PARAMS: [&str; 6] = ["xmin", "xmax", "xres", "pxmin", "pxmax", "pxres"];
pub const PARTICLE_PARAMS: [&str; 2] = ["x", "px"];

/// Grid declaration: `grid xmin = .. xmax = .. xres = .. pxmin = .. pxmax = .. pxres = ..`
#[derive(Debug, Clone, PartialEq)]
pub struct GridDecl {
    pub params: Vec<Param>,
    pub span: Option<Span>,
}

/// Initial condition for list tracking: `particle x = .. px = ..`
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleDecl {
    pub params: Vec<Param>,
    pub span: Option<Span>,
}

/// A parsed lattice file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Lattice {
    pub lets: Vec<LetDecl>,
    pub elements: Vec<ElementDecl>,
    pub grid: Option<GridDecl>,
    pub particles: Vec<ParticleDecl>,
}

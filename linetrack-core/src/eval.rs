//! Expression evaluation for lattice files
//!
//! This module evaluates expressions to concrete f64 values before the line
//! is built.

use crate::ast::{BinaryOp, Expr, FuncName, LetDecl, Param};
use crate::diagnostics::Diagnostic;
use std::collections::HashMap;
use thiserror::Error;

/// Evaluation context storing variable values
#[derive(Debug, Default)]
pub struct EvalContext<'a> {
    /// Values of let-bindings after evaluation
    pub values: HashMap<&'a str, f64>,
}

impl<'a> EvalContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }
}

/// Evaluation error
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvalError {
    #[error("unknown variable '{0}'")]
    UnknownVar(String),
    #[error("division by zero")]
    DivByZero,
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("value is not finite")]
    NotFinite,
    #[error("missing parameter '{0}'")]
    MissingParam(String),
}

/// Evaluate all let-bindings in order
/// Returns the evaluation context and any diagnostics
pub fn evaluate_lets(lets: &[LetDecl]) -> (EvalContext<'_>, Vec<Diagnostic>) {
    let mut ctx = EvalContext::new();
    let mut diagnostics = Vec::new();

    for let_decl in lets {
        match eval_expr(&let_decl.expr, &ctx) {
            Ok(value) if !value.is_finite() => {
                diagnostics.push(Diagnostic::error(
                    format!("let binding '{}' is not finite", let_decl.name),
                    let_decl.span,
                ));
            }
            Ok(value) => {
                ctx.values.insert(&let_decl.name, value);
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!("error evaluating let binding '{}': {}", let_decl.name, e),
                    let_decl.span,
                ));
            }
        }
    }

    (ctx, diagnostics)
}

/// Evaluate an expression to a f64 value
pub fn eval_expr(expr: &Expr, ctx: &EvalContext<'_>) -> Result<f64, EvalError> {
    match expr {
        Expr::Literal(v) => Ok(*v),

        Expr::Var(name) => ctx
            .get(name)
            .ok_or_else(|| EvalError::UnknownVar(name.clone())),

        Expr::UnaryMinus(e) => Ok(-eval_expr(e, ctx)?),

        Expr::Binary { op, left, right } => {
            let left_val = eval_expr(left, ctx)?;
            let right_val = eval_expr(right, ctx)?;

            match op {
                BinaryOp::Add => Ok(left_val + right_val),
                BinaryOp::Sub => Ok(left_val - right_val),
                BinaryOp::Mul => Ok(left_val * right_val),
                BinaryOp::Div => {
                    if right_val == 0.0 {
                        return Err(EvalError::DivByZero);
                    }
                    Ok(left_val / right_val)
                }
            }
        }

        Expr::Call { func, args } => {
            let arg_values = args
                .iter()
                .map(|arg| eval_expr(arg, ctx))
                .collect::<Result<Vec<f64>, EvalError>>()?;
            call_builtin(*func, &arg_values)
        }
    }
}

fn call_builtin(func: FuncName, args: &[f64]) -> Result<f64, EvalError> {
    let arity = |name: &str, n: usize| {
        if args.len() == n {
            Ok(())
        } else {
            Err(EvalError::InvalidArgs(format!(
                "{} expects {} argument(s), got {}",
                name,
                n,
                args.len()
            )))
        }
    };

    match func {
        FuncName::Sin => {
            arity("sin", 1)?;
            Ok(args[0].sin())
        }
        FuncName::Cos => {
            arity("cos", 1)?;
            Ok(args[0].cos())
        }
        FuncName::Sqrt => {
            arity("sqrt", 1)?;
            if args[0] < 0.0 {
                return Err(EvalError::InvalidArgs(format!(
                    "sqrt of negative number: {}",
                    args[0]
                )));
            }
            Ok(args[0].sqrt())
        }
        FuncName::Clamp => {
            arity("clamp", 3)?;
            // Allow min > max, just clamp in given order
            Ok(args[0].max(args[1]).min(args[2]))
        }
    }
}

/// Evaluated `key = value` parameters of one declaration
#[derive(Debug)]
pub struct ParamValues<'p> {
    values: Vec<(&'p str, f64)>,
}

impl<'p> ParamValues<'p> {
    pub fn evaluate(params: &'p [Param], ctx: &EvalContext<'_>) -> Result<Self, EvalError> {
        let mut values = Vec::with_capacity(params.len());
        for param in params {
            let value = eval_expr(&param.value, ctx)?;
            if !value.is_finite() {
                return Err(EvalError::NotFinite);
            }
            values.push((param.key.as_str(), value));
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    pub fn require(&self, key: &str) -> Result<f64, EvalError> {
        self.get(key)
            .ok_or_else(|| EvalError::MissingParam(key.to_string()))
    }

    pub fn or_zero(&self, key: &str) -> f64 {
        self.get(key).unwrap_or(0.0)
    }
}

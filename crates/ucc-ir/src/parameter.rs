//! Rotation-angle expressions.
//!
//! Front-ends may hand over circuits whose rotation angles are still
//! symbolic. Only angles that evaluate to a number can be reasoned about by
//! the optimizer; everything else is carried through untouched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::f64::consts::PI;
use std::fmt;

/// Arithmetic combining two sub-expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    /// `None` for a zero divisor.
    fn fold(self, lhs: f64, rhs: f64) -> Option<f64> {
        match self {
            BinOp::Add => Some(lhs + rhs),
            BinOp::Sub => Some(lhs - rhs),
            BinOp::Mul => Some(lhs * rhs),
            BinOp::Div if rhs == 0.0 => None,
            BinOp::Div => Some(lhs / rhs),
        }
    }

    fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
        }
    }
}

/// An angle in radians, possibly depending on unbound symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    Constant(f64),
    Symbol(String),
    Pi,
    Neg(Box<ParameterExpression>),
    Binary {
        op: BinOp,
        lhs: Box<ParameterExpression>,
        rhs: Box<ParameterExpression>,
    },
}

impl ParameterExpression {
    pub fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    pub fn pi() -> Self {
        Self::Pi
    }

    fn binary(op: BinOp, lhs: Self, rhs: Self) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Whether at least one free symbol remains.
    pub fn is_symbolic(&self) -> bool {
        let mut found = false;
        self.walk_symbols(&mut |_| found = true);
        found
    }

    /// Numeric value of the angle.
    ///
    /// `None` while a symbol is unbound, and for any division by zero.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Constant(v) => Some(*v),
            Self::Pi => Some(PI),
            Self::Symbol(_) => None,
            Self::Neg(inner) => inner.as_f64().map(|v| -v),
            Self::Binary { op, lhs, rhs } => op.fold(lhs.as_f64()?, rhs.as_f64()?),
        }
    }

    /// Distinct free symbols in lexicographic order.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.walk_symbols(&mut |name| {
            names.insert(name.to_owned());
        });
        names
    }

    fn walk_symbols(&self, visit: &mut impl FnMut(&str)) {
        match self {
            Self::Symbol(name) => visit(name),
            Self::Constant(_) | Self::Pi => {}
            Self::Neg(inner) => inner.walk_symbols(visit),
            Self::Binary { lhs, rhs, .. } => {
                lhs.walk_symbols(visit);
                rhs.walk_symbols(visit);
            }
        }
    }

    /// Copy of `self` with `name` replaced by `value` everywhere.
    #[must_use]
    pub fn bind(&self, name: &str, value: f64) -> Self {
        match self {
            Self::Symbol(s) if s == name => Self::Constant(value),
            Self::Symbol(_) | Self::Constant(_) | Self::Pi => self.clone(),
            Self::Neg(inner) => Self::Neg(Box::new(inner.bind(name, value))),
            Self::Binary { op, lhs, rhs } => {
                Self::binary(*op, lhs.bind(name, value), rhs.bind(name, value))
            }
        }
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => write!(f, "{v}"),
            Self::Symbol(name) => f.write_str(name),
            Self::Pi => f.write_str("pi"),
            Self::Neg(inner) => write!(f, "-({inner})"),
            Self::Binary { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

macro_rules! impl_binop {
    ($($trait:ident :: $method:ident => $op:ident),* $(,)?) => {
        $(
            impl std::ops::$trait for ParameterExpression {
                type Output = Self;

                fn $method(self, rhs: Self) -> Self {
                    Self::binary(BinOp::$op, self, rhs)
                }
            }
        )*
    };
}

impl_binop! {
    Add::add => Add,
    Sub::sub => Sub,
    Mul::mul => Mul,
    Div::div => Div,
}

impl std::ops::Neg for ParameterExpression {
    type Output = Self;

    fn neg(self) -> Self {
        Self::Neg(Box::new(self))
    }
}

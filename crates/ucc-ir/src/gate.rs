//! Gates a front-end can place in a circuit.

use serde::{Deserialize, Serialize};

use crate::parameter::ParameterExpression;

/// Built-in gates with fixed semantics.
///
/// For controlled gates the leading operands are controls, the last one the
/// target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    I,
    X,
    Y,
    Z,
    H,
    S,
    Sdg,
    T,
    Tdg,
    SX,
    Rx(ParameterExpression),
    Ry(ParameterExpression),
    Rz(ParameterExpression),
    /// `diag(1, e^{iθ})`.
    P(ParameterExpression),
    CX,
    CY,
    CZ,
    Swap,
    CP(ParameterExpression),
    /// Toffoli.
    CCX,
}

impl StandardGate {
    /// Lowercase name and qubit arity.
    fn signature(&self) -> (&'static str, u32) {
        use StandardGate as G;
        match self {
            G::I => ("id", 1),
            G::X => ("x", 1),
            G::Y => ("y", 1),
            G::Z => ("z", 1),
            G::H => ("h", 1),
            G::S => ("s", 1),
            G::Sdg => ("sdg", 1),
            G::T => ("t", 1),
            G::Tdg => ("tdg", 1),
            G::SX => ("sx", 1),
            G::Rx(_) => ("rx", 1),
            G::Ry(_) => ("ry", 1),
            G::Rz(_) => ("rz", 1),
            G::P(_) => ("p", 1),
            G::CX => ("cx", 2),
            G::CY => ("cy", 2),
            G::CZ => ("cz", 2),
            G::Swap => ("swap", 2),
            G::CP(_) => ("cp", 2),
            G::CCX => ("ccx", 3),
        }
    }

    /// Key used in operation counts, e.g. `"cx"`.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.signature().0
    }

    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.signature().1
    }

    /// The rotation angle, for the parameterized gates.
    pub fn angle(&self) -> Option<&ParameterExpression> {
        match self {
            Self::Rx(theta) | Self::Ry(theta) | Self::Rz(theta) | Self::P(theta) | Self::CP(theta) => {
                Some(theta)
            }
            _ => None,
        }
    }

    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        self.angle().into_iter().collect()
    }

    /// Whether the angle still contains an unbound symbol.
    pub fn is_parameterized(&self) -> bool {
        self.angle().is_some_and(ParameterExpression::is_symbolic)
    }
}

/// Either a built-in gate or one the optimizer knows only by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    Standard(StandardGate),
    Custom(CustomGate),
}

impl GateKind {
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Self::Standard(g) => g.name(),
            Self::Custom(g) => &g.name,
        }
    }

    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            Self::Standard(g) => g.num_qubits(),
            Self::Custom(g) => g.num_qubits,
        }
    }
}

/// A named black box. Its action is never inspected, so it blocks every
/// rewrite on the wires it touches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    pub name: String,
    pub num_qubits: u32,
    pub params: Vec<ParameterExpression>,
}

impl CustomGate {
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: Vec<ParameterExpression>) -> Self {
        self.params = params;
        self
    }
}

/// Fire only when `register` reads `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassicalCondition {
    pub register: String,
    pub value: u64,
}

impl ClassicalCondition {
    pub fn new(register: impl Into<String>, value: u64) -> Self {
        Self {
            register: register.into(),
            value,
        }
    }
}

/// A gate plus the metadata a front-end may attach to it.
///
/// A conditioned gate is no longer unitary on its own and is treated as
/// opaque by the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub kind: GateKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ClassicalCondition>,
}

impl Gate {
    fn bare(kind: GateKind) -> Self {
        Self {
            kind,
            label: None,
            condition: None,
        }
    }

    pub fn standard(gate: StandardGate) -> Self {
        Self::bare(GateKind::Standard(gate))
    }

    pub fn custom(gate: CustomGate) -> Self {
        Self::bare(GateKind::Custom(gate))
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: ClassicalCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }

    /// `None` for custom gates.
    pub fn as_standard(&self) -> Option<&StandardGate> {
        match &self.kind {
            GateKind::Standard(g) => Some(g),
            GateKind::Custom(_) => None,
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Self::standard(gate)
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Self::custom(gate)
    }
}

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Category of a failure. The kind tells the caller which pipeline stage
/// rejected the input or the intermediate value.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum ErrorKind {
    /// Malformed literals, unknown symbols, or missing operands.
    Syntax,
    /// Unbalanced brackets.
    Bracket,
    /// An operator was applied outside of its domain, e.g., `0.5!`.
    Domain,
    /// A tree-builder invariant was violated. Unreachable for token
    /// sequences that passed the bracket check.
    Internal,
}

/// This is handed to you whenever Treecalc could not make sense of an
/// expression or of one of the values computed from it.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct CalcError {
    pub kind: ErrorKind,
    pub msg: String,
}

impl CalcError {
    pub fn syntax(msg: String) -> Self {
        CalcError {
            kind: ErrorKind::Syntax,
            msg,
        }
    }
    pub fn bracket(msg: String) -> Self {
        CalcError {
            kind: ErrorKind::Bracket,
            msg,
        }
    }
    pub fn domain(msg: String) -> Self {
        CalcError {
            kind: ErrorKind::Domain,
            msg,
        }
    }
    pub fn internal(msg: String) -> Self {
        CalcError {
            kind: ErrorKind::Internal,
            msg,
        }
    }
}

impl Display for CalcError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.msg)
    }
}
impl Error for CalcError {}

/// Treecalc's result type with [`CalcError`](CalcError) as error type.
pub type CalcResult<U> = Result<U, CalcError>;

//! Error types for configuration generation and instantiation.

use fuzztree_core::TreeError;
use thiserror::Error;

/// A template does not match the shape a variation point or event set needs.
///
/// Fatal to the configuration being instantiated, never to the batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructuralError {
    #[error("WRONG_CHILD_TYPE: {id} expects {expected}, found {found}")]
    WrongChildType {
        id: String,
        expected: &'static str,
        found: String,
    },

    #[error("WRONG_CHILD_NUM: {id} expects {expected} child(ren), found {found}")]
    WrongChildNum {
        id: String,
        expected: &'static str,
        found: usize,
    },

    #[error("INVALID_ATTRIBUTE: {id} has invalid {attribute}: {detail}")]
    InvalidAttribute {
        id: String,
        attribute: &'static str,
        detail: String,
    },

    #[error("configuration leaves variation point {0} unresolved")]
    MissingResolution(String),

    #[error("instantiated tree is malformed: {0}")]
    Tree(#[from] TreeError),
}

impl StructuralError {
    /// Id of the template element at fault, when known.
    pub fn element_id(&self) -> Option<&str> {
        match self {
            StructuralError::WrongChildType { id, .. }
            | StructuralError::WrongChildNum { id, .. }
            | StructuralError::InvalidAttribute { id, .. }
            | StructuralError::MissingResolution(id) => Some(id),
            StructuralError::Tree(TreeError::DuplicateId(id))
            | StructuralError::Tree(TreeError::NodeNotFound(id)) => Some(id),
            StructuralError::Tree(_) => None,
        }
    }
}

/// Errors raised while parsing or evaluating a redundancy formula.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unexpected {found} at position {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("unexpected end of formula")]
    UnexpectedEnd,

    #[error("unknown variable '{0}' (only N is defined)")]
    UnknownVariable(String),

    #[error("integer literal '{0}' is too large")]
    LiteralTooLarge(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("arithmetic overflow")]
    Overflow,

    #[error("formula nests deeper than {0} levels")]
    TooDeep(usize),
}

//! Error types for the tree model.

use thiserror::Error;

/// Errors raised while building or validating a tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("parent index {0} out of range")]
    InvalidParent(usize),

    #[error("redundancy variation point {id} has malformed bounds {from}..{to}")]
    RedundancyBounds { id: String, from: i64, to: i64 },

    #[error("redundancy variation point {id} must have exactly one event set child, found {found}")]
    RedundancyChild { id: String, found: String },

    #[error("feature variation point {0} has no children")]
    EmptyFeature(String),

    #[error("event set {0} declares a quantity of zero")]
    ZeroQuantity(String),

    #[error("intermediate event set {0} must have exactly one child template")]
    EventSetTemplate(String),
}

/// Errors raised while reading a tree document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("malformed tree document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tree: {0}")]
    Tree(#[from] TreeError),
}

/// Errors raised while reducing a probability representation to an interval.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbabilityError {
    #[error("alpha level {0} outside [0, 1]")]
    InvalidAlpha(f64),

    #[error("failure rate {0} is negative or not finite")]
    InvalidFailureRate(f64),

    #[error("mission time {0} is negative or not finite")]
    InvalidMissionTime(f64),

    #[error("triangular fuzzy number ({a}, {b}, {c}) is not ordered a <= b <= c")]
    MalformedTriangle { a: f64, b: f64, c: f64 },

    #[error("decomposed fuzzy number has no alpha-cuts")]
    EmptyDecomposition,

    #[error("probability interval [{lower}, {upper}] outside [0, 1]")]
    OutOfRange { lower: f64, upper: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TreeError::DuplicateId("e1".into());
        assert!(err.to_string().contains("duplicate"));

        let err = TreeError::RedundancyBounds {
            id: "r".into(),
            from: 3,
            to: 1,
        };
        assert!(err.to_string().contains("3..1"));
    }
}

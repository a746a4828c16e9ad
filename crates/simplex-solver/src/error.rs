use thiserror::Error;

use crate::problem::Comparator;

/// Why a problem could not be solved
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// No assignment satisfies every constraint under non-negativity
    #[error("Problem is infeasible: artificial cost {residual} cannot be driven to zero")]
    Infeasible { residual: f64 },
    /// The objective grows without limit along `column`
    #[error("Problem is unbounded along tableau column {column}")]
    Unbounded { column: usize },
    #[error("Malformed problem: {0}")]
    Malformed(#[from] MalformedProblem),
    #[error("No optimum found within {0} pivots")]
    IterationLimit(usize),
}

/// Caller or builder bugs, as opposed to properties of the linear program
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedProblem {
    #[error("problem references no variables")]
    Empty,
    #[error("constraint {constraint} uses unsupported comparator '{comparator}'")]
    UnsupportedComparator {
        constraint: usize,
        comparator: Comparator,
    },
    #[error("{} has a non-finite coefficient or right-hand side", describe(.constraint))]
    NonFinite { constraint: Option<usize> },
    #[error("tableau row {row} has {found} columns, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

fn describe(constraint: &Option<usize>) -> String {
    match constraint {
        Some(i) => format!("constraint {}", i),
        None => "objective".to_string(),
    }
}

impl SolveError {
    pub fn is_infeasible(&self) -> bool {
        matches!(self, SolveError::Infeasible { .. })
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, SolveError::Unbounded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SolveError::Infeasible { residual: 5.0 };
        assert!(err.to_string().contains("infeasible"));

        let err = SolveError::from(MalformedProblem::UnsupportedComparator {
            constraint: 2,
            comparator: Comparator::Less,
        });
        assert_eq!(
            err.to_string(),
            "Malformed problem: constraint 2 uses unsupported comparator '<'"
        );

        let err = SolveError::from(MalformedProblem::NonFinite { constraint: None });
        assert!(err.to_string().contains("objective has a non-finite"));
    }

    #[test]
    fn test_predicates() {
        assert!(SolveError::Infeasible { residual: 1.0 }.is_infeasible());
        assert!(SolveError::Unbounded { column: 0 }.is_unbounded());
        assert!(!SolveError::IterationLimit(10).is_unbounded());
    }
}

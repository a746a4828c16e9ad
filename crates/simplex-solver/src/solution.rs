use crate::index::VariableIndex;
use crate::problem::{Assignment, Sense};
use crate::tableau::{FIRST_CONSTRAINT_ROW, OBJECTIVE_ROW, Tableau};

/// The optimum of a feasible, bounded problem
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Optimal objective value, in the problem's own sense
    pub objective_value: f64,
    /// Value of every variable referenced by the problem, in column order
    pub assignment: Assignment,
    /// Pivots performed to reach the optimum
    pub pivots: PivotCounts,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PivotCounts {
    pub phase_one: usize,
    pub phase_two: usize,
}

/// Information about a violated constraint
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    /// Position of the constraint in the problem
    pub constraint: usize,
    /// Required value (from constraint RHS)
    pub required: f64,
    /// Actual value of the left-hand side
    pub actual: f64,
    /// How much the constraint is violated by
    pub violation_amount: f64,
    /// Human-readable description of what's wrong
    pub description: String,
}

impl Solution {
    /// Value of `name`, zero for names the problem never mentioned
    pub fn value(&self, name: &str) -> f64 {
        self.assignment.get(name).copied().unwrap_or(0.0)
    }
}

impl PivotCounts {
    pub fn total(&self) -> usize {
        self.phase_one + self.phase_two
    }
}

/// Reads the optimum out of a converged tableau.
///
/// A decision variable is basic when its column has exactly one non-zero
/// entry below the artificial-cost row, that entry sits in a constraint row,
/// and that row records the column as its basic variable. Every other
/// variable, including columns shared between rows, is zero.
pub(crate) fn extract(
    tableau: &Tableau,
    index: &VariableIndex,
    sense: Sense,
    pivots: PivotCounts,
    tolerance: f64,
) -> Solution {
    let mut assignment = Assignment::with_capacity(index.len());

    for (name, col) in index.iter() {
        let mut non_zero = (OBJECTIVE_ROW..tableau.num_rows()).filter(|&row| tableau.rows[row][col].abs() > tolerance);
        let value = match (non_zero.next(), non_zero.next()) {
            (Some(row), None) if row >= FIRST_CONSTRAINT_ROW && tableau.basis[row] == Some(col) => {
                tableau.rhs[row] / tableau.rows[row][col]
            }
            _ => 0.0,
        };
        // Adding 0.0 turns -0.0 into 0.0
        assignment.insert(name.to_string(), value + 0.0);
    }

    let objective_value = match sense {
        Sense::Maximize => tableau.rhs[OBJECTIVE_ROW] + 0.0,
        Sense::Minimize => 0.0 - tableau.rhs[OBJECTIVE_ROW],
    };

    Solution {
        objective_value,
        assignment,
        pivots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Comparator, Problem};

    const TOL: f64 = 1e-9;

    #[test]
    fn test_extract_reads_basic_columns() {
        let mut problem = Problem::new();
        problem.set_objective([("x", 2.0), ("y", 1.0)]);
        problem.add_constraint([("x", 3.0), ("y", 1.0)], Comparator::LessOrEqual, 6.0);
        problem.add_constraint([("x", 1.0), ("y", 2.0)], Comparator::LessOrEqual, 7.0);
        let index = VariableIndex::build(&problem);
        let mut tableau = Tableau::build(&problem, &index).unwrap();

        tableau.pivot(2, 0, TOL);
        let solution = extract(&tableau, &index, Sense::Maximize, PivotCounts::default(), TOL);

        assert!((solution.value("x") - 2.0).abs() < 1e-9);
        assert_eq!(solution.value("y"), 0.0);
        assert!((solution.objective_value - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_shared_row_resolves_to_zero() {
        // x + w <= 4 with only x and w in that row: both columns have a single
        // non-zero entry, but the slack is basic
        let mut problem = Problem::new();
        problem.set_objective([("x", 0.0), ("w", 0.0)]);
        problem.add_constraint([("x", 1.0), ("w", 1.0)], Comparator::LessOrEqual, 4.0);
        let index = VariableIndex::build(&problem);
        let tableau = Tableau::build(&problem, &index).unwrap();

        let solution = extract(&tableau, &index, Sense::Maximize, PivotCounts::default(), TOL);
        assert_eq!(solution.value("x"), 0.0);
        assert_eq!(solution.value("w"), 0.0);
    }

    #[test]
    fn test_objective_only_column_is_non_basic() {
        let mut problem = Problem::new();
        problem.set_objective([("x", -3.0)]);
        let index = VariableIndex::build(&problem);
        let tableau = Tableau::build(&problem, &index).unwrap();

        let solution = extract(&tableau, &index, Sense::Maximize, PivotCounts::default(), TOL);
        assert_eq!(solution.value("x"), 0.0);
        assert_eq!(solution.assignment.len(), 1);
    }

    #[test]
    fn test_zero_objective_has_no_sign() {
        let mut problem = Problem::new();
        problem.set_objective([("x", 1.0)]);
        problem.add_constraint([("x", 1.0)], Comparator::LessOrEqual, 5.0);
        let index = VariableIndex::build(&problem);
        let mut tableau = Tableau::build(&problem, &index).unwrap();
        tableau.rhs[OBJECTIVE_ROW] = -0.0;

        for sense in [Sense::Maximize, Sense::Minimize] {
            let solution = extract(&tableau, &index, sense, PivotCounts::default(), TOL);
            assert!(solution.objective_value.is_sign_positive(), "{:?}: {}", sense, solution.objective_value);
        }
        tableau.rhs[OBJECTIVE_ROW] = 0.0;
        let solution = extract(&tableau, &index, Sense::Minimize, PivotCounts::default(), TOL);
        assert!(solution.objective_value.is_sign_positive());
    }

    #[test]
    fn test_unknown_name_is_zero() {
        let solution = Solution {
            objective_value: 0.0,
            assignment: Assignment::new(),
            pivots: PivotCounts { phase_one: 1, phase_two: 2 },
        };
        assert_eq!(solution.value("missing"), 0.0);
        assert_eq!(solution.pivots.total(), 3);
    }
}

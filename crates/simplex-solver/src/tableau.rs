use crate::error::MalformedProblem;
use crate::index::VariableIndex;
use crate::problem::{Comparator, Constraint, Problem, Sense};

/// Phase 1 cost: the sum of the artificial variables
pub(crate) const ARTIFICIAL_ROW: usize = 0;
/// Negated objective, driven to non-negative in phase 2
pub(crate) const OBJECTIVE_ROW: usize = 1;
pub(crate) const FIRST_CONSTRAINT_ROW: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Decision,
    Slack,
    Surplus,
    Artificial,
}

/// Dense simplex tableau owned by a single solve.
///
/// Row layout: the artificial-cost row, the objective row, then one row per
/// `<=` or `>=` constraint and two rows per `=` constraint (its `<=` half
/// followed by its `>=` half). Columns hold the decision variables followed
/// by the auxiliary columns each constraint row appends, in constraint order.
#[derive(Debug, Clone)]
pub(crate) struct Tableau {
    pub(crate) rows: Vec<Vec<f64>>,
    pub(crate) rhs: Vec<f64>,
    pub(crate) kinds: Vec<ColumnKind>,
    /// Basic column of each row, `None` for the two header rows
    pub(crate) basis: Vec<Option<usize>>,
}

/// A constraint rewritten so that its right-hand side is non-negative
struct Normalized<'a> {
    constraint: &'a Constraint,
    sign: f64,
    comparator: Comparator,
}

impl<'a> Normalized<'a> {
    fn new(constraint: &'a Constraint) -> Self {
        if constraint.rhs() < 0.0 {
            Self {
                constraint,
                sign: -1.0,
                comparator: constraint.comparator().mirrored(),
            }
        } else {
            Self {
                constraint,
                sign: 1.0,
                comparator: constraint.comparator(),
            }
        }
    }

    fn has_upper_half(&self) -> bool {
        matches!(self.comparator, Comparator::LessOrEqual | Comparator::Equal)
    }

    fn has_lower_half(&self) -> bool {
        matches!(self.comparator, Comparator::GreaterOrEqual | Comparator::Equal)
    }

    fn rhs(&self) -> f64 {
        self.sign * self.constraint.rhs()
    }

    fn coefficients<'b>(&'b self, index: &'b VariableIndex) -> impl Iterator<Item = (usize, f64)> + 'b {
        self.constraint.coefficients().iter().filter_map(move |(name, &coef)| {
            index.column(name).map(|col| (col, self.sign * coef))
        })
    }
}

fn validate(problem: &Problem, index: &VariableIndex) -> Result<(), MalformedProblem> {
    if index.is_empty() {
        return Err(MalformedProblem::Empty);
    }
    if problem.objective().values().any(|v| !v.is_finite()) {
        return Err(MalformedProblem::NonFinite { constraint: None });
    }
    for (i, c) in problem.constraints().iter().enumerate() {
        if c.comparator().is_strict() {
            return Err(MalformedProblem::UnsupportedComparator {
                constraint: i,
                comparator: c.comparator(),
            });
        }
        if !c.rhs().is_finite() || c.coefficients().values().any(|v| !v.is_finite()) {
            return Err(MalformedProblem::NonFinite { constraint: Some(i) });
        }
    }
    Ok(())
}

impl Tableau {
    pub(crate) fn build(problem: &Problem, index: &VariableIndex) -> Result<Self, MalformedProblem> {
        validate(problem, index)?;

        let n_vars = index.len();
        let normalized: Vec<Normalized> = problem.constraints().iter().map(Normalized::new).collect();

        // Size everything up front: a slack per <= half, surplus and
        // artificial per >= half
        let mut n_rows = FIRST_CONSTRAINT_ROW;
        let mut n_cols = n_vars;
        for c in &normalized {
            if c.has_upper_half() {
                n_rows += 1;
                n_cols += 1;
            }
            if c.has_lower_half() {
                n_rows += 1;
                n_cols += 2;
            }
        }

        let mut tableau = Tableau {
            rows: vec![vec![0.0; n_cols]; n_rows],
            rhs: vec![0.0; n_rows],
            kinds: vec![ColumnKind::Decision; n_cols],
            basis: vec![None; n_rows],
        };

        let sign = match problem.sense() {
            Sense::Maximize => -1.0,
            Sense::Minimize => 1.0,
        };
        for (name, &coef) in problem.objective() {
            if let Some(col) = index.column(name) {
                tableau.rows[OBJECTIVE_ROW][col] = sign * coef;
            }
        }

        let mut row = FIRST_CONSTRAINT_ROW;
        let mut col = n_vars;
        for c in &normalized {
            if c.has_upper_half() {
                for (j, coef) in c.coefficients(index) {
                    tableau.rows[row][j] = coef;
                }
                tableau.rows[row][col] = 1.0;
                tableau.kinds[col] = ColumnKind::Slack;
                tableau.rhs[row] = c.rhs();
                tableau.basis[row] = Some(col);
                row += 1;
                col += 1;
            }
            if c.has_lower_half() {
                for (j, coef) in c.coefficients(index) {
                    tableau.rows[row][j] = coef;
                    tableau.rows[ARTIFICIAL_ROW][j] += coef;
                }
                let (surplus, artificial) = (col, col + 1);
                tableau.rows[row][surplus] = -1.0;
                tableau.rows[ARTIFICIAL_ROW][surplus] = -1.0;
                tableau.rows[row][artificial] = 1.0;
                tableau.kinds[surplus] = ColumnKind::Surplus;
                tableau.kinds[artificial] = ColumnKind::Artificial;
                tableau.rhs[row] = c.rhs();
                tableau.rhs[ARTIFICIAL_ROW] += c.rhs();
                tableau.basis[row] = Some(artificial);
                row += 1;
                col += 2;
            }
        }

        tableau.check_widths()?;
        Ok(tableau)
    }

    fn check_widths(&self) -> Result<(), MalformedProblem> {
        let expected = self.num_columns();
        for (row, values) in self.rows.iter().enumerate() {
            if values.len() != expected {
                return Err(MalformedProblem::RowWidth {
                    row,
                    expected,
                    found: values.len(),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn num_columns(&self) -> usize {
        self.rows[ARTIFICIAL_ROW].len()
    }

    pub(crate) fn has_artificial(&self) -> bool {
        self.kinds.contains(&ColumnKind::Artificial)
    }
}

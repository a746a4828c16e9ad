use crate::tableau::{ARTIFICIAL_ROW, ColumnKind, FIRST_CONSTRAINT_ROW, OBJECTIVE_ROW, Tableau};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Drive the artificial cost to zero
    One,
    /// Drive the objective row to non-negative
    Two,
}

impl Phase {
    pub(crate) fn cost_row(self) -> usize {
        match self {
            Phase::One => ARTIFICIAL_ROW,
            Phase::Two => OBJECTIVE_ROW,
        }
    }
}

impl Tableau {
    /// Dantzig rule: the most positive artificial-cost entry in phase 1, the
    /// most negative objective entry in phase 2. Ties go to the first column.
    /// Artificial columns never re-enter the basis in phase 2.
    pub(crate) fn entering_column(&self, phase: Phase, tolerance: f64) -> Option<usize> {
        let row = &self.rows[phase.cost_row()];
        let mut best: Option<(usize, f64)> = None;

        for (j, &value) in row.iter().enumerate() {
            let improvement = match phase {
                Phase::One => value,
                Phase::Two if self.kinds[j] == ColumnKind::Artificial => continue,
                Phase::Two => -value,
            };
            if improvement <= tolerance {
                continue;
            }
            if best.is_none_or(|(_, b)| improvement > b) {
                best = Some((j, improvement));
            }
        }

        best.map(|(j, _)| j)
    }

    /// Minimum-ratio test over the constraint rows. A row qualifies when its
    /// entry in `column` is positive and its rhs is not negative; an rhs
    /// within tolerance of zero is a degenerate candidate with ratio 0.
    /// Ties go to the first row. `None` means the column is unbounded.
    pub(crate) fn leaving_row(&self, column: usize, tolerance: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for row in FIRST_CONSTRAINT_ROW..self.num_rows() {
            let entry = self.rows[row][column];
            let rhs = self.rhs[row];
            if entry <= tolerance || rhs < -tolerance {
                continue;
            }
            let ratio = if rhs.abs() <= tolerance { 0.0 } else { rhs / entry };
            if best.is_none_or(|(_, r)| ratio < r) {
                best = Some((row, ratio));
            }
        }

        best.map(|(row, _)| row)
    }

    /// After a successful phase 1, finds a constraint row whose basic
    /// variable is still an artificial column (necessarily at level zero)
    /// together with the first non-artificial column that has a non-zero
    /// entry in that row. Pivoting on it swaps the artificial out without
    /// moving the basic solution. Rows with no such column are redundant and
    /// are skipped.
    pub(crate) fn stranded_artificial(&self, tolerance: f64) -> Option<(usize, usize)> {
        (FIRST_CONSTRAINT_ROW..self.num_rows())
            .filter(|&row| {
                self.basis[row].is_some_and(|col| self.kinds[col] == ColumnKind::Artificial)
            })
            .find_map(|row| {
                self.rows[row]
                    .iter()
                    .enumerate()
                    .find(|&(j, value)| {
                        self.kinds[j] != ColumnKind::Artificial && value.abs() > tolerance
                    })
                    .map(|(j, _)| (row, j))
            })
    }

    /// Gauss-Jordan step: scales `row` so the pivot cell becomes 1, then
    /// eliminates `column` from every other row, header rows included.
    /// Entries that end up within `tolerance` of zero are set to zero.
    pub(crate) fn pivot(&mut self, row: usize, column: usize, tolerance: f64) {
        let pivot_val = self.rows[row][column];
        debug_assert!(pivot_val.abs() > tolerance, "pivot on near-zero cell");

        for value in self.rows[row].iter_mut() {
            *value /= pivot_val;
        }
        self.rhs[row] /= pivot_val;
        self.rows[row][column] = 1.0;

        let pivot_row = self.rows[row].clone();
        let pivot_rhs = self.rhs[row];

        for i in 0..self.num_rows() {
            if i == row {
                continue;
            }
            let factor = self.rows[i][column];
            if factor.abs() <= tolerance {
                self.rows[i][column] = 0.0;
                continue;
            }
            for (value, &p) in self.rows[i].iter_mut().zip(&pivot_row) {
                *value -= factor * p;
                if value.abs() <= tolerance {
                    *value = 0.0;
                }
            }
            self.rows[i][column] = 0.0;
            self.rhs[i] -= factor * pivot_rhs;
            if self.rhs[i].abs() <= tolerance {
                self.rhs[i] = 0.0;
            }
        }

        self.basis[row] = Some(column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::VariableIndex;
    use crate::problem::{Comparator, Problem};

    const TOL: f64 = 1e-9;

    fn scenario_a() -> Tableau {
        let mut problem = Problem::new();
        problem.set_objective([("x", 2.0), ("y", 1.0)]);
        problem.add_constraint([("x", 3.0), ("y", 1.0)], Comparator::LessOrEqual, 6.0);
        problem.add_constraint([("x", 1.0), ("y", 2.0)], Comparator::LessOrEqual, 7.0);
        let index = VariableIndex::build(&problem);
        Tableau::build(&problem, &index).unwrap()
    }

    #[test]
    fn test_entering_column_most_negative() {
        let t = scenario_a();
        assert_eq!(t.entering_column(Phase::Two, TOL), Some(0));
        assert_eq!(t.entering_column(Phase::One, TOL), None);
    }

    #[test]
    fn test_entering_column_ties_go_first() {
        let mut t = scenario_a();
        t.rows[OBJECTIVE_ROW] = vec![-1.0, -1.0, 0.0, 0.0];
        assert_eq!(t.entering_column(Phase::Two, TOL), Some(0));
        t.rows[ARTIFICIAL_ROW] = vec![0.0, 2.0, 2.0, 0.0];
        assert_eq!(t.entering_column(Phase::One, TOL), Some(1));
    }

    #[test]
    fn test_entering_column_ignores_noise() {
        let mut t = scenario_a();
        t.rows[OBJECTIVE_ROW] = vec![-1e-12, 0.0, 0.0, 0.0];
        assert_eq!(t.entering_column(Phase::Two, TOL), None);
    }

    #[test]
    fn test_leaving_row_minimum_ratio() {
        let t = scenario_a();
        // 6 / 3 = 2 beats 7 / 1 = 7
        assert_eq!(t.leaving_row(0, TOL), Some(2));
        // 7 / 2 = 3.5 beats 6 / 1 = 6
        assert_eq!(t.leaving_row(1, TOL), Some(3));
    }

    #[test]
    fn test_leaving_row_degenerate_and_unbounded() {
        let mut t = scenario_a();
        t.rhs[3] = 0.0;
        assert_eq!(t.leaving_row(0, TOL), Some(3));

        t.rows[2][0] = -3.0;
        t.rows[3][0] = 0.0;
        assert_eq!(t.leaving_row(0, TOL), None);
    }

    #[test]
    fn test_pivot_produces_unit_column() {
        let mut t = scenario_a();
        t.pivot(2, 0, TOL);

        for (i, row) in t.rows.iter().enumerate() {
            let expected = if i == 2 { 1.0 } else { 0.0 };
            assert!((row[0] - expected).abs() < 1e-12, "row {} = {}", i, row[0]);
        }
        assert!((t.rhs[2] - 2.0).abs() < 1e-12);
        assert!((t.rhs[3] - 5.0).abs() < 1e-12);
        assert!((t.rhs[OBJECTIVE_ROW] - 4.0).abs() < 1e-12);
        assert_eq!(t.basis[2], Some(0));
    }

    #[test]
    fn test_stranded_artificial_after_degenerate_phase_one() {
        // -x >= 0 keeps its artificial basic at level zero; phase 1 has
        // nothing to improve
        let mut problem = Problem::new();
        problem.set_objective([("x", 1.0)]);
        problem.add_constraint([("x", -1.0)], Comparator::GreaterOrEqual, 0.0);
        problem.add_constraint([("x", 1.0)], Comparator::LessOrEqual, 5.0);
        let index = VariableIndex::build(&problem);
        let mut t = Tableau::build(&problem, &index).unwrap();

        assert_eq!(t.entering_column(Phase::One, TOL), None);
        assert_eq!(t.stranded_artificial(TOL), Some((2, 0)));

        t.pivot(2, 0, TOL);
        assert_eq!(t.basis[2], Some(0));
        assert_eq!(t.rhs[2], 0.0);
        assert_eq!(t.stranded_artificial(TOL), None);
    }

    #[test]
    fn test_stranded_artificial_skips_redundant_row() {
        let mut problem = Problem::new();
        problem.set_objective([("x", 1.0)]);
        problem.add_constraint([("x", 0.0)], Comparator::GreaterOrEqual, 0.0);
        let index = VariableIndex::build(&problem);
        let mut t = Tableau::build(&problem, &index).unwrap();
        assert_eq!(t.stranded_artificial(TOL), Some((2, 1)));

        // Row left with only its artificial, as a duplicate equality ends up
        t.rows[2][1] = 0.0;
        assert_eq!(t.stranded_artificial(TOL), None);
    }
}

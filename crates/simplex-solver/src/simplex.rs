use log::{debug, trace};

use crate::error::SolveError;
use crate::index::VariableIndex;
use crate::pivot::Phase;
use crate::problem::Problem;
use crate::solution::{PivotCounts, Solution, extract};
use crate::tableau::{ARTIFICIAL_ROW, OBJECTIVE_ROW, Tableau};

/// Two-phase tableau simplex solver
#[derive(Debug, Clone, Copy)]
pub struct Solver {
    /// Maximum pivots, across both phases, before giving up
    max_iterations: usize,
    /// Magnitudes at or below this are treated as zero
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Solve the problem using the two-phase simplex method
    pub fn solve(&self, problem: &Problem) -> Result<Solution, SolveError> {
        let index = VariableIndex::build(problem);
        let mut tableau = Tableau::build(problem, &index)?;
        debug!(
            "built tableau: variables: {}, constraints: {}, rows: {}, columns: {}, artificial: {}",
            index.len(),
            problem.num_constraints(),
            tableau.num_rows(),
            tableau.num_columns(),
            tableau.has_artificial(),
        );

        let mut budget = self.max_iterations;

        // Phase 1: find an initial basic feasible solution
        let mut phase_one = self.run_phase(&mut tableau, Phase::One, &mut budget)?;
        let residual = tableau.rhs[ARTIFICIAL_ROW];
        if residual > self.tolerance {
            debug!("phase 1 stopped after {} pivots with artificial cost {}", phase_one, residual);
            return Err(SolveError::Infeasible { residual });
        }
        phase_one += self.drive_out_artificials(&mut tableau, &mut budget)?;
        debug!("phase 1 done in {} pivots", phase_one);

        // Phase 2: optimize
        let phase_two = self.run_phase(&mut tableau, Phase::Two, &mut budget)?;
        debug!(
            "phase 2 done in {} pivots, obj.: {}",
            phase_two, tableau.rhs[OBJECTIVE_ROW]
        );

        let pivots = PivotCounts { phase_one, phase_two };
        Ok(extract(&tableau, &index, problem.sense(), pivots, self.tolerance))
    }

    /// Pivots until the phase's cost row has no improving column. Returns the
    /// number of pivots performed.
    fn run_phase(&self, tableau: &mut Tableau, phase: Phase, budget: &mut usize) -> Result<usize, SolveError> {
        let mut pivots = 0;

        while let Some(column) = tableau.entering_column(phase, self.tolerance) {
            let Some(row) = tableau.leaving_row(column, self.tolerance) else {
                return Err(match phase {
                    // Unbounded in phase 1 means infeasible original
                    Phase::One => SolveError::Infeasible {
                        residual: tableau.rhs[ARTIFICIAL_ROW],
                    },
                    Phase::Two => SolveError::Unbounded { column },
                });
            };

            if *budget == 0 {
                return Err(SolveError::IterationLimit(self.max_iterations));
            }
            *budget -= 1;

            trace!(
                "{:?}: pivot row {} column {} value {}",
                phase, row, column, tableau.rows[row][column]
            );
            tableau.pivot(row, column, self.tolerance);
            pivots += 1;
        }

        Ok(pivots)
    }

    /// Replaces artificial columns left basic at level zero by phase 1, so
    /// phase 2 cannot raise them above zero through a negative entry in
    /// their row.
    fn drive_out_artificials(&self, tableau: &mut Tableau, budget: &mut usize) -> Result<usize, SolveError> {
        let mut pivots = 0;

        while let Some((row, column)) = tableau.stranded_artificial(self.tolerance) {
            if *budget == 0 {
                return Err(SolveError::IterationLimit(self.max_iterations));
            }
            *budget -= 1;

            trace!(
                "driving out artificial: pivot row {} column {} value {}",
                row, column, tableau.rows[row][column]
            );
            tableau.pivot(row, column, self.tolerance);
            pivots += 1;
        }

        if pivots > 0 {
            debug!("drove {} zero-level artificial columns out of the basis", pivots);
        }
        Ok(pivots)
    }
}

/// Solve with the default configuration
pub fn solve(problem: &Problem) -> Result<Solution, SolveError> {
    Solver::new().solve(problem)
}

mod error;
mod index;
mod pivot;
mod problem;
mod simplex;
mod solution;
mod tableau;

pub use error::{MalformedProblem, SolveError};
pub use index::VariableIndex;
pub use problem::{Assignment, Coefficients, Comparator, Constraint, Problem, Sense};
pub use simplex::{Solver, solve};
pub use solution::{ConstraintViolation, PivotCounts, Solution};

use std::fmt;

use indexmap::IndexMap;

use crate::solution::ConstraintViolation;

/// Coefficients of a linear expression, keyed by variable name
pub type Coefficients = IndexMap<String, f64>;

/// Values assigned to variables, keyed by variable name
pub type Assignment = IndexMap<String, f64>;

/// Represents a linear program over non-negative variables
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Problem {
    /// Constraints, in insertion order
    #[cfg_attr(feature = "serde", serde(default))]
    constraints: Vec<Constraint>,
    /// Objective function coefficients
    #[cfg_attr(feature = "serde", serde(default))]
    objective: Coefficients,
    /// Whether to maximize or minimize
    #[cfg_attr(feature = "serde", serde(default))]
    sense: Sense,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Left-hand side; omitted variables have coefficient zero
    coefficients: Coefficients,
    /// Comparison operator
    comparator: Comparator,
    /// Right-hand side value, any sign
    rhs: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// Strictly less than (<), rejected by the solver
    Less,
    /// Less than or equal (<=)
    LessOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (>=)
    GreaterOrEqual,
    /// Strictly greater than (>), rejected by the solver
    Greater,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sense {
    #[default]
    Maximize,
    Minimize,
}

impl Comparator {
    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Less => "<",
            Comparator::LessOrEqual => "<=",
            Comparator::Equal => "=",
            Comparator::GreaterOrEqual => ">=",
            Comparator::Greater => ">",
        }
    }

    /// Strict comparators cannot be expressed with slack and surplus columns
    pub fn is_strict(self) -> bool {
        matches!(self, Comparator::Less | Comparator::Greater)
    }

    /// The comparator that holds after multiplying both sides by -1
    pub fn mirrored(self) -> Self {
        match self {
            Comparator::Less => Comparator::Greater,
            Comparator::LessOrEqual => Comparator::GreaterOrEqual,
            Comparator::Equal => Comparator::Equal,
            Comparator::GreaterOrEqual => Comparator::LessOrEqual,
            Comparator::Greater => Comparator::Less,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Collects `(name, coefficient)` pairs, summing repeated names
fn collect_coefficients<I, K>(coefficients: I) -> Coefficients
where
    I: IntoIterator<Item = (K, f64)>,
    K: Into<String>,
{
    let mut collected = Coefficients::new();
    for (name, value) in coefficients {
        *collected.entry(name.into()).or_insert(0.0) += value;
    }
    collected
}

fn evaluate(coefficients: &Coefficients, assignment: &Assignment) -> f64 {
    coefficients
        .iter()
        .map(|(name, coef)| coef * assignment.get(name).copied().unwrap_or(0.0))
        .sum()
}

impl Constraint {
    pub fn new<I, K>(coefficients: I, comparator: Comparator, rhs: f64) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            coefficients: collect_coefficients(coefficients),
            comparator,
            rhs,
        }
    }

    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    /// Coefficient of `name`, zero when the constraint does not mention it
    pub fn coefficient(&self, name: &str) -> f64 {
        self.coefficients.get(name).copied().unwrap_or(0.0)
    }

    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Left-hand side at `assignment`; unassigned variables count as zero
    pub fn evaluate(&self, assignment: &Assignment) -> f64 {
        evaluate(&self.coefficients, assignment)
    }

    pub fn is_satisfied_by(&self, assignment: &Assignment, tolerance: f64) -> bool {
        let lhs = self.evaluate(assignment);
        match self.comparator {
            Comparator::Less => lhs < self.rhs,
            Comparator::LessOrEqual => lhs <= self.rhs + tolerance,
            Comparator::Equal => (lhs - self.rhs).abs() <= tolerance,
            Comparator::GreaterOrEqual => lhs >= self.rhs - tolerance,
            Comparator::Greater => lhs > self.rhs,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expression(f, &self.coefficients)?;
        write!(f, " {} {}", self.comparator, self.rhs)
    }
}

fn write_expression(f: &mut fmt::Formatter<'_>, coefficients: &Coefficients) -> fmt::Result {
    if coefficients.is_empty() {
        return f.write_str("0");
    }
    for (i, (name, coef)) in coefficients.iter().enumerate() {
        match (i, *coef < 0.0) {
            (0, false) => write!(f, "{}{}", coef, name)?,
            (0, true) => write!(f, "-{}{}", -coef, name)?,
            (_, false) => write!(f, " + {}{}", coef, name)?,
            (_, true) => write!(f, " - {}{}", -coef, name)?,
        }
    }
    Ok(())
}

impl Problem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_constraint<I, K>(&mut self, coefficients: I, comparator: Comparator, rhs: f64)
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        self.constraints.push(Constraint::new(coefficients, comparator, rhs));
    }

    pub fn push_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Replaces the objective function
    pub fn set_objective<I, K>(&mut self, coefficients: I)
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        self.objective = collect_coefficients(coefficients);
    }

    pub fn set_sense(&mut self, sense: Sense) {
        self.sense = sense;
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &Coefficients {
        &self.objective
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective function evaluated at `assignment`
    pub fn objective_value(&self, assignment: &Assignment) -> f64 {
        evaluate(&self.objective, assignment)
    }

    /// Constraints violated by `assignment`, worst first. Negative variable
    /// values are not reported here.
    pub fn violations(&self, assignment: &Assignment, tolerance: f64) -> Vec<ConstraintViolation> {
        let mut violations: Vec<ConstraintViolation> = self
            .constraints
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_satisfied_by(assignment, tolerance))
            .map(|(i, c)| {
                let actual = c.evaluate(assignment);
                let violation_amount = (actual - c.rhs).abs();
                let description = match c.comparator {
                    Comparator::Less | Comparator::LessOrEqual => format!(
                        "constraint {} exceeds maximum of {:.2} by {:.2}",
                        i, c.rhs, violation_amount
                    ),
                    Comparator::Equal => format!(
                        "constraint {} requires exactly {:.2} but got {:.2}",
                        i, c.rhs, actual
                    ),
                    Comparator::GreaterOrEqual | Comparator::Greater => format!(
                        "constraint {} is below minimum of {:.2} by {:.2}",
                        i, c.rhs, violation_amount
                    ),
                };
                ConstraintViolation {
                    constraint: i,
                    required: c.rhs,
                    actual,
                    violation_amount,
                    description,
                }
            })
            .collect();

        violations.sort_by(|a, b| b.violation_amount.total_cmp(&a.violation_amount));
        violations
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sense {
            Sense::Maximize => f.write_str("maximize ")?,
            Sense::Minimize => f.write_str("minimize ")?,
        }
        write_expression(f, &self.objective)?;
        for constraint in &self.constraints {
            write!(f, "\n{}", constraint)?;
        }
        Ok(())
    }
}

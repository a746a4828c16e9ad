use indexmap::IndexMap;

use crate::problem::Problem;

/// Column positions of the decision variables of a problem.
///
/// Names are numbered in order of first appearance: the objective's
/// coefficients first, then each constraint's coefficients in insertion
/// order. A name keeps the column it was first given, so the layout is
/// reproducible for a given problem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableIndex {
    columns: IndexMap<String, usize>,
}

impl VariableIndex {
    pub fn build(problem: &Problem) -> Self {
        let mut index = Self::default();
        for name in problem.objective().keys() {
            index.insert(name);
        }
        for constraint in problem.constraints() {
            for name in constraint.coefficients().keys() {
                index.insert(name);
            }
        }
        index
    }

    fn insert(&mut self, name: &str) {
        if !self.columns.contains_key(name) {
            let next = self.columns.len();
            self.columns.insert(name.to_string(), next);
        }
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// `(name, column)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.columns.iter().map(|(name, &col)| (name.as_str(), col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Comparator;

    #[test]
    fn test_objective_names_come_first() {
        let mut problem = Problem::new();
        problem.add_constraint([("z", 1.0), ("y", 1.0)], Comparator::LessOrEqual, 3.0);
        problem.add_constraint([("w", 1.0), ("x", 1.0)], Comparator::GreaterOrEqual, 1.0);
        problem.set_objective([("x", 1.0), ("y", 2.0)]);

        let index = VariableIndex::build(&problem);
        let order: Vec<_> = index.iter().collect();
        assert_eq!(order, vec![("x", 0), ("y", 1), ("z", 2), ("w", 3)]);
    }

    #[test]
    fn test_each_name_indexed_once() {
        let mut problem = Problem::new();
        problem.set_objective([("x", 1.0)]);
        problem.add_constraint([("x", 1.0), ("y", 1.0)], Comparator::LessOrEqual, 3.0);
        problem.add_constraint([("y", 1.0), ("x", 1.0)], Comparator::LessOrEqual, 4.0);

        let index = VariableIndex::build(&problem);
        assert_eq!(index.len(), 2);
        assert_eq!(index.column("x"), Some(0));
        assert_eq!(index.column("y"), Some(1));
        assert_eq!(index.column("z"), None);
    }

    #[test]
    fn test_empty_problem() {
        let index = VariableIndex::build(&Problem::new());
        assert!(index.is_empty());
    }
}

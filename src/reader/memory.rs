use std::collections::HashMap;

use crate::{
    columns::Jagged,
    jet::{Jet, PfCandidate},
};

use super::{CollectionBranches, ColumnSource, ReadError};

#[derive(Clone, Debug, PartialEq)]
enum Column {
    Scalar(Vec<f64>),
    Jagged(Vec<Vec<f64>>),
}

/// Event columns held in memory
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemorySource {
    columns: HashMap<String, Column>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column with one value per event
    pub fn with_scalars(mut self, name: &str, values: Vec<f64>) -> Self {
        self.columns.insert(name.to_owned(), Column::Scalar(values));
        self
    }

    /// Add a variable-length column together with its count column
    pub fn with_jagged(
        mut self,
        count: &str,
        name: &str,
        values: Vec<Vec<f64>>,
    ) -> Self {
        let counts = values.iter().map(|v| v.len() as f64).collect();
        self.columns.insert(count.to_owned(), Column::Scalar(counts));
        self.columns.insert(name.to_owned(), Column::Jagged(values));
        self
    }

    /// Add the columns of a jet collection
    pub fn with_jets(
        self,
        branches: &CollectionBranches,
        jets: &[Vec<Jet>],
    ) -> Self {
        let var = |f: fn(&Jet) -> f64| -> Vec<Vec<f64>> {
            jets.iter().map(|jets| jets.iter().map(f).collect()).collect()
        };
        let count = &branches.count;
        self.with_jagged(count, &branches.column("pt"), var(|j| j.pt))
            .with_jagged(count, &branches.column("eta"), var(|j| j.eta))
            .with_jagged(count, &branches.column("phi"), var(|j| j.phi))
            .with_jagged(count, &branches.column("mass"), var(|j| j.mass))
            .with_jagged(
                count,
                &branches.column("rawFactor"),
                var(|j| j.raw_factor),
            )
    }

    /// Add the columns of a particle-flow candidate collection
    pub fn with_pf_candidates(
        self,
        branches: &CollectionBranches,
        cands: &[Vec<PfCandidate>],
    ) -> Self {
        let var = |f: fn(&PfCandidate) -> f64| -> Vec<Vec<f64>> {
            cands.iter().map(|c| c.iter().map(f).collect()).collect()
        };
        let count = &branches.count;
        self.with_jagged(count, &branches.column("pt"), var(|c| c.pt))
            .with_jagged(count, &branches.column("eta"), var(|c| c.eta))
            .with_jagged(count, &branches.column("phi"), var(|c| c.phi))
            .with_jagged(count, &branches.column("energy"), var(|c| c.energy))
            .with_jagged(count, &branches.column("px"), var(|c| c.px))
            .with_jagged(count, &branches.column("py"), var(|c| c.py))
    }

    fn get(&self, name: &str) -> Result<&Column, ReadError> {
        self.columns
            .get(name)
            .ok_or_else(|| ReadError::MissingBranch(name.to_owned()))
    }
}

impl ColumnSource for MemorySource {
    fn has(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    fn scalars(&mut self, name: &str) -> Result<Vec<f64>, ReadError> {
        match self.get(name)? {
            Column::Scalar(values) => Ok(values.clone()),
            Column::Jagged(_) => Err(ReadError::UnsupportedType {
                branch: name.to_owned(),
                ty: "jagged".to_owned(),
            }),
        }
    }

    fn jagged_with_counts(
        &mut self,
        name: &str,
        counts: &[usize],
    ) -> Result<Jagged<f64>, ReadError> {
        match self.get(name)? {
            Column::Jagged(values) => {
                Ok(Jagged::from_nested(name, counts, values.clone())?)
            }
            Column::Scalar(values) => {
                Ok(Jagged::from_counts(counts, values.clone())?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::ColumnError;

    #[test]
    fn jagged_columns() {
        let mut source = MemorySource::new()
            .with_jagged("nX", "X_a", vec![vec![1., 2.], vec![], vec![3.]])
            .with_scalars("X_flat", vec![1., 2., 3.])
            .with_scalars("nY", vec![2., 2.]);
        assert!(source.has("nX"));
        assert!(!source.has("X_b"));

        let a = source.jagged("X_a", "nX").unwrap();
        assert_eq!(a.counts(), [2, 0, 1]);
        let flat = source.jagged("X_flat", "nX").unwrap();
        assert_eq!(flat, a);

        assert!(matches!(
            source.jagged("X_a", "nY"),
            Err(ReadError::Column(ColumnError::NumEvents { .. }))
        ));
        assert!(matches!(
            source.jagged("X_flat", "nY"),
            Err(ReadError::Column(ColumnError::CountMismatch { .. }))
        ));
        assert!(matches!(
            source.scalars("X_a"),
            Err(ReadError::UnsupportedType { .. })
        ));
        assert!(matches!(
            source.jagged("X_b", "nX"),
            Err(ReadError::MissingBranch(_))
        ));
    }
}

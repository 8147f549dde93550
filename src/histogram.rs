use thiserror::Error;

/// `n` evenly spaced points from `start` to `stop`, both included
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let span = stop - start;
            let nsteps = (n - 1) as f64;
            let mut points: Vec<_> = (0..n)
                .map(|i| start + span * (i as f64) / nsteps)
                .collect();
            points[n - 1] = stop;
            points
        }
    }
}

/// Points `start, start + step, ...` strictly below `stop`
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step <= 0. || stop <= start {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil() as usize;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// A one-dimensional histogram with arbitrary bin edges
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<u64>,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BinningError {
    #[error("Need at least two bin edges, got {0}")]
    TooFewEdges(usize),
    #[error("Bin edges must be increasing")]
    NotIncreasing,
}

impl Histogram {
    /// Empty histogram with the given bin edges
    pub fn new(edges: Vec<f64>) -> Result<Self, BinningError> {
        if edges.len() < 2 {
            return Err(BinningError::TooFewEdges(edges.len()));
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(BinningError::NotIncreasing);
        }
        let counts = vec![0; edges.len() - 1];
        Ok(Self { edges, counts })
    }

    /// Histogram of `values` with the given edges
    pub fn with_values<I>(edges: Vec<f64>, values: I) -> Result<Self, BinningError>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut hist = Self::new(edges)?;
        for value in values {
            hist.fill(value);
        }
        Ok(hist)
    }

    /// Add a value
    ///
    /// All bins are half-open except the last one, which also includes
    /// its upper edge. Values outside the edges and NaN are ignored.
    pub fn fill(&mut self, value: f64) {
        if let Some(bin) = self.find_bin(value) {
            self.counts[bin] += 1;
        }
    }

    fn find_bin(&self, value: f64) -> Option<usize> {
        let first = self.edges[0];
        let last = *self.edges.last()?;
        if !(first..=last).contains(&value) {
            return None;
        }
        if value == last {
            return Some(self.counts.len() - 1);
        }
        let pos = self.edges.partition_point(|&e| e <= value);
        Some(pos - 1)
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Iterate over `(lower edge, upper edge, count)`
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, u64)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(e, &c)| (e[0], e[1], c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaced_points() {
        assert_eq!(linspace(0., 1., 5), [0., 0.25, 0.5, 0.75, 1.]);
        assert_eq!(linspace(2., 3., 1), [2.]);
        assert!(linspace(2., 3., 0).is_empty());
        let edges = linspace(0., 8., 81);
        assert_eq!(edges.len(), 81);
        assert_eq!(edges[80], 8.);

        assert_eq!(arange(0., 20., 5.), [0., 5., 10., 15.]);
        assert_eq!(arange(0., 1000., 50.).len(), 20);
        assert!(arange(1., 0., 1.).is_empty());
    }

    #[test]
    fn binning() {
        let hist = Histogram::with_values(
            vec![0., 1., 2., 3.],
            [-1., 0., 0.5, 1., 2.999, 3., 3.5, f64::NAN],
        )
        .unwrap();
        assert_eq!(hist.counts(), [2, 1, 2]);
        assert_eq!(hist.total(), 5);
        let bins: Vec<_> = hist.bins().collect();
        assert_eq!(bins[1], (1., 2., 1));
    }

    #[test]
    fn bad_edges() {
        assert_eq!(
            Histogram::new(vec![1.]),
            Err(BinningError::TooFewEdges(1))
        );
        assert_eq!(
            Histogram::new(vec![0., 2., 1.]),
            Err(BinningError::NotIncreasing)
        );
    }
}

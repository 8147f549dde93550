use std::ops::Range;

use thiserror::Error;

/// A column with a variable number of entries per event
///
/// The values of all events are stored in one flat vector, event `i`
/// owns `values[offsets[i]..offsets[i + 1]]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Jagged<T> {
    offsets: Vec<usize>,
    values: Vec<T>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColumnError {
    #[error("Counts add up to {expected} entries, but there are {found} values")]
    CountMismatch { expected: usize, found: usize },
    #[error("Event {event} has {found} entries in `{column}`, expected {expected}")]
    EventLength {
        column: String,
        event: usize,
        expected: usize,
        found: usize,
    },
    #[error("Column `{column}` has {found} events, expected {expected}")]
    NumEvents {
        column: String,
        expected: usize,
        found: usize,
    },
}

impl<T> Default for Jagged<T> {
    fn default() -> Self {
        Self {
            offsets: vec![0],
            values: Vec::new(),
        }
    }
}

impl<T> Jagged<T> {
    /// Split flat `values` into events with the given entry counts
    pub fn from_counts(
        counts: &[usize],
        values: Vec<T>,
    ) -> Result<Self, ColumnError> {
        let mut offsets = Vec::with_capacity(counts.len() + 1);
        offsets.push(0);
        let mut total = 0;
        for count in counts {
            total += count;
            offsets.push(total);
        }
        if total != values.len() {
            return Err(ColumnError::CountMismatch {
                expected: total,
                found: values.len(),
            });
        }
        Ok(Self { offsets, values })
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries in each event
    pub fn counts(&self) -> Vec<usize> {
        self.offsets.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// The entries of event `i`
    pub fn get(&self, i: usize) -> Option<&[T]> {
        self.range(i).map(|r| &self.values[r])
    }

    fn range(&self, i: usize) -> Option<Range<usize>> {
        if i < self.len() {
            Some(self.offsets[i]..self.offsets[i + 1])
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &[T]> {
        self.offsets
            .windows(2)
            .map(|w| &self.values[w[0]..w[1]])
    }

    /// All entries of all events
    pub fn flat(&self) -> &[T] {
        &self.values
    }

    /// Apply a function to each entry, keeping the event structure
    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Jagged<U> {
        Jagged {
            offsets: self.offsets.clone(),
            values: self.values.iter().map(f).collect(),
        }
    }
}

impl<T: Clone> Jagged<T> {
    /// Owned entries of all events
    pub fn to_nested(&self) -> Vec<Vec<T>> {
        self.iter().map(|e| e.to_vec()).collect()
    }
}

impl<T> FromIterator<Vec<T>> for Jagged<T> {
    fn from_iter<I: IntoIterator<Item = Vec<T>>>(iter: I) -> Self {
        let mut res = Self::default();
        for event in iter {
            res.values.extend(event);
            res.offsets.push(res.values.len());
        }
        res
    }
}

impl<T> Jagged<T> {
    /// Build from per-event entries, checking them against the counts
    ///
    /// `column` is only used for error messages.
    pub fn from_nested(
        column: &str,
        counts: &[usize],
        nested: Vec<Vec<T>>,
    ) -> Result<Self, ColumnError> {
        if counts.len() != nested.len() {
            return Err(ColumnError::NumEvents {
                column: column.to_owned(),
                expected: counts.len(),
                found: nested.len(),
            });
        }
        let lengths = nested.iter().map(|e| e.len());
        for (event, (expected, found)) in counts.iter().zip(lengths).enumerate() {
            if *expected != found {
                return Err(ColumnError::EventLength {
                    column: column.to_owned(),
                    event,
                    expected: *expected,
                    found,
                });
            }
        }
        Self::from_counts(counts, nested.into_iter().flatten().collect())
    }
}

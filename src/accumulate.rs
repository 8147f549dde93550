use log::info;
use thiserror::Error;

use crate::image::{Image, ShapeError};

/// Default number of images to accumulate
pub const DEFAULT_NUM_EVENTS: usize = 40;

/// Running pixel-wise sum of images
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Accumulator {
    sum: Option<Image>,
    nevents: usize,
}

/// Average of a number of images
#[derive(Clone, Debug, PartialEq)]
pub struct Accumulated {
    pub image: Image,
    pub nevents: usize,
}

#[derive(Debug, Error)]
pub enum AccumulateError {
    #[error("No images to accumulate")]
    NoEvents,
    #[error("Failed to accumulate image {index}: {err}")]
    Shape {
        index: usize,
        #[source]
        err: ShapeError,
    },
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image to the sum
    ///
    /// All images must have the same shape as the first one.
    pub fn add(&mut self, image: &Image) -> Result<(), AccumulateError> {
        match self.sum.as_mut() {
            Some(sum) => sum.try_add_assign(image).map_err(|err| {
                AccumulateError::Shape {
                    index: self.nevents,
                    err,
                }
            })?,
            None => self.sum = Some(image.clone()),
        }
        self.nevents += 1;
        Ok(())
    }

    /// Number of images added so far
    pub fn nevents(&self) -> usize {
        self.nevents
    }

    /// The unnormalised sum
    pub fn sum(&self) -> Option<&Image> {
        self.sum.as_ref()
    }

    /// The sum divided by the number of images
    pub fn finish(self) -> Result<Accumulated, AccumulateError> {
        let Some(mut image) = self.sum else {
            return Err(AccumulateError::NoEvents);
        };
        image.scale(1. / self.nevents as f64);
        Ok(Accumulated {
            image,
            nevents: self.nevents,
        })
    }
}

/// Average over the first `numevents` images
///
/// If fewer images are available, all of them are used and the
/// average is taken over their actual number.
pub fn accumulate<'a, I>(
    images: I,
    numevents: usize,
) -> Result<Accumulated, AccumulateError>
where
    I: IntoIterator<Item = &'a Image>,
{
    let mut acc = Accumulator::new();
    for image in images.into_iter().take(numevents) {
        acc.add(image)?;
    }
    if acc.nevents() < numevents {
        info!(
            "Ran out of events after {} of {numevents} requested",
            acc.nevents()
        );
    }
    info!("Accumulated {} event images", acc.nevents());
    acc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn constant(value: f64, n_eta: usize, n_phi: usize) -> Image {
        Image::reshape(vec![value; n_eta * n_phi], n_eta, n_phi).unwrap()
    }

    fn assert_all_close(image: &Image, value: f64) {
        for p in image.as_slice() {
            assert!((p - value).abs() < 1e-12, "{p} != {value}");
        }
    }

    #[test]
    fn sum_and_normalise() {
        log_init();

        let images = vec![constant(1., 2, 2); 3];
        let mut acc = Accumulator::new();
        for image in &images {
            acc.add(image).unwrap();
        }
        assert_eq!(acc.sum(), Some(&constant(3., 2, 2)));
        let res = acc.finish().unwrap();
        assert_eq!(res.nevents, 3);
        assert_all_close(&res.image, 1.);
    }

    #[test]
    fn stops_when_out_of_events() {
        log_init();

        let images: Vec<_> = (0..10).map(|i| constant(i as f64, 3, 2)).collect();
        let res = accumulate(&images, 50).unwrap();
        assert_eq!(res.nevents, 10);
        // (0 + ... + 9) / 10
        assert_eq!(res.image.shape(), (3, 2));
        assert_all_close(&res.image, 4.5);

        let res = accumulate(&images, 4).unwrap();
        assert_eq!(res.nevents, 4);
        assert_all_close(&res.image, 1.5);
    }

    #[test]
    fn errors() {
        log_init();

        let none: Vec<Image> = Vec::new();
        assert!(matches!(
            accumulate(&none, 5),
            Err(AccumulateError::NoEvents)
        ));

        let images = vec![constant(1., 2, 2), constant(1., 2, 3)];
        assert!(matches!(
            accumulate(&images, 5),
            Err(AccumulateError::Shape { index: 1, .. })
        ));
    }

    #[test]
    fn default_number_of_events() {
        log_init();

        let images = vec![constant(2., 1, 3); 50];
        let res = accumulate(&images, DEFAULT_NUM_EVENTS).unwrap();
        assert_eq!(res.nevents, 40);
        assert_all_close(&res.image, 2.);
    }
}

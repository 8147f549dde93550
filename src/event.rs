use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{
    image::{Image, ShapeError},
    jet::{Jet, PfCandidate},
};

/// Particle-flow candidate category contributing to an image
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    EnumIter,
    EnumString,
    ValueEnum,
    Deserialize,
    Serialize,
)]
#[strum(ascii_case_insensitive)]
#[value(rename_all = "verbatim")]
pub enum PfType {
    /// All candidates
    #[default]
    #[strum(to_string = "all")]
    #[value(name = "all")]
    #[serde(rename = "all")]
    All,
    NeutralHadron,
    ChargedHadron,
    HFEM,
    HFHadronic,
}

impl PfType {
    /// Name of the pixel column for images of the given kind
    pub fn pixel_branch(&self, kind: ImageKind) -> String {
        match self {
            PfType::All => format!("{}_pixels", kind.table()),
            other => format!("{}_{other}Pixels", kind.table()),
        }
    }
}

/// Which image is looked at
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Deserialize,
    Serialize,
)]
pub enum ImageKind {
    /// Image built from all particle-flow candidates in the event
    #[default]
    Event,
    /// Image built from particle-flow candidates inside jets
    Jet,
}

impl ImageKind {
    pub fn from_jets_only(jets_only: bool) -> Self {
        if jets_only {
            Self::Jet
        } else {
            Self::Event
        }
    }

    /// Prefix of the input columns
    pub fn table(&self) -> &'static str {
        match self {
            ImageKind::Event => "EventImage",
            ImageKind::Jet => "JetImage",
        }
    }

    /// Output subdirectory for plots of this kind
    pub fn output_dir(&self) -> &'static str {
        match self {
            ImageKind::Event => "event_images",
            ImageKind::Jet => "jet_based_images",
        }
    }
}

/// Flat image pixels of one event, one set per PF type
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageData {
    pub n_eta: usize,
    pub n_phi: usize,
    pub pixels: BTreeMap<PfType, Vec<f64>>,
}

impl ImageData {
    pub fn new(n_eta: usize, n_phi: usize) -> Self {
        Self {
            n_eta,
            n_phi,
            pixels: BTreeMap::new(),
        }
    }

    pub fn with_pixels(mut self, pf_type: PfType, pixels: Vec<f64>) -> Self {
        self.pixels.insert(pf_type, pixels);
        self
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_eta, self.n_phi)
    }

    /// The 2D image for the given PF type, if it was read
    pub fn image(&self, pf_type: PfType) -> Option<Result<Image, ShapeError>> {
        self.pixels
            .get(&pf_type)
            .map(|p| Image::reshape(p.clone(), self.n_eta, self.n_phi))
    }
}

/// The data of one collision event
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Event {
    /// Reconstructed jets, by descending transverse momentum
    pub jets: Vec<Jet>,
    /// Generator-level jets
    pub gen_jets: Vec<Jet>,
    pub pf_candidates: Vec<PfCandidate>,
    pub event_image: Option<ImageData>,
    pub jet_image: Option<ImageData>,
}

impl Event {
    pub fn image_data(&self, kind: ImageKind) -> Option<&ImageData> {
        match kind {
            ImageKind::Event => self.event_image.as_ref(),
            ImageKind::Jet => self.jet_image.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn branch_names() {
        use PfType::*;
        assert_eq!(All.pixel_branch(ImageKind::Event), "EventImage_pixels");
        assert_eq!(All.pixel_branch(ImageKind::Jet), "JetImage_pixels");
        assert_eq!(
            NeutralHadron.pixel_branch(ImageKind::Event),
            "EventImage_NeutralHadronPixels"
        );
        assert_eq!(HFEM.pixel_branch(ImageKind::Event), "EventImage_HFEMPixels");
    }

    #[test]
    fn pf_type_names() {
        let names: Vec<_> = PfType::iter().map(|t| t.to_string()).collect();
        assert_eq!(
            names,
            ["all", "NeutralHadron", "ChargedHadron", "HFEM", "HFHadronic"]
        );
        assert_eq!("hfem".parse(), Ok(PfType::HFEM));
        assert_eq!("All".parse(), Ok(PfType::All));
    }

    #[test]
    fn image_from_data() {
        let data = ImageData::new(2, 2).with_pixels(PfType::All, vec![1., 2., 3., 4.]);
        let image = data.image(PfType::All).unwrap().unwrap();
        assert_eq!(image[(1, 0)], 3.);
        assert!(data.image(PfType::HFEM).is_none());

        let bad = ImageData::new(3, 2).with_pixels(PfType::All, vec![1.; 5]);
        assert!(bad.image(PfType::All).unwrap().is_err());

        let event = Event {
            jet_image: Some(data.clone()),
            ..Default::default()
        };
        assert_eq!(event.image_data(ImageKind::Jet), Some(&data));
        assert_eq!(event.image_data(ImageKind::Event), None);
    }
}

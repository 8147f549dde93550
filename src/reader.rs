mod memory;
mod root;

pub use memory::MemorySource;
pub use root::RootSource;

use std::collections::BTreeMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use typed_builder::TypedBuilder;

use crate::{
    columns::{ColumnError, Jagged},
    event::{Event, ImageData, ImageKind, PfType},
    jet::{Jet, PfCandidate},
    selection::VbfSelection,
};

/// Name of the event tree in NanoAOD files
pub const EVENTS_TREE: &str = "Events";

/// Access to the columns of an event table by branch name
pub trait ColumnSource {
    /// Whether a column with the given name exists
    fn has(&self, name: &str) -> bool;

    /// One number per event
    fn scalars(&mut self, name: &str) -> Result<Vec<f64>, ReadError>;

    /// One variable-length list per event, with lengths given by the
    /// `count` column
    fn jagged(
        &mut self,
        name: &str,
        count: &str,
    ) -> Result<Jagged<f64>, ReadError> {
        let counts = self.counts(count)?;
        self.jagged_with_counts(name, &counts)
    }

    /// One variable-length list per event with the given lengths
    ///
    /// Use this instead of [ColumnSource::jagged] to read several
    /// columns sharing the same count column.
    fn jagged_with_counts(
        &mut self,
        name: &str,
        counts: &[usize],
    ) -> Result<Jagged<f64>, ReadError>;

    /// One non-negative integer per event
    fn counts(&mut self, name: &str) -> Result<Vec<usize>, ReadError> {
        self.scalars(name)?
            .into_iter()
            .map(|value| to_count(name, value))
            .collect()
    }
}

fn to_count(branch: &str, value: f64) -> Result<usize, ReadError> {
    if value >= 0. && value.fract() == 0. {
        Ok(value as usize)
    } else {
        Err(ReadError::InvalidCount {
            branch: branch.to_owned(),
            value,
        })
    }
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Failed to open ROOT file {path}: {msg}")]
    Open { path: String, msg: String },
    #[error("Branch `{0}` not found")]
    MissingBranch(String),
    #[error("Branch `{branch}` has unsupported type `{ty}`")]
    UnsupportedType { branch: String, ty: String },
    #[error("Failed to read branch `{branch}`: {msg}")]
    Branch { branch: String, msg: String },
    #[error("Invalid entry count {value} in branch `{branch}`")]
    InvalidCount { branch: String, value: f64 },
    #[error("Inconsistent column: {0}")]
    Column(#[from] ColumnError),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read input: {0}")]
    Read(#[from] ReadError),
    #[error("Inconsistent event data: {0}")]
    Column(#[from] ColumnError),
}

/// Branches of a collection of objects, e.g. `nJet`, `Jet_pt`, ...
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CollectionBranches {
    /// Branch with the number of objects per event
    pub count: String,
    /// Prefix of the per-object branches
    pub prefix: String,
}

impl CollectionBranches {
    pub fn new(count: &str, prefix: &str) -> Self {
        Self {
            count: count.to_owned(),
            prefix: prefix.to_owned(),
        }
    }

    /// Branch of the given per-object variable
    pub fn column(&self, var: &str) -> String {
        format!("{}_{var}", self.prefix)
    }
}

/// Branches of an event or jet image
///
/// The pixels of each event are stored as a list with `n{table}`
/// entries, the image dimensions as one number per event.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageBranches {
    pub kind: ImageKind,
    /// Pixel branches differing from the standard naming
    #[serde(default)]
    pub pixels: BTreeMap<PfType, String>,
}

impl ImageBranches {
    pub fn new(kind: ImageKind) -> Self {
        Self {
            kind,
            pixels: BTreeMap::new(),
        }
    }

    /// Branch with the number of pixels per event
    pub fn count(&self) -> String {
        format!("n{}", self.kind.table())
    }

    pub fn n_eta(&self) -> String {
        format!("{}Size_nEtaBins", self.kind.table())
    }

    pub fn n_phi(&self) -> String {
        format!("{}Size_nPhiBins", self.kind.table())
    }

    /// Pixel branch for the given PF type
    pub fn pixels(&self, pf_type: PfType) -> String {
        self.pixels
            .get(&pf_type)
            .cloned()
            .unwrap_or_else(|| pf_type.pixel_branch(self.kind))
    }
}

/// Names of all input branches
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BranchNames {
    pub jets: CollectionBranches,
    pub gen_jets: CollectionBranches,
    pub pf_candidates: CollectionBranches,
    pub event_image: ImageBranches,
    pub jet_image: ImageBranches,
}

impl Default for BranchNames {
    fn default() -> Self {
        Self {
            jets: CollectionBranches::new("nJet", "Jet"),
            gen_jets: CollectionBranches::new("nGenJet", "GenJet"),
            pf_candidates: CollectionBranches::new("nPFCands", "PFCands"),
            event_image: ImageBranches::new(ImageKind::Event),
            jet_image: ImageBranches::new(ImageKind::Jet),
        }
    }
}

impl BranchNames {
    pub fn image(&self, kind: ImageKind) -> &ImageBranches {
        match kind {
            ImageKind::Event => &self.event_image,
            ImageKind::Jet => &self.jet_image,
        }
    }
}

/// What to read for each event
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Collections {
    pub jets: bool,
    /// Also read the jet raw factor
    pub jet_raw_factor: bool,
    pub gen_jets: bool,
    pub pf_candidates: bool,
    /// PF types of event images to read
    pub event_image: Vec<PfType>,
    /// PF types of jet images to read
    pub jet_image: Vec<PfType>,
}

impl Collections {
    /// Jets, generator jets, and images of the given kind
    pub fn images(kind: ImageKind, pf_types: &[PfType]) -> Self {
        let mut res = Self {
            jets: true,
            gen_jets: true,
            ..Default::default()
        };
        match kind {
            ImageKind::Event => res.event_image = pf_types.to_vec(),
            ImageKind::Jet => res.jet_image = pf_types.to_vec(),
        }
        res
    }
}

/// Assembles [Event] records from columns
#[derive(Clone, Debug, TypedBuilder)]
pub struct EventLoader {
    #[builder(default)]
    branches: BranchNames,
    collections: Collections,
}

impl EventLoader {
    /// Read all events
    pub fn load<S: ColumnSource>(
        &self,
        source: &mut S,
    ) -> Result<Vec<Event>, LoadError> {
        let mut events: Option<Vec<Event>> = None;
        let c = &self.collections;
        let b = &self.branches;
        if c.jets {
            let jets = read_jets(source, &b.jets, c.jet_raw_factor)?;
            let events = init(&mut events, &b.jets.count, jets.len())?;
            for (event, jets) in events.iter_mut().zip(jets) {
                event.jets = jets;
            }
        }
        if c.gen_jets {
            let jets = read_jets(source, &b.gen_jets, false)?;
            let events = init(&mut events, &b.gen_jets.count, jets.len())?;
            for (event, jets) in events.iter_mut().zip(jets) {
                event.gen_jets = jets;
            }
        }
        if c.pf_candidates {
            let cands = read_pf_candidates(source, &b.pf_candidates)?;
            let events =
                init(&mut events, &b.pf_candidates.count, cands.len())?;
            for (event, cands) in events.iter_mut().zip(cands) {
                event.pf_candidates = cands;
            }
        }
        for (kind, pf_types) in [
            (ImageKind::Event, &c.event_image),
            (ImageKind::Jet, &c.jet_image),
        ] {
            if pf_types.is_empty() {
                continue;
            }
            let branches = b.image(kind);
            let images = read_images(source, branches, pf_types)?;
            let events = init(&mut events, &branches.count(), images.len())?;
            for (event, image) in events.iter_mut().zip(images) {
                match kind {
                    ImageKind::Event => event.event_image = Some(image),
                    ImageKind::Jet => event.jet_image = Some(image),
                }
            }
        }
        let events = events.unwrap_or_default();
        debug!("Read {} events", events.len());
        Ok(events)
    }

    /// Read all events and keep those passing the selection
    pub fn load_selected<S: ColumnSource>(
        &self,
        source: &mut S,
        selection: &VbfSelection,
    ) -> Result<Vec<Event>, LoadError> {
        let events = self.load(source)?;
        let nall = events.len();
        let selected = selection.select(events);
        info!("{} of {nall} events pass the selection", selected.len());
        Ok(selected)
    }
}

fn init<'a>(
    events: &'a mut Option<Vec<Event>>,
    column: &str,
    nevents: usize,
) -> Result<&'a mut Vec<Event>, ColumnError> {
    let events = events.get_or_insert_with(|| vec![Event::default(); nevents]);
    check_len(column, events.len(), nevents)?;
    Ok(events)
}

fn read_jets<S: ColumnSource>(
    source: &mut S,
    branches: &CollectionBranches,
    raw_factor: bool,
) -> Result<Vec<Vec<Jet>>, ReadError> {
    let counts = source.counts(&branches.count)?;
    let mut column =
        |var: &str| source.jagged_with_counts(&branches.column(var), &counts);
    let pt = column("pt")?;
    let eta = column("eta")?;
    let phi = column("phi")?;
    let mass = column("mass")?;
    let raw = if raw_factor {
        Some(column("rawFactor")?)
    } else {
        None
    };
    let mut res = Vec::with_capacity(pt.len());
    for (i, pt) in pt.iter().enumerate() {
        let (Some(eta), Some(phi), Some(mass)) = (eta.get(i), phi.get(i), mass.get(i)) else {
            break;
        };
        let raw = raw.as_ref().and_then(|r| r.get(i));
        let jets = pt
            .iter()
            .enumerate()
            .map(|(j, &pt)| {
                let jet = Jet::new(pt, eta[j], phi[j], mass[j]);
                match raw {
                    Some(raw) => jet.with_raw_factor(raw[j]),
                    None => jet,
                }
            })
            .collect();
        res.push(jets);
    }
    Ok(res)
}

fn read_pf_candidates<S: ColumnSource>(
    source: &mut S,
    branches: &CollectionBranches,
) -> Result<Vec<Vec<PfCandidate>>, ReadError> {
    let counts = source.counts(&branches.count)?;
    let [pt, eta, phi, energy, px, py] =
        ["pt", "eta", "phi", "energy", "px", "py"].map(|var| {
            source.jagged_with_counts(&branches.column(var), &counts)
        });
    let (pt, eta, phi, energy, px, py) = (pt?, eta?, phi?, energy?, px?, py?);
    let res = (0..pt.len())
        .map(|i| {
            let [pt, eta, phi, energy, px, py] =
                [&pt, &eta, &phi, &energy, &px, &py]
                    .map(|col| col.get(i).unwrap_or_default());
            (0..pt.len())
                .map(|j| PfCandidate {
                    pt: pt[j],
                    eta: eta[j],
                    phi: phi[j],
                    energy: energy[j],
                    px: px[j],
                    py: py[j],
                })
                .collect()
        })
        .collect();
    Ok(res)
}

fn read_images<S: ColumnSource>(
    source: &mut S,
    branches: &ImageBranches,
    pf_types: &[PfType],
) -> Result<Vec<ImageData>, LoadError> {
    let n_eta_branch = branches.n_eta();
    let n_phi_branch = branches.n_phi();
    let n_eta = source.counts(&n_eta_branch)?;
    let n_phi = source.counts(&n_phi_branch)?;
    check_len(&n_phi_branch, n_eta.len(), n_phi.len())?;
    let mut images: Vec<_> = n_eta
        .into_iter()
        .zip(n_phi)
        .map(|(n_eta, n_phi)| ImageData::new(n_eta, n_phi))
        .collect();

    let counts = source.counts(&branches.count())?;
    for &pf_type in pf_types {
        let name = branches.pixels(pf_type);
        let pixels = source.jagged_with_counts(&name, &counts)?;
        check_len(&name, images.len(), pixels.len())?;
        for (image, pixels) in images.iter_mut().zip(pixels.iter()) {
            image.pixels.insert(pf_type, pixels.to_vec());
        }
    }
    debug!(
        "Read {} pixel branches for {} images",
        pf_types.len(),
        branches.kind.table()
    );
    Ok(images)
}

fn check_len(
    column: &str,
    expected: usize,
    found: usize,
) -> Result<(), ColumnError> {
    if expected == found {
        Ok(())
    } else {
        Err(ColumnError::NumEvents {
            column: column.to_owned(),
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn jets() -> Vec<Vec<Jet>> {
        vec![
            vec![
                Jet::new(120., 1.5, 0.3, 10.),
                Jet::new(60., -2., -1., 8.),
            ],
            vec![Jet::new(200., 0., 0., 20.)],
            vec![
                Jet::new(81., 2.5, 3., 5.),
                Jet::new(41., -2.5, -3., 5.),
                Jet::new(20., 0.1, 0.2, 2.),
            ],
        ]
    }

    fn source() -> MemorySource {
        let branches = BranchNames::default();
        let gen = vec![vec![Jet::new(118., 1.5, 0.35, 9.)], vec![], vec![]];
        MemorySource::new()
            .with_jets(&branches.jets, &jets())
            .with_jets(&branches.gen_jets, &gen)
            .with_scalars("EventImageSize_nEtaBins", vec![2.; 3])
            .with_scalars("EventImageSize_nPhiBins", vec![3.; 3])
            .with_jagged(
                "nEventImage",
                "EventImage_pixels",
                (0..3).map(|i| vec![i as f64; 6]).collect(),
            )
    }

    #[test]
    fn load_all() {
        log_init();

        let loader = EventLoader::builder()
            .collections(Collections::images(ImageKind::Event, &[PfType::All]))
            .build();
        let events = loader.load(&mut source()).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].jets, jets()[0]);
        assert_eq!(events[0].gen_jets.len(), 1);
        assert!(events[1].gen_jets.is_empty());
        let data = events[2].event_image.as_ref().unwrap();
        assert_eq!(data.shape(), (2, 3));
        let image = data.image(PfType::All).unwrap().unwrap();
        assert_eq!(image.as_slice(), [2.; 6]);
        assert!(events[2].jet_image.is_none());
    }

    #[test]
    fn load_with_selection() {
        log_init();

        let loader = EventLoader::builder()
            .collections(Collections::images(ImageKind::Event, &[PfType::All]))
            .build();
        let events = loader
            .load_selected(&mut source(), &VbfSelection::default())
            .unwrap();
        assert_eq!(events.len(), 2);
        // images stay with their events
        let image = events[1].event_image.as_ref().unwrap();
        assert_eq!(image.pixels[&PfType::All], [2.; 6]);
        assert_eq!(events[1].jets.len(), 3);
    }

    /// Records how often each scalar column is read
    struct CountingSource {
        inner: MemorySource,
        reads: HashMap<String, usize>,
    }

    impl ColumnSource for CountingSource {
        fn has(&self, name: &str) -> bool {
            self.inner.has(name)
        }

        fn scalars(&mut self, name: &str) -> Result<Vec<f64>, ReadError> {
            *self.reads.entry(name.to_owned()).or_default() += 1;
            self.inner.scalars(name)
        }

        fn jagged_with_counts(
            &mut self,
            name: &str,
            counts: &[usize],
        ) -> Result<Jagged<f64>, ReadError> {
            self.inner.jagged_with_counts(name, counts)
        }
    }

    #[test]
    fn count_columns_read_once() {
        log_init();

        let mut source = CountingSource {
            inner: source(),
            reads: HashMap::new(),
        };
        let loader = EventLoader::builder()
            .collections(Collections {
                jet_raw_factor: true,
                ..Collections::images(ImageKind::Event, &[PfType::All])
            })
            .build();
        let events = loader.load(&mut source).unwrap();
        assert_eq!(events.len(), 3);
        for count in ["nJet", "nGenJet", "nEventImage"] {
            assert_eq!(source.reads[count], 1, "{count}");
        }
    }

    #[test]
    fn missing_branch() {
        log_init();

        let loader = EventLoader::builder()
            .collections(Collections::images(
                ImageKind::Event,
                &[PfType::HFEM],
            ))
            .build();
        let err = loader.load(&mut source()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Read(ReadError::MissingBranch(ref b))
                if b == "EventImage_HFEMPixels"
        ));
    }

    #[test]
    fn inconsistent_number_of_events() {
        log_init();

        let branches = BranchNames::default();
        let mut source = source()
            .with_jets(&branches.gen_jets, &[vec![], vec![]]);
        let loader = EventLoader::builder()
            .collections(Collections::images(ImageKind::Event, &[]))
            .build();
        assert!(matches!(
            loader.load(&mut source),
            Err(LoadError::Column(ColumnError::NumEvents { .. }))
        ));
    }

    #[test]
    fn pf_candidates_and_raw_factor() {
        log_init();

        let branches = BranchNames::default();
        let jets = vec![vec![Jet::new(100., 0., 0., 1.).with_raw_factor(0.1)]];
        let cands = vec![vec![
            PfCandidate {
                pt: 3.,
                eta: 0.1,
                phi: 0.1,
                energy: 3.1,
                px: 3.,
                py: 0.,
            },
            PfCandidate {
                pt: 4.,
                eta: -0.1,
                phi: 1.6,
                energy: 4.2,
                px: 0.,
                py: 4.,
            },
        ]];
        let mut source = MemorySource::new()
            .with_jets(&branches.jets, &jets)
            .with_pf_candidates(&branches.pf_candidates, &cands);
        let collections = Collections {
            jets: true,
            jet_raw_factor: true,
            pf_candidates: true,
            ..Default::default()
        };
        let events = EventLoader::builder()
            .collections(collections)
            .build()
            .load(&mut source)
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].jets, jets[0]);
        assert_eq!(events[0].pf_candidates, cands[0]);
    }

    #[test]
    fn custom_pixel_branch() {
        let mut branches = ImageBranches::new(ImageKind::Jet);
        assert_eq!(branches.count(), "nJetImage");
        assert_eq!(branches.n_eta(), "JetImageSize_nEtaBins");
        assert_eq!(branches.pixels(PfType::All), "JetImage_pixels");
        branches
            .pixels
            .insert(PfType::All, "JetImage_pixelsAfterPUPPI".to_owned());
        assert_eq!(branches.pixels(PfType::All), "JetImage_pixelsAfterPUPPI");
    }

    #[test]
    fn counts() {
        let mut source = MemorySource::new()
            .with_scalars("nJet", vec![0., 3.])
            .with_scalars("bad", vec![1.5]);
        assert_eq!(source.counts("nJet").unwrap(), [0, 3]);
        assert!(matches!(
            source.counts("bad"),
            Err(ReadError::InvalidCount { .. })
        ));
    }
}

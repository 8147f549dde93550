use std::path::PathBuf;

use log::{debug, info};
use thiserror::Error;
use typed_builder::TypedBuilder;

use crate::{
    config::ColourScale,
    event::{Event, ImageKind, PfType},
    image::ShapeError,
    matching::Matcher,
    output::ensure_dir,
    plot::{save, ColourMesh, ColourNorm, CornerTexts, JetOverlay, PlotError, PlotFormat},
    progress_bar::{Progress, ProgressBar},
};

/// Default number of events to plot
pub const DEFAULT_NUM_PLOTS: usize = 5;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Event {event} has no {kind:?} image")]
    MissingImage { event: usize, kind: ImageKind },
    #[error("Event {event} has no image for PF type {pf_type}")]
    MissingPfType { event: usize, pf_type: PfType },
    #[error("Malformed image in event {event}: {err}")]
    Shape {
        event: usize,
        #[source]
        err: ShapeError,
    },
    #[error("Failed to create output directory: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Plot(#[from] PlotError),
}

/// Plot one image per event and PF type with the event's jets
#[derive(Clone, Debug, TypedBuilder)]
pub struct EventImageJob {
    kind: ImageKind,
    #[builder(default = vec![PfType::All])]
    pf_types: Vec<PfType>,
    #[builder(default = DEFAULT_NUM_PLOTS)]
    numevents: usize,
    /// Split jets into generator-matched and unmatched ones
    #[builder(default = true)]
    gen_cleaning: bool,
    #[builder(default)]
    matcher: Matcher,
    #[builder(default)]
    colour_scale: ColourScale,
    /// Prefix of the output file names
    #[builder(setter(into))]
    dataset: String,
    #[builder(default, setter(into))]
    title: Option<String>,
    #[builder(setter(into))]
    outdir: PathBuf,
    #[builder(default)]
    format: PlotFormat,
}

impl EventImageJob {
    /// PF types that are actually plotted
    ///
    /// Jet images only exist for all candidates combined.
    pub fn pf_types(&self) -> Vec<PfType> {
        match self.kind {
            ImageKind::Event => self.pf_types.clone(),
            ImageKind::Jet => vec![PfType::All],
        }
    }

    /// Jets to draw on top of the image of an event
    pub fn overlay(&self, event: &Event) -> JetOverlay {
        let (matched, unmatched) = if self.gen_cleaning {
            self.matcher.partition(&event.jets, &event.gen_jets)
        } else {
            (event.jets.clone(), Vec::new())
        };
        JetOverlay {
            matched,
            unmatched,
            radius: self.matcher.cut(),
        }
    }

    /// Plot the first events, returns the written files
    ///
    /// Stops early if there are fewer events than requested.
    pub fn run(&self, events: &[Event]) -> Result<Vec<PathBuf>, JobError> {
        let outdir = ensure_dir(&self.outdir)?;
        let pf_types = self.pf_types();
        let norm = ColourNorm::Log {
            vmin: self.colour_scale.vmin,
            vmax: self.colour_scale.vmax,
        };
        let mut written = Vec::new();
        let progress = ProgressBar::new(self.numevents as u64, "Plotting:");
        for ievent in 0..self.numevents {
            let Some(event) = events.get(ievent) else {
                progress.finish();
                info!("At the end of file: finishing job");
                info!("Processed {ievent} events");
                return Ok(written);
            };
            let data = event.image_data(self.kind).ok_or(
                JobError::MissingImage {
                    event: ievent,
                    kind: self.kind,
                },
            )?;
            let overlay = self.overlay(event);
            for &pf_type in &pf_types {
                let image = data
                    .image(pf_type)
                    .ok_or(JobError::MissingPfType {
                        event: ievent,
                        pf_type,
                    })?
                    .map_err(|err| JobError::Shape { event: ievent, err })?;
                let corner_texts = CornerTexts {
                    top_left: Some(format!("ievent={ievent}")),
                    top_right: Some(pf_type.to_string()),
                    bottom_right: None,
                };
                let mesh = ColourMesh::builder()
                    .image(&image)
                    .norm(norm)
                    .colourbar_label("PF Energy (GeV)")
                    .title(self.title.clone())
                    .corner_texts(corner_texts)
                    .jets(overlay.clone())
                    .build();
                let name = format!("{}_ievent_{ievent}_{pf_type}", self.dataset);
                let path = save(&mesh, outdir.join(name), self.format)?;
                debug!("Wrote {path:?}");
                written.push(path);
            }
            progress.inc(1);
        }
        progress.finish();
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event::ImageData, jet::Jet};

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn event() -> Event {
        Event {
            jets: vec![
                Jet::new(100., 1., 1., 10.),
                Jet::new(50., -2., -2., 10.),
            ],
            gen_jets: vec![Jet::new(98., 1.1, 1.05, 10.)],
            event_image: Some(
                ImageData::new(2, 2).with_pixels(PfType::All, vec![1.; 4]),
            ),
            ..Default::default()
        }
    }

    fn job(outdir: PathBuf) -> EventImageJob {
        EventImageJob::builder()
            .kind(ImageKind::Event)
            .dataset("test")
            .outdir(outdir)
            .build()
    }

    #[test]
    fn gen_cleaning() {
        let tmp = tempfile::tempdir().unwrap();
        let job = job(tmp.path().to_owned());
        let overlay = job.overlay(&event());
        assert_eq!(overlay.matched, [event().jets[0]]);
        assert_eq!(overlay.unmatched, [event().jets[1]]);
        assert_eq!(overlay.radius, 0.4);

        let no_cleaning = EventImageJob::builder()
            .kind(ImageKind::Event)
            .gen_cleaning(false)
            .dataset("test")
            .outdir(tmp.path())
            .build();
        let overlay = no_cleaning.overlay(&event());
        assert_eq!(overlay.matched, event().jets);
        assert!(overlay.unmatched.is_empty());
    }

    #[test]
    fn jet_images_only_for_all() {
        let job = EventImageJob::builder()
            .kind(ImageKind::Jet)
            .pf_types(vec![PfType::HFEM, PfType::ChargedHadron])
            .dataset("test")
            .outdir("out")
            .build();
        assert_eq!(job.pf_types(), [PfType::All]);
    }

    #[test]
    fn missing_data() {
        log_init();

        let tmp = tempfile::tempdir().unwrap();
        let job = job(tmp.path().to_owned());
        let no_image = Event::default();
        assert!(matches!(
            job.run(&[no_image]),
            Err(JobError::MissingImage { event: 0, .. })
        ));

        let mut bad = event();
        bad.event_image = Some(ImageData::new(3, 3).with_pixels(PfType::All, vec![1.; 4]));
        assert!(matches!(
            job.run(&[bad]),
            Err(JobError::Shape { event: 0, .. })
        ));
    }

    #[test]
    fn no_events() {
        log_init();

        let tmp = tempfile::tempdir().unwrap();
        let written = job(tmp.path().join("images")).run(&[]).unwrap();
        assert!(written.is_empty());
        assert!(tmp.path().join("images").is_dir());
    }
}

mod opt_common;
mod opt_ratio;

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use jetimages::{
    config::Config,
    event::{Event, ImageData, ImageKind, PfType},
    image::Image,
    output::{default_tag, ensure_dir, OutputDir},
    plot::{save, ColourMesh, ColourNorm, CornerTexts},
    reader::{Collections, EventLoader},
};
use log::{debug, info, warn};
use strum::IntoEnumIterator;

use crate::opt_common::{open_input, parse_args};
use crate::opt_ratio::Opt;

fn load(infile: &Path, config: &Config) -> Result<Vec<Event>> {
    let pf_types: Vec<_> = PfType::iter().collect();
    let mut source = open_input(infile)?;
    EventLoader::builder()
        .branches(config.branches.clone())
        .collections(Collections::images(ImageKind::Event, &pf_types))
        .build()
        .load_selected(&mut source, &config.selection)
        .with_context(|| format!("Failed to load events from {infile:?}"))
}

fn event_image(events: &[Event], ievent: usize) -> Result<&ImageData> {
    events
        .get(ievent)
        .and_then(|ev| ev.event_image.as_ref())
        .ok_or_else(|| anyhow!("No event image for event {ievent}"))
}

/// Check that the images of all events have the same dimensions
fn check_sizes(num: &[Event], den: &[Event]) -> Result<()> {
    if num.len() != den.len() {
        warn!(
            "Different numbers of selected events: {} vs {}",
            num.len(),
            den.len()
        );
    }
    for ievent in 0..num.len().min(den.len()) {
        let num = event_image(num, ievent)?.shape();
        let den = event_image(den, ievent)?.shape();
        if num != den {
            bail!("Image sizes differ in event {ievent}: {num:?} vs {den:?}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let opt: Opt = parse_args()?;
    opt.common.init("jetimages-ratio");
    debug!("settings: {:#?}", opt);
    let config = opt.common.config()?;

    let num = load(&opt.infile1, &config)?;
    let den = load(&opt.infile2, &config)?;
    check_sizes(&num, &den)?;

    let ievent = opt.ievent;
    let num = event_image(&num, ievent)?;
    let den = event_image(&den, ievent)?;

    let tag = opt.tag.clone().unwrap_or_else(|| default_tag("ratio_run"));
    let outdir = ensure_dir(OutputDir::new(&tag).images(ImageKind::Event))
        .context("Failed to create output directory")?;
    for pf_type in PfType::iter() {
        let image = |data: &ImageData| -> Result<Image> {
            data.image(pf_type)
                .ok_or_else(|| anyhow!("No {pf_type} image in event {ievent}"))?
                .with_context(|| format!("Malformed {pf_type} image in event {ievent}"))
        };
        let ratio = image(num)?.ratio(&image(den)?)?;
        let nonfinite = ratio.as_slice().iter().filter(|r| !r.is_finite()).count();
        if nonfinite > 0 {
            debug!("{nonfinite} pixels without finite {pf_type} ratio");
        }
        let mesh = ColourMesh::builder()
            .image(&ratio)
            .norm(ColourNorm::linear_over(ratio.as_slice()))
            .colourbar_label("Ratio of PF Energies")
            .corner_texts(CornerTexts {
                top_left: Some(format!("ievent={ievent}")),
                top_right: Some(pf_type.to_string()),
                bottom_right: None,
            })
            .build();
        let name = format!("ievent_{ievent}_ratio_{pf_type}");
        let path = save(&mesh, outdir.join(name), opt.common.format)?;
        info!("Wrote {path:?}");
    }
    Ok(())
}

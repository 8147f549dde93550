mod opt_common;
mod opt_accumulate;

use anyhow::{anyhow, Context, Result};
use jetimages::{
    accumulate::accumulate,
    dataset::{dataset_name, label_for},
    event::{ImageKind, PfType},
    image::Image,
    output::{default_tag, ensure_dir, OutputDir},
    plot::{save, ColourMesh, ColourNorm, CornerTexts},
    reader::{Collections, EventLoader},
};
use log::{debug, info};

use crate::opt_common::{open_input, parse_args};
use crate::opt_accumulate::Opt;

fn main() -> Result<()> {
    let opt: Opt = parse_args()?;
    opt.common.init("jetimages-accumulate");
    debug!("settings: {:#?}", opt);
    let config = opt.common.config()?;

    let mut source = open_input(&opt.infile)?;
    let events = EventLoader::builder()
        .branches(config.branches.clone())
        .collections(Collections::images(ImageKind::Event, &[PfType::All]))
        .build()
        .load_selected(&mut source, &config.selection)
        .with_context(|| format!("Failed to load events from {:?}", opt.infile))?;

    let images = events
        .iter()
        .take(opt.numevents)
        .enumerate()
        .map(|(ievent, event)| -> Result<Image> {
            event
                .event_image
                .as_ref()
                .and_then(|data| data.image(PfType::All))
                .ok_or_else(|| anyhow!("Event {ievent} has no event image"))?
                .with_context(|| format!("Malformed image in event {ievent}"))
        })
        .collect::<Result<Vec<_>>>()?;
    let acc = accumulate(&images, opt.numevents)?;

    let dataset = dataset_name(&opt.infile);
    let title = label_for(&opt.infile).unwrap_or_else(|| dataset.clone());
    let mesh = ColourMesh::builder()
        .image(&acc.image)
        .norm(ColourNorm::Log {
            vmin: config.colour_scale.vmin,
            vmax: config.colour_scale.vmax,
        })
        .colourbar_label("PF Energy (GeV)")
        .title(title)
        .corner_texts(CornerTexts {
            bottom_right: Some(format!("{} events", acc.nevents)),
            ..Default::default()
        })
        .build();

    let tag = opt.tag.clone().unwrap_or_else(|| default_tag("accumulated_run"));
    let outdir = ensure_dir(OutputDir::new(&tag).images(ImageKind::Event))
        .context("Failed to create output directory")?;
    let path = save(&mesh, outdir.join(format!("accumulated_{dataset}")), opt.common.format)?;
    info!("Wrote {path:?}");
    Ok(())
}

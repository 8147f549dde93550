mod opt_common;
mod opt_plot;

use anyhow::{Context, Result};
use jetimages::{
    dataset::{dataset_name, label_for},
    event::{ImageKind, PfType},
    job::EventImageJob,
    matching::Matcher,
    output::{default_tag, ensure_dir, OutputDir},
    provenance::{file_hash, write_version_file},
    reader::{Collections, EventLoader},
};
use log::{debug, info};

use crate::opt_common::{open_input, parse_args};
use crate::opt_plot::Opt;

fn main() -> Result<()> {
    let opt: Opt = parse_args()?;
    opt.common.init("jetimages-plot");
    debug!("settings: {:#?}", opt);
    let config = opt.common.config()?;

    let tag = opt.tag.clone().unwrap_or_else(|| default_tag("run"));
    let outdir = OutputDir::new(&tag);
    let hash = file_hash(&opt.infile)
        .with_context(|| format!("Failed to compute hash of {:?}", opt.infile))?;
    info!("Input file hash: {hash}");
    let version_file = ensure_dir(outdir.path())
        .and_then(|dir| write_version_file(dir, &hash))
        .context("Failed to write version file")?;
    debug!("Wrote {version_file:?}");

    let kind = ImageKind::from_jets_only(opt.jets_only);
    let pf_types = if opt.jets_only {
        vec![PfType::All]
    } else {
        opt.pf_types.clone()
    };
    let mut source = open_input(&opt.infile)?;
    let events = EventLoader::builder()
        .branches(config.branches.clone())
        .collections(Collections::images(kind, &pf_types))
        .build()
        .load_selected(&mut source, &config.selection)
        .with_context(|| format!("Failed to load events from {:?}", opt.infile))?;

    let dataset = dataset_name(&opt.infile);
    let title = label_for(&opt.infile);
    if title.is_none() {
        debug!("No label for dataset {dataset}");
    }
    let job = EventImageJob::builder()
        .kind(kind)
        .pf_types(pf_types)
        .numevents(opt.numevents)
        .gen_cleaning(!opt.no_gen_cleaning)
        .matcher(Matcher::new(config.delta_r_cut))
        .colour_scale(config.colour_scale)
        .dataset(dataset)
        .title(title)
        .outdir(outdir.images(kind))
        .format(opt.common.format)
        .build();
    let written = job.run(&events)?;
    info!("Wrote {} plots to {:?}", written.len(), outdir.images(kind));
    Ok(())
}

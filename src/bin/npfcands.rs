mod opt_common;
mod opt_npfcands;

use std::path::Path;

use anyhow::{Context, Result};
use jetimages::{
    dataset::nano_dataset_name,
    histogram::{arange, Histogram},
    output::{ensure_dir, OUTPUT_ROOT},
    plot::{save, StepHistogram},
    reader::ColumnSource,
};
use log::{debug, info};

use crate::opt_common::{open_input, parse_args};
use crate::opt_npfcands::Opt;

fn main() -> Result<()> {
    let opt: Opt = parse_args()?;
    opt.common.init("jetimages-npfcands");
    debug!("settings: {:#?}", opt);
    let config = opt.common.config()?;

    let branch = &config.branches.pf_candidates.count;
    let mut source = open_input(&opt.infile)?;
    let npfcands = source
        .counts(branch)
        .with_context(|| format!("Failed to read {branch} from {:?}", opt.infile))?;
    info!("Read {} events", npfcands.len());

    let hist = Histogram::with_values(
        arange(0., 200., 5.),
        npfcands.into_iter().map(|n| n as f64),
    )?;
    debug!("{} of the events are inside the histogram range", hist.total());
    let plot = StepHistogram::builder()
        .hist(&hist)
        .x_label("Number of PF Candidates")
        .build();

    let outdir = ensure_dir(Path::new(OUTPUT_ROOT))
        .context("Failed to create output directory")?;
    let name = format!("{}_num_pf_cands", nano_dataset_name(&opt.infile));
    let path = save(&plot, outdir.join(name), opt.common.format)?;
    info!("Wrote {path:?}");
    Ok(())
}

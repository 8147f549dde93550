use std::path::PathBuf;

use clap::Parser;
use jetimages::{event::PfType, job::DEFAULT_NUM_PLOTS};

use crate::opt_common::CommonOpt;

/// Plot event or jet images of single events with their jets
#[derive(Debug, Parser)]
#[clap(about, author, version)]
pub(crate) struct Opt {
    /// Input NanoAOD file
    #[clap(name = "INFILE", value_parser)]
    pub(crate) infile: PathBuf,

    /// Tag of the output directory, defaults to `<date>_run`
    #[clap(long, short)]
    pub(crate) tag: Option<String>,

    /// Number of events to plot
    #[clap(long, short, default_value_t = DEFAULT_NUM_PLOTS)]
    pub(crate) numevents: usize,

    /// Plot images of PF candidates inside jets instead of the whole event
    #[clap(long, alias = "jetsOnly")]
    pub(crate) jets_only: bool,

    /// PF candidate types to plot
    ///
    /// Ignored for jet-based images, which only exist for all candidates.
    #[clap(long, value_delimiter = ',', default_value = "all")]
    pub(crate) pf_types: Vec<PfType>,

    /// Draw all jets without matching them to generator-level jets
    #[clap(long)]
    pub(crate) no_gen_cleaning: bool,

    #[clap(flatten)]
    pub(crate) common: CommonOpt,
}

use std::path::PathBuf;

use clap::Parser;
use jetimages::accumulate::DEFAULT_NUM_EVENTS;

use crate::opt_common::CommonOpt;

/// Plot the average event image of the first events
#[derive(Debug, Parser)]
#[clap(about, author, version)]
pub(crate) struct Opt {
    /// Input NanoAOD file
    #[clap(name = "INFILE", value_parser)]
    pub(crate) infile: PathBuf,

    /// Tag of the output directory, defaults to `<date>_accumulated_run`
    #[clap(long, short)]
    pub(crate) tag: Option<String>,

    /// Number of events to accumulate
    #[clap(long, short, default_value_t = DEFAULT_NUM_EVENTS)]
    pub(crate) numevents: usize,

    #[clap(flatten)]
    pub(crate) common: CommonOpt,
}

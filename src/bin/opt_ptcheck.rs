use std::path::PathBuf;

use clap::Parser;

use crate::opt_common::CommonOpt;

/// Compare jet transverse momenta with the sum over their PF candidates
///
/// Only jets matched to generator-level jets are considered. Output is
/// written to `output/<input directory>/ptcheck`.
#[derive(Debug, Parser)]
#[clap(about, author, version)]
pub(crate) struct Opt {
    /// Input NanoAOD file
    #[clap(name = "INFILE", value_parser)]
    pub(crate) infile: PathBuf,

    /// Number of events to check
    #[clap(long, short, default_value_t = 10)]
    pub(crate) numevents: usize,

    #[clap(flatten)]
    pub(crate) common: CommonOpt,
}

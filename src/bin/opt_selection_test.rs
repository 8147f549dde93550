use std::path::PathBuf;

use clap::Parser;

use crate::opt_common::CommonOpt;

/// Control plots of the two leading jets
///
/// Only events with at least two jets are considered, no further
/// selection is applied.
#[derive(Debug, Parser)]
#[clap(about, author, version)]
pub(crate) struct Opt {
    /// Input NanoAOD file
    #[clap(name = "INFILE", value_parser)]
    pub(crate) infile: PathBuf,

    #[clap(flatten)]
    pub(crate) common: CommonOpt,
}

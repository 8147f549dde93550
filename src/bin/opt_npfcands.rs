use std::path::PathBuf;

use clap::Parser;

use crate::opt_common::CommonOpt;

/// Plot the distribution of the number of PF candidates per event
#[derive(Debug, Parser)]
#[clap(about, author, version)]
pub(crate) struct Opt {
    /// Input NanoAOD file `nano_<dataset>.root`
    #[clap(name = "INFILE", value_parser)]
    pub(crate) infile: PathBuf,

    #[clap(flatten)]
    pub(crate) common: CommonOpt,
}

use std::path::PathBuf;

use clap::Parser;

use crate::opt_common::CommonOpt;

/// Plot the ratio of the event images in two files
///
/// Both files have to contain the same events, e.g. processed with
/// different cleaning cuts.
#[derive(Debug, Parser)]
#[clap(about, author, version)]
pub(crate) struct Opt {
    /// Input NanoAOD file with the numerator images
    #[clap(name = "INFILE1", value_parser)]
    pub(crate) infile1: PathBuf,

    /// Input NanoAOD file with the denominator images
    #[clap(name = "INFILE2", value_parser)]
    pub(crate) infile2: PathBuf,

    /// Tag of the output directory, defaults to `<date>_ratio_run`
    #[clap(long, short)]
    pub(crate) tag: Option<String>,

    /// Number of the event to look at
    #[clap(long, short, default_value_t = 0)]
    pub(crate) ievent: usize,

    #[clap(flatten)]
    pub(crate) common: CommonOpt,
}

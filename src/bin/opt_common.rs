use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use jetimages::{
    config::Config, plot::PlotFormat, reader::RootSource, GIT_BRANCH, GIT_REV,
    VERSION,
};
use log::{debug, info};

/// Options shared by all binaries
#[derive(Debug, Parser)]
pub(crate) struct CommonOpt {
    /// Configuration file with branch names, cuts, and colour ranges
    #[clap(long, short, value_parser)]
    pub(crate) config: Option<PathBuf>,

    /// Output format of the plots
    #[clap(long, value_enum, default_value_t)]
    pub(crate) format: PlotFormat,

    /// Verbosity level
    #[clap(
        short,
        long,
        default_value = "Info",
        help = "Verbosity level.
Possible values with increasing amount of output are
'off', 'error', 'warn', 'info', 'debug', 'trace'.\n"
    )]
    pub(crate) loglevel: String,
}

impl CommonOpt {
    /// Set up logging and announce the program version
    pub(crate) fn init(&self, name: &str) {
        let env = Env::default().filter_or("JETIMAGES_LOG", &self.loglevel);
        env_logger::init_from_env(env);

        if let (Some(rev), Some(branch)) = (GIT_REV, GIT_BRANCH) {
            info!("{name} {VERSION} rev {rev} ({branch})");
        } else {
            info!("{name} {VERSION}");
        }
    }

    /// The configuration file contents, or the defaults
    pub(crate) fn config(&self) -> Result<Config> {
        let Some(path) = self.config.as_ref() else {
            return Ok(Config::default());
        };
        info!("Reading configuration from {path:?}");
        let config = Config::from_file(path).with_context(|| {
            format!("Failed to read configuration file {path:?}")
        })?;
        debug!("configuration: {config:#?}");
        Ok(config)
    }
}

/// Parse the command line, expanding `@file` arguments
pub(crate) fn parse_args<T: Parser>() -> Result<T> {
    let args = argfile::expand_args_from(
        std::env::args_os(),
        argfile::parse_fromfile,
        argfile::PREFIX,
    )
    .with_context(|| "Failed to read argument file")?;
    Ok(T::parse_from(args))
}

pub(crate) fn open_input(path: &Path) -> Result<RootSource> {
    info!("Reading events from {path:?}");
    RootSource::open(path)
        .with_context(|| format!("Failed to read {path:?} as ROOT file"))
}

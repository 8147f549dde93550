use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::Local;
use log::debug;

use crate::event::ImageKind;

/// Default root of all output
pub const OUTPUT_ROOT: &str = "output";

/// Tag of the form `YYYY-MM-DD_<suffix>` for the current day
pub fn default_tag(suffix: &str) -> String {
    format!("{}_{suffix}", Local::now().format("%Y-%m-%d"))
}

/// Directory tree `<root>/<tag>` for the output of one run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputDir {
    dir: PathBuf,
}

impl OutputDir {
    /// `./output/<tag>`
    pub fn new(tag: &str) -> Self {
        Self::with_root(OUTPUT_ROOT, tag)
    }

    pub fn with_root<P: AsRef<Path>>(root: P, tag: &str) -> Self {
        Self {
            dir: root.as_ref().join(tag),
        }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Directory for images of the given kind
    pub fn images(&self, kind: ImageKind) -> PathBuf {
        self.dir.join(kind.output_dir())
    }

    /// Directory for pt checks, optionally for a specific input version
    pub fn ptcheck(&self, version: Option<&str>) -> PathBuf {
        let dir = self.dir.join("ptcheck");
        match version {
            Some(version) => dir.join(version),
            None => dir,
        }
    }
}

/// Create a directory including its parents and return it
pub fn ensure_dir<P: AsRef<Path>>(dir: P) -> Result<PathBuf, io::Error> {
    let dir = dir.as_ref();
    if !dir.exists() {
        debug!("Creating output directory {dir:?}");
        fs::create_dir_all(dir)?;
    }
    Ok(dir.to_owned())
}

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    matching::DEFAULT_DELTA_R_CUT, reader::BranchNames,
    selection::VbfSelection,
};

/// Colour range for energy maps
#[derive(Deserialize, Serialize, Copy, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ColourScale {
    pub vmin: f64,
    pub vmax: f64,
}

impl Default for ColourScale {
    fn default() -> Self {
        Self {
            vmin: 0.1,
            vmax: 1e3,
        }
    }
}

/// Run configuration
///
/// All settings are optional in the configuration file.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub branches: BranchNames,
    pub selection: VbfSelection,
    /// Cone radius for matching jets to generator jets
    pub delta_r_cut: f64,
    pub colour_scale: ColourScale,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            branches: Default::default(),
            selection: Default::default(),
            delta_r_cut: DEFAULT_DELTA_R_CUT,
            colour_scale: Default::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to open configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = BufReader::new(File::open(path)?);
        Ok(serde_yaml::from_reader(file)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PfType;

    #[test]
    fn defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.delta_r_cut, 0.4);
        assert_eq!(config.selection.leading_pt_min, 80.);
        assert_eq!(config.branches.jets.count, "nJet");
    }

    #[test]
    fn partial() {
        let yaml = r#"
selection:
  leading_pt_min: 100
delta_r_cut: 0.2
branches:
  event_image:
    kind: Event
    pixels:
      all: EventImage_pixelsAfterPUPPI
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.selection.leading_pt_min, 100.);
        assert_eq!(config.selection.trailing_pt_min, 40.);
        assert_eq!(config.delta_r_cut, 0.2);
        assert_eq!(
            config.branches.event_image.pixels(PfType::All),
            "EventImage_pixelsAfterPUPPI"
        );
        assert_eq!(
            config.branches.event_image.pixels(PfType::HFEM),
            "EventImage_HFEMPixels"
        );
        assert_eq!(config.branches.jet_image, BranchNames::default().jet_image);
    }

    #[test]
    fn from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "colour_scale:\n  vmax: 100\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.colour_scale.vmin, 0.1);
        assert_eq!(config.colour_scale.vmax, 100.);
        assert!(Config::from_file(dir.path().join("missing")).is_err());
    }
}

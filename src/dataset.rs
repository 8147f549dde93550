use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VERSION_RE: Regex = Regex::new(r"v\d").unwrap();
    static ref DEFAULT_LABELS: DatasetLabels = DatasetLabels::default();
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Dataset name from an input file name
///
/// The `.root` suffix and the first `_`-separated token are removed,
/// e.g. `tree_VBF_HToInvisible_M125.root` gives `VBF_HToInvisible_M125`.
pub fn dataset_name<P: AsRef<Path>>(path: P) -> String {
    let name = file_name(path.as_ref()).replace(".root", "");
    name.split('_').skip(1).collect::<Vec<_>>().join("_")
}

/// Dataset name from a NanoAOD file name `nano_<dataset>.root`
pub fn nano_dataset_name<P: AsRef<Path>>(path: P) -> String {
    file_name(path.as_ref())
        .replace("nano_", "")
        .replace(".root", "")
}

/// First version tag `v<digit>` in the file name
pub fn version_tag<P: AsRef<Path>>(path: P) -> Option<String> {
    let name = file_name(path.as_ref());
    VERSION_RE.find(&name).map(|m| m.as_str().to_owned())
}

/// Default label for the dataset of an input file
pub fn label_for<P: AsRef<Path>>(path: P) -> Option<String> {
    DEFAULT_LABELS
        .label(&dataset_name(path))
        .map(str::to_owned)
}

/// Human-readable labels for datasets
///
/// Patterns are tried in order and have to match at the start of the
/// dataset name. The first matching pattern determines the label.
#[derive(Clone, Debug)]
pub struct DatasetLabels {
    labels: Vec<(Regex, String)>,
}

impl Default for DatasetLabels {
    fn default() -> Self {
        const DEFAULT: [(&str, &str); 3] = [
            (r"Z(\d)JetsToNuNu.*Pt.*FXFX.*", "QCD Z(νν)"),
            (r"EWKZ2Jets.*ZToNuNu.*", "EWK Z(νν)"),
            (r"VBF_HToInv.*M125.*", "VBF H(inv)"),
        ];
        let mut labels = Self::new();
        for (pattern, label) in DEFAULT {
            labels = labels.with(pattern, label).unwrap();
        }
        labels
    }
}

impl DatasetLabels {
    /// No labels at all
    pub fn new() -> Self {
        Self { labels: Vec::new() }
    }

    /// Append a pattern with lower priority than all previous ones
    pub fn with(
        mut self,
        pattern: &str,
        label: &str,
    ) -> Result<Self, regex::Error> {
        let re = Regex::new(&format!("^(?:{pattern})"))?;
        self.labels.push((re, label.to_owned()));
        Ok(self)
    }

    /// Label of the first pattern matching the dataset name
    pub fn label(&self, dataset: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(re, _)| re.is_match(dataset))
            .map(|(_, label)| label.as_str())
    }
}

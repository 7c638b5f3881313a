use crate::config::RoutingConfig;
use crate::i18n::path_has_prefix;

/// Static paths that never receive a locale prefix or an auth check.
///
/// All checks are plain string comparisons; the order of the lists does not matter.
#[derive(Debug, Clone, Default)]
pub struct PublicPaths {
    files: Vec<String>,
    dirs: Vec<String>,
    markers: Vec<String>,
}

impl PublicPaths {
    pub fn new(files: Vec<String>, dirs: Vec<String>, markers: Vec<String>) -> Self {
        Self { files, dirs, markers }
    }

    pub fn from_config(cfg: &RoutingConfig) -> Self {
        Self::new(cfg.public_files.clone(), cfg.public_dirs.clone(), cfg.internal_markers.clone())
    }

    pub fn matches(&self, path: &str) -> bool {
        self.files.iter().any(|f| f == path)
            || self.dirs.iter().any(|d| path_has_prefix(path, d))
            || self.markers.iter().any(|m| path.contains(m.as_str()))
    }
}

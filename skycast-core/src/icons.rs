use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codes::{CANONICAL_CODES, DEFAULT_ICON_ASSET, icon_asset};

/// Icon files found on disk, keyed by condition code.
///
/// Codes whose asset is missing fall back to `default.png`; if that is
/// missing too the lookup yields nothing and the caller shows no icon.
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    by_code: HashMap<i32, PathBuf>,
    fallback: Option<PathBuf>,
}

impl IconSet {
    pub fn load(dir: &Path) -> Self {
        let existing = |file: &str| {
            let path = dir.join(file);
            path.is_file().then_some(path)
        };

        let by_code: HashMap<_, _> = CANONICAL_CODES
            .iter()
            .filter_map(|&code| icon_asset(code).and_then(existing).map(|p| (code, p)))
            .collect();
        let fallback = existing(DEFAULT_ICON_ASSET);

        debug!(dir = %dir.display(), icons = by_code.len(), fallback = fallback.is_some(), "icons loaded");
        Self { by_code, fallback }
    }

    pub fn icon_for(&self, code: Option<i32>) -> Option<&Path> {
        code.and_then(|c| self.by_code.get(&c))
            .or(self.fallback.as_ref())
            .map(PathBuf::as_path)
    }
}

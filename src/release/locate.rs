//! Asset filtering by file name

use super::{Asset, Release};

/// Every asset of `release` whose name equals `file_name` exactly.
///
/// Case-sensitive, no normalization, release order preserved. Duplicates
/// are all returned; an empty result is the caller's problem.
pub fn locate_assets<'a>(release: &'a Release, file_name: &str) -> Vec<&'a Asset> {
    release
        .assets
        .iter()
        .filter(|asset| asset.name == file_name)
        .collect()
}

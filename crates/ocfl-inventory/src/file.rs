use std::collections::BTreeMap;

use ocfl_crypto::DigestAlgorithm;
use ocfl_types::VersionId;

use crate::manifest::Digest;

/// A logical file of one version, joined against the manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct File {
    /// Version the file was listed for.
    pub version: VersionId,
    /// Path of the file in the version's logical state.
    pub logical_path: String,
    /// Object-relative path of the stored content.
    pub physical_path: String,
    pub digest: Digest,
    /// Digests of the same content under the inventory's fixity algorithms.
    pub fixity: BTreeMap<DigestAlgorithm, Digest>,
}

/// Pick the physical path to report for a logical file of `version`.
///
/// Several physical paths may hold the same content. Candidates whose first
/// segment is a version not after `version` are preferred, the latest such
/// version wins, ties go to the lexically greatest path. If no candidate
/// qualifies the lexically smallest path is used.
pub(crate) fn select_physical_path<'a>(candidates: &'a [String], version: &VersionId) -> Option<&'a str> {
    let target = version.number().ok();

    candidates
        .iter()
        .filter_map(|path| {
            let n = leading_version(path)?;
            target.map_or(true, |t| n <= t).then_some((n, path))
        })
        .max_by(|(n1, p1), (n2, p2)| n1.cmp(n2).then_with(|| p1.cmp(p2)))
        .map(|(_, path)| path.as_str())
        .or_else(|| candidates.iter().min().map(String::as_str))
}

fn leading_version(path: &str) -> Option<u64> {
    let first = path.split('/').next()?;
    VersionId::new(first).number().ok()
}

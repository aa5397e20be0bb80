//! The flattened build inputs handed to the orchestrator.

use std::hash::Hash;
use std::path::PathBuf;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::descriptor::StagingCategory;
use crate::error::Result;

/// A runtime file copied into the packaged build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StagedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub category: StagingCategory,
}

/// A resolved build-receipt entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiptProperty {
    pub name: String,
    pub value: PathBuf,
}

/// Include paths, link inputs and staged files for one platform.
///
/// Every list is ordered and free of duplicates; the first occurrence of an
/// entry keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolvedBuildInputs {
    pub include_paths: Vec<PathBuf>,
    pub library_paths: Vec<PathBuf>,
    pub delay_load: Vec<PathBuf>,
    pub runtime_files: Vec<StagedFile>,
    pub system_libraries: Vec<String>,
    pub frameworks: Vec<String>,
    pub module_dependencies: Vec<String>,
    pub receipt_properties: Vec<ReceiptProperty>,
}

fn extend_unique<T: Hash + Eq>(dst: &mut Vec<T>, src: impl IntoIterator<Item = T>) {
    let mut set: IndexSet<T> = dst.drain(..).collect();
    set.extend(src);
    dst.extend(set);
}

impl ResolvedBuildInputs {
    /// True when no list has any entry.
    pub fn is_empty(&self) -> bool {
        self.include_paths.is_empty()
            && self.library_paths.is_empty()
            && self.delay_load.is_empty()
            && self.runtime_files.is_empty()
            && self.system_libraries.is_empty()
            && self.frameworks.is_empty()
            && self.module_dependencies.is_empty()
            && self.receipt_properties.is_empty()
    }

    /// Link inputs plus delay-loaded binaries.
    pub fn library_reference_count(&self) -> usize {
        self.library_paths.len() + self.delay_load.len()
    }

    /// Append `other`, dropping entries already present.
    pub fn merge(&mut self, other: ResolvedBuildInputs) {
        extend_unique(&mut self.include_paths, other.include_paths);
        extend_unique(&mut self.library_paths, other.library_paths);
        extend_unique(&mut self.delay_load, other.delay_load);
        extend_unique(&mut self.runtime_files, other.runtime_files);
        extend_unique(&mut self.system_libraries, other.system_libraries);
        extend_unique(&mut self.frameworks, other.frameworks);
        extend_unique(&mut self.module_dependencies, other.module_dependencies);
        extend_unique(&mut self.receipt_properties, other.receipt_properties);
    }

    /// Remove duplicates within each list.
    pub fn dedup(&mut self) {
        self.merge(ResolvedBuildInputs::default());
    }

    /// Pretty JSON in field declaration order.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Hex SHA-256 of the compact JSON encoding.
    pub fn fingerprint(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        let digest = Sha256::digest(&json);
        Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
    }
}

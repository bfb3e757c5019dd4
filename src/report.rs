//! JSON report of a generation run.
//!
//! Mirrors [`GenerationResult`] in a serializable shape so the outcome of a
//! run can be handed to other tools.

use crate::catalog::Platform;
use crate::error::{AssetError, Result};
use crate::generate::{GenerationResult, VariantResult};
use serde::Serialize;
use std::path::Path;

/// Root structure of a run report.
#[derive(Serialize, Debug, Clone)]
pub struct RunReport {
    pub root: String,
    pub name: String,
    pub success: bool,
    pub main: VariantEntry,
    pub platforms: Vec<PlatformEntry>,
}

#[derive(Serialize, Debug, Clone)]
pub struct PlatformEntry {
    pub platform: Platform,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub variants: Vec<VariantEntry>,
}

#[derive(Serialize, Debug, Clone)]
pub struct VariantEntry {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub path: String,
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&VariantResult> for VariantEntry {
    fn from(result: &VariantResult) -> Self {
        Self {
            id: result.id.to_string(),
            width: result.width,
            height: result.height,
            path: result.path.display().to_string(),
            success: result.is_success(),
            error: result.error().map(ToString::to_string),
        }
    }
}

impl From<&GenerationResult> for RunReport {
    fn from(result: &GenerationResult) -> Self {
        let platforms = result
            .platforms
            .iter()
            .map(|(platform, outcome)| PlatformEntry {
                platform: *platform,
                folder: outcome
                    .folder
                    .as_ref()
                    .ok()
                    .map(|dir| dir.display().to_string()),
                error: outcome.folder.as_ref().err().map(ToString::to_string),
                variants: outcome.variants.iter().map(VariantEntry::from).collect(),
            })
            .collect();

        Self {
            root: result.root.display().to_string(),
            name: result.base_name.clone(),
            success: result.is_success(),
            main: VariantEntry::from(&result.main),
            platforms,
        }
    }
}

impl RunReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty-printed JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| AssetError::filesystem(path, e))
    }
}

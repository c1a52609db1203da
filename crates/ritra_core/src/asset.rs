//! Per-section outcome of a retrying generation task.

use crate::SectionKey;
use serde::{Deserialize, Serialize};

/// Why a section task finished without an asset.
///
/// These are data carried in [`AssetResult`], never propagated as faults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetError {
    /// The stage deadline (or attempt ceiling) was reached without success.
    #[display("gave up after {} attempt(s)", attempts)]
    Timeout {
        /// Attempts started before giving up
        attempts: u32,
        /// Description of the most recent failure, if any attempt ran
        #[serde(default, skip_serializing_if = "Option::is_none")]
        last_failure: Option<String>,
    },
}

/// Result of one section task: a URL or a classified error, never both.
///
/// # Examples
///
/// ```
/// use ritra_core::{AssetError, AssetResult, SectionKey};
///
/// let ok = AssetResult::stored(SectionKey::new(1), "https://cdn/a.png");
/// assert!(ok.is_success());
///
/// let timed_out = AssetResult::failed(
///     SectionKey::new(2),
///     AssetError::Timeout { attempts: 4, last_failure: None },
/// );
/// assert!(timed_out.url().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct AssetResult {
    /// Section this result belongs to
    key: SectionKey,
    /// Public URL of the stored asset
    url: Option<String>,
    /// Failure classification when no asset was produced
    error: Option<AssetError>,
}

impl AssetResult {
    /// A successfully stored asset.
    pub fn stored(key: SectionKey, url: impl Into<String>) -> Self {
        Self {
            key,
            url: Some(url.into()),
            error: None,
        }
    }

    /// A task that ended without an asset.
    pub fn failed(key: SectionKey, error: AssetError) -> Self {
        Self {
            key,
            url: None,
            error: Some(error),
        }
    }

    /// True if the task produced a URL.
    pub fn is_success(&self) -> bool {
        self.url.is_some()
    }
}

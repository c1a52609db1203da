//! Section keys and the prompt map handed to the fan-out stage.

use ritra_error::{PipelineError, PipelineErrorKind, RitraResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

const PREFIX: &str = "section_";

/// Identifier of one fan-out unit, carrying its position explicitly.
///
/// Keys order by ordinal, so `section_10` sorts after `section_2`. The textual
/// form (`section_<n>`) exists only at the edges: logs, JSON, storage names.
///
/// # Examples
///
/// ```
/// use ritra_core::SectionKey;
///
/// let key: SectionKey = "section_10".parse().unwrap();
/// assert_eq!(key.ordinal(), 10);
/// assert!(SectionKey::new(2) < key);
/// assert_eq!(key.to_string(), "section_10");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct SectionKey {
    ordinal: u32,
}

impl SectionKey {
    /// Creates a key for the given ordinal.
    pub fn new(ordinal: u32) -> Self {
        Self { ordinal }
    }

    /// The numeric position used for reassembly.
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }
}

impl std::fmt::Display for SectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", PREFIX, self.ordinal)
    }
}

impl FromStr for SectionKey {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(PREFIX)
            .and_then(|digits| digits.parse::<u32>().ok())
            .map(SectionKey::new)
            .ok_or_else(|| {
                PipelineError::new(PipelineErrorKind::MalformedInput(format!(
                    "invalid section key '{}'",
                    s
                )))
            })
    }
}

impl TryFrom<String> for SectionKey {
    type Error = PipelineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SectionKey> for String {
    fn from(key: SectionKey) -> Self {
        key.to_string()
    }
}

/// One unit of fan-out input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct PromptSection {
    /// Section identifier
    key: SectionKey,
    /// Generation input for this section
    prompt: String,
}

impl PromptSection {
    /// Creates a new prompt section.
    pub fn new(key: SectionKey, prompt: impl Into<String>) -> Self {
        Self {
            key,
            prompt: prompt.into(),
        }
    }
}

/// Keyed prompt map with unique keys.
///
/// Immutable once handed to the fan-out stage; iteration is in ordinal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptSections {
    sections: BTreeMap<SectionKey, String>,
}

impl PromptSections {
    /// Creates an empty section map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a section.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` if the key is already present.
    pub fn insert(&mut self, key: SectionKey, prompt: impl Into<String>) -> RitraResult<()> {
        if self.sections.contains_key(&key) {
            return Err(PipelineError::new(PipelineErrorKind::MalformedInput(format!(
                "duplicate section key {}",
                key
            )))
            .into());
        }
        self.sections.insert(key, prompt.into());
        Ok(())
    }

    /// Builds a map from `(key, prompt)` pairs, rejecting duplicates.
    pub fn try_from_pairs<I, S>(pairs: I) -> RitraResult<Self>
    where
        I: IntoIterator<Item = (SectionKey, S)>,
        S: Into<String>,
    {
        let mut sections = Self::new();
        for (key, prompt) in pairs {
            sections.insert(key, prompt)?;
        }
        Ok(sections)
    }

    /// Splits narrative text into at most `max_sections` contiguous sections.
    ///
    /// Sentences are kept whole and distributed as evenly as possible, earlier
    /// sections taking the remainder. Text with no sentences yields an empty map.
    ///
    /// # Examples
    ///
    /// ```
    /// use ritra_core::{PromptSections, SectionKey};
    ///
    /// let sections = PromptSections::split_text("One. Two. Three.", 2);
    /// assert_eq!(sections.len(), 2);
    /// assert_eq!(sections.get(&SectionKey::new(1)), Some("One. Two."));
    /// assert_eq!(sections.get(&SectionKey::new(2)), Some("Three."));
    /// ```
    pub fn split_text(text: &str, max_sections: u32) -> Self {
        let sentences = sentences(text);
        let count = sentences.len().min(max_sections as usize);
        if count == 0 {
            return Self::new();
        }

        let base = sentences.len() / count;
        let extra = sentences.len() % count;
        let mut sections = BTreeMap::new();
        let mut rest = sentences.as_slice();
        for index in 0..count {
            let take = base + usize::from(index < extra);
            let (group, tail) = rest.split_at(take);
            rest = tail;
            sections.insert(SectionKey::new(index as u32 + 1), group.join(" "));
        }
        Self { sections }
    }

    /// Returns the prompt for a key.
    pub fn get(&self, key: &SectionKey) -> Option<&str> {
        self.sections.get(key).map(String::as_str)
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True if there are no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Keys in ordinal order.
    pub fn keys(&self) -> impl Iterator<Item = SectionKey> + '_ {
        self.sections.keys().copied()
    }

    /// Sections in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (SectionKey, &str)> + '_ {
        self.sections.iter().map(|(key, prompt)| (*key, prompt.as_str()))
    }

    /// Consumes the map into owned sections, in ordinal order.
    pub fn into_sections(self) -> Vec<PromptSection> {
        self.sections
            .into_iter()
            .map(|(key, prompt)| PromptSection { key, prompt })
            .collect()
    }
}

// A sentence ends at '.', '!' or '?' followed by whitespace or end of input.
fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        let terminal = matches!(c, '.' | '!' | '?');
        let boundary = chars.peek().is_none_or(|next| next.is_whitespace());
        if terminal && boundary {
            push_trimmed(&mut out, &current);
            current.clear();
        }
    }
    push_trimmed(&mut out, &current);
    out
}

fn push_trimmed(out: &mut Vec<String>, sentence: &str) {
    let normalized = sentence.split_whitespace().collect::<Vec<_>>().join(" ");
    if !normalized.is_empty() {
        out.push(normalized);
    }
}

//! Ordered compaction of section results.

use ritra_core::{AssetResult, SectionKey};

/// Successful URLs sorted by section ordinal, failures dropped.
///
/// Order follows the ordinal, never completion order. Compaction is
/// best-effort: a gap means the remaining illustrations no longer line up
/// with the narration timeline. Idempotent on gap-free ordered input.
///
/// # Examples
///
/// ```
/// use ritra_core::{AssetError, AssetResult, SectionKey};
/// use ritra_pipeline::to_ordered_urls;
///
/// let results = vec![
///     AssetResult::stored(SectionKey::new(10), "j"),
///     AssetResult::failed(SectionKey::new(3), AssetError::Timeout { attempts: 2, last_failure: None }),
///     AssetResult::stored(SectionKey::new(2), "b"),
/// ];
/// assert_eq!(to_ordered_urls(&results), vec!["b", "j"]);
/// ```
pub fn to_ordered_urls<'a, I>(results: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a AssetResult>,
{
    let mut ordered: Vec<&AssetResult> = results.into_iter().collect();
    ordered.sort_by_key(|result| *result.key());
    ordered
        .into_iter()
        .filter_map(|result| result.url().clone())
        .collect()
}

/// Keys of sections that produced no asset, in ordinal order.
pub fn failed_sections<'a, I>(results: I) -> Vec<SectionKey>
where
    I: IntoIterator<Item = &'a AssetResult>,
{
    let mut keys: Vec<SectionKey> = results
        .into_iter()
        .filter(|result| !result.is_success())
        .map(|result| *result.key())
        .collect();
    keys.sort();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use ritra_core::AssetError;
    use std::collections::BTreeMap;

    fn timeout() -> AssetError {
        AssetError::Timeout {
            attempts: 1,
            last_failure: None,
        }
    }

    #[test]
    fn test_drops_failures_and_keeps_ordinal_order() {
        let results = vec![
            AssetResult::stored(SectionKey::new(3), "c"),
            AssetResult::failed(SectionKey::new(2), timeout()),
            AssetResult::stored(SectionKey::new(1), "a"),
        ];
        assert_eq!(to_ordered_urls(&results), vec!["a", "c"]);
        assert_eq!(failed_sections(&results), vec![SectionKey::new(2)]);
    }

    #[test]
    fn test_numeric_not_lexical_order() {
        let results: Vec<AssetResult> = (1..=12)
            .rev()
            .map(|n| AssetResult::stored(SectionKey::new(n), format!("u{}", n)))
            .collect();
        let urls = to_ordered_urls(&results);
        assert_eq!(urls.first().map(String::as_str), Some("u1"));
        assert_eq!(urls[1], "u2");
        assert_eq!(urls.last().map(String::as_str), Some("u12"));
    }

    #[test]
    fn test_idempotent_on_gap_free_input() {
        let map: BTreeMap<SectionKey, AssetResult> = (1..=4)
            .map(|n| {
                let key = SectionKey::new(n);
                (key, AssetResult::stored(key, format!("u{}", n)))
            })
            .collect();
        let first = to_ordered_urls(map.values());
        let again: Vec<AssetResult> = first
            .iter()
            .enumerate()
            .map(|(i, url)| AssetResult::stored(SectionKey::new(i as u32 + 1), url.clone()))
            .collect();
        assert_eq!(to_ordered_urls(&again), first);
    }

    #[test]
    fn test_all_failed_is_empty() {
        let results = vec![AssetResult::failed(SectionKey::new(1), timeout())];
        assert!(to_ordered_urls(&results).is_empty());
    }
}

//! Watermark scanning over most-recent-first feeds.

/// Returns the prefix of `feed` that arrived after `watermark`.
///
/// The scan starts at the head and stops just before the first element whose
/// key equals the watermark. When the watermark is no longer in the window
/// (or there is none), the whole batch counts as new, capped at `max_batch`
/// so a long-stale watermark cannot turn into a burst storm. The cap only
/// applies in that case; a matched watermark returns the full new prefix.
pub fn new_since<'a, T, K, F>(
    feed: &'a [T],
    watermark: Option<&K>,
    key: F,
    max_batch: usize,
) -> &'a [T]
where
    K: PartialEq + ?Sized,
    F: Fn(&T) -> &K,
{
    let Some(watermark) = watermark else {
        return &feed[..feed.len().min(max_batch)];
    };

    match feed.iter().position(|item| key(item) == watermark) {
        Some(end) => &feed[..end],
        None => {
            tracing::trace!(
                "Watermark fell out of the feed window; taking up to {} of {} entries",
                max_batch,
                feed.len()
            );
            &feed[..feed.len().min(max_batch)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[&'static str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn key(s: &String) -> &str {
        s.as_str()
    }

    #[test]
    fn test_stops_at_watermark() {
        let feed = ids(&["e5", "e4", "e3", "e2"]);
        let new = new_since(&feed, Some("e3"), key, 12);
        assert_eq!(new, &feed[..2]);
    }

    #[test]
    fn test_head_equal_to_watermark_is_empty() {
        let feed = ids(&["e5", "e4"]);
        assert!(new_since(&feed, Some("e5"), key, 12).is_empty());
    }

    #[test]
    fn test_missing_watermark_takes_capped_batch() {
        let feed: Vec<String> = (0..30).rev().map(|n| format!("e{}", n)).collect();
        let new = new_since(&feed, Some("gone"), key, 12);
        assert_eq!(new.len(), 12);
        assert_eq!(new[0], "e29");
    }

    #[test]
    fn test_matched_watermark_ignores_cap() {
        let feed: Vec<String> = (0..30).rev().map(|n| format!("e{}", n)).collect();
        let new = new_since(&feed, Some("e0"), key, 12);
        assert_eq!(new.len(), 29);
    }

    #[test]
    fn test_no_watermark() {
        let feed = ids(&["e1", "e0"]);
        assert_eq!(new_since::<_, str, _>(&feed, None, key, 12).len(), 2);
        let empty: Vec<String> = Vec::new();
        assert!(new_since(&empty, Some("e1"), key, 12).is_empty());
    }
}

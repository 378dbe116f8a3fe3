//! Technical-focus tag extraction.

use prospector_shared::RankingRules;

/// Tags from the focus vocabulary found in `body`, ordered by first mention.
///
/// Each topic's position is the earliest offset of any of its phrases; topics
/// mentioned at the same offset keep vocabulary order. A phrase only counts
/// where it starts a word, so stems like `encrypt` still match `encryption`
/// but `apis` does not match inside `therapists`. At most
/// `rules.max_focus_tags` distinct tags are returned, possibly none.
pub fn extract_technical_focus(body: &str, rules: &RankingRules) -> Vec<String> {
    let haystack = body.to_lowercase();

    let mut hits: Vec<(usize, usize)> = rules
        .focus_topics
        .iter()
        .enumerate()
        .filter_map(|(i, topic)| {
            topic
                .phrases
                .iter()
                .filter_map(|phrase| find_at_word_start(&haystack, phrase))
                .min()
                .map(|offset| (offset, i))
        })
        .collect();
    hits.sort_unstable();

    let mut tags: Vec<String> = Vec::with_capacity(rules.max_focus_tags);
    for (_, i) in hits {
        if tags.len() == rules.max_focus_tags {
            break;
        }
        let tag = &rules.focus_topics[i].tag;
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

/// Offset of the first occurrence of `phrase` that is not preceded by a
/// letter or digit.
fn find_at_word_start(haystack: &str, phrase: &str) -> Option<usize> {
    haystack.match_indices(phrase).map(|(i, _)| i).find(|&i| {
        haystack[..i]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric())
    })
}

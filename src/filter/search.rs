use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::graph::NodeId;
use crate::util::short_name;

#[derive(Clone, Copy, Debug)]
pub struct SearchCandidate<'a> {
    pub id: NodeId,
    pub title: &'a str,
    pub path: &'a str,
}

/// Text matching used by the filter: returns the matching candidates.
///
/// Implementations may rank the result, but the order is advisory;
/// [`GraphView`](super::GraphView) only uses membership and keeps nodes in
/// insertion order.
pub trait TextMatcher {
    fn matches(&self, query: &str, candidates: &[SearchCandidate<'_>]) -> Vec<NodeId>;
}

#[derive(Default)]
pub struct SkimTextMatcher {
    matcher: SkimMatcherV2,
}

impl SkimTextMatcher {
    fn score(&self, text: &str, query: &str) -> Option<i64> {
        self.matcher.fuzzy_match(text, query).or_else(|| {
            self.matcher
                .fuzzy_match(&text.to_lowercase(), &query.to_lowercase())
        })
    }
}

impl TextMatcher for SkimTextMatcher {
    fn matches(&self, query: &str, candidates: &[SearchCandidate<'_>]) -> Vec<NodeId> {
        let mut scored = candidates
            .iter()
            .filter_map(|candidate| {
                let title = self.score(candidate.title, query);
                let path = self.score(short_name(candidate.path), query);
                title.max(path).map(|score| (score, candidate.id))
            })
            .collect::<Vec<_>>();

        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        scored.into_iter().map(|(_, id)| id).collect()
    }
}

/// Case-insensitive substring match on title or path, in candidate order.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubstringMatcher;

impl TextMatcher for SubstringMatcher {
    fn matches(&self, query: &str, candidates: &[SearchCandidate<'_>]) -> Vec<NodeId> {
        let query = query.to_lowercase();
        candidates
            .iter()
            .filter(|candidate| {
                candidate.title.to_lowercase().contains(&query)
                    || candidate.path.to_lowercase().contains(&query)
            })
            .map(|candidate| candidate.id)
            .collect()
    }
}

//! Pass 1: binary keyword matching of systems and their domains.

use crate::corpus::KeywordCorpus;

/// Word-boundary OR-of-alternatives matcher over a corpus.
#[derive(Debug, Clone, Copy)]
pub struct BinaryMatcher<'a> {
    corpus: &'a KeywordCorpus,
}

impl<'a> BinaryMatcher<'a> {
    pub fn new(corpus: &'a KeywordCorpus) -> Self {
        Self { corpus }
    }

    /// System ids whose pattern matches anywhere in `request`, corpus order.
    pub fn match_systems(&self, request: &str) -> Vec<String> {
        self.corpus
            .systems()
            .iter()
            .filter(|system| system.pattern.is_match(request))
            .map(|system| system.id.clone())
            .collect()
    }

    /// Domain ids of the given systems that match `request`, in corpus order.
    pub fn match_domains(&self, request: &str, systems: &[String]) -> Vec<String> {
        self.corpus
            .systems()
            .iter()
            .filter(|system| systems.contains(&system.id))
            .flat_map(|system| system.domains.iter())
            .filter(|domain| domain.pattern.is_match(request))
            .map(|domain| domain.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> std::sync::Arc<KeywordCorpus> {
        KeywordCorpus::builtin().unwrap()
    }

    #[test]
    fn index_request_hits_storage_only() {
        let corpus = corpus();
        let matcher = BinaryMatcher::new(&corpus);
        let systems = matcher.match_systems("design a composite index for range queries");
        assert_eq!(systems, vec!["storage"]);
        let domains = matcher.match_domains("design a composite index for range queries", &systems);
        assert_eq!(domains, vec!["indexing", "query-planning"]);
    }

    #[test]
    fn systems_come_back_in_corpus_order() {
        let corpus = corpus();
        let matcher = BinaryMatcher::new(&corpus);
        let systems = matcher.match_systems("caching in front of replication");
        assert_eq!(systems, vec!["distributed", "caching"]);
    }

    #[test]
    fn substring_inside_word_does_not_match() {
        let corpus = corpus();
        let matcher = BinaryMatcher::new(&corpus);
        assert!(matcher.match_systems("the walrus is fine").is_empty());
    }

    #[test]
    fn domains_limited_to_requested_systems() {
        let corpus = corpus();
        let matcher = BinaryMatcher::new(&corpus);
        let domains = matcher.match_domains("lru eviction with raft", &["caching".to_string()]);
        assert_eq!(domains, vec!["eviction"]);
    }
}

// file: src/retrieval/retriever.rs
// description: embeds query and documents, scores, filters and ranks them
// reference: https://docs.rs/futures/latest/futures/stream/trait.StreamExt.html#method.buffer_unordered

use crate::config::RetrievalConfig;
use crate::embedding::{EmbeddingProvider, EmbeddingVector, cosine_similarity};
use crate::error::{EmbeddingError, RetrievalError};
use crate::models::{Document, ScoredDocument};
use crate::store::DocumentStore;
use crate::utils::OperationTimer;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Selects the documents most relevant to a query.
///
/// Every call embeds the query and every candidate afresh. Candidate
/// embeddings run concurrently, bounded by
/// [`RetrievalConfig::max_concurrent_embeddings`]; a candidate whose
/// embedding fails is left out while the rest are still scored.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    config: RetrievalConfig,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, config: RetrievalConfig) -> Self {
        Self { embedder, config }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub async fn retrieve(
        &self,
        query: &str,
        documents: &[Document],
    ) -> Result<Vec<ScoredDocument>, RetrievalError> {
        self.retrieve_with(query, documents, &self.config).await
    }

    /// Retrieves over the current contents of `store`.
    pub async fn retrieve_from(
        &self,
        query: &str,
        store: &dyn DocumentStore,
    ) -> Result<Vec<ScoredDocument>, RetrievalError> {
        let documents = store.list();
        self.retrieve(query, &documents).await
    }

    /// Same as [`retrieve`](Self::retrieve) with a per-call threshold and cap.
    pub async fn retrieve_with(
        &self,
        query: &str,
        documents: &[Document],
        policy: &RetrievalConfig,
    ) -> Result<Vec<ScoredDocument>, RetrievalError> {
        let timer = OperationTimer::new("retrieval");

        let query_embedding = self.embedder.embed(query).await.map_err(|e| {
            warn!("Query embedding failed, no retrieval context: {}", e);
            RetrievalError::QueryEmbedding(e)
        })?;

        let embeddings = self
            .embed_documents(documents, policy.max_concurrent_embeddings)
            .await;

        let mut candidates = Vec::with_capacity(embeddings.len());
        let mut failed = 0usize;

        for (index, result) in embeddings {
            let document = &documents[index];
            match result {
                Ok(vector) if vector.len() == query_embedding.len() => {
                    let score = cosine_similarity(&query_embedding, &vector);
                    debug!("Scored '{}' at {:.4}", document.title, score);
                    candidates.push((index, score));
                }
                Ok(vector) => {
                    failed += 1;
                    warn!(
                        "Skipping '{}': embedding dimension {} differs from query dimension {}",
                        document.title,
                        vector.len(),
                        query_embedding.len()
                    );
                }
                Err(e) => {
                    failed += 1;
                    warn!("Skipping '{}': {}", document.title, e);
                }
            }
        }

        let selected = select_top(candidates, policy.similarity_threshold, policy.top_k);

        info!(
            "Retrieved {} of {} documents ({} not embedded)",
            selected.len(),
            documents.len(),
            failed
        );
        timer.finish_with_count(documents.len(), "documents scored");

        Ok(selected
            .into_iter()
            .map(|(index, score)| ScoredDocument::new(documents[index].clone(), score))
            .collect())
    }

    /// Embeds each document independently. Results carry the input index so
    /// completion order does not matter.
    async fn embed_documents(
        &self,
        documents: &[Document],
        concurrency: usize,
    ) -> Vec<(usize, Result<EmbeddingVector, EmbeddingError>)> {
        let embedder = self.embedder.as_ref();

        stream::iter(documents.iter().enumerate())
            .map(|(index, document)| async move {
                (index, embedder.embed(&document.content).await)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await
    }
}

/// Keeps scores strictly above `threshold`, highest first, input order on
/// ties, at most `top_k`.
fn select_top(
    mut candidates: Vec<(usize, f32)>,
    threshold: f32,
    top_k: usize,
) -> Vec<(usize, f32)> {
    candidates.retain(|&(_, score)| score.is_finite() && score > threshold);
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    candidates.truncate(top_k);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryDocumentStore;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Maps exact text to a canned vector; unknown text fails like a network error.
    struct FakeEmbedder {
        vectors: HashMap<String, EmbeddingVector>,
        calls: AtomicUsize,
    }

    impl FakeEmbedder {
        fn new(entries: &[(&str, EmbeddingVector)]) -> Self {
            Self {
                vectors: entries
                    .iter()
                    .map(|(text, v)| (text.to_string(), v.clone()))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmbeddingProvider for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.vectors
                .get(text)
                .cloned()
                .ok_or_else(|| EmbeddingError::Transport(format!("no vector for '{}'", text)))
        }

        fn model_name(&self) -> &str {
            "fake"
        }
    }

    const QUERY: &str = "query";

    /// Unit vector whose cosine with `[1, 0]` is exactly `score`.
    fn at(score: f32) -> EmbeddingVector {
        vec![score, (1.0 - score * score).sqrt()]
    }

    fn doc(name: &str) -> Document {
        Document::new(name, format!("content of {}", name))
    }

    fn retriever(embedder: Arc<FakeEmbedder>) -> Retriever {
        Retriever::new(embedder, RetrievalConfig::default())
    }

    fn titles(results: &[ScoredDocument]) -> Vec<&str> {
        results.iter().map(|r| r.title()).collect()
    }

    #[tokio::test]
    async fn test_threshold_and_cap() {
        let docs = vec![doc("a"), doc("b"), doc("c"), doc("d"), doc("e")];
        let embedder = Arc::new(FakeEmbedder::new(&[
            (QUERY, vec![1.0, 0.0]),
            ("content of a", at(0.95)),
            ("content of b", at(0.85)),
            ("content of c", at(0.72)),
            ("content of d", at(0.65)),
            ("content of e", at(0.50)),
        ]));

        let results = retriever(embedder).retrieve(QUERY, &docs).await.unwrap();

        assert_eq!(titles(&results), vec!["a", "b", "c"]);
        assert!((results[0].score - 0.95).abs() < 1e-5);
        assert!((results[2].score - 0.72).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_cap_applies_after_threshold() {
        let docs = vec![doc("low"), doc("b"), doc("c"), doc("d"), doc("a")];
        let embedder = Arc::new(FakeEmbedder::new(&[
            (QUERY, vec![1.0, 0.0]),
            ("content of low", at(0.71)),
            ("content of b", at(0.90)),
            ("content of c", at(0.80)),
            ("content of d", at(0.75)),
            ("content of a", at(0.99)),
        ]));

        let results = retriever(embedder).retrieve(QUERY, &docs).await.unwrap();
        assert_eq!(titles(&results), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_threshold_is_strict() {
        let docs = vec![doc("orthogonal"), doc("positive")];
        let embedder = Arc::new(FakeEmbedder::new(&[
            (QUERY, vec![1.0, 0.0]),
            ("content of orthogonal", vec![0.0, 1.0]),
            ("content of positive", vec![1.0, 1.0]),
        ]));
        let policy = RetrievalConfig {
            similarity_threshold: 0.0,
            ..RetrievalConfig::default()
        };

        let results = retriever(embedder)
            .retrieve_with(QUERY, &docs, &policy)
            .await
            .unwrap();
        assert_eq!(titles(&results), vec!["positive"]);
    }

    #[tokio::test]
    async fn test_failed_document_is_excluded() {
        let docs = vec![doc("good"), doc("broken"), doc("also good")];
        let embedder = Arc::new(FakeEmbedder::new(&[
            (QUERY, vec![1.0, 0.0]),
            ("content of good", at(0.9)),
            ("content of also good", at(0.8)),
        ]));

        let results = retriever(embedder.clone())
            .retrieve(QUERY, &docs)
            .await
            .unwrap();

        assert_eq!(titles(&results), vec!["good", "also good"]);
        assert_eq!(embedder.calls(), 4);
    }

    #[tokio::test]
    async fn test_query_failure_fails_retrieval() {
        let docs = vec![doc("a")];
        let embedder = Arc::new(FakeEmbedder::new(&[("content of a", at(0.9))]));

        let err = retriever(embedder.clone())
            .retrieve(QUERY, &docs)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RetrievalError::QueryEmbedding(EmbeddingError::Transport(_))
        ));
        assert_eq!(embedder.calls(), 1);
    }

    #[tokio::test]
    async fn test_ties_keep_input_order() {
        let docs = vec![doc("first"), doc("second"), doc("third")];
        let embedder = Arc::new(FakeEmbedder::new(&[
            (QUERY, vec![1.0, 0.0]),
            ("content of first", at(0.8)),
            ("content of second", at(0.8)),
            ("content of third", at(0.8)),
        ]));

        let retriever = retriever(embedder);
        let first = retriever.retrieve(QUERY, &docs).await.unwrap();
        let second = retriever.retrieve(QUERY, &docs).await.unwrap();

        assert_eq!(titles(&first), vec!["first", "second", "third"]);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_zero_and_mismatched_vectors_never_score() {
        let docs = vec![doc("zero"), doc("wide"), doc("ok")];
        let embedder = Arc::new(FakeEmbedder::new(&[
            (QUERY, vec![1.0, 0.0]),
            ("content of zero", vec![0.0, 0.0]),
            ("content of wide", vec![1.0, 0.0, 0.0]),
            ("content of ok", at(0.9)),
        ]));
        let policy = RetrievalConfig {
            similarity_threshold: -1.0,
            ..RetrievalConfig::default()
        };

        let results = retriever(embedder)
            .retrieve_with(QUERY, &docs, &policy)
            .await
            .unwrap();

        assert_eq!(titles(&results), vec!["ok", "zero"]);
        assert_eq!(results[1].score, 0.0);
    }

    #[tokio::test]
    async fn test_empty_collection_is_not_an_error() {
        let embedder = Arc::new(FakeEmbedder::new(&[(QUERY, vec![1.0, 0.0])]));
        let results = retriever(embedder).retrieve(QUERY, &[]).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_from_store_leaves_it_unchanged() {
        let mut store = InMemoryDocumentStore::new();
        store.add("a", "alpha").unwrap();
        store.add("b", "beta").unwrap();
        let before = store.list();

        let embedder = Arc::new(FakeEmbedder::new(&[
            (QUERY, vec![1.0, 0.0]),
            ("alpha", at(0.75)),
            ("beta", at(0.95)),
        ]));

        let results = retriever(embedder)
            .retrieve_from(QUERY, &store)
            .await
            .unwrap();

        assert_eq!(titles(&results), vec!["b", "a"]);
        assert_eq!(store.list(), before);
    }

    #[test]
    fn test_per_call_policy_overrides_defaults() {
        let docs = vec![doc("a"), doc("b"), doc("c")];
        let embedder = Arc::new(FakeEmbedder::new(&[
            (QUERY, vec![1.0, 0.0]),
            ("content of a", at(0.9)),
            ("content of b", at(0.6)),
            ("content of c", at(0.4)),
        ]));
        let retriever = retriever(embedder.clone());
        let policy = RetrievalConfig {
            similarity_threshold: 0.5,
            top_k: 1,
            ..RetrievalConfig::default()
        };

        let results =
            tokio_test::block_on(retriever.retrieve_with(QUERY, &docs, &policy)).unwrap();
        assert_eq!(titles(&results), vec!["a"]);
        assert_eq!(embedder.calls(), 4);

        let results = tokio_test::block_on(retriever.retrieve(QUERY, &docs)).unwrap();
        assert_eq!(titles(&results), vec!["a"]);
        assert_eq!(retriever.config().similarity_threshold, 0.7);
    }

    #[test]
    fn test_select_top() {
        let candidates = vec![(0, 0.5), (1, 0.9), (2, f32::NAN), (3, 0.9), (4, 0.71)];
        assert_eq!(select_top(candidates, 0.7, 2), vec![(1, 0.9), (3, 0.9)]);
    }

    #[test]
    fn test_select_top_breaks_ties_by_index_not_arrival() {
        let arrived = vec![(3, 0.9), (4, 0.8), (1, 0.9), (0, 0.8)];
        assert_eq!(
            select_top(arrived, 0.7, 4),
            vec![(1, 0.9), (3, 0.9), (0, 0.8), (4, 0.8)]
        );
    }
}

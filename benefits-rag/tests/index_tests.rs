//! Property tests for flat index search ordering.

use benefits_rag::{FlatIndex, l2_normalize};
use proptest::prelude::*;

/// Generate a non-zero embedding of the given dimension (not normalized).
fn arb_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim)
        .prop_filter("non-zero embedding", |v| v.iter().map(|x| x * x).sum::<f32>() > 1e-6)
}

/// Search ordering: results are ordered by descending cosine similarity and
/// there are exactly `min(k, corpus size)` of them.
mod prop_flat_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_sized_min_k_len(
            embeddings in proptest::collection::vec(arb_embedding(DIM), 0..20),
            query in arb_embedding(DIM),
            k in 0usize..25,
        ) {
            let len = embeddings.len();
            let index = FlatIndex::build(embeddings.clone()).unwrap();
            let hits = index.search(&query, k).unwrap();

            prop_assert_eq!(hits.len(), k.min(len));
            for window in hits.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }

            // Scores are cosine similarities of the raw vectors.
            let mut q = query.clone();
            l2_normalize(&mut q);
            for hit in &hits {
                let mut v = embeddings[hit.chunk_index].clone();
                l2_normalize(&mut v);
                let cosine: f32 = v.iter().zip(&q).map(|(a, b)| a * b).sum();
                prop_assert!((cosine - hit.score).abs() < 1e-4);
            }
        }

        #[test]
        fn k_at_least_len_returns_every_chunk(
            embeddings in proptest::collection::vec(arb_embedding(DIM), 1..20),
            query in arb_embedding(DIM),
        ) {
            let len = embeddings.len();
            let index = FlatIndex::build(embeddings).unwrap();
            let mut seen: Vec<usize> =
                index.search(&query, len + 3).unwrap().iter().map(|h| h.chunk_index).collect();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..len).collect::<Vec<_>>());
        }
    }
}

use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleError {
    #[error("bucket holds {have} gifs but {want} were requested")]
    InsufficientGifs { have: usize, want: usize },
}

/// Draw `count` distinct gif locations from `bucket`, in random order.
///
/// Runs a partial Fisher-Yates shuffle over an index scratch: each draw
/// swaps a uniformly chosen remaining index into place, so no element is
/// emitted twice within one call and the output order is independent of
/// catalog order. The bucket itself is never mutated; sampling the same
/// bucket twice may legitimately repeat elements across calls.
///
/// Asking for more gifs than the bucket holds fails with
/// [`SampleError::InsufficientGifs`] rather than padding the result.
///
/// # Examples
///
/// ```
/// use facegif::sample;
///
/// let bucket = vec!["a.gif".to_string(), "b.gif".to_string(), "c.gif".to_string()];
/// let picked = sample(&bucket, 2, &mut rand::thread_rng()).unwrap();
/// assert_eq!(picked.len(), 2);
/// assert_ne!(picked[0], picked[1]);
/// ```
pub fn sample<R: Rng>(
    bucket: &[String],
    count: usize,
    rng: &mut R,
) -> Result<Vec<String>, SampleError> {
    if count > bucket.len() {
        return Err(SampleError::InsufficientGifs {
            have: bucket.len(),
            want: count,
        });
    }
    let mut indices: Vec<usize> = (0..bucket.len()).collect();
    let mut picked = Vec::with_capacity(count);
    for i in 0..count {
        let j = rng.gen_range(i..indices.len());
        indices.swap(i, j);
        picked.push(bucket[indices[i]].clone());
    }
    Ok(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn bucket(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{i}.gif")).collect()
    }

    #[test]
    fn returns_exactly_count_distinct_members() {
        let source = bucket(10);
        let mut rng = StdRng::seed_from_u64(7);
        let picked = sample(&source, 4, &mut rng).unwrap();
        assert_eq!(picked.len(), 4);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 4);
        for gif in &picked {
            assert!(source.contains(gif));
        }
    }

    #[test]
    fn full_bucket_draw_is_a_permutation() {
        let source = bucket(5);
        let mut rng = StdRng::seed_from_u64(1);
        let mut picked = sample(&source, 5, &mut rng).unwrap();
        picked.sort();
        let mut expected = source.clone();
        expected.sort();
        assert_eq!(picked, expected);
    }

    #[test]
    fn source_bucket_is_untouched() {
        let source = bucket(6);
        let before = source.clone();
        let mut rng = StdRng::seed_from_u64(3);
        sample(&source, 6, &mut rng).unwrap();
        assert_eq!(source, before);
        // a second draw can still produce any member, including repeats
        // of the first draw's picks
        let again = sample(&source, 6, &mut rng).unwrap();
        assert_eq!(again.len(), 6);
    }

    #[test]
    fn different_seeds_give_different_orders() {
        let source = bucket(12);
        let mut a = StdRng::seed_from_u64(0);
        let mut b = StdRng::seed_from_u64(99);
        let first = sample(&source, 12, &mut a).unwrap();
        let second = sample(&source, 12, &mut b).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn zero_count_is_empty() {
        let source = bucket(3);
        let mut rng = StdRng::seed_from_u64(5);
        assert!(sample(&source, 0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn oversized_request_fails_fast() {
        let source = bucket(2);
        let mut rng = StdRng::seed_from_u64(5);
        let err = sample(&source, 3, &mut rng).unwrap_err();
        assert_eq!(err, SampleError::InsufficientGifs { have: 2, want: 3 });
    }

    #[test]
    fn empty_bucket_fails_for_any_positive_count() {
        let mut rng = StdRng::seed_from_u64(5);
        let err = sample(&[], 1, &mut rng).unwrap_err();
        assert_eq!(err, SampleError::InsufficientGifs { have: 0, want: 1 });
    }
}

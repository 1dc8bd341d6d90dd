
use log::trace;
use rustc_hash::FxHashMap as HashMap;

/// Smallest k-mer length the diagonal search will retry with
pub const MIN_QGRAM_LENGTH: usize = 1;

/// Finds the most supported diagonal between two sequences, shrinking the k-mer length to `k*2/3` whenever a pass finds nothing.
/// The diagonal is reported as `query_offset - reference_offset` of the voting k-mer hits.
/// Returns None only when even the minimum k-mer length produces no shared seed.
/// # Arguments
/// * `reference` - the indexed sequence
/// * `query` - the sequence whose k-mers are looked up in the index
/// * `qgram_length` - the initial k-mer length
/// # Examples
/// ```rust
/// use contig_merge::diagonal::best_diagonal;
/// // the query carries two extra leading bases
/// assert_eq!(best_diagonal(b"ACGTTGCA", b"GGACGTTGCA", 4), Some(2));
/// // 10-mers do not fit, so this retries with 6 and then 4
/// assert_eq!(best_diagonal(b"ACGT", b"ACGT", 10), Some(0));
/// assert_eq!(best_diagonal(b"AAAA", b"CCCC", 3), None);
/// ```
pub fn best_diagonal(reference: &[u8], query: &[u8], qgram_length: usize) -> Option<isize> {
    let mut k = qgram_length;
    while k >= MIN_QGRAM_LENGTH {
        if let Some(diagonal) = seed_diagonal(reference, query, k) {
            return Some(diagonal);
        }
        trace!("best_diagonal: no seed hits with k={k}, retrying with k={}", k * 2 / 3);
        k = k * 2 / 3;
    }
    None
}

/// Single voting pass for the best diagonal using k-mers of exactly length `k`.
/// Every k-mer of `query` found in `reference` votes for the diagonal it implies; the highest vote wins and ties go to the lowest diagonal.
/// Returns None if `k` is zero, if `k` exceeds either sequence, or if no k-mer is shared.
/// # Arguments
/// * `reference` - the indexed sequence
/// * `query` - the sequence whose k-mers are looked up in the index
/// * `k` - the k-mer length
pub fn seed_diagonal(reference: &[u8], query: &[u8], k: usize) -> Option<isize> {
    let ref_len = reference.len();
    let query_len = query.len();
    if k == 0 || k > ref_len || k > query_len {
        return None;
    }

    // index every k-mer start in the reference
    let mut kmer_index: HashMap<&[u8], Vec<usize>> = Default::default();
    for (ref_offset, kmer) in reference.windows(k).enumerate() {
        kmer_index.entry(kmer).or_default().push(ref_offset);
    }

    // counter index is `ref_len + query_offset - ref_offset`, which is always in 1..ref_len+query_len
    let mut counters: Vec<u32> = vec![0; ref_len + query_len];
    for (query_offset, kmer) in query.windows(k).enumerate() {
        if let Some(occurrences) = kmer_index.get(kmer) {
            for &ref_offset in occurrences.iter() {
                counters[ref_len + query_offset - ref_offset] += 1;
            }
        }
    }

    let mut best: Option<usize> = None;
    let mut max_count = 0;
    for (index, &count) in counters.iter().enumerate() {
        if count > max_count {
            max_count = count;
            best = Some(index);
        }
    }

    best.map(|index| index as isize - ref_len as isize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        assert_eq!(seed_diagonal(b"ACGTTGCA", b"ACGTTGCA", 4), Some(0));
    }

    #[test]
    fn test_shifted() {
        // query has two extra bases up front
        assert_eq!(seed_diagonal(b"ACGTTGCA", b"GGACGTTGCA", 4), Some(2));
        // reference has two extra bases up front
        assert_eq!(seed_diagonal(b"GGACGTTGCA", b"ACGTTGCA", 4), Some(-2));
    }

    #[test]
    fn test_tie_lowest_diagonal() {
        // hits on diagonals 0 and 2, one vote each
        assert_eq!(seed_diagonal(b"AC", b"ACAC", 2), Some(0));
        // hits on diagonals 0 and -2, one vote each
        assert_eq!(seed_diagonal(b"ACAC", b"AC", 2), Some(-2));
    }

    #[test]
    fn test_majority_wins() {
        // five votes for diagonal 4 outweigh three for diagonal 0
        assert_eq!(seed_diagonal(b"ACGTAC", b"ACTTACGTAC", 2), Some(4));
    }

    #[test]
    fn test_too_long() {
        assert_eq!(seed_diagonal(b"ACGT", b"ACGTACGT", 5), None);
        assert_eq!(seed_diagonal(b"ACGTACGT", b"ACGT", 5), None);
        assert_eq!(seed_diagonal(b"ACGT", b"ACGT", 0), None);
    }

    #[test]
    fn test_retry_shorter_kmer() {
        // no shared 6-mer or 4-mer, but there are shared 2-mers (6 -> 4 -> 2)
        assert_eq!(seed_diagonal(b"GGACTT", b"CCACAA", 6), None);
        assert_eq!(seed_diagonal(b"GGACTT", b"CCACAA", 4), None);
        assert_eq!(best_diagonal(b"GGACTT", b"CCACAA", 6), Some(0));
    }

    #[test]
    fn test_retry_exhausted() {
        // nothing in common even as 1-mers
        assert_eq!(best_diagonal(b"AAAAAA", b"CCCCCC", 9), None);
        assert_eq!(best_diagonal(b"", b"ACGT", 4), None);
    }
}

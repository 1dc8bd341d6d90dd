
/// Gapped view of one sequence inside a local alignment.
/// The aligned region covers `source_begin..source_end` of the original sequence, and any gap columns are recorded by their aligned column index.
/// This is the translation layer between alignment columns and positions in the un-gapped source sequence.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GapMap {
    /// First source position covered by the aligned region
    source_begin: usize,
    /// One past the last source position covered by the aligned region
    source_end: usize,
    /// Sorted aligned column indices that hold a gap instead of a source symbol
    gap_columns: Vec<usize>
}

impl GapMap {
    /// Constructor
    /// # Arguments
    /// * `source_begin` - the first source position in the aligned region
    /// * `source_end` - one past the last source position in the aligned region
    /// * `gap_columns` - aligned columns holding a gap, must be strictly increasing
    pub fn new(source_begin: usize, source_end: usize, gap_columns: Vec<usize>) -> GapMap {
        assert!(source_begin <= source_end);
        assert!(gap_columns.windows(2).all(|w| w[0] < w[1]));
        GapMap {
            source_begin,
            source_end,
            gap_columns
        }
    }

    /// Returns the number of aligned columns, counting source symbols and gaps
    pub fn len(&self) -> usize {
        self.source_end - self.source_begin + self.gap_columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Translates an aligned column into a position in the source sequence.
    /// A gap column maps to the source position of the next real symbol, so column 0 is always `source_begin` and column `len()` is always `source_end`.
    /// # Arguments
    /// * `aligned_position` - the column in alignment space, must be <= `len()`
    /// # Examples
    /// ```rust
    /// use contig_merge::gaps::GapMap;
    /// // "AC-GT" aligned from source offset 2
    /// let gaps = GapMap::new(2, 6, vec![2]);
    /// assert_eq!(gaps.to_source_position(0), 2);
    /// assert_eq!(gaps.to_source_position(2), 4);
    /// assert_eq!(gaps.to_source_position(3), 4);
    /// assert_eq!(gaps.to_source_position(5), 6);
    /// ```
    pub fn to_source_position(&self, aligned_position: usize) -> usize {
        assert!(aligned_position <= self.len());
        let gaps_before = self.gap_columns.partition_point(|&g| g < aligned_position);
        self.source_begin + aligned_position - gaps_before
    }

    /// Translates a source position into the aligned column holding that symbol.
    /// `source_end` maps to `len()`.
    /// # Arguments
    /// * `source_position` - a position in `source_begin..=source_end`
    pub fn to_aligned_position(&self, source_position: usize) -> usize {
        assert!((self.source_begin..=self.source_end).contains(&source_position));
        let mut aligned_position = source_position - self.source_begin;
        for &g in self.gap_columns.iter() {
            if g <= aligned_position {
                aligned_position += 1;
            } else {
                break;
            }
        }
        aligned_position
    }

    // Getters
    pub fn source_begin(&self) -> usize {
        self.source_begin
    }

    pub fn source_end(&self) -> usize {
        self.source_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ungapped() {
        let gaps = GapMap::new(3, 7, vec![]);
        assert_eq!(gaps.len(), 4);
        for p in 0..=4 {
            assert_eq!(gaps.to_source_position(p), 3 + p);
            assert_eq!(gaps.to_aligned_position(3 + p), p);
        }
    }

    #[test]
    fn test_interior_gaps() {
        // source symbols s0 s1 - s2 - - s3
        let gaps = GapMap::new(0, 4, vec![2, 4, 5]);
        assert_eq!(gaps.len(), 7);

        let expected_source = [0, 1, 2, 2, 3, 3, 3, 4];
        for (column, &expected) in expected_source.iter().enumerate() {
            assert_eq!(gaps.to_source_position(column), expected);
        }

        // every symbol lands on a non-gap column
        assert_eq!(gaps.to_aligned_position(0), 0);
        assert_eq!(gaps.to_aligned_position(1), 1);
        assert_eq!(gaps.to_aligned_position(2), 3);
        assert_eq!(gaps.to_aligned_position(3), 6);
        assert_eq!(gaps.to_aligned_position(4), 7);
    }

    #[test]
    fn test_leading_gap() {
        let gaps = GapMap::new(5, 7, vec![0]);
        assert_eq!(gaps.to_source_position(0), 5);
        assert_eq!(gaps.to_source_position(1), 5);
        assert_eq!(gaps.to_aligned_position(5), 1);
        assert_eq!(gaps.to_source_position(gaps.len()), 7);
    }

    #[test]
    fn test_empty() {
        let gaps = GapMap::default();
        assert!(gaps.is_empty());
        assert_eq!(gaps.to_source_position(0), 0);
        assert_eq!(gaps.to_aligned_position(0), 0);
    }
}

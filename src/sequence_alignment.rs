
use log::trace;

use crate::gaps::GapMap;

/// Traceback markers for the local alignment matrix
const TB_STOP: u8 = 0;
const TB_DIAG: u8 = 1;
/// Consumes a symbol of `seq_a` against a gap in `seq_b`
const TB_UP: u8 = 2;
/// Consumes a symbol of `seq_b` against a gap in `seq_a`
const TB_LEFT: u8 = 3;

/// Linear scoring scheme for local alignment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scoring {
    /// Score added for two equal symbols, should be positive
    pub match_score: i32,
    /// Score added for two different symbols, should be negative
    pub mismatch_score: i32,
    /// Score added for each gapped column, should be negative
    pub gap_score: i32
}

impl Scoring {
    /// Scoring where mismatches and gaps share a single error score.
    /// # Arguments
    /// * `match_score` - score for a match
    /// * `error_score` - score for either a mismatch or a gap
    pub fn simple(match_score: i32, error_score: i32) -> Scoring {
        Scoring {
            match_score,
            mismatch_score: error_score,
            gap_score: error_score
        }
    }

    fn substitution(&self, a: u8, b: u8) -> i32 {
        if a == b {
            self.match_score
        } else {
            self.mismatch_score
        }
    }
}

/// Restricts the alignment to the diagonals `lower..=upper`, where the diagonal of a cell is its position in `seq_a` minus its position in `seq_b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Band {
    pub lower: isize,
    pub upper: isize
}

impl Band {
    /// Constructor
    /// # Arguments
    /// * `lower` - the lowest diagonal allowed
    /// * `upper` - the highest diagonal allowed, must be >= `lower`
    pub fn new(lower: isize, upper: isize) -> Band {
        assert!(lower <= upper);
        Band { lower, upper }
    }

    /// Creates a band centered on `diagonal` that spans `width` diagonals to either side
    pub fn around(diagonal: isize, width: usize) -> Band {
        let width = width as isize;
        Band::new(diagonal - width, diagonal + width)
    }

    fn contains(&self, diagonal: isize) -> bool {
        self.lower <= diagonal && diagonal <= self.upper
    }
}

/// Result of a local alignment, consumed once by the caller
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalAlignment {
    /// Total score of the aligned region
    score: i32,
    /// Gapped view of the first sequence
    gaps_a: GapMap,
    /// Gapped view of the second sequence
    gaps_b: GapMap
}

impl LocalAlignment {
    // Getters
    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn gaps_a(&self) -> &GapMap {
        &self.gaps_a
    }

    pub fn gaps_b(&self) -> &GapMap {
        &self.gaps_b
    }
}

/// Traceback storage that only keeps the cells a band (or the full matrix) can reach.
/// Rows follow `seq_a` and columns follow `seq_b`, both with the usual leading zero row/column.
struct TracebackMatrix {
    /// Per-cell traceback markers, `width` cells per row
    cells: Vec<u8>,
    /// Number of stored cells per row
    width: usize,
    /// Optional band; if None, every column is stored
    band: Option<Band>
}

impl TracebackMatrix {
    fn new(rows: usize, cols: usize, band: Option<Band>) -> TracebackMatrix {
        let width = match band {
            Some(b) => (b.upper - b.lower + 1) as usize,
            None => cols
        };
        TracebackMatrix {
            cells: vec![TB_STOP; rows * width],
            width,
            band
        }
    }

    /// Returns the storage index for a cell, or None if the band excludes it
    fn index(&self, i: usize, j: usize) -> Option<usize> {
        let column = match self.band {
            Some(b) => {
                // the first stored column of row i is the one on diagonal `upper`
                let offset = j as isize - (i as isize - b.upper);
                if offset < 0 || offset >= self.width as isize {
                    return None;
                }
                offset as usize
            },
            None => j
        };
        Some(i * self.width + column)
    }

    fn get(&self, i: usize, j: usize) -> u8 {
        match self.index(i, j) {
            Some(idx) => self.cells[idx],
            None => TB_STOP
        }
    }

    fn set(&mut self, i: usize, j: usize, value: u8) {
        let idx = self.index(i, j).unwrap_or_else(|| panic!("cell ({i}, {j}) is outside the band"));
        self.cells[idx] = value;
    }
}

/// Computes an optimal local alignment (Smith-Waterman, linear gaps) between two sequences.
/// If a band is provided, only cells whose diagonal (`i - j`) lies inside it are explored.
/// The best cell is the first maximum encountered in row-major order; traceback prefers a diagonal step, then a gap in `seq_b`, then a gap in `seq_a`.
/// An alignment with score 0 is empty and anchored at the start of both sequences.
/// # Arguments
/// * `seq_a` - the first sequence, rows of the matrix
/// * `seq_b` - the second sequence, columns of the matrix
/// * `scoring` - the scoring scheme
/// * `band` - optional diagonal band
/// # Examples
/// ```rust
/// use contig_merge::sequence_alignment::{local_alignment, Scoring};
/// let alignment = local_alignment(b"GGGACGTGGG", b"ACGT", &Scoring::simple(1, -1), None);
/// assert_eq!(alignment.score(), 4);
/// assert_eq!(alignment.gaps_a().source_begin(), 3);
/// assert_eq!(alignment.gaps_a().source_end(), 7);
/// ```
pub fn local_alignment(seq_a: &[u8], seq_b: &[u8], scoring: &Scoring, band: Option<Band>) -> LocalAlignment {
    let rows = seq_a.len() + 1;
    let cols = seq_b.len() + 1;
    let in_band = |i: usize, j: usize| -> bool {
        band.map_or(true, |b| b.contains(i as isize - j as isize))
    };

    // rolling score rows; row 0 and column 0 are the local alignment boundary
    let mut prev_row: Vec<i32> = vec![0; cols];
    let mut curr_row: Vec<i32> = vec![0; cols];
    let mut traceback = TracebackMatrix::new(rows, cols, band);

    let mut best_score = 0;
    let mut best_cell = (0, 0);

    for i in 1..rows {
        // restrict the columns to those the band can reach in this row
        let (j_start, j_end) = match band {
            Some(b) => {
                let lo = (i as isize - b.upper).max(1);
                let hi = (i as isize - b.lower).min(cols as isize - 1);
                (lo, hi)
            },
            None => (1, cols as isize - 1)
        };

        curr_row[0] = 0;
        if j_start > j_end {
            std::mem::swap(&mut prev_row, &mut curr_row);
            continue;
        }
        let (j_start, j_end) = (j_start as usize, j_end as usize);

        for j in j_start..=j_end {
            let mut score = 0;
            let mut direction = TB_STOP;

            // neighbors on the boundary are always zero, neighbors outside the band are unreachable
            let diag_prev = if i == 1 || j == 1 { Some(0) } else if in_band(i - 1, j - 1) { Some(prev_row[j - 1]) } else { None };
            if let Some(d) = diag_prev {
                let candidate = d + scoring.substitution(seq_a[i - 1], seq_b[j - 1]);
                if candidate > score {
                    score = candidate;
                    direction = TB_DIAG;
                }
            }

            let up_prev = if i == 1 { Some(0) } else if in_band(i - 1, j) { Some(prev_row[j]) } else { None };
            if let Some(u) = up_prev {
                let candidate = u + scoring.gap_score;
                if candidate > score {
                    score = candidate;
                    direction = TB_UP;
                }
            }

            let left_prev = if j == 1 { Some(0) } else if in_band(i, j - 1) { Some(curr_row[j - 1]) } else { None };
            if let Some(l) = left_prev {
                let candidate = l + scoring.gap_score;
                if candidate > score {
                    score = candidate;
                    direction = TB_LEFT;
                }
            }

            curr_row[j] = score;
            traceback.set(i, j, direction);

            if score > best_score {
                best_score = score;
                best_cell = (i, j);
            }
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    if best_score <= 0 {
        trace!("local_alignment: no positive scoring cell");
        return LocalAlignment::default();
    }

    // walk back from the best cell, collecting the operations in reverse
    let (end_a, end_b) = best_cell;
    let (mut i, mut j) = best_cell;
    let mut reverse_ops: Vec<u8> = vec![];
    loop {
        let direction = traceback.get(i, j);
        match direction {
            TB_DIAG => {
                i -= 1;
                j -= 1;
            },
            TB_UP => {
                i -= 1;
            },
            TB_LEFT => {
                j -= 1;
            },
            _ => break
        }
        reverse_ops.push(direction);
    }

    // convert the operations into gap columns for each side
    let mut gap_columns_a = vec![];
    let mut gap_columns_b = vec![];
    for (column, &op) in reverse_ops.iter().rev().enumerate() {
        match op {
            TB_UP => gap_columns_b.push(column),
            TB_LEFT => gap_columns_a.push(column),
            _ => {}
        }
    }

    trace!("local_alignment: score={best_score}, a={i}..{end_a}, b={j}..{end_b}, columns={}", reverse_ops.len());
    LocalAlignment {
        score: best_score,
        gaps_a: GapMap::new(i, end_a, gap_columns_a),
        gaps_b: GapMap::new(j, end_b, gap_columns_b)
    }
}

/*!
This module provides access to the SequenceMerger, which collapses a group of highly similar contigs into a minimal set of merged sequences.
The first sequence seeds a ComponentGraph; every following sequence is aligned against all current paths and then either extends the best path or branches off of it.

# Example usage
```rust
use contig_merge::merge::SequenceMerger;
use contig_merge::merge_config::MergeConfigBuilder;

let sequences = [
    b"AAAACCCCTTTT".to_vec(),
    b"CCCCTTTTGGGG".to_vec(), // overlaps the end of the first, so it extends it
    b"AAAACCCCTTTTGGAACCTT".to_vec() // diverges after the shared region, so it branches
];

let config = MergeConfigBuilder::default()
    .min_branch_len(2)
    .match_score(5)
    .error_penalty(-1)
    .qgram_length(4)
    .build().unwrap();
let mut merger = SequenceMerger::with_config(config).unwrap();
for s in sequences.iter() {
    merger.add_sequence(s).unwrap();
}

let merged = merger.merge().unwrap();
assert_eq!(merged, vec![
    b"AAAACCCCTTTTGGGG".to_vec(),
    b"AAAACCCCTTTTGGAACCTT".to_vec()
]);
```
*/

use log::{debug, info, trace, warn};
use simple_error::bail;
use std::fmt;

use crate::component_graph::ComponentGraph;
use crate::diagonal::best_diagonal;
use crate::merge_config::MergeConfig;
use crate::path::Path;
use crate::sequence_alignment::{local_alignment, Band, LocalAlignment, Scoring};

/// Error reported when a group branches into more paths than the configured maximum.
/// The merge of the whole group is abandoned; no partial result exists.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComplexityExceeded {
    /// Index of the input sequence that was about to be merged
    step: usize,
    /// Number of paths observed in the graph
    num_paths: usize,
    /// The configured maximum
    max_paths: usize
}

impl ComplexityExceeded {
    // Getters
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn num_paths(&self) -> usize {
        self.num_paths
    }

    pub fn max_paths(&self) -> usize {
        self.max_paths
    }
}

impl fmt::Display for ComplexityExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component graph has {} paths (maximum {}) before merging sequence {}", self.num_paths, self.max_paths, self.step)
    }
}

impl std::error::Error for ComplexityExceeded {}

/// Core utility that merges an ordered group of sequences into a branching graph and reads the merged sequences back out.
/// Input order matters: the first sequence is always the seed, and branches are discovered first-come.
#[derive(Debug, Default)]
pub struct SequenceMerger<'a> {
    /// Contains all the sequences that have been added so far, in merge order
    sequences: Vec<&'a [u8]>,
    /// The config for this merge
    config: MergeConfig
}

impl<'a> SequenceMerger<'a> {
    /// Creates a new instance of SequenceMerger and performs sanity checks on the config.
    /// # Arguments
    /// * `config` - the merge parameters
    /// # Errors
    /// * if the scoring scheme cannot produce a positive local alignment, or the k-mer length or path cap is zero
    pub fn with_config(config: MergeConfig) -> Result<SequenceMerger<'a>, Box<dyn std::error::Error>> {
        if config.match_score <= 0 {
            bail!("match_score must be positive, got {}", config.match_score);
        }
        if config.error_penalty >= 0 {
            bail!("error_penalty must be negative, got {}", config.error_penalty);
        }
        if config.qgram_length == 0 {
            bail!("qgram_length must be at least 1");
        }
        if config.max_paths == 0 {
            bail!("max_paths must be at least 1");
        }
        Ok(SequenceMerger {
            sequences: vec![],
            config
        })
    }

    /// Adds a new sequence to the end of the group.
    /// # Arguments
    /// * `sequence` - the new sequence to add
    /// # Errors
    /// * if the sequence is empty
    pub fn add_sequence(&mut self, sequence: &'a [u8]) -> Result<(), Box<dyn std::error::Error>> {
        if sequence.is_empty() {
            bail!("Cannot merge an empty sequence (index {}).", self.sequences.len());
        }
        self.sequences.push(sequence);
        Ok(())
    }

    /// Builds the component graph by seeding it with the first sequence and merging every other sequence in order.
    /// # Errors
    /// * if no sequences were added
    /// * if the number of paths exceeds the configured maximum before any merge step, see `ComplexityExceeded`
    pub fn build_graph(&self) -> Result<ComponentGraph, Box<dyn std::error::Error>> {
        if self.sequences.is_empty() {
            bail!("Must have at least one sequence to merge.");
        }

        let mut graph = ComponentGraph::new(self.sequences[0]);
        for (step, &sequence) in self.sequences.iter().enumerate().skip(1) {
            self.merge_sequence(&mut graph, sequence, step)?;
        }

        debug!("build_graph: {} sequences -> {} vertices, {} edges, {} sources", self.sequences.len(), graph.num_vertices(), graph.num_edges(), graph.sources().len());
        Ok(graph)
    }

    /// The core function that gets called after adding all the sequences.
    /// Returns one merged sequence per source-to-sink path of the final graph, in enumeration order.
    /// # Errors
    /// * if no sequences were added
    /// * if the group is too complex to merge, see `ComplexityExceeded`
    pub fn merge(&self) -> Result<Vec<Vec<u8>>, Box<dyn std::error::Error>> {
        let graph = self.build_graph()?;

        if self.config.verbose && graph.num_vertices() > 1 {
            for line in graph.to_string().lines() {
                info!("{line}");
            }
        }

        let merged: Vec<Vec<u8>> = graph.enumerate_paths().into_iter()
            .map(|p| p.into_sequence())
            .collect();
        debug!("merge: {} sequences -> {} merged sequences", self.sequences.len(), merged.len());
        Ok(merged)
    }

    /// Merges one sequence into the graph: selects the best-scoring path and applies that alignment.
    /// # Arguments
    /// * `graph` - the graph to update
    /// * `sequence` - the sequence being merged
    /// * `step` - index of the sequence in the group, for reporting
    /// # Errors
    /// * if the graph has more paths than allowed
    /// * if the alignment cannot be applied to the graph
    fn merge_sequence(&self, graph: &mut ComponentGraph, sequence: &[u8], step: usize) -> Result<(), Box<dyn std::error::Error>> {
        let num_paths = graph.count_paths();
        if num_paths > self.config.max_paths {
            debug!("merge_sequence: aborting at step {step} with {num_paths} paths");
            return Err(Box::new(ComplexityExceeded {
                step,
                num_paths,
                max_paths: self.config.max_paths
            }));
        }

        let paths = graph.enumerate_paths();
        debug_assert_eq!(paths.len(), num_paths);

        match self.best_path_alignment(&paths, sequence) {
            Some((path_index, alignment)) => {
                debug!("merge_sequence: step {step} best path {path_index}/{num_paths}, score {}", alignment.score());
                apply_alignment(graph, &paths[path_index], sequence, &alignment, self.config.min_branch_len)?;
            },
            None => {
                warn!("Sequence {step} has no positive local alignment to any path, it was not merged.");
            }
        }
        Ok(())
    }

    /// Aligns `sequence` against every path and returns the first path with the strictly highest score.
    /// Returns None if no path reaches a positive score.
    /// # Arguments
    /// * `paths` - the current paths in enumeration order
    /// * `sequence` - the sequence being merged
    fn best_path_alignment(&self, paths: &[Path], sequence: &[u8]) -> Option<(usize, LocalAlignment)> {
        let scoring = Scoring::simple(self.config.match_score, self.config.error_penalty);
        let mut best: Option<(usize, LocalAlignment)> = None;

        for (path_index, path) in paths.iter().enumerate() {
            // the diagonal is path offset minus sequence offset, which matches the band orientation below
            let diagonal = best_diagonal(sequence, path.sequence(), self.config.qgram_length);
            let band = diagonal.map(|d| Band::around(d, self.config.band_width));
            let alignment = local_alignment(path.sequence(), sequence, &scoring, band);
            trace!("best_path_alignment: path {path_index} (len {}) diagonal {diagonal:?} score {}", path.len(), alignment.score());

            let is_better = match best.as_ref() {
                Some((_, best_alignment)) => alignment.score() > best_alignment.score(),
                None => true
            };
            if is_better {
                best = Some((path_index, alignment));
            }
        }

        best.filter(|(_, alignment)| alignment.score() > 0)
    }

    // getters
    pub fn sequences(&self) -> &[&'a [u8]] {
        &self.sequences
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }
}

/// Convenience wrapper that merges a group in one call.
/// # Arguments
/// * `sequences` - the ordered group, the first entry is the seed
/// * `config` - the merge parameters
/// # Errors
/// * if the config or any sequence is invalid
/// * if the group is too complex to merge, see `ComplexityExceeded`
pub fn merge_sequences<S: AsRef<[u8]>>(sequences: &[S], config: &MergeConfig) -> Result<Vec<Vec<u8>>, Box<dyn std::error::Error>> {
    let mut merger = SequenceMerger::with_config(config.clone())?;
    for sequence in sequences.iter() {
        merger.add_sequence(sequence.as_ref())?;
    }
    merger.merge()
}

/// Applies a winning alignment to the graph.
/// An unaligned 3' tail extends the last vertex when the alignment reaches the end of the path.
/// Otherwise it becomes a branch if it is longer than `min_branch_len` and is trimmed if not.
/// The 5' head is handled the same way against the start of the path, with new branches registered as sources.
/// Vertex offsets are derived from the locus start, which the 3' changes never move, so both ends can be resolved against the same path snapshot.
/// # Arguments
/// * `graph` - the graph to update
/// * `path` - the path the alignment was computed against, as enumerated before this call
/// * `sequence` - the sequence being merged
/// * `alignment` - the local alignment of (`path`, `sequence`)
/// * `min_branch_len` - overhangs must be strictly longer than this to branch
/// # Errors
/// * if an alignment boundary does not fall on the path
fn apply_alignment(graph: &mut ComponentGraph, path: &Path, sequence: &[u8], alignment: &LocalAlignment, min_branch_len: usize) -> Result<(), Box<dyn std::error::Error>> {
    let gaps_path = alignment.gaps_a();
    let gaps_seq = alignment.gaps_b();

    // 3' end of the alignment
    let align_end_seq = gaps_seq.to_source_position(gaps_seq.len());
    let align_end_path = gaps_path.to_source_position(gaps_path.len());

    if align_end_seq < sequence.len() {
        let overhang = &sequence[align_end_seq..];

        if align_end_path == path.len() {
            let last = match path.last_vertex() {
                Some(v) => v,
                None => bail!("Cannot extend an empty path")
            };
            trace!("apply_alignment: extending vertex {last} by {} bases", overhang.len());
            graph.append_to_label(last, overhang);
        } else if overhang.len() > min_branch_len {
            let locus = match path.locus_ending_at_or_after(align_end_path) {
                Some(l) => l,
                None => bail!("Alignment end {align_end_path} is past the end of a path of length {}", path.len())
            };
            if locus.end > align_end_path {
                // the alignment ends inside the label; the locus vertex keeps the prefix
                graph.split_vertex_at(locus.vertex, locus.offset_of(align_end_path))?;
            }
            let branch = graph.add_vertex(overhang.to_vec());
            graph.add_edge(locus.vertex, branch);
            debug!("apply_alignment: 3' branch vertex {branch} ({} bases) after vertex {}", overhang.len(), locus.vertex);
        } else {
            trace!("apply_alignment: trimming {} base 3' overhang", overhang.len());
        }
    }

    // 5' end of the alignment
    let align_begin_seq = gaps_seq.to_source_position(0);
    let align_begin_path = gaps_path.to_source_position(0);

    if align_begin_seq > 0 {
        let locus = match path.locus_containing(align_begin_path) {
            Some(l) => l,
            None => bail!("Alignment begin {align_begin_path} is past the end of a path of length {}", path.len())
        };
        let overhang = &sequence[..align_begin_seq];

        if align_begin_path == 0 {
            trace!("apply_alignment: extending vertex {} by {} leading bases", locus.vertex, overhang.len());
            graph.prepend_to_label(locus.vertex, overhang);
        } else if overhang.len() > min_branch_len {
            let entry = if locus.start < align_begin_path {
                // the alignment starts inside the label; the branch joins the new suffix vertex
                graph.split_vertex_at(locus.vertex, locus.offset_of(align_begin_path))?
            } else {
                locus.vertex
            };
            let branch = graph.add_vertex(overhang.to_vec());
            graph.add_source(branch);
            graph.add_edge(branch, entry);
            debug!("apply_alignment: 5' source vertex {branch} ({} bases) before vertex {entry}", overhang.len());
        } else {
            trace!("apply_alignment: trimming {} base 5' overhang", overhang.len());
        }
    }

    Ok(())
}

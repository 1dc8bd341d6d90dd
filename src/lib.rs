/*!
# contig_merge
This library merges groups of highly similar contigs (e.g., assemblies of the same insertion from different samples) into a minimal set of representative sequences.
Sequences are folded one at a time into a branching component graph; the merged sequences are the source-to-sink paths of that graph.

Key benefits:
* Overlapping contigs collapse into a single longer sequence
* Divergent alleles are kept as separate branches that share their common sequence
* Short divergent ends are treated as noise and trimmed away

Performance notes:
* Every input is aligned against every current path, so groups that branch repeatedly get expensive; merging is abandoned once the path count exceeds a configured maximum
* Alignments are banded around a k-mer seeded diagonal, so large indels relative to the seed are not recovered

# Example usage
```rust
use contig_merge::merge::SequenceMerger;
use contig_merge::merge_config::MergeConfigBuilder;

let sequences = [
    b"AAAACCCCTTTT".to_vec(),
    b"AAAACCCCGGGG".to_vec() // shares the first 8 bases, then diverges
];

let config = MergeConfigBuilder::default()
    .min_branch_len(2)
    .match_score(5)
    .error_penalty(-1)
    .qgram_length(4)
    .build().unwrap();

// add all the sequences
let mut merger = SequenceMerger::with_config(config).unwrap();
for s in sequences.iter() {
    merger.add_sequence(s).unwrap();
}

// run the merge and check the results
let merged = merger.merge().unwrap();
assert_eq!(merged.len(), 2);
assert_eq!(merged[0], sequences[0]);
assert_eq!(merged[1], sequences[1]);
```
*/

/// Branching graph of sequence fragments
pub mod component_graph;
/// K-mer voting for the best alignment diagonal
pub mod diagonal;
/// Utility for generating examples
pub mod example_gen;
/// Gap bookkeeping for aligned sequences
pub mod gaps;
/// Main functionality for merging a group of sequences
pub mod merge;
/// Configuration for SequenceMerger
pub mod merge_config;
/// Paths through the component graph
pub mod path;
/// Banded local pair-wise alignment
pub mod sequence_alignment;

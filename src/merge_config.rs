/*!
Contains configuration information for the sequence merge.
Typical usage is to the use the builder to construct the config, e.g.
```
use contig_merge::merge_config::{MergeConfig, MergeConfigBuilder};
let config: MergeConfig = MergeConfigBuilder::default()
    .min_branch_len(20)
    .qgram_length(21)
    .build()
    .unwrap();
assert_eq!(config.max_paths, 30);
```
*/

/**
Contains configuration information for the sequence merge.
Typical usage is to the use the builder to construct the config, e.g.
```
use contig_merge::merge_config::{MergeConfig, MergeConfigBuilder};
let config: MergeConfig = MergeConfigBuilder::default()
    .match_score(5)
    .error_penalty(-1)
    .verbose(true)
    .build()
    .unwrap();
```
*/
#[derive(derive_builder::Builder, Clone, Debug)]
#[builder(default)]
pub struct MergeConfig {
    /// Unaligned overhangs longer than this become a new branch, shorter ones are trimmed away
    pub min_branch_len: usize,
    /// Alignment score for two matching symbols, must be positive
    pub match_score: i32,
    /// Alignment score for a mismatch or a gap, must be negative
    pub error_penalty: i32,
    /// Initial k-mer length for the diagonal search
    pub qgram_length: usize,
    /// Number of diagonals on either side of the seed diagonal that the banded alignment explores
    pub band_width: usize,
    /// Maximum number of paths allowed in the graph before a merge is abandoned
    pub max_paths: usize,
    /// If true, the final graph structure is logged at info level
    pub verbose: bool
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            // contigs rarely diverge for less than this unless it is assembly noise
            min_branch_len: 50,
            match_score: 1,
            error_penalty: -5,
            // long enough to be unique in an insertion, shrinks automatically if it finds nothing
            qgram_length: 47,
            band_width: 25,
            // repeated branching beyond this is treated as an unmergeable group
            max_paths: 30,
            verbose: false
        }
    }
}

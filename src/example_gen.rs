
use rand::distributions::Uniform;
use rand::{Rng, SeedableRng};

/// Creates a group of overlapping contigs we can verify merging on.
/// All alleles share their first three quarters; every allele after the first replaces the last quarter with fresh random sequence.
/// Each sample is a window of one allele (assigned round-robin) that starts in the first quarter and ends in the last quarter, so any two samples of the same allele overlap by at least half the allele.
/// Returns a tuple of (alleles, samples).
/// # Arguments
/// * `alphabet_size` - the length of the alphabet, e.g. for DNA it's 4
/// * `seq_len` - the length of each allele, at least 4
/// * `num_samples` - the number of windows to generate
/// * `num_alleles` - the number of distinct alleles to draw the windows from
pub fn generate_test(alphabet_size: u8, seq_len: usize, num_samples: usize, num_alleles: usize) -> (Vec<Vec<u8>>, Vec<Vec<u8>>) {
    assert!(alphabet_size > 1);
    assert!(seq_len >= 4);
    assert!(num_alleles > 0);

    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    let base_distribution = Uniform::new(0, alphabet_size);
    let quarter = seq_len / 4;
    let shared_len = seq_len - quarter;
    assert!((alphabet_size as f64).powi(quarter as i32) >= num_alleles as f64, "not enough distinct tails for {num_alleles} alleles");

    let shared: Vec<u8> = (0..shared_len)
        .map(|_i| rng.sample(base_distribution))
        .collect();

    let mut first_allele = shared.clone();
    first_allele.extend((0..quarter).map(|_i| rng.sample(base_distribution)));
    let mut alleles = vec![first_allele];
    while alleles.len() < num_alleles {
        let mut allele = shared.clone();
        allele.extend((0..quarter).map(|_i| rng.sample(base_distribution)));
        // identical tails would collapse into one allele
        if !alleles.contains(&allele) {
            alleles.push(allele);
        }
    }

    let start_distribution = Uniform::new(0, quarter);
    let end_distribution = Uniform::new_inclusive(seq_len - quarter + 1, seq_len);
    let samples: Vec<Vec<u8>> = (0..num_samples)
        .map(|i| {
            let start = rng.sample(start_distribution);
            let end = rng.sample(end_distribution);
            alleles[i % num_alleles][start..end].to_vec()
        })
        .collect();

    (alleles, samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_shapes() {
        let (alleles, samples) = generate_test(4, 100, 9, 3);
        assert_eq!(alleles.len(), 3);
        assert!(alleles.iter().all(|a| a.len() == 100));
        assert!(alleles.iter().all(|a| a[..75] == alleles[0][..75]));
        assert_ne!(alleles[0][75..], alleles[1][75..]);

        assert_eq!(samples.len(), 9);
        for (i, sample) in samples.iter().enumerate() {
            assert!(sample.len() > 50);
            let allele = &alleles[i % 3];
            assert!(allele.windows(sample.len()).any(|w| w == sample.as_slice()));
        }
    }
}

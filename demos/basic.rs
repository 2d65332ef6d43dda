//! Basic example demonstrating sparse-kmeans usage
//!
//! Run with: cargo run --example basic --release

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sparse_kmeans::{Dataset, KMeansConfig, SparseKMeans, SparseVector};

fn main() {
    println!("=== sparse-kmeans example ===\n");

    // Three "topics", each with its own small vocabulary of feature ids
    let topics: [(&str, std::ops::Range<u64>); 3] =
        [("sports", 0..20), ("cooking", 100..120), ("finance", 200..220)];
    let n_per_topic = 100;

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut dataset = Dataset::new();
    for (name, vocab) in topics.iter() {
        for i in 0..n_per_topic {
            let vector: SparseVector = (0..8)
                .map(|_| (rng.gen_range(vocab.clone()), rng.gen_range(0.5..2.0)))
                .collect();
            dataset.push(format!("{}-{}", name, i), vector);
        }
    }

    println!(
        "Generated {} records over {} topics\n",
        dataset.len(),
        topics.len()
    );

    let config = KMeansConfig::new(topics.len()).with_max_iters(20).with_seed(42);

    println!("Running k-means with k={}...\n", config.k);

    let mut kmeans = SparseKMeans::with_config(config);
    let clustering = kmeans.fit_predict(&dataset).expect("Training failed");

    println!(
        "{:?} after {} iterations, inertia {:.3}\n",
        clustering.termination, clustering.n_iterations, clustering.inertia
    );

    // Count samples per cluster
    let mut cluster_counts = vec![0usize; topics.len()];
    for &label in clustering.labels.iter() {
        cluster_counts[label] += 1;
    }

    println!("Cluster distribution:");
    for (i, count) in cluster_counts.iter().enumerate() {
        println!("  Cluster {}: {} records", i, count);
    }
    println!();

    // Show a few assignments from each topic
    println!("Sample assignments:");
    for (label, cluster) in clustering.assignments(&dataset).step_by(n_per_topic / 4) {
        println!("  {} -> Cluster {}", label, cluster);
    }

    println!("\n=== Done! ===");
}

use ellpack_lsolver::{
    algorithms::{Jacobi, SolveAlgorithm},
    EllpackMatrix, Triplet,
};
use std::time::Instant;

/// Creates a pentadiagonal sparse matrix A of size n x n.
/// Diagonals:
/// - Main: 4.0
/// - Adjacent (+1, -1): -1.0
/// - Outer (+2, -2): -0.5
fn create_pentadiagonal_matrix(n: usize) -> EllpackMatrix {
    let mut triplets = Vec::new();

    for i in 0..n {
        // Diagonal -2
        if i >= 2 {
            triplets.push(Triplet::new(i, i - 2, -0.5));
        }
        // Diagonal -1
        if i >= 1 {
            triplets.push(Triplet::new(i, i - 1, -1.0));
        }
        // Main Diagonal
        triplets.push(Triplet::new(i, i, 4.0));
        // Diagonal +1
        if i + 1 < n {
            triplets.push(Triplet::new(i, i + 1, -1.0));
        }
        // Diagonal +2
        if i + 2 < n {
            triplets.push(Triplet::new(i, i + 2, -0.5));
        }
    }

    EllpackMatrix::from_triplets(n, n, 5, triplets)
        .expect("Failed to assemble pentadiagonal matrix")
}

/// Creates a vector b of size n with b[i] = sin(i / n).
fn create_sin_vector(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i as f64 / n as f64).sin()).collect()
}

fn main() {
    // Initialize logging based on RUST_LOG environment variable
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let n = 500;
    log::info!(
        "Setting up {}x{} pentadiagonal matrix A and sin vector b...",
        n,
        n
    );

    let a = create_pentadiagonal_matrix(n);
    let b = create_sin_vector(n);

    let tolerance = 1e-8;
    let max_iterations = n * 5; // A common heuristic
    let algorithm = Jacobi::with_params(tolerance, max_iterations);

    log::info!("Starting solve...");
    let start_time = Instant::now();
    let x_result = algorithm.solve(&a, &b).and_then(|result| result.ensure_converged());
    let duration = start_time.elapsed();

    match x_result {
        Ok(result) => {
            log::info!("Solver finished successfully!");
            log::info!("  Iterations: {}", result.metadata.iterations);
            log::info!(
                "  Final Residual Norm: {:.6e}",
                result.metadata.residual_norm
            );
            log::info!("  Time elapsed: {:?}", duration);
            log::debug!("Solution vector x (first 10 elements): {:?}", &result.x[..10.min(n)]);
        }
        Err(e) => {
            log::error!("Solver failed: {}", e);
        }
    }
}

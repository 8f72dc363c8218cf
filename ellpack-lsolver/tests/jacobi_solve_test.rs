use ellpack_lsolver::{
    algorithms::{Jacobi, SolveAlgorithm},
    EllpackError, EllpackMatrix, Triplet,
};

// Helper for float comparison in tests
fn assert_approx_eq_vec(a: &[f64], b: &[f64], tolerance: f64) {
    assert_eq!(a.len(), b.len(), "Vector lengths differ");
    for i in 0..a.len() {
        let diff = (a[i] - b[i]).abs();
        assert!(
            diff <= tolerance,
            "Verification failed at index {}: expected {}, got {}, diff {}",
            i,
            b[i],
            a[i],
            diff
        );
    }
}

fn symmetric_system() -> Result<EllpackMatrix, EllpackError> {
    EllpackMatrix::from_dense(&[
        vec![4.0, -1.0, 0.0],
        vec![-1.0, 4.0, -1.0],
        vec![0.0, -1.0, 4.0],
    ])
}

#[test]
fn test_jacobi_symmetric() -> Result<(), EllpackError> {
    let a = symmetric_system()?;
    let b = vec![15.0, 10.0, 10.0];

    let result = Jacobi::default().solve(&a, &b)?;

    assert!(result.metadata.converged);
    assert!(result.metadata.iterations > 0);
    assert!(result.metadata.residual_norm < 1e-10);
    assert_approx_eq_vec(&a.mul_vec(&result.x)?, &b, 1e-6);
    // 4x0 - x1 = 15, -x0 + 4x1 - x2 = 10, -x1 + 4x2 = 10
    assert_approx_eq_vec(&result.x, &[275.0 / 56.0, 65.0 / 14.0, 205.0 / 56.0], 1e-8);
    Ok(())
}

#[test]
fn test_jacobi_non_symmetric() -> Result<(), EllpackError> {
    // Same as the symmetric system, without the (2, 1) entry
    let mut a = EllpackMatrix::new(3, 3, 3)?;
    a.insert(0, 0, 4.0)?;
    a.insert(0, 1, -1.0)?;
    a.insert(1, 0, -1.0)?;
    a.insert(1, 1, 4.0)?;
    a.insert(1, 2, -1.0)?;
    a.insert(2, 2, 4.0)?;
    let b = vec![15.0, 10.0, 10.0];

    let result = Jacobi::default().solve(&a, &b)?.ensure_converged()?;

    assert_approx_eq_vec(&a.mul_vec(&result.x)?, &b, 1e-6);
    assert_approx_eq_vec(&result.x, &[29.0 / 6.0, 13.0 / 3.0, 2.5], 1e-8);
    Ok(())
}

#[test]
fn test_jacobi_first_sweep_is_synchronous() -> Result<(), EllpackError> {
    // From x = 0 a single Jacobi sweep gives b / diag(A).
    // Gauss-Seidel would already use the updated x0 in row 1.
    let a = symmetric_system()?;
    let b = vec![15.0, 10.0, 10.0];

    let result = Jacobi::with_params(1e-10, 1).solve(&a, &b)?;

    assert_eq!(result.metadata.iterations, 1);
    assert!(!result.metadata.converged);
    assert_eq!(result.x, vec![3.75, 2.5, 2.5]);
    Ok(())
}

#[test]
fn test_jacobi_non_convergence() -> Result<(), EllpackError> {
    let a = symmetric_system()?;
    let b = vec![15.0, 10.0, 10.0];

    let result = Jacobi::with_params(1e-12, 3).solve(&a, &b)?;
    assert!(!result.metadata.converged);
    assert_eq!(result.metadata.iterations, 3);
    assert!(result.metadata.residual_norm >= 1e-12);
    // The approximate iterate is still available
    assert_eq!(result.x.len(), 3);

    match result.ensure_converged() {
        Err(EllpackError::NonConvergence {
            iterations,
            tolerance,
            ..
        }) => {
            assert_eq!(iterations, 3);
            assert_eq!(tolerance, 1e-12);
        }
        other => panic!("Expected NonConvergence error, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_jacobi_missing_diagonal() -> Result<(), EllpackError> {
    let a = EllpackMatrix::from_dense(&[
        vec![4.0, -1.0, 0.0],
        vec![-1.0, 0.0, -1.0],
        vec![0.0, -1.0, 4.0],
    ])?;

    let result = Jacobi::default().solve(&a, &[1.0, 1.0, 1.0]);
    assert_eq!(result.err(), Some(EllpackError::MissingDiagonal { row: 1 }));
    Ok(())
}

#[test]
fn test_jacobi_divergence_is_reported() -> Result<(), EllpackError> {
    // Not diagonally dominant: the Jacobi iterates grow without bound
    let a = EllpackMatrix::from_dense(&[vec![1.0, 2.0], vec![2.0, 1.0]])?;

    let result = Jacobi::with_params(1e-10, 5000).solve(&a, &[3.0, 3.0]);
    match result {
        Err(EllpackError::NumericalBreakdown { iteration, .. }) => {
            assert!(iteration > 0 && iteration < 5000)
        }
        other => panic!("Expected NumericalBreakdown error, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_jacobi_weighted() -> Result<(), EllpackError> {
    let a = symmetric_system()?;
    let b = vec![15.0, 10.0, 10.0];

    let plain = Jacobi::default().solve(&a, &b)?;
    let weighted = Jacobi::default().with_omega(0.8).solve(&a, &b)?;

    assert!(weighted.metadata.converged);
    assert_approx_eq_vec(&weighted.x, &plain.x, 1e-8);
    assert_ne!(weighted.metadata.iterations, plain.metadata.iterations);
    Ok(())
}

#[test]
fn test_jacobi_initial_guess() -> Result<(), EllpackError> {
    let a = symmetric_system()?;
    let b = vec![15.0, 10.0, 10.0];
    let exact = [275.0 / 56.0, 65.0 / 14.0, 205.0 / 56.0];

    let result = Jacobi::default().solve_from(&a, &b, &exact)?;
    assert!(result.metadata.converged);
    assert_eq!(result.metadata.iterations, 0);
    assert_approx_eq_vec(&result.x, &exact, 1e-12);

    let wrong_length = Jacobi::default().solve_from(&a, &b, &[0.0, 0.0]);
    assert!(matches!(
        wrong_length,
        Err(EllpackError::InvalidDimensions(_))
    ));
    Ok(())
}

#[test]
fn test_jacobi_invalid_inputs() -> Result<(), EllpackError> {
    let a = symmetric_system()?;

    match Jacobi::default().solve(&a, &[1.0, 2.0]) {
        Err(EllpackError::InvalidDimensions(msg)) => assert!(msg.contains("RHS")),
        other => panic!("Expected InvalidDimensions error, got {:?}", other),
    }

    let rectangular = EllpackMatrix::from_triplets(2, 3, 2, vec![Triplet::new(0, 0, 1.0)])?;
    match Jacobi::default().solve(&rectangular, &[1.0, 2.0]) {
        Err(EllpackError::InvalidDimensions(msg)) => assert!(msg.contains("square")),
        other => panic!("Expected InvalidDimensions error, got {:?}", other),
    }

    let b = [1.0, 1.0, 1.0];
    assert_eq!(
        Jacobi::with_params(0.0, 10).solve(&a, &b).err(),
        Some(EllpackError::InvalidParameter {
            name: "tolerance",
            value: 0.0
        })
    );
    assert_eq!(
        Jacobi::default().with_omega(1.5).solve(&a, &b).err(),
        Some(EllpackError::InvalidParameter {
            name: "omega",
            value: 1.5
        })
    );
    Ok(())
}

#[test]
fn test_jacobi_assembled_single_precision() -> Result<(), EllpackError> {
    // 1D Laplacian-like stencil assembled element by element
    let n = 6;
    let mut triplets = Vec::new();
    for e in 0..n - 1 {
        triplets.push(Triplet::new(e, e, 1.5f32));
        triplets.push(Triplet::new(e + 1, e + 1, 1.5f32));
        triplets.push(Triplet::new(e, e + 1, -1.0f32));
        triplets.push(Triplet::new(e + 1, e, -1.0f32));
    }
    let a = EllpackMatrix::from_triplets(n, n, 3, triplets)?;
    assert_eq!(a.get(2, 2)?, Some(3.0));
    assert_eq!(a.get(0, 0)?, Some(1.5));

    let b = vec![1.0f32; n];
    let result = Jacobi::with_params(1e-4, 2000).solve(&a, &b)?;
    assert!(result.metadata.converged);

    let residual: Vec<f64> = a
        .mul_vec(&result.x)?
        .iter()
        .zip(&b)
        .map(|(ax, b)| (*ax - *b) as f64)
        .collect();
    assert_approx_eq_vec(&residual, &vec![0.0; n], 1e-3);
    Ok(())
}

#[test]
fn test_jacobi_config_from_json() {
    let config: Jacobi = serde_json::from_str(r#"{ "max_iterations": 50 }"#).unwrap();
    assert_eq!(config.max_iterations, 50);
    assert_eq!(config.tolerance, 1e-10);
    assert_eq!(config.omega, 1.0);

    let config: Jacobi =
        serde_json::from_str(r#"{ "tolerance": 1e-6, "max_iterations": 10, "omega": 0.5 }"#)
            .unwrap();
    assert_eq!(config, Jacobi::with_params(1e-6, 10).with_omega(0.5));

    let round_trip: Jacobi =
        serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
    assert_eq!(round_trip, config);
}

use kornia_lapack::{
    cholesky, symmetric_eigen, symmetric_eigen_workspace, EigenvectorJob, LapackError,
    MatrixViewMut, Uplo, VectorViewMut,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;

/// Eigenvalues of a random symmetric matrix and the Cholesky factor of its shifted version.
fn run(seed: u64, n: usize) -> Result<(Vec<f64>, Vec<f64>), LapackError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut a = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..=i {
            let x = rng.random_range(-1.0..1.0);
            a[i * n + j] = x;
            a[j * n + i] = x;
        }
        a[i * n + i] += n as f64;
    }

    let mut factor = a.clone();
    cholesky(Uplo::Upper, &mut MatrixViewMut::from_row_major(&mut factor, n, n)?)?;

    let mut w = vec![0.0; n];
    let mut workspace = vec![0.0; symmetric_eigen_workspace(EigenvectorJob::Skip, n)?];
    symmetric_eigen(
        EigenvectorJob::Skip,
        Uplo::Upper,
        &mut MatrixViewMut::from_row_major(&mut a, n, n)?,
        &mut VectorViewMut::contiguous(&mut w),
        &mut workspace,
    )?;
    Ok((w, factor))
}

#[test]
fn independent_calls_run_concurrently() -> Result<(), LapackError> {
    let _ = env_logger::builder().is_test(true).try_init();
    let seeds: Vec<u64> = (0..32).collect();
    let sequential = seeds
        .iter()
        .map(|&seed| run(seed, 8))
        .collect::<Result<Vec<_>, _>>()?;
    let parallel = seeds
        .par_iter()
        .map(|&seed| run(seed, 8))
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(sequential, parallel);
    Ok(())
}

//! Dense linear algebra for the Newton step and the rank check.

use ndarray::{Array1, Array2, Axis};

use crate::error::{Result, SolverError};

/// Minimum-norm least-squares step for an under-determined system
///
/// Solves `(A S)(A S)ᵗ z = b` and returns `X = S (A S)ᵗ z`, where `S` is the
/// diagonal column scale. A column with a small scale moves by roughly the
/// square of that scale, so dragged parameters stay close to where the user
/// put them while the rest of the sketch absorbs the correction.
///
/// # Arguments
///
/// * `a` - Jacobian, one row per equation (m x n)
/// * `b` - Residuals (m)
/// * `scale` - Per-column scale (n)
/// * `pivot_threshold` - Smallest accepted pivot magnitude
///
/// # Errors
///
/// `SolverError::SingularJacobian` when `A Aᵗ` has a vanishing pivot.
pub fn least_squares_step(
    a: &Array2<f64>,
    b: &Array1<f64>,
    scale: &Array1<f64>,
    pivot_threshold: f64,
) -> Result<Array1<f64>> {
    let mut scaled = a.clone();
    for (mut column, s) in scaled.axis_iter_mut(Axis(1)).zip(scale.iter()) {
        column *= *s;
    }

    let aat = scaled.dot(&scaled.t());
    let z = solve_linear_system(aat, b.clone(), pivot_threshold)?;

    let x = scaled.t().dot(&z);
    Ok(x * scale)
}

/// Gaussian elimination with partial pivoting
///
/// Pivots are chosen by magnitude; a pivot smaller than `pivot_threshold`
/// means two rows are equivalent and fails the solve.
pub fn solve_linear_system(
    mut a: Array2<f64>,
    mut b: Array1<f64>,
    pivot_threshold: f64,
) -> Result<Array1<f64>> {
    let n = b.len();

    for i in 0..n {
        let mut imax = i;
        let mut max = 0.0;
        for ip in i..n {
            if a[[ip, i]].abs() > max {
                imax = ip;
                max = a[[ip, i]].abs();
            }
        }
        if max < pivot_threshold {
            return Err(SolverError::SingularJacobian { rank: i, rows: n });
        }

        if imax != i {
            for jp in 0..n {
                a.swap([imax, jp], [i, jp]);
            }
            b.swap(imax, i);
        }

        for ip in (i + 1)..n {
            let factor = a[[ip, i]] / a[[i, i]];
            for jp in i..n {
                a[[ip, jp]] -= factor * a[[i, jp]];
            }
            b[ip] -= factor * b[i];
        }
    }

    // back substitution on the upper triangle
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut acc = b[i];
        for j in (i + 1)..n {
            acc -= x[j] * a[[i, j]];
        }
        x[i] = acc / a[[i, i]];
    }
    Ok(x)
}

/// Row rank by incremental Gram-Schmidt orthogonalization
///
/// Each row has its components along the previous non-degenerate rows removed;
/// it adds to the rank when the squared magnitude of what remains exceeds
/// `threshold`. Works on a copy of `a`.
pub fn gram_schmidt_rank(a: &Array2<f64>, threshold: f64) -> usize {
    let mut rows = a.clone();
    let mut magnitudes = Vec::with_capacity(rows.nrows());
    let mut rank = 0;

    for i in 0..rows.nrows() {
        for prev in 0..i {
            let mag: f64 = magnitudes[prev];
            if mag <= threshold {
                continue;
            }
            let dot = rows.row(prev).dot(&rows.row(i));
            let projection = rows.row(prev).to_owned() * (dot / mag);
            let mut row = rows.row_mut(i);
            row -= &projection;
        }
        let mag = rows.row(i).dot(&rows.row(i));
        if mag > threshold {
            rank += 1;
        }
        magnitudes.push(mag);
    }

    rank
}

/// Row rank from the singular values of `a`
///
/// Counts singular values whose square exceeds `threshold`, matching the
/// squared-magnitude convention of [`gram_schmidt_rank`].
#[cfg(feature = "faer-rank")]
pub fn svd_rank(a: &Array2<f64>, threshold: f64) -> Result<usize> {
    let mat = faer::Mat::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]]);
    match mat.singular_values() {
        Ok(values) => Ok(values.iter().filter(|s| **s * **s > threshold).count()),
        Err(_) => Err(SolverError::DidNotConverge(
            "singular value decomposition failed".to_string(),
        )),
    }
}

//! Scalar reference implementation.
//!
//! Straight triple loop over the stored triangle of A, used as the oracle
//! for the tiled kernels in tests and benchmarks.

use crate::types::{Side, SsymmParams, Uplo};

/// Element `(i, j)` of the symmetric matrix A, reading only the stored triangle.
#[inline]
pub fn sym_get(a: &[f32], lda: usize, uplo: Uplo, i: usize, j: usize) -> f32 {
    let (r, c) = match uplo {
        Uplo::Upper if i <= j => (i, j),
        Uplo::Upper => (j, i),
        Uplo::Lower if i >= j => (i, j),
        Uplo::Lower => (j, i),
    };
    a[c * lda + r]
}

/// `C = alpha * A * B + beta * C` (left) or `C = alpha * B * A + beta * C`
/// (right), column-major, accumulating in `f64`.
///
/// C is not read when `beta == 0`.
pub fn ssymm_reference(params: &SsymmParams, a: &[f32], b: &[f32], c: &mut [f32]) {
    let SsymmParams {
        side,
        uplo,
        m,
        n,
        alpha,
        beta,
        lda,
        ldb,
        ldc,
    } = *params;
    let ka = params.ka();

    for j in 0..n {
        for i in 0..m {
            let mut dot = 0.0f64;
            for l in 0..ka {
                let (x, y) = match side {
                    Side::Left => (sym_get(a, lda, uplo, i, l), b[j * ldb + l]),
                    Side::Right => (b[l * ldb + i], sym_get(a, lda, uplo, l, j)),
                };
                dot += x as f64 * y as f64;
            }
            let idx = j * ldc + i;
            let product = alpha as f64 * dot;
            c[idx] = if beta == 0.0 {
                product as f32
            } else {
                (product + beta as f64 * c[idx] as f64) as f32
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sym_get() {
        // 2x2 column-major; upper stores (0,1) = 2.0, lower stores (1,0) = 5.0
        let a = [1.0, 5.0, 2.0, 3.0];
        assert_eq!(sym_get(&a, 2, Uplo::Upper, 1, 0), 2.0);
        assert_eq!(sym_get(&a, 2, Uplo::Upper, 0, 1), 2.0);
        assert_eq!(sym_get(&a, 2, Uplo::Lower, 0, 1), 5.0);
        assert_eq!(sym_get(&a, 2, Uplo::Lower, 1, 1), 3.0);
    }

    #[test]
    fn test_reference_left() {
        // A = [[2, 1], [1, 3]], B = [[1, 0, 2], [0, 1, 1]]
        let a = [2.0, 1.0, 1.0, 3.0];
        let b = [1.0, 0.0, 0.0, 1.0, 2.0, 1.0];
        let mut c = [f32::NAN; 6];
        let params = SsymmParams::new(Side::Left, Uplo::Lower, 2, 3);
        ssymm_reference(&params, &a, &b, &mut c);
        // A*B = [[2, 1, 5], [1, 3, 5]]
        assert_eq!(c, [2.0, 1.0, 1.0, 3.0, 5.0, 5.0]);
    }

    #[test]
    fn test_reference_right_with_beta() {
        // B = [[1, 2]], A = [[2, 1], [1, 3]]: B*A = [[4, 7]]
        let a = [2.0, 0.0, 1.0, 3.0];
        let b = [1.0, 2.0];
        let mut c = [1.0, 1.0];
        let mut params = SsymmParams::new(Side::Right, Uplo::Upper, 1, 2);
        params.alpha = 2.0;
        params.beta = -1.0;
        ssymm_reference(&params, &a, &b, &mut c);
        assert_eq!(c, [7.0, 13.0]);
    }
}

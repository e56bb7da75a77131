use num::Num;

/// Dot product accumulated in f64
/// Σ(a_i * b_i) over the common prefix; callers check lengths first
#[inline]
pub fn dot<N>(a: &[N], b: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    debug_assert_eq!(a.len(), b.len(), "Vectors must be of the same length to compute dot product.");
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| x.into() * y.into())
        .sum()
}

/// Squared L2 norm
/// Σ(a_i^2)
#[inline]
pub fn norm_sq<N>(a: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    a.iter()
        .map(|&x| {
            let x: f64 = x.into();
            x * x
        })
        .sum()
}

/// L2 norm
#[inline]
pub fn norm<N>(a: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    norm_sq(a).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_and_norm() {
        let a = [1.0f64, 2.0, 3.0];
        let b = [4.0f64, -5.0, 6.0];
        assert_eq!(dot(&a, &b), 12.0);
        assert_eq!(norm_sq(&a), 14.0);
        assert_eq!(norm(&[3.0f64, 4.0]), 5.0);
    }

    #[test]
    fn test_integer_and_f32_inputs() {
        assert_eq!(dot(&[1u32, 2, 3], &[1u32, 1, 1]), 6.0);
        assert_eq!(norm_sq(&[0.5f32, 0.5]), 0.5);
        assert_eq!(norm::<f64>(&[]), 0.0);
    }
}

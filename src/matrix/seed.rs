use super::dense::Matrix;
use crate::error::{Error, Result};

/// Builds the two input matrices from a pair of decimal seeds.
///
/// A cycles over the digits of `seed_a`; B cycles over the digits of the
/// product `seed_a * seed_b`.
pub fn seeded_inputs(n: usize, seed_a: &str, seed_b: &str) -> Result<(Matrix, Matrix)> {
    let a = Matrix::from_digits(n, seed_a)?;
    let product = parse_seed(seed_a)?
        .checked_mul(parse_seed(seed_b)?)
        .ok_or_else(|| Error::InvalidSeed {
            seed: format!("{}*{}", seed_a, seed_b),
            reason: "seed product overflows",
        })?;
    let b = Matrix::from_digits(n, &product.to_string())?;
    Ok((a, b))
}

fn parse_seed(seed: &str) -> Result<u128> {
    seed.parse().map_err(|_| Error::InvalidSeed {
        seed: seed.to_string(),
        reason: "seed must be a non-negative integer",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn b_uses_seed_product() {
        let (a, b) = seeded_inputs(2, "12", "3").unwrap();
        assert_eq!(a.as_slice(), &[1, 2, 1, 2]);
        assert_eq!(b.as_slice(), &[3, 6, 3, 6]);
    }

    #[test]
    fn default_seeds() {
        // 1211553 * 2003 = 2426740659
        let (a, b) = seeded_inputs(3, "1211553", "2003").unwrap();
        assert_eq!(a.as_slice(), &[1, 2, 1, 1, 5, 5, 3, 1, 2]);
        assert_eq!(b.as_slice(), &[2, 4, 2, 6, 7, 4, 0, 6, 5]);
    }

    #[test]
    fn non_numeric_seed() {
        assert!(seeded_inputs(2, "12", "x").is_err());
    }
}

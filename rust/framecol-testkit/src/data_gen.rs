//! Data generation utilities for testing.
//!
//! Every generator is seeded, so a failing test reproduces with the same data.

/// Generates `count` longs, each null with probability `null_ratio`.
pub fn nullable_longs(count: usize, null_ratio: f64, seed: u64) -> Vec<Option<i64>> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..count)
        .map(|_| (rng.f64() >= null_ratio).then(|| rng.i64(..)))
        .collect()
}

/// Generates `count` doubles in `[-1000, 1000)`, each null with probability
/// `null_ratio`.
pub fn nullable_doubles(count: usize, null_ratio: f64, seed: u64) -> Vec<Option<f64>> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..count)
        .map(|_| (rng.f64() >= null_ratio).then(|| rng.f64() * 2000.0 - 1000.0))
        .collect()
}

/// Generates `count` alphanumeric strings of up to `max_len` characters, each null
/// with probability `null_ratio`.
pub fn nullable_strings(
    count: usize,
    max_len: usize,
    null_ratio: f64,
    seed: u64,
) -> Vec<Option<String>> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..count)
        .map(|_| (rng.f64() >= null_ratio).then(|| random_string(&mut rng, max_len)))
        .collect()
}

/// Generates `count` multi-value rows of up to `max_values` strings each. A row is
/// null with probability `null_ratio`; so is each individual string.
pub fn nullable_string_lists(
    count: usize,
    max_values: usize,
    null_ratio: f64,
    seed: u64,
) -> Vec<Option<Vec<Option<String>>>> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..count)
        .map(|_| {
            (rng.f64() >= null_ratio).then(|| {
                let len = rng.usize(..=max_values);
                (0..len)
                    .map(|_| (rng.f64() >= null_ratio).then(|| random_string(&mut rng, 8)))
                    .collect()
            })
        })
        .collect()
}

/// Borrows a generated string column in the shape accepted by
/// [`FrameBuilder::add_string`](crate::FrameBuilder::add_string).
pub fn as_str_values(values: &[Option<String>]) -> Vec<Option<&str>> {
    values.iter().map(|v| v.as_deref()).collect()
}

/// Borrows generated multi-value rows in the shape accepted by
/// [`FrameBuilder::add_string_array`](crate::FrameBuilder::add_string_array).
pub fn as_str_lists(rows: &[Option<Vec<Option<String>>>]) -> Vec<Option<Vec<Option<&str>>>> {
    rows.iter()
        .map(|row| row.as_ref().map(|values| as_str_values(values)))
        .collect()
}

fn random_string(rng: &mut fastrand::Rng, max_len: usize) -> String {
    let len = rng.usize(..=max_len);
    (0..len).map(|_| rng.alphanumeric()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generators_are_seeded() {
        assert_eq!(nullable_longs(50, 0.3, 7), nullable_longs(50, 0.3, 7));
        let strings = nullable_strings(200, 5, 0.5, 1);
        assert_eq!(strings.len(), 200);
        assert!(strings.iter().any(Option::is_none));
        assert!(strings.iter().flatten().all(|s| s.len() <= 5));

        let lists = nullable_string_lists(100, 3, 0.1, 3);
        assert!(lists.iter().flatten().all(|l| l.len() <= 3));
        assert_eq!(as_str_lists(&lists).len(), 100);
    }

    #[test]
    fn test_no_nulls() {
        assert!(nullable_doubles(100, 0.0, 9).iter().all(Option::is_some));
    }
}

//! Rolling mean used to smooth series before plotting.

/// Trailing rolling mean over `window` samples.
///
/// Position `i` averages `values[i + 1 - window ..= i]`. It is `None` while
/// fewer than `window` samples are available or when any sample in the window
/// is undefined. A window of 0 behaves like 1.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let mut sum = 0.0;
            for v in slice {
                sum += (*v)?;
            }
            Some(sum / window as f64)
        })
        .collect()
}

use std::collections::VecDeque;

/// Mean and sample standard deviation of a full window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowStats {
    pub mean: f64,
    pub std: f64,
}

/// Fixed-length trailing window over a stream of values.
///
/// Holds at most `capacity` values; pushing into a full window evicts the
/// oldest one. Statistics are only reported once the window is full.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    values: VecDeque<f64>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_warm(&self) -> bool {
        self.capacity > 0 && self.values.len() == self.capacity
    }

    /// Simple mean and sample standard deviation (divides by `n - 1`) of the
    /// current contents, or `None` until the window is full.
    ///
    /// A window whose values are all identical reports its value as the mean
    /// and a standard deviation of exactly zero. Statistics that overflow are
    /// `None`, never infinite or NaN.
    pub fn stats(&self) -> Option<WindowStats> {
        if !self.is_warm() || self.capacity < 2 {
            return None;
        }

        let first = self.values[0];
        if self.values.iter().all(|&v| v == first) {
            return Some(WindowStats {
                mean: first,
                std: 0.0,
            });
        }

        let n = self.values.len() as f64;
        let mean = self.values.iter().sum::<f64>() / n;

        // Two-pass variance.
        let sum_sq: f64 = self.values.iter().map(|v| (v - mean).powi(2)).sum();
        let std = (sum_sq / (n - 1.0)).sqrt();

        if !mean.is_finite() || !std.is_finite() {
            return None;
        }

        Some(WindowStats { mean, std })
    }
}

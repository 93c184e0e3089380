use super::PositionFilter;
use std::collections::VecDeque;

/// Moving average over the last `window_size` positions
pub struct MovingAverageFilter {
    window_size: usize,
    buffer: VecDeque<(f64, f64)>,
}

impl MovingAverageFilter {
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
        }
    }
}

impl PositionFilter for MovingAverageFilter {
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64) {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back((x, y));

        let n = self.buffer.len() as f64;
        let (sx, sy) = self
            .buffer
            .iter()
            .fold((0.0, 0.0), |(ax, ay), &(bx, by)| (ax + bx, ay + by));
        (sx / n, sy / n)
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "MovingAverageFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average() {
        let mut filter = MovingAverageFilter::new(3);

        assert_eq!(filter.apply(0.1, 0.2), (0.1, 0.2));

        let (x, y) = filter.apply(0.3, 0.4);
        assert!((x - 0.2).abs() < 1e-12);
        assert!((y - 0.3).abs() < 1e-12);

        filter.apply(0.5, 0.6);
        // Window is full, oldest value should be dropped
        let (x, y) = filter.apply(0.7, 0.8);
        assert!((x - 0.5).abs() < 1e-12);
        assert!((y - 0.6).abs() < 1e-12);

        filter.reset();
        assert_eq!(filter.apply(0.9, 0.9), (0.9, 0.9));
    }
}

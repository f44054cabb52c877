/// Running mean of a scalar observable.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub count: usize,
    pub aggregate: f64,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, value: f64) {
        self.count += 1;
        self.aggregate += value;
    }

    /// Mean of all recorded values, or 0 before the first update.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.aggregate / self.count as f64
    }
}

use super::IndicatorError;

/// Simple Moving Average (SMA)
/// Calculates the arithmetic mean of the last N closes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SMA {
    period: usize,
}

impl SMA {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidPeriod(period));
        }
        Ok(Self { period })
    }

    /// Calculate SMA for a close series
    /// Returns a vector of the same length as input
    /// First (period - 1) values are None (warmup)
    pub fn calculate(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; closes.len()];

        if closes.len() < self.period {
            return result;
        }

        for i in (self.period - 1)..closes.len() {
            let window = &closes[i + 1 - self.period..=i];
            let sum: f64 = window.iter().sum();
            result[i] = Some(sum / self.period as f64);
        }

        result
    }
}

/// Exponential Moving Average (EMA)
/// Seeded with the SMA of the first `period` closes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EMA {
    period: usize,
}

impl EMA {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidPeriod(period));
        }
        Ok(Self { period })
    }

    /// k = 2 / (period + 1)
    fn smoothing_factor(&self) -> f64 {
        2.0 / (self.period as f64 + 1.0)
    }

    /// Calculate EMA for a close series
    /// Returns a vector of the same length as input
    /// First (period - 1) values are None (warmup)
    pub fn calculate(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; closes.len()];

        if closes.len() < self.period {
            return result;
        }

        let k = self.smoothing_factor();

        let seed: f64 = closes[..self.period].iter().sum::<f64>() / self.period as f64;
        result[self.period - 1] = Some(seed);

        // EMA(t) = Close(t) * k + EMA(t-1) * (1 - k)
        let mut prev = seed;
        for i in self.period..closes.len() {
            prev = closes[i] * k + prev * (1.0 - k);
            result[i] = Some(prev);
        }

        result
    }
}

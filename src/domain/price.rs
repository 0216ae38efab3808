//! Price point representation.

use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PricePoint {
    /// Close-to-close change from `prev`.
    pub fn change_from(&self, prev: &PricePoint) -> f64 {
        self.close - prev.close
    }
}

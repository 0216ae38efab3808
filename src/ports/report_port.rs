//! Report generation port trait.

use crate::domain::error::CrosstraderError;
use crate::domain::strategy::StrategyRun;

/// Port for writing strategy run reports.
pub trait ReportPort {
    fn write(&self, run: &StrategyRun, output_path: &str) -> Result<(), CrosstraderError>;
}

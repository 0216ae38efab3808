//! Port traits decoupling the engine from I/O.

pub mod config_port;
pub mod data_port;
pub mod report_port;

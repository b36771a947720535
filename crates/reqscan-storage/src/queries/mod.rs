//! Free-function queries over a borrowed connection.

pub mod metrics_log;
pub mod requirements;

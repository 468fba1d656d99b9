//! Utility modules for the threat intel pipeline.
//! This module contains the error taxonomy and logging helpers shared by
//! both pipelines.

mod logging;
mod error;

pub use logging::{
    init_logging,
    log_cloudflare_event,
};

pub use error::{IntelError, IntelResult};

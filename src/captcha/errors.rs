use std::time::Duration;
use thiserror::Error;

/// Failure of a human-resolution wait
///
/// Soft: the engine task that hits it logs the timeout and still reads
/// whatever the page shows.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaptchaError {
    #[error("CAPTCHA was not resolved within {waited:?}")]
    Timeout { waited: Duration },
}

//! Verification-challenge detection and human-resolution coordination

pub mod coordinator;
pub mod detector;
pub mod errors;

pub use coordinator::CaptchaCoordinator;
pub use detector::{CAPTCHA_KEYWORDS, CAPTCHA_SELECTORS, CAPTCHA_URL_TOKENS, CaptchaDetector};
pub use errors::CaptchaError;

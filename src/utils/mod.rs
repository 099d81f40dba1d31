pub mod constants;
pub mod string_utils;
pub mod timing;
pub mod url_utils;

pub use constants::*;
pub use string_utils::{char_len, collapse_whitespace, safe_truncate_chars, truncate_with_marker};
pub use timing::{human_sleep, jittered_delay, scaled_ms};
pub use url_utils::{cookie_domain_matches, host_of, is_valid_url, origin_matches, origin_of, path_of};

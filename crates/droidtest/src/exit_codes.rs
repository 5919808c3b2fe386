//! Exit codes for the CLI
//!
//! Library failures map to `DroidTestError::exit_code`; the codes below cover
//! outcomes decided by the CLI itself.

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Unit tests ran and failed; reports were still exported
pub const TEST_FAILED: i32 = 10;

//! Unified exit codes for the tonality CLI.
//! These codes are part of the public contract; scripts branch on them.

pub const SUCCESS: i32 = 0; // Scored, or a clean no-data outcome
pub const ANALYSIS_FAILED: i32 = 1; // Scoring batch failed
pub const CONFIG_ERROR: i32 = 2; // Bad flags, config or fixture file
pub const VIDEO_NOT_FOUND: i32 = 3; // Video id absent from the source
pub const SOURCE_UNAVAILABLE: i32 = 4; // Source exists but could not be read

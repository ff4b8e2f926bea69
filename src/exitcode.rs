//! Standard exit codes (BSD sysexits.h compatible)
//!
//! `render_nb` exits with the converter's own code instead.

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error (malformed package file)
pub const DATAERR: i32 = 65;

/// Cannot open input (package file missing)
pub const NOINPUT: i32 = 66;

/// Service unavailable (registry could not be queried)
pub const UNAVAILABLE: i32 = 69;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;

//! Site and hardware defaults for the door terminal.
//!
//! Every value here is a default only. Sites override them through the
//! terminal configuration file; nothing in the pipeline reads these
//! constants directly once a configuration has been built.
//!
//! # Usage
//!
//! ```
//! use doorkeep_core::constants::*;
//! use std::time::Duration;
//!
//! assert_eq!(DEFAULT_HEADER_LENGTH, 10);
//! let hold = Duration::from_millis(DEFAULT_GRANTED_DWELL_MS);
//! assert_eq!(hold.as_secs(), 5);
//! ```

// ============================================================================
// Swipe Normalization
// ============================================================================

/// Number of leading characters the card reader prepends to every swipe.
///
/// The header is a reader preamble, not part of the badge identity. It is
/// only stripped when the site enables the header-strip transform.
pub const DEFAULT_HEADER_LENGTH: usize = 10;

/// Character written over the first character left after the header strip.
///
/// Marks the code as an unlock-class badge in the credential table.
pub const DEFAULT_SENTINEL: char = 'u';

// ============================================================================
// Lock Controller Link
// ============================================================================

/// Unlock command understood by the lock controller firmware.
pub const DEFAULT_UNLOCK_COMMAND: &[u8] = b"u\r";

/// Serial line speed of the lock controller (8N1).
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Upper bound for a single command write, in milliseconds.
pub const DEFAULT_LINK_WRITE_TIMEOUT_MS: u64 = 1000;

// ============================================================================
// Credential Store
// ============================================================================

/// Upper bound for a credential lookup, in milliseconds.
///
/// The terminal historically waited up to 30 seconds for the store; a swipe
/// that takes longer than this is reported as a store fault instead.
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5000;

/// Upper bound for the access log write that follows an unlock, in
/// milliseconds. The dwell is already running while it is pending.
pub const DEFAULT_AUDIT_TIMEOUT_MS: u64 = 1000;

/// Number of rows fetched per lookup.
///
/// Two rows are enough to tell a unique match from a duplicated badge code.
pub const DUPLICATE_LOOKUP_LIMIT: i64 = 2;

// ============================================================================
// Feedback Dwell
// ============================================================================

/// How long the greeting stays on screen after an unlock (milliseconds).
pub const DEFAULT_GRANTED_DWELL_MS: u64 = 5000;

/// How long a denial stays on screen (milliseconds).
pub const DEFAULT_DENIED_DWELL_MS: u64 = 2000;

/// How long an operational fault stays on screen (milliseconds).
pub const DEFAULT_ERROR_DWELL_MS: u64 = 3000;

// ============================================================================
// Display
// ============================================================================

/// Default text grid height, in rows.
pub const DEFAULT_DISPLAY_ROWS: usize = 12;

/// Default text grid width, in columns.
pub const DEFAULT_DISPLAY_COLUMNS: usize = 48;

/// Idle screen lines, top to bottom.
pub const DEFAULT_WELCOME_LINES: &[&str] = &["Welcome to BUILDS", "Please Swipe Your ID"];

/// Row of the first welcome line; following lines are placed one row apart.
pub const DEFAULT_WELCOME_ROW: u16 = 2;

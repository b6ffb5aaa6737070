//! Protocol constants: frame markers, status codes and defaults.

use std::time::Duration;

// ============================================================================
// Frame Markers
// ============================================================================

/// Start marker of an outgoing command frame.
pub const COMMAND_START: u8 = b'#';

/// Terminator of an outgoing command frame.
pub const COMMAND_END: &[u8] = b"\r\n";

/// Start marker of every incoming frame (response or update).
pub const RESPONSE_START: u8 = b'@';

/// Terminator of an incoming frame. This is the sole delimiter on the
/// device-to-host byte stream.
pub const RESPONSE_END: u8 = b'\r';

/// Separator between code, status and data fields.
pub const FIELD_SEPARATOR: u8 = b' ';

// ============================================================================
// Status Codes
// ============================================================================

/// Status code of a successful response.
pub const STATUS_OK: &[u8; 2] = b"OK";

/// Status code of a failed response.
pub const STATUS_ERROR: &[u8; 2] = b"ER";

// ============================================================================
// Sizes and Defaults
// ============================================================================

/// Length of a command or update code in bytes.
pub const CODE_LEN: usize = 3;

/// Longest incoming frame accepted before the frame codec gives up on it.
pub const MAX_FRAME_LENGTH: usize = 256;

/// Advisory timeout attached to a command when nothing overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

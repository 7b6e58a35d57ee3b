//! Centralized constants for SlotCode
//!
//! This module contains all configurable numerical values used throughout
//! the application. Each constant includes documentation on its purpose,
//! unit, and recommended value range.

// ============================================================================
// CODE DERIVATION
// ============================================================================

/// Width of one time slot; the code rotates once per slot.
/// Unit: seconds
/// Recommended range: 30 (matches common authenticator apps), 5-300 accepted
pub const SLOT_INTERVAL_DEFAULT_SECS: u64 = 30;

/// Smallest slot interval accepted from SLOTCODE_INTERVAL.
/// Unit: seconds
pub const SLOT_INTERVAL_MIN_SECS: u64 = 5;

/// Largest slot interval accepted from SLOTCODE_INTERVAL.
/// Unit: seconds
pub const SLOT_INTERVAL_MAX_SECS: u64 = 300;

/// Number of decimal digits in a derived code.
/// Unit: digits
/// Range: 1-9 (the code is taken from a 4-byte truncation of the digest)
pub const CODE_DIGITS_DEFAULT: u32 = 6;

/// Largest digit width that still fits under a 4-byte truncation.
/// Unit: digits
/// Range: Fixed, do not raise
pub const CODE_DIGITS_MAX: u32 = 9;

/// Domain separator mixed into every HMAC message.
/// Range: Fixed; changing it changes every generated code
pub const APPEND_CONSTANT_DEFAULT: &str = "OLEG";

/// Separator placed between secret, append-constant and slot in the message.
pub const MESSAGE_DELIMITER: char = ':';

/// Number of leading digest bytes interpreted as the big-endian code value.
/// Unit: bytes
/// Range: Fixed at 4
pub const TRUNCATION_BYTES: usize = 4;

// ============================================================================
// POLLING & THREAD INTERVALS
// ============================================================================

/// Heartbeat period driving reconciliation.
/// Unit: milliseconds
/// Recommended range: 1000 (the label shows whole seconds)
pub const HEARTBEAT_INTERVAL_MS: u64 = 1000;

// ============================================================================
// GLYPH RENDERING
// ============================================================================

/// Edge length of the square countdown glyph.
/// Unit: pixels
/// Recommended range: 32-128 (tray hosts downscale larger icons)
pub const GLYPH_SIZE_PX: u32 = 64;

/// Width of the outline ring drawn on top of the wedge.
/// Unit: pixels
pub const GLYPH_OUTLINE_WIDTH_PX: f32 = 2.5;

/// Fill of the translucent background disc (RGBA).
pub const GLYPH_BACKGROUND_RGBA: [u8; 4] = [128, 128, 128, 96];

/// Fill of the elapsed-time wedge (RGBA).
pub const GLYPH_WEDGE_RGBA: [u8; 4] = [52, 152, 219, 255];

/// Color of the outline ring (RGBA).
pub const GLYPH_OUTLINE_RGBA: [u8; 4] = [255, 255, 255, 255];

/// Badge edge length relative to the glyph edge.
/// Unit: fraction
pub const GLYPH_BADGE_SCALE: f32 = 0.5;

// ============================================================================
// ASSET FILES
// ============================================================================

/// Filename prefix of every glyph asset; the sweep deletes by this prefix.
pub const ASSET_PREFIX: &str = "slotcode-glyph-";

/// Filename extension of glyph assets.
pub const ASSET_EXTENSION: &str = "png";

/// Random bytes in an asset filename suffix (hex-encoded, so twice as many chars).
/// Unit: bytes
pub const ASSET_SUFFIX_BYTES: usize = 8;

/// Directory name used under config/cache/runtime roots.
pub const APP_DIR_NAME: &str = "slotcode";

// ============================================================================
// NOTIFICATION TIMEOUTS
// ============================================================================

/// Code-updated notification display duration.
/// Unit: milliseconds
/// Recommended range: 2000-5000 (long enough to read, short enough to not annoy)
pub const NOTIFICATION_TIMEOUT_MS: u32 = 3000;

// ============================================================================
// FILE PERMISSIONS
// ============================================================================

/// Config file permissions (user read/write only, the file holds the secret).
/// Unit: Unix permission bits (octal)
/// Recommended: 0o600
pub const CONFIG_FILE_PERMISSIONS: u32 = 0o600;

/// Permission mask to check for group/other access (security check).
/// Unit: Unix permission bits (octal)
/// Range: Fixed, used for security validation
pub const CONFIG_PERMISSION_MASK_GROUP_OTHER: u32 = 0o077;

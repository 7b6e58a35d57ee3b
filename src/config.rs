//! Environment overrides for SlotCode
//!
//! This module handles parsing of environment variables that can optionally
//! override built-in defaults. The persisted user preferences live in the
//! JSON config file (see config_file module); these variables cover the
//! algorithm parameters and filesystem locations, which are not user-editable.
//!
//! Environment variables (all optional):
//! - SLOTCODE_DIGITS: Code width in digits (1-9)
//! - SLOTCODE_INTERVAL: Slot width in seconds (5-300)
//! - SLOTCODE_APPEND: Append-constant mixed into every code
//! - SLOTCODE_CONFIG: Path of the JSON config file
//! - SLOTCODE_SCRATCH_DIR: Directory receiving glyph assets
//! - SLOTCODE_BADGE: PNG drawn in the middle of the countdown glyph

use crate::constants::{CODE_DIGITS_MAX, SLOT_INTERVAL_MAX_SECS, SLOT_INTERVAL_MIN_SECS};
use log::{debug, info, warn};
use std::env;
use std::path::PathBuf;

/// Parse the SLOTCODE_DIGITS environment variable
///
/// Returns Some(digits) if a valid width is configured (1-9)
/// Returns None if not set or invalid
pub fn parse_code_digits() -> Option<u32> {
    match env::var("SLOTCODE_DIGITS") {
        Ok(val) => match val.parse::<u32>() {
            Ok(digits) if (1..=CODE_DIGITS_MAX).contains(&digits) => {
                info!("Code width set via environment variable: {} digits", digits);
                Some(digits)
            }
            Ok(digits) => {
                warn!(
                    "Invalid code width: {} (must be 1-{} digits). Using default.",
                    digits, CODE_DIGITS_MAX
                );
                None
            }
            Err(e) => {
                warn!("Failed to parse SLOTCODE_DIGITS: {}. Using default.", e);
                None
            }
        },
        Err(_) => {
            debug!("SLOTCODE_DIGITS not set.");
            None
        }
    }
}

/// Parse the SLOTCODE_INTERVAL environment variable
///
/// Returns Some(seconds) if a valid interval is configured (5-300 seconds)
/// Returns None if not set or invalid
pub fn parse_slot_interval() -> Option<u64> {
    match env::var("SLOTCODE_INTERVAL") {
        Ok(val) => match val.parse::<u64>() {
            Ok(seconds) if (SLOT_INTERVAL_MIN_SECS..=SLOT_INTERVAL_MAX_SECS).contains(&seconds) => {
                info!("Slot interval set via environment variable: {} seconds", seconds);
                Some(seconds)
            }
            Ok(seconds) => {
                warn!(
                    "Invalid slot interval: {} (must be {}-{} seconds). Using default.",
                    seconds, SLOT_INTERVAL_MIN_SECS, SLOT_INTERVAL_MAX_SECS
                );
                None
            }
            Err(e) => {
                warn!("Failed to parse SLOTCODE_INTERVAL: {}. Using default.", e);
                None
            }
        },
        Err(_) => {
            debug!("SLOTCODE_INTERVAL not set.");
            None
        }
    }
}

/// Parse the SLOTCODE_APPEND environment variable
///
/// Blank values are rejected so a stray empty export cannot silently change every code.
pub fn parse_append_constant() -> Option<String> {
    match env::var("SLOTCODE_APPEND") {
        Ok(val) if val.trim().is_empty() => {
            warn!("SLOTCODE_APPEND is set but empty. Using default.");
            None
        }
        Ok(val) => {
            info!("Append-constant overridden via environment variable");
            Some(val)
        }
        Err(_) => {
            debug!("SLOTCODE_APPEND not set.");
            None
        }
    }
}

/// Config file location override (SLOTCODE_CONFIG)
pub fn config_path_override() -> Option<PathBuf> {
    path_var("SLOTCODE_CONFIG")
}

/// Glyph asset directory override (SLOTCODE_SCRATCH_DIR)
pub fn scratch_dir_override() -> Option<PathBuf> {
    path_var("SLOTCODE_SCRATCH_DIR")
}

/// Badge image location (SLOTCODE_BADGE)
pub fn badge_path_override() -> Option<PathBuf> {
    path_var("SLOTCODE_BADGE")
}

fn path_var(name: &str) -> Option<PathBuf> {
    match env::var_os(name) {
        Some(val) if !val.is_empty() => {
            let path = PathBuf::from(val);
            info!("{} set: {}", name, path.display());
            Some(path)
        }
        Some(_) => {
            warn!("{} is set but empty. Ignoring.", name);
            None
        }
        None => {
            debug!("{} not set.", name);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_code_digits() {
        env::set_var("SLOTCODE_DIGITS", "1");
        assert_eq!(parse_code_digits(), Some(1), "Should accept 1 digit");

        env::set_var("SLOTCODE_DIGITS", "8");
        assert_eq!(parse_code_digits(), Some(8), "Should accept 8 digits");

        env::set_var("SLOTCODE_DIGITS", "9");
        assert_eq!(parse_code_digits(), Some(9), "Should accept 9 digits");

        env::set_var("SLOTCODE_DIGITS", "0");
        assert_eq!(parse_code_digits(), None, "Should reject 0 digits");

        env::set_var("SLOTCODE_DIGITS", "10");
        assert_eq!(parse_code_digits(), None, "Should reject 10 digits");

        env::set_var("SLOTCODE_DIGITS", "six");
        assert_eq!(parse_code_digits(), None, "Should reject non-numeric value");

        env::remove_var("SLOTCODE_DIGITS");
        assert_eq!(parse_code_digits(), None, "Should return None when not set");
    }

    #[test]
    fn test_parse_slot_interval_boundaries() {
        env::set_var("SLOTCODE_INTERVAL", "4");
        assert_eq!(parse_slot_interval(), None, "Should reject 4 seconds");

        env::set_var("SLOTCODE_INTERVAL", "5");
        assert_eq!(parse_slot_interval(), Some(5), "Should accept 5 seconds");

        env::set_var("SLOTCODE_INTERVAL", "60");
        assert_eq!(parse_slot_interval(), Some(60), "Should accept 60 seconds");

        env::set_var("SLOTCODE_INTERVAL", "300");
        assert_eq!(parse_slot_interval(), Some(300), "Should accept 300 seconds");

        env::set_var("SLOTCODE_INTERVAL", "301");
        assert_eq!(parse_slot_interval(), None, "Should reject 301 seconds");

        env::set_var("SLOTCODE_INTERVAL", "30s");
        assert_eq!(parse_slot_interval(), None, "Should reject value with units");

        env::remove_var("SLOTCODE_INTERVAL");
        assert_eq!(parse_slot_interval(), None);
    }

    #[test]
    fn test_parse_append_constant() {
        env::set_var("SLOTCODE_APPEND", "   ");
        assert_eq!(parse_append_constant(), None, "Should reject blank value");

        env::set_var("SLOTCODE_APPEND", "TEAM");
        assert_eq!(parse_append_constant(), Some("TEAM".to_string()));

        env::remove_var("SLOTCODE_APPEND");
        assert_eq!(parse_append_constant(), None);
    }

    #[test]
    fn test_path_overrides() {
        env::set_var("SLOTCODE_BADGE", "");
        assert_eq!(badge_path_override(), None, "Empty path should be ignored");

        env::set_var("SLOTCODE_BADGE", "/tmp/badge.png");
        assert_eq!(badge_path_override(), Some(PathBuf::from("/tmp/badge.png")));

        env::remove_var("SLOTCODE_BADGE");
        assert_eq!(badge_path_override(), None);
    }
}

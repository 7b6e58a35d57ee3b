//! Time-slot code derivation
//!
//! A code is derived from the secret word and the index of the current time
//! slot: `HMAC-SHA256(key = secret, msg = "secret:APPEND:slot")`, the first
//! four digest bytes read as a big-endian integer, reduced modulo
//! `10^digits` and zero-padded. An empty secret yields the all-zero sentinel.

use crate::config;
use crate::constants::{
    APPEND_CONSTANT_DEFAULT, CODE_DIGITS_DEFAULT, CODE_DIGITS_MAX, MESSAGE_DELIMITER,
    SLOT_INTERVAL_DEFAULT_SECS, TRUNCATION_BYTES,
};
use anyhow::{bail, Result};
use ring::hmac;
use std::time::{SystemTime, UNIX_EPOCH};

/// Position of a wall-clock instant inside the slot grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    /// `floor(unix / interval)`
    pub index: u64,
    /// Seconds until the next rollover, always in `1..=interval`
    pub remaining: u64,
    /// Slot width in seconds
    pub interval: u64,
}

impl TimeSlot {
    pub fn at(unix: u64, interval: u64) -> Self {
        let interval = interval.max(1);
        Self {
            index: unix / interval,
            remaining: interval - (unix % interval),
            interval,
        }
    }

    /// Fraction of the slot already elapsed: 0.0 right after a rollover,
    /// approaching 1.0 just before the next one.
    pub fn elapsed_fraction(&self) -> f32 {
        (self.interval - self.remaining) as f32 / self.interval as f32
    }
}

/// Fixed parameters of the code algorithm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSpec {
    digits: u32,
    interval_secs: u64,
    append_constant: String,
}

impl CodeSpec {
    pub fn new(digits: u32, interval_secs: u64, append_constant: impl Into<String>) -> Result<Self> {
        if digits == 0 || digits > CODE_DIGITS_MAX {
            bail!(
                "Code width must be between 1 and {} digits (got {})",
                CODE_DIGITS_MAX,
                digits
            );
        }
        if interval_secs == 0 {
            bail!("Slot interval must be at least one second");
        }
        Ok(Self {
            digits,
            interval_secs,
            append_constant: append_constant.into(),
        })
    }

    /// Build the parameters from defaults, applying any SLOTCODE_* overrides
    pub fn from_env() -> Result<Self> {
        Self::new(
            config::parse_code_digits().unwrap_or(CODE_DIGITS_DEFAULT),
            config::parse_slot_interval().unwrap_or(SLOT_INTERVAL_DEFAULT_SECS),
            config::parse_append_constant().unwrap_or_else(|| APPEND_CONSTANT_DEFAULT.to_string()),
        )
    }

    pub fn digits(&self) -> u32 {
        self.digits
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn append_constant(&self) -> &str {
        &self.append_constant
    }

    pub fn slot_at(&self, unix: u64) -> TimeSlot {
        TimeSlot::at(unix, self.interval_secs)
    }

    /// Derive the code for `slot`. Pure: the same inputs always give the same code.
    pub fn derive(&self, secret: &str, slot: u64) -> String {
        if secret.is_empty() {
            return self.sentinel();
        }

        let message = format!(
            "{secret}{d}{append}{d}{slot}",
            d = MESSAGE_DELIMITER,
            append = self.append_constant
        );
        let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
        let tag = hmac::sign(&key, message.as_bytes());

        let mut head = [0u8; TRUNCATION_BYTES];
        head.copy_from_slice(&tag.as_ref()[..TRUNCATION_BYTES]);
        let value = u32::from_be_bytes(head) % 10u32.pow(self.digits);

        format!("{:0width$}", value, width = self.digits as usize)
    }

    /// The code shown while no secret is configured
    pub fn sentinel(&self) -> String {
        "0".repeat(self.digits as usize)
    }
}

impl Default for CodeSpec {
    fn default() -> Self {
        Self {
            digits: CODE_DIGITS_DEFAULT,
            interval_secs: SLOT_INTERVAL_DEFAULT_SECS,
            append_constant: APPEND_CONSTANT_DEFAULT.to_string(),
        }
    }
}

/// Current Unix time in whole seconds (0 if the clock reads before the epoch)
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_scenario() {
        let spec = CodeSpec::default();
        let slot = spec.slot_at(1_700_000_010);

        assert_eq!(slot.index, 56_666_667);
        // 1_700_000_010 sits exactly on a slot boundary
        assert_eq!(slot.remaining, 30);
        assert_eq!(spec.derive("abc123", slot.index), "962825");
    }

    #[test]
    fn test_known_codes() {
        let spec = CodeSpec::default();
        assert_eq!(spec.derive("abc123", 56_666_668), "354355");
        assert_eq!(spec.derive("abc123", 0), "079388", "Leading zeros must be kept");
        assert_eq!(spec.derive("пароль", 1), "451020");

        let wide = CodeSpec::new(8, 30, "OLEG").unwrap();
        assert_eq!(wide.derive("abc123", 56_666_667), "90962825");
    }

    #[test]
    fn test_empty_secret_yields_sentinel() {
        let spec = CodeSpec::default();
        for slot in [0, 1, 56_666_667, u64::MAX] {
            assert_eq!(spec.derive("", slot), "000000");
        }
        assert_eq!(spec.sentinel(), "000000");
    }

    #[test]
    fn test_derive_is_deterministic() {
        let spec = CodeSpec::default();
        for slot in 0..50 {
            assert_eq!(spec.derive("secret", slot), spec.derive("secret", slot));
        }
    }

    #[test]
    fn test_code_width_and_range() {
        for digits in 1..=CODE_DIGITS_MAX {
            let spec = CodeSpec::new(digits, 30, "OLEG").unwrap();
            for slot in 1_000..1_050 {
                let code = spec.derive("width-check", slot);
                assert_eq!(code.len(), digits as usize);
                assert!(code.bytes().all(|b| b.is_ascii_digit()));
                assert!(code.parse::<u64>().unwrap() < 10u64.pow(digits));
            }
        }
    }

    #[test]
    fn test_invalid_spec_rejected() {
        assert!(CodeSpec::new(0, 30, "OLEG").is_err());
        assert!(CodeSpec::new(10, 30, "OLEG").is_err());
        assert!(CodeSpec::new(6, 0, "OLEG").is_err());
        assert!(CodeSpec::new(9, 1, "").is_ok());
    }

    #[test]
    fn test_append_constant_changes_code() {
        let a = CodeSpec::new(6, 30, "OLEG").unwrap();
        let b = CodeSpec::new(6, 30, "OTHER").unwrap();
        let differing = (0..20)
            .filter(|slot| a.derive("abc123", *slot) != b.derive("abc123", *slot))
            .count();
        assert!(differing > 15);
    }

    #[test]
    fn test_adjacent_slot_collision_rate() {
        // With 2 digits, neighbouring slots should collide roughly 1% of the time
        let spec = CodeSpec::new(2, 30, "OLEG").unwrap();
        let samples = 20_000u64;
        let collisions = (0..samples)
            .filter(|n| spec.derive("rollover", *n) == spec.derive("rollover", n + 1))
            .count();

        let rate = collisions as f64 / samples as f64;
        assert!(rate > 0.004 && rate < 0.02, "collision rate {rate}");
    }

    #[test]
    fn test_time_slot_remaining_bounds() {
        for unix in 1_700_000_000..1_700_000_100 {
            let slot = TimeSlot::at(unix, 30);
            assert!(slot.remaining > 0 && slot.remaining <= 30);
            assert_eq!(slot.index * 30 + (30 - slot.remaining), unix);
        }
    }

    #[test]
    fn test_elapsed_fraction() {
        assert_eq!(TimeSlot::at(60, 30).elapsed_fraction(), 0.0);
        assert_eq!(TimeSlot::at(75, 30).elapsed_fraction(), 0.5);
        let late = TimeSlot::at(89, 30).elapsed_fraction();
        assert!(late > 0.9 && late < 1.0);
    }

    #[test]
    fn test_unix_now_is_recent() {
        // 2023-11-14, well before any machine running this test
        assert!(unix_now() > 1_700_000_000);
    }
}

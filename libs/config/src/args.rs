//! Positional argument validation
//!
//! Every numeric argument must consist of ASCII digits only and fit in a
//! signed 32-bit integer. The philosopher count must additionally be in
//! `1..=MAX_PHILOSOPHERS`.

use crate::error::{ConfigError, Result};
use crate::limits::table::{MAX_ARGUMENT, MAX_PHILOSOPHERS};

/// Parse a digit-only argument into an integer no larger than `MAX_ARGUMENT`
pub fn parse_argument(arg: &str) -> Result<u64> {
    if arg.is_empty() || !arg.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConfigError::not_a_number(arg));
    }

    // Accumulate with saturation so absurdly long inputs fail the range check
    // instead of overflowing.
    let value = arg
        .bytes()
        .fold(0u64, |acc, b| acc.saturating_mul(10).saturating_add(u64::from(b - b'0')));

    if value > MAX_ARGUMENT {
        return Err(ConfigError::not_a_number(arg));
    }
    Ok(value)
}

/// Parse the philosopher count argument
pub fn parse_philosopher_count(arg: &str) -> Result<usize> {
    let count = parse_argument(arg)?;
    if count == 0 || count > MAX_PHILOSOPHERS as u64 {
        return Err(ConfigError::PhilosopherCount { count });
    }
    Ok(count as usize)
}

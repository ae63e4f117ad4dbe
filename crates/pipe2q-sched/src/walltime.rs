//! Walltime normalization for the PBS `-l walltime=` directive.

use std::fmt;
use std::str::FromStr;

use crate::error::{SubmitError, SubmitResult};

/// A walltime request in the scheduler's canonical `dd:hh:mm:ss` form.
///
/// Input fields are interpreted most-significant-last, so missing leading
/// components default to zero: `10` is ten seconds, `10:00` ten minutes,
/// `10:00:00` ten hours, `10:00:00:00` ten days.
///
/// Field values are rendered at a minimum width of two digits and are
/// deliberately not range-checked: `25:70:90` normalizes to `00:25:70:90`
/// and is handed to the scheduler as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walltime {
    days: u32,
    hours: u32,
    minutes: u32,
    seconds: u32,
}

impl Walltime {
    /// Create a walltime from explicit components.
    pub fn new(days: u32, hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            days,
            hours,
            minutes,
            seconds,
        }
    }

    /// Normalize a user-supplied duration string.
    ///
    /// Fails when more than four colon-separated fields are given or when a
    /// field does not parse as a non-negative integer.
    pub fn parse(raw: &str) -> SubmitResult<Self> {
        let parts: Vec<&str> = raw.split(':').collect();
        if parts.len() > 4 {
            return Err(SubmitError::InvalidWalltime(format!(
                "'{raw}': expected at most 4 fields (dd:hh:mm:ss)"
            )));
        }

        // Left-pad with zero components so a short input fills the
        // trailing (least significant) fields.
        let mut fields = [0u32; 4];
        let offset = 4 - parts.len();
        for (i, part) in parts.iter().enumerate() {
            fields[offset + i] = part.trim().parse().map_err(|_| {
                SubmitError::InvalidWalltime(format!(
                    "'{raw}': field '{part}' is not a non-negative integer"
                ))
            })?;
        }

        Ok(Self {
            days: fields[0],
            hours: fields[1],
            minutes: fields[2],
            seconds: fields[3],
        })
    }
}

impl fmt::Display for Walltime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

impl FromStr for Walltime {
    type Err = SubmitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

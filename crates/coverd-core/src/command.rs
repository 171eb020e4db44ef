// ── Cover commands ──
//
// Everything the guard can send to the actuator flows through this enum.

use std::fmt;

/// A single motion command for the controlled cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverCommand {
    Stop,
    Open,
    Close,
    /// Absolute move. `None` fields are omitted from the request so the
    /// device leaves that axis alone.
    GoToPosition {
        position: Option<u8>,
        slat_position: Option<u8>,
    },
}

impl CoverCommand {
    /// Slat-only move; cover travel is left untouched.
    pub fn slat(slat_position: u8) -> Self {
        Self::GoToPosition {
            position: None,
            slat_position: Some(slat_position),
        }
    }

    /// The device RPC method this command maps to.
    pub fn method(self) -> &'static str {
        match self {
            Self::Stop => "Cover.Stop",
            Self::Open => "Cover.Open",
            Self::Close => "Cover.Close",
            Self::GoToPosition { .. } => "Cover.GoToPosition",
        }
    }
}

impl fmt::Display for CoverCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoToPosition {
                position,
                slat_position,
            } => {
                write!(f, "{}(", self.method())?;
                let mut sep = "";
                if let Some(pos) = position {
                    write!(f, "pos={pos}")?;
                    sep = ", ";
                }
                if let Some(slat) = slat_position {
                    write!(f, "{sep}slat_pos={slat}")?;
                }
                f.write_str(")")
            }
            other => f.write_str(other.method()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_slat_only_move() {
        assert_eq!(
            CoverCommand::slat(75).to_string(),
            "Cover.GoToPosition(slat_pos=75)"
        );
        assert_eq!(CoverCommand::Stop.to_string(), "Cover.Stop");
    }
}

use std::fmt;
use std::io::Write;

use crate::build::BuildState;
use crate::Result;

/// Final status as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalStatus {
    /// The server never reported a result.
    Unknown,
    /// Result string exactly as the server reported it.
    Reported(String),
}

impl FinalStatus {
    pub fn from_state(state: &BuildState) -> Self {
        match &state.result {
            Some(r) if !r.as_str().is_empty() => FinalStatus::Reported(r.as_str().to_string()),
            _ => FinalStatus::Unknown,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FinalStatus::Reported(s) if s == "SUCCESS")
    }
}

impl fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalStatus::Unknown => f.write_str("Unknown"),
            FinalStatus::Reported(s) => f.write_str(s),
        }
    }
}

/// Print the summary for a build whose observer loops have both exited.
pub fn report<W: Write>(state: &BuildState, out: &mut W) -> Result<FinalStatus> {
    let status = FinalStatus::from_state(state);
    writeln!(out, "Job execution completed")?;
    writeln!(out, "Jenkins job build final status - {status}")?;
    Ok(status)
}

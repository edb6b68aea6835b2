//! The four error kinds of the decision core (see §7). No `thiserror`/
//! `anyhow` dependency is pulled in — the teacher repo's library code
//! never reaches for one either, preferring a hand-rolled enum with a
//! manual `Display`/`Error` impl.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// `placeShip` rejected a placement that overlaps another ship or
    /// leaves the board, or a custom `Difficulty` had an out-of-range
    /// scalar. Surfaced to the caller; never recovered internally.
    InvalidPlacement(String),
    /// A weapon was asked to resolve against a cell its own
    /// `is_valid_target` rejects.
    InvalidTarget(String),
    /// The belief sampler exhausted its attempt budget without finding a
    /// single admissible configuration.
    ExhaustedSampler,
    /// A ship's `sunk` flag and its segment health diverged during
    /// resolution (e.g. marked sunk while a segment still has positive
    /// health). Never constructed from a `Result`-returning call; only
    /// ever raised via `inconsistent_state`'s `panic!`, since this is a
    /// programmer error rather than something a caller could recover from.
    InconsistentState(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidPlacement(detail) => {
                write!(f, "invalid placement: {detail}")
            }
            CoreError::InvalidTarget(detail) => write!(f, "invalid target: {detail}"),
            CoreError::ExhaustedSampler => {
                write!(f, "belief sampler exhausted its attempt budget")
            }
            CoreError::InconsistentState(detail) => {
                write!(f, "inconsistent match state: {detail}")
            }
        }
    }
}

impl std::error::Error for CoreError {}

/// Panics with a diagnostic identifying the inconsistent state (§7 item 4).
/// This is a programmer error, not a recoverable condition, so it is never
/// wrapped in a `Result` — matching the teacher's treatment of impossible
/// internal states as `panic!`/`.expect()` territory rather than something
/// a caller could meaningfully handle.
#[track_caller]
pub fn inconsistent_state(detail: impl fmt::Display) -> ! {
    let err = CoreError::InconsistentState(detail.to_string());
    panic!("{err}");
}

pub type CoreResult<T> = Result<T, CoreError>;

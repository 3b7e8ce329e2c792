use ridetheme_logic::rides::RideId;
use thiserror::Error;

/// Reasons an apply is refused outright. Step failures are not errors; they
/// show up as [`StepOutcome::Failed`](crate::apply::StepOutcome::Failed).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("no ride selected")]
    NoRideSelected,
    #[error("ride {0} does not exist")]
    UnknownRide(RideId),
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),
}

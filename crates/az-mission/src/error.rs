use thiserror::Error;

pub type MissionResult<T> = Result<T, MissionError>;

#[derive(Debug, Error)]
pub enum MissionError {
    #[error("invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// The requested state exists mathematically but not physically, e.g.
    /// a mission whose fuel load exceeds the takeoff weight.
    #[error("physically infeasible: {what}")]
    Infeasible { what: String },

    #[error(transparent)]
    Solver(#[from] az_solver::SolverError),

    #[error(transparent)]
    Earth(#[from] az_earth::EarthError),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("unknown time zone: {name}")]
    InvalidZone { name: String },

    #[error("invalid civil date/time: {reason}")]
    InvalidCivilTime { reason: String },

    #[error("realtime clock unavailable")]
    ClockUnavailable,

    #[error("zone catalog cannot be empty")]
    EmptyCatalog,
}

pub type Result<T> = std::result::Result<T, ConvertError>;

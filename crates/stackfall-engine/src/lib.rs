pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },
    #[display("min_tick_ms ({min}) must not exceed normal_tick_ms ({normal})")]
    MinAboveNormal { min: u64, normal: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SeedParseError {
    #[display("invalid hex: expected 32 characters, got {_0}")]
    InvalidLength(#[error(not(source))] usize),
    #[display("invalid hex: {_0}")]
    InvalidDigit(std::num::ParseIntError),
}

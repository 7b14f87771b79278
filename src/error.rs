use thiserror::Error;

use crate::num::{Int, Nat};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("Number error - invalid nat: {0}")]
    InvalidNat(String),
    #[error("Number error - invalid int: {0}")]
    InvalidInt(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("Math error - division by zero")]
    DivisionByZero,
    #[error("Math error - tick {0} is out of the ladder bounds")]
    TickOutOfBounds(Int),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("State error - tick {0} is not initialized")]
    MissingTick(Int),
    #[error("State error - position {0} does not exist")]
    MissingPosition(Nat),
    #[error("State error - cumulatives buffer has no entry {0}")]
    MissingCumulative(Nat),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    /// A single step moved the price outside `[0.7, 1.5]` of its previous
    /// value, beyond what the rational log approximation can handle.
    #[error("Swap error - too big price change")]
    TooBigPriceChange,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    NumberError(#[from] crate::error::NumberError),

    #[error(transparent)]
    MathError(#[from] crate::error::MathError),

    #[error(transparent)]
    StateError(#[from] crate::error::StateError),

    #[error(transparent)]
    SwapError(#[from] crate::error::SwapError),
}

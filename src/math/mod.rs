pub mod ladder;
pub mod liquidity_math;
pub mod oracle;
pub mod shift;
pub mod tick_math;

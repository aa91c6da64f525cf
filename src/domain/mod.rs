// Analysis configuration value objects
pub mod config;

// Domain-specific error types
pub mod errors;

// Candles, price series and timeframes
pub mod market;

// Port interfaces
pub mod ports;

pub mod recommendation;
pub mod report;
pub mod sentiment;
pub mod signal;

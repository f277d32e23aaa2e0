//! Rules-engine adapters that can back a board's drop validator.
pub mod cozy;

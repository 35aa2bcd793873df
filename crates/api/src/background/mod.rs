//! Background maintenance tasks.

pub mod nonce_sweep;

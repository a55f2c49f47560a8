//! Data types for the token relay.

mod token;

pub use token::{TokenRecord, TokenStats};

//! Wire shapes shared with relay peers and API clients

mod types;

pub use types::*;

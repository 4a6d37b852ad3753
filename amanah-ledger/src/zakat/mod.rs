//! Zakat payments. Each payment posts its cash value to the payer's
//! mosque ledger in the same operation that records it.
pub mod error;
mod fitrah;
mod mal;

pub use fitrah::*;
pub use mal::*;

pub const ZAKAT_FITRAH_CATEGORY: &str = "zakat_fitrah";
pub const ZAKAT_MAL_CATEGORY: &str = "zakat_mal";

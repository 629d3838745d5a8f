//! Market listing retrieval.
//!
//! - `rest` - CoinGecko `/coins/markets` client behind the `ListingSource` trait
//! - `scanner` - paginated scan with early termination, feeding the ranker

pub mod error;
pub mod rest;
pub mod scanner;

pub use error::*;
pub use rest::*;
pub use scanner::*;

//! Query modules for the fuel price SDK.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection) and exposes methods
//! returning `Result<T>` with typed model payloads.

pub mod compiler;
pub mod prices;
pub mod stations;
pub mod trends;

pub use prices::{PriceQuery, PriceWindow};
pub use stations::StationQuery;
pub use trends::TrendQuery;

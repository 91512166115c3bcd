pub mod period;
pub mod price;
pub mod query;
pub mod response;
pub mod station;
pub mod trend;

pub use period::*;
pub use price::*;
pub use query::*;
pub use response::*;
pub use station::*;
pub use trend::*;

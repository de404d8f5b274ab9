pub mod arrivals;
pub mod config;
pub mod error;
pub mod live;
pub mod prelude;
pub mod query;
pub mod shared;
pub mod trimet;

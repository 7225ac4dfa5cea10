//! Core of tokensweep: look up memberships by customer email and disable the
//! payment instrument tokens on their recurring collections.

pub mod collection;
pub mod config;
pub mod error;
pub mod export;
pub mod gateway;
pub mod ingest;
pub mod io;
pub mod membership;
pub mod paths;
pub mod pipeline;
pub mod types;

pub use error::{CoreError, Result};
pub use gateway::{Gateway, HttpGateway};
pub use pipeline::{Pipeline, ProcessOutput};

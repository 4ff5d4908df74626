//! HTTP inbound adapter exposing the REST endpoints under `/api/v1`.

pub mod error;
pub mod health;
pub mod parks;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod view;
pub mod visits;

pub use error::{ApiResult, json_config};

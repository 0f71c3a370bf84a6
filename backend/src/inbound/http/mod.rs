//! HTTP inbound adapter exposing REST and streaming endpoints.

pub mod error;
pub mod generation;
pub mod health;
pub mod interviews;
pub mod job_infos;
pub mod principal;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;
pub mod webhooks;

pub use error::{ApiResult, PlainTextError, json_error_handler};

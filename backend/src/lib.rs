//! Backend library for the interview rehearsal service.
//!
//! Hexagonal layout: [`domain`] holds the use-cases and their ports,
//! [`inbound`] adapts HTTP onto the driving ports, and [`outbound`] supplies
//! the driven adapters (PostgreSQL, caching, identity, text generation).

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;

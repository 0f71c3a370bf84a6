//! Identity-provider adapters: session-token verification and grant checks
//! answered from verified claims.

mod claims_entitlements;
mod session_token;

pub use claims_entitlements::ClaimsEntitlementService;
pub use session_token::{SessionKeyError, SessionTokenVerifier};

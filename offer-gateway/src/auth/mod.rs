//! Caller identity and authorization
//!
//! - **middleware**: resolves the `x-offer-role` header into an `AccessContext`
//! - **rbac**: enforces per-action capabilities with audit logging
//!
//! ## Usage
//!
//! ```ignore
//! let api = Router::new()
//!     .route("/api/offers", get(list_offers))
//!     .layer(middleware::from_fn(role_middleware));
//!
//! async fn list_offers(Viewer(ctx): Viewer) -> impl IntoResponse {
//!     enforce(&ctx, Action::ListOffers)?;
//!     // ...
//! }
//! ```

pub mod middleware;
pub mod rbac;

pub use middleware::{
    resolve_context, role_middleware, AuthError, Viewer, REQUEST_ID_HEADER, ROLE_HEADER,
    USER_HEADER,
};
pub use rbac::enforce;

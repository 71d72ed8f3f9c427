//! Domain model, controllers, and ports of the admin console.
//!
//! Purpose: describe the studio resources, how they are edited and
//! confirmed, and the ports the controllers use to reach the REST API and
//! the credential store. Nothing here knows about HTTP clients, terminals, or
//! files.
//!
//! Public surface:
//! - Error / ErrorCode: taxonomy every controller reports with.
//! - SessionGuard / SessionContext: credential lifecycle and 401 handling.
//! - Resource / ResourceController: the generic CRUD page.
//! - PendingQueue: reconciled approval queue for pending purchases.

pub mod confirm;
pub mod controller;
pub mod decode;
pub mod display;
pub mod error;
pub mod form;
pub mod invitation;
pub mod pending;
pub mod ports;
pub mod reconcile;
pub mod resource;
pub mod resources;
pub mod schema;
pub mod session;

pub use self::controller::{ListState, ListView, ResourceContext, ResourceController, fetch_options};
pub use self::error::{Error, ErrorCode};
pub use self::invitation::{InvitationProbe, InvitationStatus};
pub use self::pending::PendingQueue;
pub use self::resource::{ApiPath, CollectionShape, Resource, ResourceId, ResourceIdValidationError};
pub use self::session::{
    AuthToken, AuthTokenValidationError, SessionContext, SessionGuard, SessionMetadata,
    StoredCredential,
};

//! # migrent-access
//!
//! Role-gated access control for the MigRent admin area.
//!
//! Every protected page mounts a fresh [`Mount`] from an
//! [`AccessController`]. The mount starts `Unresolved` and settles in one
//! of three terminal states:
//!
//! | State | When |
//! |-------|------|
//! | `Redirecting(SignIn)` | no session |
//! | `Granted` | session role claim or stored role equals the required role |
//! | `Redirecting(Home)` / `Denied` | anything else, including lookup errors |
//!
//! The session claim is checked first; the user-record store is consulted
//! at most once per identity per mount, and only when the claim does not
//! match.

pub mod collaborators;
pub mod controller;
pub mod error;
pub mod identity;
pub mod state;

pub use collaborators::{AuthProvider, Navigator, RecordingNavigator, UserRecordStore};
pub use controller::{AccessController, Mount};
pub use error::AccessError;
pub use identity::{Identity, Session};
pub use state::{AccessPolicy, AccessState, Authorization, RedirectTarget};

//! Core crate for the `slidescope` viewer.
//!
//! The root module primarily re-exports types from the feature modules so
//! that embedders can wire up a session without digging through the module
//! hierarchy.

pub mod boundary;
pub mod overlay;
pub mod search;

pub use crate::boundary::{Boundary, BoundaryError, CenterPoint};
pub use crate::overlay::{ImageUpdate, OverlayDescriptor, ViewerSession};
pub use crate::search::{SearchBackend, SearchCoordinator, SearchError, SearchPhase, WsiRecord};

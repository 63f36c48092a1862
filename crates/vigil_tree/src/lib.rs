//! The design tree model consumed by the Vigil coverage engine.
//!
//! A [`Design`] is a global signal table plus a hierarchy of [`Fragment`]s.
//! Each fragment holds, per clock [`Domain`], an ordered list of
//! [`Statement`]s: assignments, dispatches over case bodies, and formal
//! directives. Coverage passes attach their identities to the tree through
//! [`Marks`], which makes re-tagging idempotent.

#![warn(missing_docs)]

pub mod arena;
pub mod cover;
pub mod design;
pub mod error;
pub mod expr;
pub mod fragment;
pub mod ids;
pub mod loc;
pub mod pattern;
pub mod signal;
pub mod stmt;

pub use arena::{Arena, ArenaId};
pub use cover::{CoverageId, FacetSet, Marks, ParseCoverageIdError};
pub use design::Design;
pub use error::TreeError;
pub use expr::{BinaryOp, Expr, UnaryOp};
pub use fragment::{Domain, DomainBody, Fragment, Subfragment};
pub use ids::SignalId;
pub use loc::SrcLoc;
pub use pattern::Pattern;
pub use signal::{Signal, SignalKind};
pub use stmt::{Assign, Case, Formal, FormalKind, Statement, Switch};

//! Coverage instrumentation and aggregation for Vigil designs.
//!
//! The crate turns an elaborated [`Design`](vigil_tree::Design) into a
//! self-observing one and folds what the observation saw into per-facet
//! reports:
//!
//! 1. [`tag`] gives every coverable construct of a facet a stable
//!    [`CoverageId`](vigil_tree::CoverageId) and a [`Descriptor`].
//! 2. [`inject`] adds 1-bit shadow signals recording each construct's
//!    outcomes, leaving the design's own behaviour untouched.
//! 3. A [`CoverageObserver`] registered with the simulator counts the
//!    shadows that read true at each settled step.
//! 4. An [`AggregateReport`] merges the counts of many runs and emits the
//!    summary line and the JSON document.
//!
//! [`instrument`] and [`CoverageSession`] bundle these steps for a test
//! session.
//!
//! # Usage
//!
//! ```ignore
//! let mut session = CoverageSession::from_config(&config);
//! let inst = session.instrument(&mut design)?;
//! let mut observers = inst.observers();
//! {
//!     let mut sim = Simulator::with_config(&design, session.sim_config())?;
//!     for obs in observers.iter_mut() {
//!         sim.add_observer(obs);
//!     }
//!     // drive stimulus
//! }
//! session.finish_run(&inst, &observers);
//! for line in session.emit()? {
//!     println!("{line}");
//! }
//! ```

#![warn(missing_docs)]

pub mod aggregate;
pub mod counter;
pub mod descriptor;
pub mod error;
pub mod inject;
pub mod instrument;
pub mod naming;
pub mod observer;
pub mod report;
pub mod session;
pub mod tag;
pub mod walk;

#[cfg(test)]
mod fixture;

pub use aggregate::AggregateReport;
pub use counter::OutcomeCounter;
pub use descriptor::{ConstructKind, Descriptor};
pub use error::CoverageError;
pub use inject::{inject, ShadowIndex};
pub use instrument::{instrument, FacetPlan, Instrumentation};
pub use naming::Namer;
pub use observer::CoverageObserver;
pub use report::{CoverageDocument, ListingOptions, SortBy, Summary};
pub use session::CoverageSession;
pub use tag::{tag, TagResult};

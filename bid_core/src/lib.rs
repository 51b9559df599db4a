//! # bid_core - Fence Bid Calculation Engine
//!
//! `bid_core` is the computational heart of FenceBid, providing the bid
//! projection calculator and session state for a fencing contractor's
//! proposal workflow. All inputs and outputs are JSON-serializable; the
//! remote pricing API's wire shapes are modeled directly.
//!
//! ## Design Philosophy
//!
//! - **Stateless core**: Projections are pure functions over an
//!   already-fetched estimate and user inputs
//! - **Typed boundary**: Free text is validated into range-checked values
//!   before it reaches any arithmetic
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use bid_core::projection::project_custom_margin;
//! use bid_core::session::{BidSession, SessionEvent};
//!
//! // Pure projection: $1,000 job over 100 LF at a 20% net margin
//! let p = project_custom_margin(1000.0, 100.0, 20.0).unwrap();
//! assert_eq!(p.revenue, 1250.0);
//!
//! // Or fold events into a session
//! let session = BidSession::new().apply(SessionEvent::CrewOptionToggled(4));
//! assert_eq!(session.resolved_crew_size(), 4);
//! ```
//!
//! ## Modules
//!
//! - [`projection`] - The bid projection calculator (crew scaling, margins)
//! - [`session`] - Bid session container and event reducer
//! - [`costs`] - Remote pricing API data model
//! - [`forms`] - Typed form inputs with validation
//! - [`selection`] - Toggle-selection state machine
//! - [`errors`] - Structured error types
//! - [`file_io`] - Session drafts with atomic saves and locking

pub mod costs;
pub mod errors;
pub mod file_io;
pub mod forms;
pub mod projection;
pub mod selection;
pub mod session;

// Re-export commonly used types at crate root for convenience
pub use errors::{BidError, BidResult};
pub use file_io::{load_session, save_session, FileLock};
pub use session::{BidSession, SessionEvent};

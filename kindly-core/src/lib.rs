//! Core types and orchestration for the Kindly care-provider browser.

/// Domain models and category identifiers shared by every layer.
pub mod model;
/// Gateway trait describing the backend provider queries.
pub mod ports;
/// Path registry and lifetime management for the views.
pub mod router;
/// Stateless category picker that reports selections to its owner.
pub mod selector;
/// Orchestrator keeping the result set in sync with the latest selection.
pub mod synchronizer;
/// Pure view model derived from a synchronizer snapshot.
pub mod view;

pub use model::*;
pub use ports::*;
pub use router::*;
pub use selector::*;
pub use synchronizer::*;
pub use view::*;

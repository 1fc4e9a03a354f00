//! Interactive-surface plumbing: the dispatch bridge that carries work from
//! background threads onto the surface, and the registry of open views.

pub mod bridge;
pub mod registry;

pub use bridge::{bridge, BridgeClosed, UiDispatcher, UiQueue};
pub use registry::{View, ViewRegistry};

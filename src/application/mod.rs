//! Application layer: the client-side state machine of the account payments screen.
//!
//! `reactive` provides the cells and key-tagged queries the other modules are
//! built on. `AccountPayments` wires the selection, the dependent payments
//! query, the form and the create workflow together.

pub mod component;
pub mod form;
pub mod reactive;
pub mod selection;
pub mod workflow;

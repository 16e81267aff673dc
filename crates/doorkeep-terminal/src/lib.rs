//! Door terminal logic.
//!
//! This crate holds the swipe pipeline between the peripherals and the
//! credential store: the key [`Accumulator`], the code [`Normalizer`], the
//! [`StateMachine`] and the [`Session`] that sequences them, plus the
//! [`Display`] seam and its in-memory [`VirtualDisplay`].

pub mod accumulator;
pub mod display;
pub mod messages;
pub mod normalizer;
pub mod session;
pub mod state_machine;

pub use accumulator::Accumulator;
pub use display::{Alignment, Display, VirtualDisplay, VirtualDisplayBuilder, align_text, truncate_text};
pub use messages::DisplayMessages;
pub use normalizer::{Normalizer, NormalizerConfig};
pub use session::{Control, Session, SessionConfig};
pub use state_machine::{StateMachine, StateMachineBuilder, StateTransition};

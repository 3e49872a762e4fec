//! Component models for cable simulation.
//!
//! This module provides the pieces a cable is built from:
//! - Carriers: strand, tape stack, stabilizer
//! - Sources: operating current waveform
//! - Contacts: inter-carrier conductance and mutual inductance

mod carrier;
mod conductance;
mod sources;

pub use carrier::{CarrierKind, CurrentCarrier, TapeLayer};
pub use conductance::{ConductanceDefinition, InterCarrierConductance};
pub use sources::CurrentWaveform;

//! Error types for the cable electric solver.
//!
//! This module provides a unified error type [`ScableError`] that covers
//! all error conditions that can occur while validating a cable description,
//! reducing a constrained linear system and solving it.

use thiserror::Error;

/// Result type alias using [`ScableError`].
pub type Result<T> = std::result::Result<T, ScableError>;

/// Unified error type for all solver operations.
#[derive(Error, Debug)]
pub enum ScableError {
    // ============ Assembly / Dimension Errors ============
    /// A matrix or vector does not match the current DOF count
    #[error("Dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    /// An index refers to a DOF that does not exist
    #[error("Index {index} in {what} is out of range for {dofs} degrees of freedom")]
    IndexOutOfRange {
        what: String,
        index: usize,
        dofs: usize,
    },

    /// Equipotential descriptor is inconsistent
    #[error("Invalid equipotential surfaces: {message}")]
    InvalidEquipotential { message: String },

    // ============ Solve Errors ============
    /// Reduced system has no usable pivot in a column
    #[error("Singular reduced system - no pivot in column {column}")]
    SingularMatrix { column: usize },

    /// Direct solve produced NaN or infinity
    #[error("Non-finite value in reduced solution at index {index}")]
    NonFiniteSolution { index: usize },

    /// Transient solve requested before any steady state was computed
    #[error("Transient solve requires a steady-state solution as initial condition")]
    MissingSteadyState,

    // ============ Configuration Errors ============
    /// Invalid solver parameter
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    /// Invalid cable description
    #[error("Invalid cable description: {message}")]
    InvalidCable { message: String },

    // ============ Report I/O Errors ============
    /// Error writing the step report
    #[error("Report output error: {message}")]
    ReportOutputError { message: String },
}

impl ScableError {
    /// Create a dimension mismatch error
    pub fn dimension_mismatch(what: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            what: what.into(),
            expected,
            found,
        }
    }

    /// Create an index out of range error
    pub fn index_out_of_range(what: impl Into<String>, index: usize, dofs: usize) -> Self {
        Self::IndexOutOfRange {
            what: what.into(),
            index,
            dofs,
        }
    }

    /// Create an invalid equipotential error
    pub fn invalid_equipotential(message: impl Into<String>) -> Self {
        Self::InvalidEquipotential {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid cable error
    pub fn invalid_cable(message: impl Into<String>) -> Self {
        Self::InvalidCable {
            message: message.into(),
        }
    }
}

//! Operations Module
//!
//! This module provides a unified description of every call the tool makes
//! to the auth service and the gateway.

pub mod operation;

pub use operation::{Method, Operation, OperationResult, Service};

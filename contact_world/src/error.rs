// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use alloc::string::String;

use contact_shapes::Shape;
use thiserror::Error;

use crate::types::ColliderId;

/// Errors returned by [`World`](crate::World) construction and mutation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Error {
    /// A radius or half extent was zero, negative, or not finite.
    #[error("invalid collider geometry: {0:?}")]
    InvalidGeometry(Shape),
    /// A layer index was not below the configured layer count.
    #[error("layer {layer} is out of range (max_layers = {max_layers})")]
    InvalidLayer {
        /// The offending layer.
        layer: usize,
        /// The world's configured layer count.
        max_layers: usize,
    },
    /// More layers were requested than the subscription bitmask can hold.
    #[error("{0} layers requested; at most 32 are supported")]
    TooManyLayers(usize),
}

/// Failure reported by a collision handler.
///
/// A failing handler never aborts a step. The world counts the fault, logs
/// it, and applies its [`FaultPolicy`](crate::FaultPolicy).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The handler gave up with a message.
    #[error("{0}")]
    Failed(String),
    /// The owner of the given collider was already mutably borrowed when an
    /// instance handler needed it.
    #[error("owner of collider {0} is already borrowed")]
    OwnerBusy(ColliderId),
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Return type of every collision handler.
pub type HandlerResult = Result<(), HandlerError>;

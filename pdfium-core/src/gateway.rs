//! The single serialization point for engine calls
//!
//! The native engine has no internal concurrency guarantees and its global
//! state is not partitionable by document or page, so every call into it
//! must hold one process-wide exclusive lock. The gateway owns the engine
//! outright: the only way to reach it is through [`EngineGateway::lock`],
//! which makes bypassing the serialization structurally impossible.

use pdfium_engine::PdfiumEngine;
use std::sync::{Mutex, MutexGuard};

/// Owns the engine and serializes all access to it.
///
/// The lock is intentionally coarse. It does not distinguish documents or
/// pages, and it is held for the full duration of each public operation,
/// nested helper calls included. Helpers receive `&mut dyn PdfiumEngine`
/// from the already-acquired guard, so the lock is taken exactly once per
/// operation.
pub struct EngineGateway {
    engine: Mutex<Box<dyn PdfiumEngine>>,
}

impl EngineGateway {
    /// Take ownership of an engine.
    pub fn new(engine: Box<dyn PdfiumEngine>) -> Self {
        Self {
            engine: Mutex::new(engine),
        }
    }

    /// Acquire the engine lock, blocking until it is free.
    ///
    /// A poisoned lock means a caller panicked mid-engine-call and the
    /// engine's internal state can no longer be trusted; that is the one
    /// fatal condition in this layer.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Box<dyn PdfiumEngine>> {
        self.engine
            .lock()
            .expect("engine lock poisoned: a previous engine call panicked")
    }
}

impl std::fmt::Debug for EngineGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineGateway").finish_non_exhaustive()
    }
}

//! A cart bound to a persistence port.
//!
//! [`CartStore`] loads its state once when opened and saves after every
//! dispatched operation. Storage is abstracted behind [`CartPersistence`]
//! so the reducer stays pure and tests can run against
//! [`MemoryPersistence`].
//!
//! The store does no locking of its own; callers serialize dispatches.

use std::convert::Infallible;
use std::sync::{Mutex, PoisonError};

use super::cart::{CartAction, CartState, reduce};

/// Load/save hooks for a cart's state.
pub trait CartPersistence {
    type Error;

    /// Load the saved cart, or `None` if nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self) -> Result<Option<CartState>, Self::Error>;

    /// Save the cart, replacing anything saved before.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&self, state: &CartState) -> Result<(), Self::Error>;
}

/// In-process persistence backed by a mutex.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    saved: Mutex<Option<CartState>>,
}

impl MemoryPersistence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously saved cart.
    #[must_use]
    pub fn with_state(state: CartState) -> Self {
        Self {
            saved: Mutex::new(Some(state)),
        }
    }

    /// The most recently saved state.
    #[must_use]
    pub fn saved(&self) -> Option<CartState> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CartPersistence for MemoryPersistence {
    type Error = Infallible;

    fn load(&self) -> Result<Option<CartState>, Self::Error> {
        Ok(self.saved())
    }

    fn save(&self, state: &CartState) -> Result<(), Self::Error> {
        *self.saved.lock().unwrap_or_else(PoisonError::into_inner) = Some(state.clone());
        Ok(())
    }
}

/// A cart whose every change is written through to persistence.
#[derive(Debug)]
pub struct CartStore<P> {
    state: CartState,
    persistence: P,
}

impl<P: CartPersistence> CartStore<P> {
    /// Open the store, loading any saved cart.
    ///
    /// # Errors
    ///
    /// Returns the persistence error if loading fails.
    pub fn open(persistence: P) -> Result<Self, P::Error> {
        let state = persistence.load()?.unwrap_or_default();
        Ok(Self { state, persistence })
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Apply an operation and save the result.
    ///
    /// If saving fails the in-memory state is left as it was before the call.
    ///
    /// # Errors
    ///
    /// Returns the persistence error if saving fails.
    pub fn dispatch(&mut self, action: CartAction) -> Result<&CartState, P::Error> {
        let next = reduce(&self.state, action);
        self.persistence.save(&next)?;
        self.state = next;
        Ok(&self.state)
    }

    /// Consume the store, returning its persistence.
    pub fn into_inner(self) -> P {
        self.persistence
    }
}

use std::ops::Deref;

use windows::core::Interface;

/// A COM interface pointer that may be moved between threads.
///
/// Only wrap objects whose threading model allows it. SAPI's voice, token and stream objects are
/// registered as `Both`, and every thread that touches them must have called
/// [`initialize`](crate::initialize).
#[derive(Debug, Clone)]
pub struct Intf<I: Interface>(pub I);

unsafe impl<I: Interface> Send for Intf<I> {}

impl<I: Interface> Deref for Intf<I> {
    type Target = I;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

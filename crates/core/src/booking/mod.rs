//! Slot reservation engine
//!
//! State machine per slot: `Unbooked -> Booked -> Unbooked`. There is no
//! terminal "cancelled" state; a cancelled slot is reset and reusable.

pub mod ports;
pub mod service;
pub mod slot;

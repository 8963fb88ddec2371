//! Ports - interfaces between the domain and the outside world.
//!
//! Ports define what the domain needs from infrastructure without
//! depending on any concrete implementation.

mod channel;

pub use channel::Channel;

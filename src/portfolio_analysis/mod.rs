/// Domain layer: value objects, routing policy and pure services.
///
/// Nothing in here performs I/O directly; services talk to the outside world
/// only through the ports in [`crate::ports`].
pub mod domain;
pub mod policies;
pub mod services;

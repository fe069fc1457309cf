//! Services behind the handlers: the simulation service client and the
//! scenario teardown.

pub mod http;
pub mod teardown;

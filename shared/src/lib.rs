pub mod config;
pub mod constants;
pub mod customer;
pub mod error;
pub mod spin_session;
pub mod validation;
pub mod wheel_config;
pub mod wheel_spin;

pub use error::SpinError;
pub use spin_session::{SessionEvent, SpinSession, SpinState, SpinTicket};
pub use wheel_config::{Segment, WheelConfiguration};

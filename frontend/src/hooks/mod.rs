pub mod form_state;
pub mod use_wheel_config;

pub use form_state::*;
pub use use_wheel_config::*;

//! User-facing messages.
//!
//! Every line the command-line front end prints is a [`Message`] variant.
//! The text lives in one `Display` impl and the `msg_*` macros decide where
//! it goes.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;

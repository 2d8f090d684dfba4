//! IRC line handling: only the handful of verbs the logger acts on.
//!
//! - **classifier**: raw inbound line → [`LineEvent`]
//! - **command**: admin chat text → [`AdminCommand`]
//! - **outbound**: handshake, `PONG`, and `PRIVMSG` line builders

pub mod classifier;
pub mod command;
pub mod outbound;

pub use classifier::{classify, LineEvent};
pub use command::{parse_admin_command, AdminCommand};

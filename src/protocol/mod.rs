//! Wire protocol
//!
//! Length-prefixed binary framing shared by requests and responses, plus
//! classification of request payloads into control commands and synthesis
//! requests.

pub mod command;
pub mod frame;

pub use command::Command;
pub use frame::{read_header, read_payload, write_frame, MAX_REQUEST_LEN};

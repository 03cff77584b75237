//! Chat commands
//!
//! [`parse_command`] recognises the command in a message and
//! [`CommandInterpreter`] runs it against ClickUp, producing a
//! [`CommandResponse`] for the chat frontend.

pub mod bulk;
pub mod interpreter;
pub mod parser;
pub mod prd;
pub mod response;

pub use interpreter::CommandInterpreter;
pub use parser::{parse_command, Command};
pub use response::{CommandFailed, CommandResponse};

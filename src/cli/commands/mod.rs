mod command_result;
pub mod extract;
pub mod scan;
pub mod watch;

pub use command_result::*;

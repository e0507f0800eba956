/*!
 * Operator Console
 * Command parsing and snapshot rendering for the interactive binary
 */

mod command;
mod render;

pub use command::{ConsoleCommand, ParseError, HELP_TEXT};
pub use render::render;

mod command_overlay;
mod input;

pub use command_overlay::draw_command_overlay;
pub use input::{InputResult, TextInput};

pub mod command;
pub mod input;
pub mod interior_point;
pub mod number;
pub mod simplex;

mod helpers;

pub use input::{InputError, InputResult, ParsedInput};
pub use nalgebra;
pub use number::Number;

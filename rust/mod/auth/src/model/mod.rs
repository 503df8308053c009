mod member;
mod token;

pub use member::*;
pub use token::*;

mod comment;
mod like;
mod post;

pub use comment::*;
pub use like::*;
pub use post::*;

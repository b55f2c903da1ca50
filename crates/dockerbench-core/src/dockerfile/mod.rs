pub mod discover;
pub mod node;
pub mod parse;

pub use node::Node;
pub use parse::{ParseError, parse_dockerfile};

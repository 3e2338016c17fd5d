//! Reader for the SVG markup this crate emits

pub mod ast;
mod grammar;
pub mod lexer;
pub mod reader;

pub use ast::Element;
pub use grammar::parse;
pub use reader::read_scene;

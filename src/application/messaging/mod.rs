//! Message handling - turning chat text into commands

pub mod parser;

pub use parser::MessageParser;

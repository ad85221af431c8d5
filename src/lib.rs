pub mod ast;
pub mod builtins;
pub mod fixtures;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod token;

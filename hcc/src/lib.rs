pub mod ast;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod token;

pub use codegen::CodeGen;
pub use error::Error;
pub use lexer::Lexer;
pub use parser::Parser;

//! Kata lexer: converts learner source text into a token stream.

mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};

pub mod ast;
pub mod consteval;
mod error;
pub mod node;
mod parser;
pub mod scope;

pub use ast::*;
pub use error::{PResult, ParseError};
pub use node::{count_nodes, Node, NodeKind};
pub use parser::{parse_translation_unit, parse_with_typedefs, Parser, DEFAULT_MAX_DEPTH};
pub use scope::{DeclarationConflict, NameKind, ScopeStack};

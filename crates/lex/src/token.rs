use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntBase {
    Dec,
    Oct,
    Hex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Auto,
    Break,
    Case,
    Char,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extern,
    Float,
    For,
    Goto,
    If,
    Inline,
    Int,
    Long,
    Register,
    Restrict,
    Return,
    Short,
    Signed,
    Sizeof,
    Static,
    Struct,
    Switch,
    Typedef,
    Union,
    Unsigned,
    Void,
    Volatile,
    While,
    Bool,
    Complex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punctuator {
    LParen, RParen,
    LBrace, RBrace,
    LBracket, RBracket,
    Semicolon, Comma, Dot, Ellipsis,
    Arrow,
    Plus, Minus, Star, Slash, Percent,
    Inc, Dec,
    Amp, Pipe, Caret, Tilde, Bang,
    Question, Colon,
    Assign,
    PlusAssign, MinusAssign, StarAssign, SlashAssign, PercentAssign,
    Shl, Shr,
    ShlAssign, ShrAssign,
    Lt, Gt, Le, Ge, Eq, Ne,
    AndAnd, OrOr,
    AndAssign, OrAssign, XorAssign,
}

impl Punctuator {
    pub fn as_str(self) -> &'static str {
        use Punctuator::*;
        match self {
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            Semicolon => ";",
            Comma => ",",
            Dot => ".",
            Ellipsis => "...",
            Arrow => "->",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            Inc => "++",
            Dec => "--",
            Amp => "&",
            Pipe => "|",
            Caret => "^",
            Tilde => "~",
            Bang => "!",
            Question => "?",
            Colon => ":",
            Assign => "=",
            PlusAssign => "+=",
            MinusAssign => "-=",
            StarAssign => "*=",
            SlashAssign => "/=",
            PercentAssign => "%=",
            Shl => "<<",
            Shr => ">>",
            ShlAssign => "<<=",
            ShrAssign => ">>=",
            Lt => "<",
            Gt => ">",
            Le => "<=",
            Ge => ">=",
            Eq => "==",
            Ne => "!=",
            AndAnd => "&&",
            OrOr => "||",
            AndAssign => "&=",
            OrAssign => "|=",
            XorAssign => "^=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralKind {
    Int { base: IntBase, repr: String },
    Float { repr: String },
    Char { repr: String },
    String { repr: String },
}

impl LiteralKind {
    pub fn repr(&self) -> &str {
        match self {
            LiteralKind::Int { repr, .. }
            | LiteralKind::Float { repr }
            | LiteralKind::Char { repr }
            | LiteralKind::String { repr } => repr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Identifier(String),
    // identifier that names a typedef visible at the point it was lexed
    TypeName(String),
    Keyword(Keyword),
    Literal(LiteralKind),
    Punct(Punctuator),
    // `#pragma` line; holds the text after the `pragma` word
    Pragma(String),
}

impl TokenKind {
    /// Short category name used in diagnostics and token dumps.
    pub fn category(&self) -> &'static str {
        match self {
            TokenKind::Identifier(_) => "identifier",
            TokenKind::TypeName(_) => "type-name",
            TokenKind::Keyword(_) => "keyword",
            TokenKind::Literal(_) => "literal",
            TokenKind::Punct(_) => "punct",
            TokenKind::Pragma(_) => "pragma",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// 1-based source coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Loc {
    pub line: u32,
    pub column: u32,
}

impl Loc {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
    pub loc: Loc,
}

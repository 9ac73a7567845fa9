use crate::keywords::to_keyword;
use crate::token::{IntBase, LiteralKind, Loc, Punctuator as P, Span, Token, TokenKind as K};
use crate::{LexError, TypedefLookup};

// Longest spellings first so a prefix never wins over a longer operator.
const PUNCTUATORS: &[(&str, P)] = &[
    ("...", P::Ellipsis),
    ("<<=", P::ShlAssign),
    (">>=", P::ShrAssign),
    ("->", P::Arrow),
    ("++", P::Inc),
    ("--", P::Dec),
    ("<=", P::Le),
    (">=", P::Ge),
    ("==", P::Eq),
    ("!=", P::Ne),
    ("&&", P::AndAnd),
    ("||", P::OrOr),
    ("+=", P::PlusAssign),
    ("-=", P::MinusAssign),
    ("*=", P::StarAssign),
    ("/=", P::SlashAssign),
    ("%=", P::PercentAssign),
    ("<<", P::Shl),
    (">>", P::Shr),
    ("&=", P::AndAssign),
    ("|=", P::OrAssign),
    ("^=", P::XorAssign),
    ("(", P::LParen),
    (")", P::RParen),
    ("{", P::LBrace),
    ("}", P::RBrace),
    ("[", P::LBracket),
    ("]", P::RBracket),
    (";", P::Semicolon),
    (",", P::Comma),
    (".", P::Dot),
    ("+", P::Plus),
    ("-", P::Minus),
    ("*", P::Star),
    ("/", P::Slash),
    ("%", P::Percent),
    ("&", P::Amp),
    ("|", P::Pipe),
    ("^", P::Caret),
    ("~", P::Tilde),
    ("!", P::Bang),
    ("?", P::Question),
    (":", P::Colon),
    ("=", P::Assign),
    ("<", P::Lt),
    (">", P::Gt),
];

pub struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    len: usize,
    pos: usize,
    // Line bookkeeping is advanced lazily up to `counted`.
    counted: usize,
    line: u32,
    line_start: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            len: src.len(),
            pos: 0,
            counted: 0,
            line: 1,
            line_start: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }
    fn peek_at(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.pos + n).copied()
    }
    fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }
    fn starts_with(&self, s: &str) -> bool {
        self.bytes
            .get(self.pos..)
            .is_some_and(|rest| rest.starts_with(s.as_bytes()))
    }
    fn make_span(&self, start: usize) -> Span {
        Span {
            start,
            end: self.pos,
        }
    }

    fn loc_at(&mut self, pos: usize) -> Loc {
        while self.counted < pos {
            if self.bytes[self.counted] == b'\n' {
                self.line += 1;
                self.line_start = self.counted + 1;
            }
            self.counted += 1;
        }
        Loc::new(self.line, (pos - self.line_start + 1) as u32)
    }

    fn error(&mut self, pos: usize, message: impl Into<String>) -> LexError {
        LexError {
            message: message.into(),
            loc: self.loc_at(pos),
        }
    }

    fn is_ident_start(c: u8) -> bool {
        (c == b'_') || (c as char).is_ascii_alphabetic()
    }
    fn is_ident_continue(c: u8) -> bool {
        (c == b'_') || (c as char).is_ascii_alphanumeric()
    }

    fn at_line_start(&mut self, pos: usize) -> bool {
        self.loc_at(pos);
        self.src[self.line_start..pos].trim().is_empty()
    }

    // Stops early at a `#pragma` line and hands back its token.
    fn skip_ws_and_comments(&mut self) -> Result<Option<Token>, LexError> {
        loop {
            // whitespace
            while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n' | 0x0B | 0x0C)) {
                self.pos += 1;
            }
            // line splice \\
            if self.starts_with("\\\n") {
                self.pos += 2;
                continue;
            }
            if self.starts_with("\\\r\n") {
                self.pos += 3;
                continue;
            }
            // comments
            if self.starts_with("//") {
                self.pos += 2;
                while let Some(c) = self.peek() {
                    if c == b'\n' {
                        break;
                    }
                    self.pos += 1;
                }
                continue;
            }
            if self.starts_with("/*") {
                let start = self.pos;
                self.pos += 2;
                while self.pos < self.len && !self.starts_with("*/") {
                    self.pos += 1;
                }
                if !self.starts_with("*/") {
                    return Err(self.error(start, "unterminated comment"));
                }
                self.pos += 2;
                continue;
            }
            if self.peek() == Some(b'#') && self.at_line_start(self.pos) {
                if let Some(pragma) = self.directive()? {
                    return Ok(Some(pragma));
                }
                continue;
            }
            break;
        }
        Ok(None)
    }

    // Preprocessor output: `# 12 "file.c" 1`, `#line 12`, `#pragma ...`.
    fn directive(&mut self) -> Result<Option<Token>, LexError> {
        let start = self.pos;
        let loc = self.loc_at(start);
        self.pos += 1;
        let body_start = self.pos;
        while let Some(c) = self.peek() {
            if c == b'\n' {
                break;
            }
            self.pos += 1;
        }
        let body = self.src[body_start..self.pos].trim();
        if let Some(rest) = body.strip_prefix("pragma") {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                let text = rest.trim().to_string();
                return Ok(Some(Token {
                    kind: K::Pragma(text),
                    lexeme: self.src[start..self.pos].trim_end().to_string(),
                    span: self.make_span(start),
                    loc,
                }));
            }
        }
        let body = body.strip_prefix("line").map(str::trim_start).unwrap_or(body);
        let word: String = body.chars().take_while(|c| !c.is_whitespace()).collect();
        if word.is_empty() {
            return Ok(None);
        }
        let Ok(line) = word.parse::<u32>() else {
            return Err(self.error(
                start,
                format!("preprocessing directive `#{}` is not supported; preprocess the input first", word),
            ));
        };
        // The marker names the line that follows it.
        if self.peek() == Some(b'\n') {
            self.pos += 1;
        }
        self.loc_at(self.pos);
        self.line = line;
        self.line_start = self.pos;
        Ok(None)
    }

    pub fn next_token(&mut self, names: &impl TypedefLookup) -> Result<Option<Token>, LexError> {
        if let Some(pragma) = self.skip_ws_and_comments()? {
            return Ok(Some(pragma));
        }
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Ok(None);
        };
        let loc = self.loc_at(start);

        // Wide literals: L'x' and L"..."
        if c == b'L' && matches!(self.peek_at(1), Some(b'\'' | b'"')) {
            self.pos += 1;
            let kind = self.quoted(start)?;
            return Ok(Some(self.token(kind, start, loc)));
        }

        // Identifier, keyword or typedef-name
        if Self::is_ident_start(c) {
            self.bump();
            while let Some(c2) = self.peek() {
                if Self::is_ident_continue(c2) {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            let lex = &self.src[start..self.pos];
            let kind = if let Some(kw) = to_keyword(lex) {
                K::Keyword(kw)
            } else {
                classify_identifier(lex, names)
            };
            return Ok(Some(self.token(kind, start, loc)));
        }

        if (c as char).is_ascii_digit()
            || (c == b'.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()))
        {
            let kind = self.number(start)?;
            return Ok(Some(self.token(kind, start, loc)));
        }

        if c == b'"' || c == b'\'' {
            let kind = self.quoted(start)?;
            return Ok(Some(self.token(kind, start, loc)));
        }

        for (spelling, p) in PUNCTUATORS {
            if self.starts_with(spelling) {
                self.pos += spelling.len();
                return Ok(Some(self.token(K::Punct(*p), start, loc)));
            }
        }

        let ch = self.src[start..].chars().next().unwrap_or('?');
        Err(LexError {
            message: format!("unrecognized character {:?}", ch),
            loc,
        })
    }

    fn token(&self, kind: K, start: usize, loc: Loc) -> Token {
        Token {
            kind,
            lexeme: self.src[start..self.pos].to_string(),
            span: self.make_span(start),
            loc,
        }
    }

    fn eat_digits(&mut self, pred: fn(u8) -> bool) -> usize {
        let from = self.pos;
        while self.peek().is_some_and(pred) {
            self.pos += 1;
        }
        self.pos - from
    }

    fn eat_exponent(&mut self, markers: [u8; 2]) -> Result<bool, LexError> {
        match self.peek() {
            Some(e) if e == markers[0] || e == markers[1] => {
                let at = self.pos;
                self.pos += 1;
                if matches!(self.peek(), Some(b'+' | b'-')) {
                    self.pos += 1;
                }
                if self.eat_digits(|d| d.is_ascii_digit()) == 0 {
                    return Err(self.error(at, "exponent has no digits"));
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    // Longest match over integer and floating constants, suffix included.
    fn number(&mut self, start: usize) -> Result<K, LexError> {
        let is_float;
        let base;
        if self.starts_with("0x") || self.starts_with("0X") {
            self.pos += 2;
            base = IntBase::Hex;
            let mut digits = self.eat_digits(|d| d.is_ascii_hexdigit());
            let mut fraction = false;
            if self.peek() == Some(b'.') {
                self.pos += 1;
                fraction = true;
                digits += self.eat_digits(|d| d.is_ascii_hexdigit());
            }
            if digits == 0 {
                return Err(self.error(start, "hexadecimal constant has no digits"));
            }
            let exponent = self.eat_exponent([b'p', b'P'])?;
            if fraction && !exponent {
                return Err(self.error(start, "hexadecimal floating constant requires an exponent"));
            }
            is_float = exponent;
        } else {
            self.eat_digits(|d| d.is_ascii_digit());
            let mut fraction = false;
            if self.peek() == Some(b'.') {
                self.pos += 1;
                fraction = true;
                self.eat_digits(|d| d.is_ascii_digit());
            }
            let exponent = self.eat_exponent([b'e', b'E'])?;
            is_float = fraction || exponent;
            base = if !is_float && self.bytes[start] == b'0' && self.pos - start > 1 {
                IntBase::Oct
            } else {
                IntBase::Dec
            };
            if base == IntBase::Oct && self.src[start..self.pos].bytes().any(|d| d == b'8' || d == b'9') {
                return Err(self.error(start, format!("invalid digit in octal constant `{}`", &self.src[start..self.pos])));
            }
        }

        let suffix_start = self.pos;
        while self.peek().is_some_and(Self::is_ident_continue) {
            self.pos += 1;
        }
        let suffix = self.src[suffix_start..self.pos].to_ascii_lowercase();
        let repr = self.src[start..self.pos].to_string();
        if is_float {
            if !matches!(suffix.as_str(), "" | "f" | "l") {
                return Err(self.error(start, format!("invalid suffix on floating constant `{}`", repr)));
            }
            return Ok(K::Literal(LiteralKind::Float { repr }));
        }
        if !matches!(
            suffix.as_str(),
            "" | "u" | "l" | "ul" | "lu" | "ll" | "ull" | "llu"
        ) {
            return Err(self.error(start, format!("invalid suffix on integer constant `{}`", repr)));
        }
        Ok(K::Literal(LiteralKind::Int { base, repr }))
    }

    // Character constant or string literal; the cursor sits on the opening quote.
    fn quoted(&mut self, start: usize) -> Result<K, LexError> {
        let quote = self.bump().unwrap_or(b'"');
        let what = if quote == b'"' { "string literal" } else { "character constant" };
        let mut chars = 0usize;
        loop {
            match self.bump() {
                None | Some(b'\n') => return Err(self.error(start, format!("unterminated {}", what))),
                Some(b'\\') => {
                    if matches!(self.bump(), None | Some(b'\n')) {
                        return Err(self.error(start, format!("unterminated {}", what)));
                    }
                    chars += 1;
                }
                Some(q) if q == quote => break,
                Some(_) => chars += 1,
            }
        }
        let repr = self.src[start..self.pos].to_string();
        if quote == b'\'' {
            if chars == 0 {
                return Err(self.error(start, "empty character constant"));
            }
            return Ok(K::Literal(LiteralKind::Char { repr }));
        }
        Ok(K::Literal(LiteralKind::String { repr }))
    }
}

/// Decides between identifier and typedef-name for a non-keyword lexeme.
pub fn classify_identifier(lexeme: &str, names: &impl TypedefLookup) -> K {
    if names.is_typedef(lexeme) {
        K::TypeName(lexeme.to_string())
    } else {
        K::Identifier(lexeme.to_string())
    }
}

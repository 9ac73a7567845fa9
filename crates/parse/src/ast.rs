use std::fmt;

pub use lex::Loc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Extern,
    Static,
    Auto,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeQual {
    Const,
    Volatile,
    Restrict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuncSpec {
    Inline,
}

impl Storage {
    pub fn as_str(self) -> &'static str {
        match self {
            Storage::Extern => "extern",
            Storage::Static => "static",
            Storage::Auto => "auto",
            Storage::Register => "register",
        }
    }
}

impl TypeQual {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeQual::Const => "const",
            TypeQual::Volatile => "volatile",
            TypeQual::Restrict => "restrict",
        }
    }
}

pub fn join_quals(quals: &[TypeQual]) -> String {
    quals.iter().map(|q| q.as_str()).collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    pub items: Vec<ExternalDecl>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalDecl {
    FuncDef(FuncDef),
    Decl(Decl),
    Typedef(Typedef),
    Pragma(Pragma),
}

/// A `#pragma` line kept from preprocessed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pragma {
    // everything after the `pragma` word, trimmed; may be empty
    pub text: String,
    pub loc: Loc,
}

impl TranslationUnit {
    pub fn functions(&self) -> impl Iterator<Item = &FuncDef> {
        self.items.iter().filter_map(|it| match it {
            ExternalDecl::FuncDef(f) => Some(f),
            _ => None,
        })
    }

    pub fn decls(&self) -> impl Iterator<Item = &Decl> {
        self.items.iter().filter_map(|it| match it {
            ExternalDecl::Decl(d) => Some(d),
            _ => None,
        })
    }

    pub fn typedefs(&self) -> impl Iterator<Item = &Typedef> {
        self.items.iter().filter_map(|it| match it {
            ExternalDecl::Typedef(t) => Some(t),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDef {
    pub decl: Decl,
    pub body: Compound,
    pub loc: Loc,
}

impl FuncDef {
    pub fn name(&self) -> &str {
        self.decl.name.as_deref().unwrap_or("")
    }

    pub fn params(&self) -> &[Decl] {
        match &self.decl.ty {
            Type::Func { params: Some(pl), .. } => &pl.params,
            _ => &[],
        }
    }
}

/// An object, function or member declaration, or an unnamed one such as
/// `struct S { int a; };` or an abstract parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decl {
    pub name: Option<String>,
    pub storage: Vec<Storage>,
    pub funcspec: Vec<FuncSpec>,
    pub ty: Type,
    pub init: Option<Initializer>,
    pub bitsize: Option<Expr>,
    pub loc: Loc,
}

impl Decl {
    /// Spelling of the base type specifier: `int`, `unsigned long`, `myint`, `struct S`.
    pub fn type_name(&self) -> String {
        self.ty.base_spec().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typedef {
    pub name: String,
    pub storage: Vec<Storage>,
    pub ty: Type,
    pub loc: Loc,
}

impl Typedef {
    pub fn type_name(&self) -> String {
        self.ty.base_spec().to_string()
    }
}

/// Declarator chain, outermost modifier first, ending in `Type::Decl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Decl {
        declname: Option<String>,
        quals: Vec<TypeQual>,
        spec: TypeSpec,
        loc: Loc,
    },
    Ptr {
        quals: Vec<TypeQual>,
        to: Box<Type>,
        loc: Loc,
    },
    Array {
        of: Box<Type>,
        dim: Option<Box<Expr>>,
        dim_quals: Vec<TypeQual>,
        is_static: bool,
        // `[*]`
        vla_star: bool,
        loc: Loc,
    },
    Func {
        ret: Box<Type>,
        // None for `()`, an unspecified parameter list
        params: Option<ParamList>,
        loc: Loc,
    },
}

impl Type {
    pub fn base_spec(&self) -> &TypeSpec {
        match self {
            Type::Decl { spec, .. } => spec,
            Type::Ptr { to, .. } => to.base_spec(),
            Type::Array { of, .. } => of.base_spec(),
            Type::Func { ret, .. } => ret.base_spec(),
        }
    }

    pub fn declname(&self) -> Option<&str> {
        match self {
            Type::Decl { declname, .. } => declname.as_deref(),
            Type::Ptr { to, .. } => to.declname(),
            Type::Array { of, .. } => of.declname(),
            Type::Func { ret, .. } => ret.declname(),
        }
    }

    pub fn loc(&self) -> Loc {
        match self {
            Type::Decl { loc, .. }
            | Type::Ptr { loc, .. }
            | Type::Array { loc, .. }
            | Type::Func { loc, .. } => *loc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    // keyword specifiers in source order, e.g. ["unsigned", "long", "int"]
    Builtin { names: Vec<String>, loc: Loc },
    TypedefName { name: String, loc: Loc },
    Record(Record),
    Enum(EnumSpec),
}

impl TypeSpec {
    pub fn loc(&self) -> Loc {
        match self {
            TypeSpec::Builtin { loc, .. } | TypeSpec::TypedefName { loc, .. } => *loc,
            TypeSpec::Record(r) => r.loc,
            TypeSpec::Enum(e) => e.loc,
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Builtin { names, .. } => f.write_str(&names.join(" ")),
            TypeSpec::TypedefName { name, .. } => f.write_str(name),
            TypeSpec::Record(r) => match &r.tag {
                Some(tag) => write!(f, "{} {}", r.kind.as_str(), tag),
                None => f.write_str(r.kind.as_str()),
            },
            TypeSpec::Enum(e) => match &e.tag {
                Some(tag) => write!(f, "enum {}", tag),
                None => f.write_str("enum"),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Struct,
    Union,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Struct => "struct",
            RecordKind::Union => "union",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub kind: RecordKind,
    pub tag: Option<String>,
    // None when the tag is only referenced, not defined
    pub members: Option<Vec<Decl>>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSpec {
    pub tag: Option<String>,
    pub enumerators: Option<Vec<Enumerator>>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumerator {
    pub name: String,
    pub init: Option<Expr>,
    // folded constant value; None when the explicit value is not an integer constant
    pub value: Option<i64>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamList {
    pub params: Vec<Decl>,
    pub ellipsis: Option<Loc>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    pub ty: Type,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initializer {
    Expr(Expr),
    List(InitList),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitList {
    pub items: Vec<InitItem>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitItem {
    pub designators: Vec<Designator>,
    pub init: Initializer,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Designator {
    Field { name: String, loc: Loc },
    Index { index: Expr, loc: Loc },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compound {
    pub items: Vec<BlockItem>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockItem {
    Decl(Decl),
    Typedef(Typedef),
    Stmt(Stmt),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StmtKind {
    Compound(Compound),
    Expr(Expr),
    Empty,
    If { cond: Expr, then_branch: Box<Stmt>, else_branch: Option<Box<Stmt>> },
    Switch { cond: Expr, body: Box<Stmt> },
    Case { value: Expr, body: Box<Stmt> },
    Default { body: Box<Stmt> },
    Label { name: String, body: Box<Stmt> },
    While { cond: Expr, body: Box<Stmt> },
    DoWhile { body: Box<Stmt>, cond: Expr },
    For { init: Option<ForInit>, cond: Option<Expr>, step: Option<Expr>, body: Box<Stmt> },
    Goto(String),
    Continue,
    Break,
    Return(Option<Expr>),
    Pragma(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForInit {
    Decls(Vec<Decl>),
    Expr(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    BitNot,
    LogicalNot,
    AddrOf,
    Deref,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
    Sizeof,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::BitNot => "~",
            UnaryOp::LogicalNot => "!",
            UnaryOp::AddrOf => "&",
            UnaryOp::Deref => "*",
            UnaryOp::PreInc => "++",
            UnaryOp::PreDec => "--",
            UnaryOp::PostInc => "p++",
            UnaryOp::PostDec => "p--",
            UnaryOp::Sizeof => "sizeof",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    // Shifts
    Shl,
    Shr,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    // Logical
    LAnd,
    LOr,
    // Comparisons
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::LAnd => "&&",
            BinaryOp::LOr => "||",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstKind {
    Int,
    Float,
    Char,
    String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    Ident(String),
    // value is the source spelling, quotes and suffixes included
    Constant { kind: ConstKind, value: String },
    Unary { op: UnaryOp, expr: Box<Expr> },
    SizeofType(TypeName),
    Binary { op: BinaryOp, lhs: Box<Expr>, rhs: Box<Expr> },
    // op is None for plain `=`, Some(op) for `op=`
    Assign { op: Option<BinaryOp>, lhs: Box<Expr>, rhs: Box<Expr> },
    Cond { cond: Box<Expr>, then_e: Box<Expr>, else_e: Box<Expr> },
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Index { base: Box<Expr>, index: Box<Expr> },
    Member { base: Box<Expr>, field: String, arrow: bool },
    Cast { ty: TypeName, expr: Box<Expr> },
    CompoundLiteral { ty: TypeName, init: InitList },
    Comma(Vec<Expr>),
}

pub fn assign_symbol(op: Option<BinaryOp>) -> &'static str {
    match op {
        None => "=",
        Some(BinaryOp::Plus) => "+=",
        Some(BinaryOp::Minus) => "-=",
        Some(BinaryOp::Mul) => "*=",
        Some(BinaryOp::Div) => "/=",
        Some(BinaryOp::Mod) => "%=",
        Some(BinaryOp::Shl) => "<<=",
        Some(BinaryOp::Shr) => ">>=",
        Some(BinaryOp::BitAnd) => "&=",
        Some(BinaryOp::BitOr) => "|=",
        Some(BinaryOp::BitXor) => "^=",
        // not produced by the parser
        Some(other) => other.symbol(),
    }
}

impl Expr {
    pub fn new(kind: ExprKind, loc: Loc) -> Self {
        Self { kind, loc }
    }

    pub fn ident(name: impl Into<String>, loc: Loc) -> Self {
        Self::new(ExprKind::Ident(name.into()), loc)
    }

    pub fn constant(kind: ConstKind, value: impl Into<String>, loc: Loc) -> Self {
        Self::new(ExprKind::Constant { kind, value: value.into() }, loc)
    }

    pub fn unary(op: UnaryOp, expr: Expr, loc: Loc) -> Self {
        Self::new(ExprKind::Unary { op, expr: Box::new(expr) }, loc)
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        let loc = lhs.loc;
        Self::new(ExprKind::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }, loc)
    }

    pub fn assign(op: Option<BinaryOp>, lhs: Expr, rhs: Expr) -> Self {
        let loc = lhs.loc;
        Self::new(ExprKind::Assign { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }, loc)
    }

    pub fn cond(cond: Expr, then_e: Expr, else_e: Expr) -> Self {
        let loc = cond.loc;
        Self::new(
            ExprKind::Cond { cond: Box::new(cond), then_e: Box::new(then_e), else_e: Box::new(else_e) },
            loc,
        )
    }

    /// Literal spelling for constants, name for identifiers.
    pub fn as_leaf(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident(s) | ExprKind::Constant { value: s, .. } => Some(s),
            _ => None,
        }
    }
}

impl Stmt {
    pub fn new(kind: StmtKind, loc: Loc) -> Self {
        Self { kind, loc }
    }
}

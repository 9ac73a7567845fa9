//! Uniform read-only view over the typed AST.
//!
//! `Node` borrows one AST element and answers three questions the graph
//! emitter (or any other walker) needs: what kind of node it is, its most
//! salient attribute, and its children in source order.

use crate::ast::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    FileAst,
    FuncDef,
    Decl,
    Typedef,
    DeclList,
    TypeDecl,
    PtrDecl,
    ArrayDecl,
    FuncDecl,
    IdentifierType,
    TypedefName,
    Struct,
    Union,
    Enum,
    Enumerator,
    ParamList,
    EllipsisParam,
    Typename,
    Compound,
    If,
    While,
    DoWhile,
    For,
    Switch,
    Case,
    Default,
    Label,
    Goto,
    Break,
    Continue,
    Return,
    EmptyStatement,
    Id,
    Constant,
    UnaryOp,
    BinaryOp,
    Assignment,
    TernaryOp,
    FuncCall,
    ArrayRef,
    StructRef,
    Cast,
    ExprList,
    CompoundLiteral,
    InitList,
    NamedInitializer,
    Designator,
    Pragma,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        use NodeKind::*;
        match self {
            FileAst => "FileAST",
            FuncDef => "FuncDef",
            Decl => "Decl",
            Typedef => "Typedef",
            DeclList => "DeclList",
            TypeDecl => "TypeDecl",
            PtrDecl => "PtrDecl",
            ArrayDecl => "ArrayDecl",
            FuncDecl => "FuncDecl",
            IdentifierType => "IdentifierType",
            TypedefName => "TypedefName",
            Struct => "Struct",
            Union => "Union",
            Enum => "Enum",
            Enumerator => "Enumerator",
            ParamList => "ParamList",
            EllipsisParam => "EllipsisParam",
            Typename => "Typename",
            Compound => "Compound",
            If => "If",
            While => "While",
            DoWhile => "DoWhile",
            For => "For",
            Switch => "Switch",
            Case => "Case",
            Default => "Default",
            Label => "Label",
            Goto => "Goto",
            Break => "Break",
            Continue => "Continue",
            Return => "Return",
            EmptyStatement => "EmptyStatement",
            Id => "ID",
            Constant => "Constant",
            UnaryOp => "UnaryOp",
            BinaryOp => "BinaryOp",
            Assignment => "Assignment",
            TernaryOp => "TernaryOp",
            FuncCall => "FuncCall",
            ArrayRef => "ArrayRef",
            StructRef => "StructRef",
            Cast => "Cast",
            ExprList => "ExprList",
            CompoundLiteral => "CompoundLiteral",
            InitList => "InitList",
            NamedInitializer => "NamedInitializer",
            Designator => "Designator",
            Pragma => "Pragma",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    TranslationUnit(&'a TranslationUnit),
    FuncDef(&'a FuncDef),
    Decl(&'a Decl),
    Typedef(&'a Typedef),
    DeclList(&'a [Decl], Loc),
    Type(&'a Type),
    TypeSpec(&'a TypeSpec),
    Enumerator(&'a Enumerator),
    ParamList(&'a ParamList),
    Ellipsis(Loc),
    TypeName(&'a TypeName),
    Compound(&'a Compound),
    Stmt(&'a Stmt),
    Expr(&'a Expr),
    InitList(&'a InitList),
    NamedInitializer(&'a InitItem),
    Designator(&'a Designator),
    Pragma(&'a Pragma),
}

impl<'a> From<&'a TranslationUnit> for Node<'a> {
    fn from(tu: &'a TranslationUnit) -> Self {
        Node::TranslationUnit(tu)
    }
}

fn initializer(init: &Initializer) -> Node<'_> {
    match init {
        Initializer::Expr(e) => Node::Expr(e),
        Initializer::List(l) => Node::InitList(l),
    }
}

fn init_item(item: &InitItem) -> Node<'_> {
    if item.designators.is_empty() {
        initializer(&item.init)
    } else {
        Node::NamedInitializer(item)
    }
}

fn block_item(item: &BlockItem) -> Node<'_> {
    match item {
        BlockItem::Decl(d) => Node::Decl(d),
        BlockItem::Typedef(t) => Node::Typedef(t),
        BlockItem::Stmt(s) => Node::Stmt(s),
    }
}

impl<'a> Node<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::TranslationUnit(_) => NodeKind::FileAst,
            Node::FuncDef(_) => NodeKind::FuncDef,
            Node::Decl(_) => NodeKind::Decl,
            Node::Typedef(_) => NodeKind::Typedef,
            Node::DeclList(..) => NodeKind::DeclList,
            Node::Type(t) => match t {
                Type::Decl { .. } => NodeKind::TypeDecl,
                Type::Ptr { .. } => NodeKind::PtrDecl,
                Type::Array { .. } => NodeKind::ArrayDecl,
                Type::Func { .. } => NodeKind::FuncDecl,
            },
            Node::TypeSpec(s) => match s {
                TypeSpec::Builtin { .. } => NodeKind::IdentifierType,
                TypeSpec::TypedefName { .. } => NodeKind::TypedefName,
                TypeSpec::Record(r) => match r.kind {
                    RecordKind::Struct => NodeKind::Struct,
                    RecordKind::Union => NodeKind::Union,
                },
                TypeSpec::Enum(_) => NodeKind::Enum,
            },
            Node::Enumerator(_) => NodeKind::Enumerator,
            Node::ParamList(_) => NodeKind::ParamList,
            Node::Ellipsis(_) => NodeKind::EllipsisParam,
            Node::TypeName(_) => NodeKind::Typename,
            Node::Compound(_) => NodeKind::Compound,
            Node::Stmt(s) => match &s.kind {
                StmtKind::Compound(_) => NodeKind::Compound,
                StmtKind::Expr(e) => Node::Expr(e).kind(),
                StmtKind::Empty => NodeKind::EmptyStatement,
                StmtKind::If { .. } => NodeKind::If,
                StmtKind::Switch { .. } => NodeKind::Switch,
                StmtKind::Case { .. } => NodeKind::Case,
                StmtKind::Default { .. } => NodeKind::Default,
                StmtKind::Label { .. } => NodeKind::Label,
                StmtKind::While { .. } => NodeKind::While,
                StmtKind::DoWhile { .. } => NodeKind::DoWhile,
                StmtKind::For { .. } => NodeKind::For,
                StmtKind::Goto(_) => NodeKind::Goto,
                StmtKind::Continue => NodeKind::Continue,
                StmtKind::Break => NodeKind::Break,
                StmtKind::Return(_) => NodeKind::Return,
                StmtKind::Pragma(_) => NodeKind::Pragma,
            },
            Node::Expr(e) => match &e.kind {
                ExprKind::Ident(_) => NodeKind::Id,
                ExprKind::Constant { .. } => NodeKind::Constant,
                ExprKind::Unary { .. } | ExprKind::SizeofType(_) => NodeKind::UnaryOp,
                ExprKind::Binary { .. } => NodeKind::BinaryOp,
                ExprKind::Assign { .. } => NodeKind::Assignment,
                ExprKind::Cond { .. } => NodeKind::TernaryOp,
                ExprKind::Call { .. } => NodeKind::FuncCall,
                ExprKind::Index { .. } => NodeKind::ArrayRef,
                ExprKind::Member { .. } => NodeKind::StructRef,
                ExprKind::Cast { .. } => NodeKind::Cast,
                ExprKind::CompoundLiteral { .. } => NodeKind::CompoundLiteral,
                ExprKind::Comma(_) => NodeKind::ExprList,
            },
            Node::InitList(_) => NodeKind::InitList,
            Node::NamedInitializer(_) => NodeKind::NamedInitializer,
            Node::Designator(_) => NodeKind::Designator,
            Node::Pragma(_) => NodeKind::Pragma,
        }
    }

    /// The single most salient attribute for this node, if it has one.
    pub fn attribute(&self) -> Option<String> {
        match self {
            Node::FuncDef(f) => f.decl.name.clone(),
            Node::Decl(d) => d.name.clone(),
            Node::Typedef(t) => Some(t.name.clone()),
            Node::Type(Type::Decl { declname, .. }) => declname.clone(),
            Node::Type(Type::Ptr { quals, .. }) if !quals.is_empty() => Some(join_quals(quals)),
            Node::Type(Type::Array { vla_star: true, .. }) => Some("*".to_string()),
            Node::Type(Type::Array { is_static: true, .. }) => Some("static".to_string()),
            Node::TypeSpec(TypeSpec::Builtin { names, .. }) => Some(names.join(" ")),
            Node::TypeSpec(TypeSpec::TypedefName { name, .. }) => Some(name.clone()),
            Node::TypeSpec(TypeSpec::Record(r)) => r.tag.clone(),
            Node::TypeSpec(TypeSpec::Enum(e)) => e.tag.clone(),
            Node::Enumerator(en) => Some(match en.value {
                Some(v) => format!("{} = {}", en.name, v),
                None => en.name.clone(),
            }),
            Node::Stmt(s) => match &s.kind {
                StmtKind::Expr(e) => Node::Expr(e).attribute(),
                StmtKind::Label { name, .. } => Some(name.clone()),
                StmtKind::Goto(name) => Some(name.clone()),
                StmtKind::Pragma(text) if !text.is_empty() => Some(text.clone()),
                _ => None,
            },
            Node::Expr(e) => match &e.kind {
                ExprKind::Ident(name) => Some(name.clone()),
                ExprKind::Constant { value, .. } => Some(value.clone()),
                ExprKind::Unary { op, .. } => Some(op.symbol().to_string()),
                ExprKind::SizeofType(_) => Some(UnaryOp::Sizeof.symbol().to_string()),
                ExprKind::Binary { op, .. } => Some(op.symbol().to_string()),
                ExprKind::Assign { op, .. } => Some(assign_symbol(*op).to_string()),
                ExprKind::Member { field, arrow, .. } => {
                    Some(format!("{}{}", if *arrow { "->" } else { "." }, field))
                }
                _ => None,
            },
            Node::Designator(Designator::Field { name, .. }) => Some(format!(".{}", name)),
            Node::Designator(Designator::Index { .. }) => Some("[]".to_string()),
            Node::Pragma(p) if !p.text.is_empty() => Some(p.text.clone()),
            _ => None,
        }
    }

    /// Children in source order.
    pub fn children(&self) -> Vec<Node<'a>> {
        let mut out = Vec::new();
        match *self {
            Node::TranslationUnit(tu) => {
                for item in &tu.items {
                    out.push(match item {
                        ExternalDecl::FuncDef(f) => Node::FuncDef(f),
                        ExternalDecl::Decl(d) => Node::Decl(d),
                        ExternalDecl::Typedef(t) => Node::Typedef(t),
                        ExternalDecl::Pragma(p) => Node::Pragma(p),
                    });
                }
            }
            Node::FuncDef(f) => {
                out.push(Node::Decl(&f.decl));
                out.push(Node::Compound(&f.body));
            }
            Node::Decl(d) => {
                out.push(Node::Type(&d.ty));
                if let Some(bits) = &d.bitsize {
                    out.push(Node::Expr(bits));
                }
                if let Some(init) = &d.init {
                    out.push(initializer(init));
                }
            }
            Node::Typedef(t) => out.push(Node::Type(&t.ty)),
            Node::DeclList(decls, _) => out.extend(decls.iter().map(Node::Decl)),
            Node::Type(t) => match t {
                Type::Decl { spec, .. } => out.push(Node::TypeSpec(spec)),
                Type::Ptr { to, .. } => out.push(Node::Type(to)),
                Type::Array { of, dim, .. } => {
                    out.push(Node::Type(of));
                    if let Some(dim) = dim {
                        out.push(Node::Expr(dim));
                    }
                }
                Type::Func { ret, params, .. } => {
                    out.push(Node::Type(ret));
                    if let Some(pl) = params {
                        out.push(Node::ParamList(pl));
                    }
                }
            },
            Node::TypeSpec(s) => match s {
                TypeSpec::Builtin { .. } | TypeSpec::TypedefName { .. } => {}
                TypeSpec::Record(r) => {
                    if let Some(members) = &r.members {
                        out.extend(members.iter().map(Node::Decl));
                    }
                }
                TypeSpec::Enum(e) => {
                    if let Some(values) = &e.enumerators {
                        out.extend(values.iter().map(Node::Enumerator));
                    }
                }
            },
            Node::Enumerator(en) => {
                if let Some(init) = &en.init {
                    out.push(Node::Expr(init));
                }
            }
            Node::ParamList(pl) => {
                out.extend(pl.params.iter().map(Node::Decl));
                if let Some(loc) = pl.ellipsis {
                    out.push(Node::Ellipsis(loc));
                }
            }
            Node::Ellipsis(_) => {}
            Node::TypeName(tn) => out.push(Node::Type(&tn.ty)),
            Node::Compound(c) => out.extend(c.items.iter().map(block_item)),
            Node::Stmt(s) => stmt_children(s, &mut out),
            Node::Expr(e) => expr_children(e, &mut out),
            Node::InitList(l) => out.extend(l.items.iter().map(init_item)),
            Node::NamedInitializer(item) => {
                out.extend(item.designators.iter().map(Node::Designator));
                out.push(initializer(&item.init));
            }
            Node::Designator(d) => {
                if let Designator::Index { index, .. } = d {
                    out.push(Node::Expr(index));
                }
            }
            Node::Pragma(_) => {}
        }
        out
    }

    pub fn loc(&self) -> Loc {
        match self {
            Node::TranslationUnit(tu) => tu.loc,
            Node::FuncDef(f) => f.loc,
            Node::Decl(d) => d.loc,
            Node::Typedef(t) => t.loc,
            Node::DeclList(_, loc) | Node::Ellipsis(loc) => *loc,
            Node::Type(t) => t.loc(),
            Node::TypeSpec(s) => s.loc(),
            Node::Enumerator(e) => e.loc,
            Node::ParamList(p) => p.loc,
            Node::TypeName(t) => t.loc,
            Node::Compound(c) => c.loc,
            Node::Stmt(s) => s.loc,
            Node::Expr(e) => e.loc,
            Node::InitList(l) => l.loc,
            Node::NamedInitializer(i) => i.loc,
            Node::Designator(Designator::Field { loc, .. })
            | Node::Designator(Designator::Index { loc, .. }) => *loc,
            Node::Pragma(p) => p.loc,
        }
    }
}

fn stmt_children<'a>(s: &'a Stmt, out: &mut Vec<Node<'a>>) {
    match &s.kind {
        StmtKind::Compound(c) => out.extend(c.items.iter().map(block_item)),
        // an expression statement is the expression itself
        StmtKind::Expr(e) => expr_children(e, out),
        StmtKind::Empty | StmtKind::Goto(_) | StmtKind::Continue | StmtKind::Break | StmtKind::Pragma(_) => {}
        StmtKind::If { cond, then_branch, else_branch } => {
            out.push(Node::Expr(cond));
            out.push(Node::Stmt(then_branch));
            if let Some(e) = else_branch {
                out.push(Node::Stmt(e));
            }
        }
        StmtKind::Switch { cond, body } | StmtKind::While { cond, body } => {
            out.push(Node::Expr(cond));
            out.push(Node::Stmt(body));
        }
        StmtKind::Case { value, body } => {
            out.push(Node::Expr(value));
            out.push(Node::Stmt(body));
        }
        StmtKind::Default { body } | StmtKind::Label { body, .. } => out.push(Node::Stmt(body)),
        StmtKind::DoWhile { body, cond } => {
            out.push(Node::Stmt(body));
            out.push(Node::Expr(cond));
        }
        StmtKind::For { init, cond, step, body } => {
            match init {
                Some(ForInit::Decls(decls)) => {
                    let loc = decls.first().map_or(s.loc, |d| d.loc);
                    out.push(Node::DeclList(decls, loc));
                }
                Some(ForInit::Expr(e)) => out.push(Node::Expr(e)),
                None => {}
            }
            out.extend(cond.iter().map(Node::Expr));
            out.extend(step.iter().map(Node::Expr));
            out.push(Node::Stmt(body));
        }
        StmtKind::Return(value) => out.extend(value.iter().map(Node::Expr)),
    }
}

fn expr_children<'a>(e: &'a Expr, out: &mut Vec<Node<'a>>) {
    match &e.kind {
        ExprKind::Ident(_) | ExprKind::Constant { .. } => {}
        ExprKind::Unary { expr, .. } => out.push(Node::Expr(expr)),
        ExprKind::SizeofType(tn) => out.push(Node::TypeName(tn)),
        ExprKind::Binary { lhs, rhs, .. } | ExprKind::Assign { lhs, rhs, .. } => {
            out.push(Node::Expr(lhs));
            out.push(Node::Expr(rhs));
        }
        ExprKind::Cond { cond, then_e, else_e } => {
            out.push(Node::Expr(cond));
            out.push(Node::Expr(then_e));
            out.push(Node::Expr(else_e));
        }
        ExprKind::Call { callee, args } => {
            out.push(Node::Expr(callee));
            out.extend(args.iter().map(Node::Expr));
        }
        ExprKind::Index { base, index } => {
            out.push(Node::Expr(base));
            out.push(Node::Expr(index));
        }
        ExprKind::Member { base, .. } => out.push(Node::Expr(base)),
        ExprKind::Cast { ty, expr } => {
            out.push(Node::TypeName(ty));
            out.push(Node::Expr(expr));
        }
        ExprKind::CompoundLiteral { ty, init } => {
            out.push(Node::TypeName(ty));
            out.push(Node::InitList(init));
        }
        ExprKind::Comma(items) => out.extend(items.iter().map(Node::Expr)),
    }
}

/// Total number of nodes reachable from `root`, root included.
pub fn count_nodes(root: Node<'_>) -> usize {
    let mut stack = vec![root];
    let mut n = 0;
    while let Some(node) = stack.pop() {
        n += 1;
        stack.extend(node.children());
    }
    n
}

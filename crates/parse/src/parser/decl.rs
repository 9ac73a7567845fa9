//! Declarations: specifiers, declarators, records, enums and parameter lists.

use lex::keywords::keyword_str;
use lex::{Keyword as Kw, Loc, Punctuator as P, TokenKind as K};

use super::{Declared, Parser};
use crate::ast::*;
use crate::consteval;
use crate::error::PResult;
use crate::scope::NameKind;

/// Declaration specifiers shared by every declarator of one declaration.
pub(crate) struct Specifiers {
    pub storage: Vec<Storage>,
    pub is_typedef: bool,
    pub funcspec: Vec<FuncSpec>,
    pub quals: Vec<TypeQual>,
    pub spec: TypeSpec,
    pub loc: Loc,
}

impl Specifiers {
    // each declarator gets its own copy of the specifier subtree
    fn base(&self, declname: Option<String>, loc: Loc) -> Type {
        Type::Decl { declname, quals: self.quals.clone(), spec: self.spec.clone(), loc }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeclMode {
    // object, function, member and typedef declarators
    Named,
    // type names in casts, sizeof and compound literals
    Abstract,
    // parameters
    Either,
}

enum Modifier {
    Ptr { quals: Vec<TypeQual>, loc: Loc },
    Array { dim: Option<Box<Expr>>, dim_quals: Vec<TypeQual>, is_static: bool, vla_star: bool, loc: Loc },
    Func { params: Option<ParamList>, loc: Loc },
}

pub(crate) struct Declarator {
    name: Option<(String, Loc)>,
    // outermost first
    mods: Vec<Modifier>,
}

impl Declarator {
    /// Wraps the specifiers' base type in this declarator's modifiers.
    fn into_type(self, specs: &Specifiers) -> (Option<String>, Type, Loc) {
        let (declname, loc) = match self.name {
            Some((n, l)) => (Some(n), l),
            None => (None, specs.loc),
        };
        let mut ty = specs.base(declname.clone(), loc);
        for m in self.mods.into_iter().rev() {
            ty = match m {
                Modifier::Ptr { quals, loc } => Type::Ptr { quals, to: Box::new(ty), loc },
                Modifier::Array { dim, dim_quals, is_static, vla_star, loc } => {
                    Type::Array { of: Box::new(ty), dim, dim_quals, is_static, vla_star, loc }
                }
                Modifier::Func { params, loc } => Type::Func { ret: Box::new(ty), params, loc },
            };
        }
        (declname, ty, loc)
    }
}

fn storage_class(kw: Kw) -> Option<Storage> {
    match kw {
        Kw::Extern => Some(Storage::Extern),
        Kw::Static => Some(Storage::Static),
        Kw::Auto => Some(Storage::Auto),
        Kw::Register => Some(Storage::Register),
        _ => None,
    }
}

fn type_qualifier(kw: Kw) -> Option<TypeQual> {
    match kw {
        Kw::Const => Some(TypeQual::Const),
        Kw::Volatile => Some(TypeQual::Volatile),
        Kw::Restrict => Some(TypeQual::Restrict),
        _ => None,
    }
}

fn is_builtin_type(kw: Kw) -> bool {
    matches!(
        kw,
        Kw::Void
            | Kw::Char
            | Kw::Short
            | Kw::Int
            | Kw::Long
            | Kw::Float
            | Kw::Double
            | Kw::Signed
            | Kw::Unsigned
            | Kw::Bool
            | Kw::Complex
    )
}

/// Can `kind` begin a type name (specifier-qualifier list)?
pub(crate) fn starts_type_name(kind: &K) -> bool {
    match kind {
        K::TypeName(_) => true,
        K::Keyword(kw) => {
            is_builtin_type(*kw)
                || type_qualifier(*kw).is_some()
                || matches!(kw, Kw::Struct | Kw::Union | Kw::Enum)
        }
        _ => false,
    }
}

/// Can `kind` begin a declaration?
pub(crate) fn starts_declaration(kind: &K) -> bool {
    starts_type_name(kind)
        || matches!(kind, K::Keyword(kw) if storage_class(*kw).is_some() || matches!(kw, Kw::Typedef | Kw::Inline))
}

impl<'a> Parser<'a> {
    /// Declaration specifiers, or `None` when the current token cannot start
    /// one. A typedef-name only counts as a specifier while no other type
    /// specifier has been seen; after that it is the declarator's name.
    pub(crate) fn parse_decl_specifiers(&mut self, allow_storage: bool) -> PResult<Option<Specifiers>> {
        let start = self.peek_loc();
        let mut storage = Vec::new();
        let mut is_typedef = false;
        let mut funcspec = Vec::new();
        let mut quals = Vec::new();
        let mut builtin: Vec<String> = Vec::new();
        let mut builtin_loc = None;
        let mut spec: Option<TypeSpec> = None;
        let mut any = false;

        while let Some(kind) = self.peek_kind() {
            match kind {
                K::Keyword(kw) => {
                    if let Some(st) = storage_class(kw) {
                        if !allow_storage {
                            break;
                        }
                        self.bump();
                        storage.push(st);
                    } else if kw == Kw::Typedef {
                        if !allow_storage {
                            break;
                        }
                        self.bump();
                        is_typedef = true;
                    } else if let Some(q) = type_qualifier(kw) {
                        self.bump();
                        quals.push(q);
                    } else if kw == Kw::Inline {
                        self.bump();
                        funcspec.push(FuncSpec::Inline);
                    } else if is_builtin_type(kw) {
                        if spec.is_some() {
                            return self.unexpected("declarator");
                        }
                        let loc = self.peek_loc();
                        self.bump();
                        builtin_loc.get_or_insert(loc);
                        builtin.push(keyword_str(kw).to_string());
                    } else if matches!(kw, Kw::Struct | Kw::Union | Kw::Enum) {
                        if spec.is_some() || !builtin.is_empty() {
                            return self.unexpected("declarator");
                        }
                        spec = Some(if kw == Kw::Enum {
                            TypeSpec::Enum(self.nested(Self::parse_enum_spec)?)
                        } else {
                            TypeSpec::Record(self.nested(Self::parse_record_spec)?)
                        });
                    } else {
                        break;
                    }
                }
                K::TypeName(name) => {
                    if spec.is_some() || !builtin.is_empty() {
                        break;
                    }
                    let loc = self.peek_loc();
                    self.bump();
                    spec = Some(TypeSpec::TypedefName { name, loc });
                }
                _ => break,
            }
            any = true;
        }

        if !any {
            return Ok(None);
        }
        let spec = match (spec, builtin_loc) {
            (Some(s), _) => s,
            (None, Some(loc)) => TypeSpec::Builtin { names: builtin, loc },
            (None, None) => return self.unexpected("type specifier"),
        };
        Ok(Some(Specifiers { storage, is_typedef, funcspec, quals, spec, loc: start }))
    }

    /// The init-declarator list after `specs`, through the closing `;`, or a
    /// function definition when `allow_fndef` and a body follows the first
    /// declarator. Every name is declared before its initializer is parsed.
    pub(crate) fn parse_declaration(&mut self, specs: Specifiers, allow_fndef: bool) -> PResult<Vec<Declared>> {
        if self.consume_punct(P::Semicolon) {
            // tag declaration such as `struct S { int a; };`
            let ty = specs.base(None, specs.loc);
            return Ok(vec![Declared::Decl(Decl {
                name: None,
                storage: specs.storage,
                funcspec: specs.funcspec,
                ty,
                init: None,
                bitsize: None,
                loc: specs.loc,
            })]);
        }

        let mut out = Vec::new();
        loop {
            let d = self.parse_declarator(DeclMode::Named)?;
            let (name, ty, loc) = d.into_type(&specs);
            let name = name.unwrap_or_default();
            let kind = if specs.is_typedef { NameKind::Typedef } else { NameKind::Ordinary };
            self.declare(&name, kind, loc)?;

            if specs.is_typedef {
                out.push(Declared::Typedef(Typedef { name, storage: specs.storage.clone(), ty, loc }));
            } else {
                if allow_fndef && out.is_empty() && matches!(ty, Type::Func { .. }) && self.check_punct(P::LBrace) {
                    let decl = Decl {
                        name: Some(name),
                        storage: specs.storage.clone(),
                        funcspec: specs.funcspec.clone(),
                        ty,
                        init: None,
                        bitsize: None,
                        loc,
                    };
                    let body = self.parse_function_body(&decl)?;
                    log::debug!("parsed function `{}` ({} block items)", decl.name.as_deref().unwrap_or(""), body.items.len());
                    return Ok(vec![Declared::Func(FuncDef { decl, body, loc })]);
                }
                let init = if self.consume_punct(P::Assign) { Some(self.parse_initializer()?) } else { None };
                out.push(Declared::Decl(Decl {
                    name: Some(name),
                    storage: specs.storage.clone(),
                    funcspec: specs.funcspec.clone(),
                    ty,
                    init,
                    bitsize: None,
                    loc,
                }));
            }

            if self.consume_punct(P::Comma) {
                continue;
            }
            self.expect_punct(P::Semicolon)?;
            break;
        }
        Ok(out)
    }

    fn parse_function_body(&mut self, decl: &Decl) -> PResult<Compound> {
        let loc = self.expect_punct(P::LBrace)?;
        self.push_scope();
        // parameters are visible in the outermost block of the body
        if let Type::Func { params: Some(pl), .. } = &decl.ty {
            for p in &pl.params {
                if let Some(n) = &p.name {
                    self.declare(n, NameKind::Ordinary, p.loc)?;
                }
            }
        }
        let items = self.parse_block_items()?;
        self.pop_scope();
        Ok(Compound { items, loc })
    }

    pub(crate) fn parse_declarator(&mut self, mode: DeclMode) -> PResult<Declarator> {
        let mut ptrs = Vec::new();
        while self.check_punct(P::Star) {
            let loc = self.peek_loc();
            self.bump();
            let quals = self.parse_type_quals();
            ptrs.push(Modifier::Ptr { quals, loc });
        }

        let mut decl = Declarator { name: None, mods: Vec::new() };
        match self.peek_kind() {
            Some(K::Identifier(_)) | Some(K::TypeName(_)) if mode != DeclMode::Abstract => {
                decl.name = Some(self.expect_name()?);
            }
            Some(K::Punct(P::LParen)) if self.paren_opens_declarator(mode) => {
                self.bump();
                decl = self.nested(|p| p.parse_declarator(mode))?;
                self.expect_punct(P::RParen)?;
            }
            _ if mode == DeclMode::Named => return self.unexpected("identifier"),
            _ => {}
        }

        loop {
            let m = match self.peek_kind() {
                Some(K::Punct(P::LBracket)) => self.parse_array_suffix()?,
                Some(K::Punct(P::LParen)) => self.parse_param_suffix()?,
                _ => break,
            };
            decl.mods.push(m);
        }
        decl.mods.extend(ptrs.into_iter().rev());
        Ok(decl)
    }

    // `(` after the pointer part: a parenthesized declarator, or the parameter
    // list of an abstract function declarator?
    fn paren_opens_declarator(&mut self, mode: DeclMode) -> bool {
        if mode == DeclMode::Named {
            return true;
        }
        match self.peek_kind_n(1) {
            Some(K::Punct(P::Star)) | Some(K::Punct(P::LParen)) | Some(K::Punct(P::LBracket)) => true,
            Some(K::Identifier(_)) => mode == DeclMode::Either,
            _ => false,
        }
    }

    fn parse_type_quals(&mut self) -> Vec<TypeQual> {
        let mut quals = Vec::new();
        while let Some(K::Keyword(kw)) = self.peek_kind() {
            match type_qualifier(kw) {
                Some(q) => {
                    self.bump();
                    quals.push(q);
                }
                None => break,
            }
        }
        quals
    }

    fn parse_array_suffix(&mut self) -> PResult<Modifier> {
        let loc = self.expect_punct(P::LBracket)?;
        let mut is_static = self.consume_keyword(Kw::Static);
        let dim_quals = self.parse_type_quals();
        if !is_static {
            is_static = self.consume_keyword(Kw::Static);
        }
        let mut vla_star = false;
        let mut dim = None;
        if self.check_punct(P::Star) && self.peek_kind_n(1) == Some(K::Punct(P::RBracket)) {
            self.bump();
            vla_star = true;
        } else if !self.check_punct(P::RBracket) {
            dim = Some(Box::new(self.parse_assignment()?));
        }
        self.expect_punct(P::RBracket)?;
        Ok(Modifier::Array { dim, dim_quals, is_static, vla_star, loc })
    }

    fn parse_param_suffix(&mut self) -> PResult<Modifier> {
        let loc = self.expect_punct(P::LParen)?;
        self.push_scope();
        let params = self.parse_param_list(loc);
        self.pop_scope();
        Ok(Modifier::Func { params: params?, loc })
    }

    // after `(`, through `)`; None for an empty list
    fn parse_param_list(&mut self, loc: Loc) -> PResult<Option<ParamList>> {
        if self.consume_punct(P::RParen) {
            return Ok(None);
        }
        let mut params = Vec::new();
        let mut ellipsis = None;
        loop {
            if !params.is_empty() && self.check_punct(P::Ellipsis) {
                ellipsis = Some(self.peek_loc());
                self.bump();
                self.expect_punct(P::RParen)?;
                break;
            }
            // identifier lists of old-style definitions land here too
            let Some(specs) = self.parse_decl_specifiers(true)? else {
                return self.unexpected("parameter declaration");
            };
            let d = self.nested(|p| p.parse_declarator(DeclMode::Either))?;
            let (name, ty, ploc) = d.into_type(&specs);
            if let Some(n) = &name {
                self.declare(n, NameKind::Ordinary, ploc)?;
            }
            params.push(Decl {
                name,
                storage: specs.storage,
                funcspec: specs.funcspec,
                ty,
                init: None,
                bitsize: None,
                loc: ploc,
            });
            if self.consume_punct(P::Comma) {
                continue;
            }
            self.expect_punct(P::RParen)?;
            break;
        }
        Ok(Some(ParamList { params, ellipsis, loc }))
    }

    /// `struct`/`union` specifier, keyword included.
    fn parse_record_spec(&mut self) -> PResult<Record> {
        let loc = self.peek_loc();
        let kind = if self.consume_keyword(Kw::Union) {
            RecordKind::Union
        } else {
            self.bump();
            RecordKind::Struct
        };
        let tag = match self.peek_kind() {
            Some(K::Identifier(_)) | Some(K::TypeName(_)) => Some(self.expect_name()?.0),
            _ => None,
        };
        let members = if self.consume_punct(P::LBrace) {
            let mut members = Vec::new();
            while !self.consume_punct(P::RBrace) {
                self.parse_member_declaration(&mut members)?;
            }
            Some(members)
        } else if tag.is_none() {
            return self.unexpected("'{' or tag name");
        } else {
            None
        };
        Ok(Record { kind, tag, members, loc })
    }

    fn parse_member_declaration(&mut self, out: &mut Vec<Decl>) -> PResult<()> {
        let Some(specs) = self.parse_decl_specifiers(false)? else {
            return self.unexpected("member declaration");
        };
        if self.consume_punct(P::Semicolon) {
            // anonymous struct or union member
            let ty = specs.base(None, specs.loc);
            out.push(Decl { name: None, storage: Vec::new(), funcspec: Vec::new(), ty, init: None, bitsize: None, loc: specs.loc });
            return Ok(());
        }
        loop {
            let (name, ty, loc) = if self.check_punct(P::Colon) {
                // unnamed bit-field
                let loc = self.peek_loc();
                (None, specs.base(None, loc), loc)
            } else {
                self.parse_declarator(DeclMode::Named)?.into_type(&specs)
            };
            let bitsize = if self.consume_punct(P::Colon) { Some(self.parse_conditional()?) } else { None };
            out.push(Decl { name, storage: Vec::new(), funcspec: Vec::new(), ty, init: None, bitsize, loc });
            if self.consume_punct(P::Comma) {
                continue;
            }
            self.expect_punct(P::Semicolon)?;
            return Ok(());
        }
    }

    /// `enum` specifier, keyword included. Enumerators are declared as
    /// ordinary identifiers as soon as they are read.
    fn parse_enum_spec(&mut self) -> PResult<EnumSpec> {
        let loc = self.peek_loc();
        self.bump();
        let tag = match self.peek_kind() {
            Some(K::Identifier(_)) | Some(K::TypeName(_)) => Some(self.expect_name()?.0),
            _ => None,
        };
        if !self.consume_punct(P::LBrace) {
            if tag.is_none() {
                return self.unexpected("'{' or tag name");
            }
            return Ok(EnumSpec { tag, enumerators: None, loc });
        }

        let mut enumerators: Vec<Enumerator> = Vec::new();
        let mut next = Some(0i64);
        loop {
            // trailing comma
            if !enumerators.is_empty() && self.check_punct(P::RBrace) {
                break;
            }
            let (name, eloc) = self.expect_name()?;
            let init = if self.consume_punct(P::Assign) { Some(self.parse_conditional()?) } else { None };
            let value = match &init {
                Some(e) => consteval::eval_int(e, &self.scopes),
                None => next,
            };
            next = value.and_then(|v| v.checked_add(1));
            self.declare_enumerator(&name, value, eloc)?;
            enumerators.push(Enumerator { name, init, value, loc: eloc });
            if !self.consume_punct(P::Comma) {
                break;
            }
        }
        self.expect_punct(P::RBrace)?;
        Ok(EnumSpec { tag, enumerators: Some(enumerators), loc })
    }

    /// Type name as used by casts, `sizeof` and compound literals.
    pub(crate) fn parse_type_name(&mut self) -> PResult<TypeName> {
        let loc = self.peek_loc();
        let Some(specs) = self.parse_decl_specifiers(false)? else {
            return self.unexpected("type name");
        };
        let (_, ty, _) = self.nested(|p| p.parse_declarator(DeclMode::Abstract))?.into_type(&specs);
        Ok(TypeName { ty, loc })
    }

    pub(crate) fn parse_initializer(&mut self) -> PResult<Initializer> {
        if self.check_punct(P::LBrace) {
            return Ok(Initializer::List(self.nested(Self::parse_init_list)?));
        }
        Ok(Initializer::Expr(self.parse_assignment()?))
    }

    /// `{ ... }` with optional designators and a trailing comma.
    pub(crate) fn parse_init_list(&mut self) -> PResult<InitList> {
        let loc = self.expect_punct(P::LBrace)?;
        let mut items = Vec::new();
        while !self.check_punct(P::RBrace) {
            let iloc = self.peek_loc();
            let mut designators = Vec::new();
            loop {
                if self.check_punct(P::LBracket) {
                    let dloc = self.peek_loc();
                    self.bump();
                    let index = self.parse_conditional()?;
                    self.expect_punct(P::RBracket)?;
                    designators.push(Designator::Index { index, loc: dloc });
                } else if self.check_punct(P::Dot) {
                    let dloc = self.peek_loc();
                    self.bump();
                    let (name, _) = self.expect_name()?;
                    designators.push(Designator::Field { name, loc: dloc });
                } else {
                    break;
                }
            }
            if !designators.is_empty() {
                self.expect_punct(P::Assign)?;
            }
            let init = self.parse_initializer()?;
            items.push(InitItem { designators, init, loc: iloc });
            if !self.consume_punct(P::Comma) {
                break;
            }
        }
        self.expect_punct(P::RBrace)?;
        Ok(InitList { items, loc })
    }
}

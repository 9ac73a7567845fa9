//! Declaration scopes for the ordinary-identifier namespace.
//!
//! The front end needs to know whether a visible name is a typedef-name or an
//! ordinary identifier (object, function, parameter, enumerator), and for
//! enumeration constants their folded value. Tags and members live in other
//! namespaces and never land here.

use std::collections::HashMap;
use std::fmt;

use lex::TypedefLookup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Ordinary,
    Typedef,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NameKind::Ordinary => "non-typedef",
            NameKind::Typedef => "typedef",
        })
    }
}

/// A name redeclared in the same frame with the other kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationConflict {
    pub name: String,
    pub previous: NameKind,
    pub requested: NameKind,
}

#[derive(Debug, Clone, Copy)]
struct Binding {
    kind: NameKind,
    // set only for enumeration constants with a folded value
    value: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct ScopeStack {
    // frames[0] is file scope and is never popped
    frames: Vec<HashMap<String, Binding>>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    /// File scope pre-populated with typedef names, standing in for headers.
    pub fn with_typedefs<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut scopes = Self::new();
        for name in names {
            scopes.frames[0].insert(name.into(), Binding { kind: NameKind::Typedef, value: None });
        }
        scopes
    }

    pub fn push_scope(&mut self) {
        self.frames.push(HashMap::new());
        log::debug!("push scope (depth {})", self.frames.len());
    }

    pub fn pop_scope(&mut self) {
        if self.frames.len() == 1 {
            log::warn!("attempt to pop file scope ignored");
            return;
        }
        self.frames.pop();
        log::debug!("pop scope (depth {})", self.frames.len());
    }

    /// Number of live frames, file scope included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn declare(&mut self, name: &str, kind: NameKind) -> Result<(), DeclarationConflict> {
        self.bind(name, Binding { kind, value: None })
    }

    /// Declares an enumeration constant; `value` is None when its initializer
    /// did not fold.
    pub fn declare_enumerator(&mut self, name: &str, value: Option<i64>) -> Result<(), DeclarationConflict> {
        self.bind(name, Binding { kind: NameKind::Ordinary, value })
    }

    fn bind(&mut self, name: &str, binding: Binding) -> Result<(), DeclarationConflict> {
        let depth = self.frames.len();
        let Some(frame) = self.frames.last_mut() else {
            return Ok(());
        };
        match frame.get_mut(name) {
            Some(prev) if prev.kind != binding.kind => Err(DeclarationConflict {
                name: name.to_string(),
                previous: prev.kind,
                requested: binding.kind,
            }),
            Some(prev) => {
                prev.value = binding.value;
                Ok(())
            }
            None => {
                log::debug!("declare {} `{}` at depth {}", binding.kind, name, depth);
                frame.insert(name.to_string(), binding);
                Ok(())
            }
        }
    }

    /// Innermost binding of `name`, if any frame has one.
    pub fn lookup(&self, name: &str) -> Option<NameKind> {
        self.innermost(name).map(|b| b.kind)
    }

    /// Value of the enumeration constant `name` as visible here. An inner
    /// object or parameter of the same name hides it.
    pub fn constant(&self, name: &str) -> Option<i64> {
        self.innermost(name).and_then(|b| b.value)
    }

    fn innermost(&self, name: &str) -> Option<&Binding> {
        self.frames.iter().rev().find_map(|f| f.get(name))
    }

    pub fn is_typedef(&self, name: &str) -> bool {
        self.lookup(name) == Some(NameKind::Typedef)
    }
}

impl TypedefLookup for ScopeStack {
    fn is_typedef(&self, name: &str) -> bool {
        ScopeStack::is_typedef(self, name)
    }
}

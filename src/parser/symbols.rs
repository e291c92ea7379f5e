//! Two-level scoped symbol table
//!
//! Names live in one of two scopes: the Global scope, which lasts for the whole
//! parse, and at most one Local scope, which is opened for a function's
//! parameters and body and discarded in one step when the body ends.
//!
//! Entries are stored in an arena and addressed by [`SymbolId`], so AST nodes
//! can refer to a parameter or local after its scope has been closed. A closed
//! scope's entries are unreachable through [`SymbolTable::lookup`].

use std::fmt;

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Index of a [`Symbol`] inside its [`SymbolTable`].
pub type SymbolId = usize;

/// What a name was declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Variable => write!(f, "variable"),
            SymbolKind::Function => write!(f, "function"),
        }
    }
}

/// The scope an entry was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Local,
}

/// Which scopes a lookup consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    LocalOnly,
    GlobalOnly,
    /// Active Local scope first (if any), then Global.
    LocalThenGlobal,
}

/// A declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Number of formal parameters; always 0 for variables.
    pub arity: usize,
    pub scope: Scope,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("'{name}' is already declared in this scope")]
    Duplicate { name: String, existing: SymbolId },

    #[error("no function scope is active")]
    NoActiveScope,
}

/// Symbol table with a Global scope and an optional active Local scope
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    global: FxHashMap<String, SymbolId>,
    global_order: Vec<SymbolId>,
    local: Option<FxHashMap<String, SymbolId>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` in `scope`.
    ///
    /// Fails if `name` already exists in that scope, or if `scope` is
    /// [`Scope::Local`] and no function scope is active. The same name may
    /// exist in both scopes at once.
    pub fn declare(
        &mut self,
        name: &str,
        kind: SymbolKind,
        arity: usize,
        scope: Scope,
    ) -> Result<SymbolId, SymbolError> {
        let id = self.symbols.len();
        let names = match scope {
            Scope::Global => &mut self.global,
            Scope::Local => self.local.as_mut().ok_or(SymbolError::NoActiveScope)?,
        };

        if let Some(&existing) = names.get(name) {
            return Err(SymbolError::Duplicate {
                name: name.to_string(),
                existing,
            });
        }
        names.insert(name.to_string(), id);

        if scope == Scope::Global {
            self.global_order.push(id);
        }
        self.symbols.push(Symbol {
            name: name.to_string(),
            kind,
            arity: if kind == SymbolKind::Function { arity } else { 0 },
            scope,
        });

        Ok(id)
    }

    pub fn lookup(&self, name: &str, mode: LookupMode) -> Option<SymbolId> {
        let local = || self.local.as_ref().and_then(|names| names.get(name).copied());
        let global = || self.global.get(name).copied();

        match mode {
            LookupMode::LocalOnly => local(),
            LookupMode::GlobalOnly => global(),
            LookupMode::LocalThenGlobal => local().or_else(global),
        }
    }

    /// Look up `name` and return the entry itself.
    pub fn resolve(&self, name: &str, mode: LookupMode) -> Option<&Symbol> {
        self.lookup(name, mode).map(|id| &self.symbols[id])
    }

    /// The entry for an id handed out by [`declare`](Self::declare).
    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    /// Open a fresh, empty Local scope, replacing any previous one.
    pub fn enter_function_scope(&mut self) {
        self.local = Some(FxHashMap::default());
    }

    /// Discard the Local scope and every name in it.
    pub fn exit_function_scope(&mut self) {
        self.local = None;
    }

    pub fn in_function_scope(&self) -> bool {
        self.local.is_some()
    }

    /// Global entries in declaration order.
    pub fn globals(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> + '_ {
        self.global_order.iter().map(|&id| (id, &self.symbols[id]))
    }

    /// Total entries ever declared, including those of closed scopes.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_and_lookup_global() {
        let mut table = SymbolTable::new();
        let id = table
            .declare("f", SymbolKind::Function, 2, Scope::Global)
            .unwrap();

        assert_eq!(table.lookup("f", LookupMode::GlobalOnly), Some(id));
        assert_eq!(table.lookup("f", LookupMode::LocalThenGlobal), Some(id));
        assert_eq!(table.lookup("f", LookupMode::LocalOnly), None);
        assert_eq!(table.get(id).arity, 2);
        assert_eq!(table.get(id).kind, SymbolKind::Function);
    }

    #[test]
    fn test_duplicate_in_same_scope() {
        let mut table = SymbolTable::new();
        let first = table
            .declare("x", SymbolKind::Variable, 0, Scope::Global)
            .unwrap();
        let err = table
            .declare("x", SymbolKind::Function, 0, Scope::Global)
            .unwrap_err();

        assert_eq!(
            err,
            SymbolError::Duplicate {
                name: "x".to_string(),
                existing: first
            }
        );
    }

    #[test]
    fn test_local_shadows_global() {
        let mut table = SymbolTable::new();
        let global = table
            .declare("x", SymbolKind::Function, 0, Scope::Global)
            .unwrap();
        table.enter_function_scope();
        let local = table
            .declare("x", SymbolKind::Variable, 0, Scope::Local)
            .unwrap();

        assert_ne!(global, local);
        assert_eq!(table.lookup("x", LookupMode::LocalThenGlobal), Some(local));
        assert_eq!(table.lookup("x", LookupMode::GlobalOnly), Some(global));

        table.exit_function_scope();
        assert_eq!(table.lookup("x", LookupMode::LocalThenGlobal), Some(global));
    }

    #[test]
    fn test_exit_discards_locals() {
        let mut table = SymbolTable::new();
        table.enter_function_scope();
        let y = table
            .declare("y", SymbolKind::Variable, 0, Scope::Local)
            .unwrap();
        table.exit_function_scope();

        assert!(!table.in_function_scope());
        assert_eq!(table.lookup("y", LookupMode::LocalThenGlobal), None);
        assert_eq!(table.lookup("y", LookupMode::LocalOnly), None);
        // The entry itself survives for AST references.
        assert_eq!(table.get(y).scope, Scope::Local);

        table.enter_function_scope();
        assert!(table
            .declare("y", SymbolKind::Variable, 0, Scope::Local)
            .is_ok());
    }

    #[test]
    fn test_local_declare_without_scope() {
        let mut table = SymbolTable::new();
        assert_eq!(
            table.declare("a", SymbolKind::Variable, 0, Scope::Local),
            Err(SymbolError::NoActiveScope)
        );
        assert!(table.is_empty());
    }

    #[test]
    fn test_variables_have_no_arity() {
        let mut table = SymbolTable::new();
        let id = table
            .declare("v", SymbolKind::Variable, 3, Scope::Global)
            .unwrap();
        assert_eq!(table.get(id).arity, 0);
    }

    #[test]
    fn test_globals_in_declaration_order() {
        let mut table = SymbolTable::new();
        for name in ["c", "a", "b"] {
            table
                .declare(name, SymbolKind::Variable, 0, Scope::Global)
                .unwrap();
        }
        table.enter_function_scope();
        table
            .declare("local", SymbolKind::Variable, 0, Scope::Local)
            .unwrap();

        let names: Vec<_> = table.globals().map(|(_, s)| s.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert_eq!(table.len(), 4);
    }
}

use std::collections::HashMap;
use std::iter::FromIterator;

use super::{Result, TinyError, Type, Value};

/// What a declaration recorded: the declared type and the current value.
/// The declared type is bookkeeping only; it never coerces the stored value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Binding {
    pub declared_type: Type,
    pub value: Value,
}

/// The run-lifetime mapping from declared identifier to its binding.
///
/// The tiny language has no block scope: every declaration of a run lands in
/// this one flat table and stays visible until the run ends. A second parse
/// run must construct its own table; nothing here is process-wide.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    bindings: HashMap<String, Binding>,
}

impl SymbolTable {
    /// Creates a new empty table.
    #[must_use]
    pub fn new() -> Self {
        SymbolTable {
            bindings: HashMap::new(),
        }
    }

    /// Records a declaration. Redeclaring a name overwrites the previous
    /// entry: last write wins.
    pub fn define(&mut self, name: String, declared_type: Type, value: Value) {
        self.bindings.insert(
            name,
            Binding {
                declared_type,
                value,
            },
        );
    }

    /// Looks `name` up.
    ///
    /// # Returns
    /// Returns `Ok(Binding)` if `name` has been declared. Returns
    /// `Err(TinyError::UndefinedIdentifier(name))` otherwise.
    pub fn get(&self, name: &str) -> Result<Binding> {
        self.bindings
            .get(name)
            .copied()
            .ok_or_else(|| TinyError::UndefinedIdentifier(name.to_owned()))
    }
}

/// Constructs a table from an iterator of declarations.
impl FromIterator<(String, Type, Value)> for SymbolTable {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (String, Type, Value)>,
    {
        let mut table = SymbolTable::new();
        for (name, declared_type, value) in iter {
            table.define(name, declared_type, value);
        }

        table
    }
}

use std::collections::HashMap;

use tracing::debug;

use crate::{constants::*, types::*};

// Symbol bindings for a single assembly run. Predefined names are fixed and
// always win; labels are bound in the first pass; variables are allocated on
// first use in the second pass, from VARIABLE_BASE upwards.
#[derive(Debug)]
pub struct SymbolTable {
    predefined: HashMap<&'static str, Address>,
    labels: HashMap<String, Address>,
    variables: HashMap<String, Address>,
    next_free_address: Address,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            predefined: PREDEFINED_SYMBOLS.iter().copied().collect(),
            labels: HashMap::new(),
            variables: HashMap::new(),
            next_free_address: VARIABLE_BASE,
        }
    }

    pub fn resolve_predefined(&self, name: &str) -> Option<Address> {
        self.predefined.get(name).copied()
    }

    // Binds a label to an instruction address, returning the address it was
    // previously bound to, if any. Redefinition overwrites.
    pub fn define_label(&mut self, name: &str, address: Address) -> Option<Address> {
        self.labels.insert(name.to_owned(), address)
    }

    pub fn label(&self, name: &str) -> Option<Address> {
        self.labels.get(name).copied()
    }

    pub fn variable(&self, name: &str) -> Option<Address> {
        self.variables.get(name).copied()
    }

    pub fn resolve_or_allocate_variable(&mut self, name: &str) -> Address {
        if let Some(address) = self.label(name).or_else(|| self.variable(name)) {
            return address;
        }

        let address = self.next_free_address;
        self.next_free_address += 1;
        self.variables.insert(name.to_owned(), address);
        debug!(name, address, "allocated variable");
        address
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, Address)> {
        self.labels.iter().map(|(name, &address)| (name.as_str(), address))
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, Address)> {
        self.variables
            .iter()
            .map(|(name, &address)| (name.as_str(), address))
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}

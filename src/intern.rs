use std::collections::HashMap;

/// Interned identifier name. Cheap to copy and compare; the actual text
/// lives in the [`Interner`] that produced it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Symbol(u32);

impl Symbol {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Deduplicating store for identifier names.
///
/// The lexer interns every identifier it reads; tokens, scopes and
/// function bindings all carry [`Symbol`]s and resolve them back through
/// the interner only when text is needed (display, diagnostics).
pub struct Interner {
    map: HashMap<String, Symbol>,
    names: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Interner {
            map: HashMap::new(),
            names: Vec::new(),
        }
    }

    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&sym) = self.map.get(name) {
            return sym;
        }
        let sym = Symbol(self.names.len() as u32);
        self.names.push(name.to_string());
        self.map.insert(name.to_string(), sym);
        sym
    }

    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.names[sym.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_twice_returns_same_symbol() {
        let mut interner = Interner::new();
        let a = interner.intern("deadline");
        let b = interner.intern("deadline");
        assert_eq!(a, b);
        assert_eq!(1, interner.len());
    }

    #[test]
    fn distinct_names_get_distinct_symbols() {
        let mut interner = Interner::new();
        let a = interner.intern("start");
        let b = interner.intern("end");
        assert_ne!(a, b);
        assert_eq!("start", interner.resolve(a));
        assert_eq!("end", interner.resolve(b));
    }
}

#![forbid(unsafe_code)]

//! Source-name resolution.
//!
//! Display names travel out of band: the transport that attaches a source
//! knows what to call it, the events themselves only carry the id. An
//! unresolvable id rejects the event outright, which is the contract that
//! keeps stray ids from leaking nameless windows onto the screen.

use ahash::AHashMap;
use spindle_core::SourceId;

/// The side channel mapping source ids to human-readable names.
pub trait NameSource {
    fn resolve(&self, id: &SourceId) -> Option<String>;
}

/// Closures work directly as name sources, which keeps tests and small
/// hosts free of table bookkeeping.
impl<F> NameSource for F
where
    F: Fn(&SourceId) -> Option<String>,
{
    fn resolve(&self, id: &SourceId) -> Option<String> {
        self(id)
    }
}

/// Plain-map name registry for hosts that register sources explicitly.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    names: AHashMap<SourceId, String>,
}

impl NameTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or renames a source. Returns the prior name, if any.
    pub fn insert(
        &mut self,
        id: impl Into<SourceId>,
        name: impl Into<String>,
    ) -> Option<String> {
        self.names.insert(id.into(), name.into())
    }

    /// Forgets a source. Later events for it become unknown-source errors.
    pub fn remove(&mut self, id: &SourceId) -> Option<String> {
        self.names.remove(id)
    }

    #[must_use]
    pub fn contains(&self, id: &SourceId) -> bool {
        self.names.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl NameSource for NameTable {
    fn resolve(&self, id: &SourceId) -> Option<String> {
        self.names.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_registered_names() {
        let mut table = NameTable::new();
        table.insert("lsp1", "rust-analyzer");
        assert_eq!(
            table.resolve(&SourceId::new("lsp1")),
            Some("rust-analyzer".to_owned())
        );
        assert_eq!(table.resolve(&SourceId::new("lsp2")), None);
    }

    #[test]
    fn insert_returns_the_replaced_name() {
        let mut table = NameTable::new();
        assert_eq!(table.insert("a", "first"), None);
        assert_eq!(table.insert("a", "second"), Some("first".to_owned()));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn removed_sources_stop_resolving() {
        let mut table = NameTable::new();
        table.insert("a", "tool");
        assert_eq!(table.remove(&SourceId::new("a")), Some("tool".to_owned()));
        assert!(table.is_empty());
        assert_eq!(table.resolve(&SourceId::new("a")), None);
    }

    #[test]
    fn closures_act_as_name_sources() {
        let upper = |id: &SourceId| Some(id.as_str().to_uppercase());
        assert_eq!(upper.resolve(&SourceId::new("fmt")), Some("FMT".to_owned()));
    }
}

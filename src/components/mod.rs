//! Component registry en evaluatie-logica.

use std::collections::HashMap;
use std::fmt;

use crate::graph::node::MetaMap;
use crate::graph::value::Value;
use crate::necklace::NecklaceError;

pub mod coerce;
pub mod necklace;

/// Output-map van een component: pinnickname → waarde.
pub type OutputMap = std::collections::BTreeMap<String, Value>;

/// Fouttype voor component-evaluaties.
#[derive(Debug, Clone)]
pub enum ComponentError {
    /// Een generieke fout met een bericht.
    Message(String),
    /// Een fout uit de sampler zelf.
    Necklace(NecklaceError),
}

impl ComponentError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Message(s) => s.clone(),
            Self::Necklace(err) => err.to_string(),
        }
    }
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(s) => f.write_str(s),
            Self::Necklace(err) => write!(f, "necklace: {err}"),
        }
    }
}

impl std::error::Error for ComponentError {}

impl From<NecklaceError> for ComponentError {
    fn from(err: NecklaceError) -> Self {
        Self::Necklace(err)
    }
}

/// Resultaat van een component-executie.
pub type ComponentResult = Result<OutputMap, ComponentError>;

/// Trait die alle componentimplementaties dienen te implementeren.
pub trait Component {
    fn evaluate(&self, inputs: &[Value], meta: &MetaMap) -> ComponentResult;
}

/// Beschikbare componenttypen binnen de registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Necklace(necklace::ComponentKind),
}

impl ComponentKind {
    pub fn evaluate(&self, inputs: &[Value], meta: &MetaMap) -> ComponentResult {
        match self {
            Self::Necklace(component) => component.evaluate(inputs, meta),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Necklace(component) => component.name(),
        }
    }

    #[must_use]
    pub fn input_pins(&self) -> &'static [&'static str] {
        match self {
            Self::Necklace(component) => component.input_pins(),
        }
    }
}

/// Registry die componentimplementaties opzoekt op id of naam.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    by_id: HashMap<String, ComponentKind>,
    by_name: HashMap<String, ComponentKind>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        let mut registry = Self::new();

        for registration in necklace::REGISTRATIONS {
            let kind = ComponentKind::Necklace(registration.kind);
            for id in registration.ids {
                registry.register_id(id, kind);
            }
            registry.register_names(registration.names, kind);
        }

        registry
    }
}

impl ComponentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_id: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn register_id(&mut self, id: impl AsRef<str>, kind: ComponentKind) {
        let key = normalize_id(id.as_ref());
        self.by_id.insert(key, kind);
    }

    pub fn register_names(&mut self, names: &[&str], kind: ComponentKind) {
        for name in names {
            let key = normalize_name(name);
            self.by_name.insert(key, kind);
        }
    }

    #[must_use]
    pub fn resolve(
        &self,
        id: Option<&str>,
        name: Option<&str>,
        nickname: Option<&str>,
    ) -> Option<ComponentKind> {
        if let Some(id) = id {
            if let Some(component) = self.by_id.get(&normalize_id(id)) {
                return Some(*component);
            }
        }

        if let Some(name) = name {
            if let Some(component) = self.by_name.get(&normalize_name(name)) {
                return Some(*component);
            }
        }

        if let Some(nickname) = nickname {
            if let Some(component) = self.by_name.get(&normalize_name(nickname)) {
                return Some(*component);
            }
        }

        None
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

fn normalize_id(id: &str) -> String {
    id.trim_matches(|c| c == '{' || c == '}').trim().to_lowercase()
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{ComponentKind, ComponentRegistry, necklace};
    use crate::necklace::NodeVariant;

    #[test]
    fn lookup_by_id_and_name() {
        let registry = ComponentRegistry::default();
        assert_eq!(registry.len(), 4);

        let component = registry.resolve(Some("necklaceShift"), None, None).unwrap();
        assert_eq!(
            component,
            ComponentKind::Necklace(necklace::ComponentKind::new(NodeVariant::NecklaceShift))
        );

        let by_name = registry
            .resolve(None, Some("Necklace Spread"), None)
            .unwrap();
        assert_eq!(by_name.name(), "Necklace Spread");

        let by_nickname = registry.resolve(None, None, Some("nkl")).unwrap();
        assert_eq!(by_nickname.name(), "Necklace");
    }

    #[test]
    fn unknown_component_is_none() {
        let registry = ComponentRegistry::default();
        assert!(registry.resolve(Some("{deadbeef}"), Some("Pearls"), None).is_none());
    }

    #[test]
    fn id_lookup_ignores_braces_and_case() {
        let registry = ComponentRegistry::default();
        assert!(registry.resolve(Some("{NECKLACESPREADSHIFT}"), None, None).is_some());
    }
}

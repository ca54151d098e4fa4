//! Binding declarations and resolution.
//!
//! A component declares which store values it wants as properties through a
//! [`Bindings`] map: one entry per property key, each entry either a bare
//! getter or a getter/setter pair. Declarations can also come from mixins;
//! [`resolve`] folds all sources into one normalized [`BindingEntry`] list.
//!
//! Merge rules (deterministic, independent of map iteration order):
//! - sources fold in order: mixins first as listed, the instance's own map
//!   last
//! - on key collision the later declaration wins
//! - a colliding key keeps its first-seen position, so binding order (and
//!   therefore subscription/disposer order) is stable

use std::collections::HashMap;
use std::rc::Rc;

use crate::instance::{ComponentInstance, ComponentOptions};
use crate::types::{Getter, Setter, Value};

// =============================================================================
// Declarations
// =============================================================================

/// One declared binding, in either accepted shape.
#[derive(Clone)]
pub enum BindingDecl {
    /// A bare computation: read-only property.
    Getter(Getter),
    /// Explicit getter with an optional setter.
    Accessor { get: Getter, set: Option<Setter> },
}

impl BindingDecl {
    /// Wrap a closure as a read-only declaration.
    pub fn getter(get: impl Fn(&ComponentInstance) -> Value + 'static) -> Self {
        BindingDecl::Getter(Rc::new(get))
    }

    /// Wrap a getter/setter closure pair.
    pub fn accessor(
        get: impl Fn(&ComponentInstance) -> Value + 'static,
        set: impl Fn(&ComponentInstance, Value) + 'static,
    ) -> Self {
        BindingDecl::Accessor {
            get: Rc::new(get),
            set: Some(Rc::new(set)),
        }
    }
}

/// A normalized binding: what the orchestrator actually runs.
#[derive(Clone)]
pub struct BindingEntry {
    /// Property name exposed on the host instance.
    pub key: String,
    pub get: Getter,
    pub set: Option<Setter>,
}

// =============================================================================
// Bindings Builder
// =============================================================================

/// An ordered binding declaration map.
///
/// Declaration and registration are one visible step: each call appends an
/// entry, and within one map a re-declared key is resolved last-wins exactly
/// like a mixin collision.
///
/// # Example
///
/// ```ignore
/// let bindings = Bindings::new()
///     .getter("foo", move |_| store.foo().into())
///     .accessor(
///         "name",
///         move |_| store.name().into(),
///         move |_, value| store.set_name(value),
///     );
/// ```
#[derive(Clone, Default)]
pub struct Bindings {
    entries: Vec<(String, BindingDecl)>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a read-only property.
    pub fn getter(
        mut self,
        key: &str,
        get: impl Fn(&ComponentInstance) -> Value + 'static,
    ) -> Self {
        self.entries
            .push((key.to_string(), BindingDecl::getter(get)));
        self
    }

    /// Declare a read-write property.
    pub fn accessor(
        mut self,
        key: &str,
        get: impl Fn(&ComponentInstance) -> Value + 'static,
        set: impl Fn(&ComponentInstance, Value) + 'static,
    ) -> Self {
        self.entries
            .push((key.to_string(), BindingDecl::accessor(get, set)));
        self
    }

    /// Declare a property from an already-built [`BindingDecl`].
    pub fn declare(mut self, key: &str, decl: BindingDecl) -> Self {
        self.entries.push((key.to_string(), decl));
        self
    }

    /// Append every entry of `other` after this map's entries.
    pub fn extend(mut self, other: Bindings) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Declared entries, in declaration order.
    pub fn entries(&self) -> &[(String, BindingDecl)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolve an instance's declared bindings into the normalized list.
///
/// Folds mixins in listed order, then the instance's own map; later
/// declarations win on key collision while the key keeps its first-seen
/// position. No declarations at all resolves to an empty list.
pub fn resolve(options: &ComponentOptions) -> Vec<BindingEntry> {
    let mut order: Vec<String> = Vec::new();
    let mut latest: HashMap<String, BindingDecl> = HashMap::new();

    let sources = options
        .mixins
        .iter()
        .chain(std::iter::once(&options.from_store));

    for source in sources {
        for (key, decl) in source.entries() {
            if !latest.contains_key(key) {
                order.push(key.clone());
            }
            latest.insert(key.clone(), decl.clone());
        }
    }

    order
        .into_iter()
        .filter_map(|key| latest.remove(&key).map(|decl| normalize(key, decl)))
        .collect()
}

/// Normalize either declaration shape into a [`BindingEntry`].
fn normalize(key: String, decl: BindingDecl) -> BindingEntry {
    match decl {
        BindingDecl::Getter(get) => BindingEntry {
            key,
            get,
            set: None,
        },
        BindingDecl::Accessor { get, set } => BindingEntry { key, get, set },
    }
}

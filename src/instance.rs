//! Component instances and identity.
//!
//! A [`ComponentInstance`] is the bridge's view of one host component: a
//! process-unique identity, the binding declarations it was created with, and
//! (once `before_create` has run) the resolved binding list plus the
//! host-visible property table. Instances are `Rc`-shared because
//! subscription computations need to evaluate getters against them after
//! creation returns.
//!
//! Identity is a monotonically allocated [`InstanceId`]; ids are never
//! reused, so a stale address can never alias a newer instance's cells.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::bindings::{BindingEntry, Bindings};
use crate::cells;
use crate::error::BridgeError;
use crate::types::{Setter, Value};

// =============================================================================
// Instance Identity
// =============================================================================

thread_local! {
    /// Counter for allocating instance ids. Never reset: ids are never reused.
    static NEXT_INSTANCE_ID: Cell<u64> = const { Cell::new(0) };
}

/// Stable, process-unique component identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

fn next_instance_id() -> InstanceId {
    NEXT_INSTANCE_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        InstanceId(id)
    })
}

// =============================================================================
// Options
// =============================================================================

/// Declarations an instance is created with.
#[derive(Clone, Default)]
pub struct ComponentOptions {
    /// The instance's own binding map.
    pub from_store: Bindings,
    /// Composed mixins, in composition order. Later mixins override earlier
    /// ones on key collision; `from_store` overrides them all.
    pub mixins: Vec<Bindings>,
}

impl ComponentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the instance's own binding map.
    pub fn bindings(mut self, from_store: Bindings) -> Self {
        self.from_store = from_store;
        self
    }

    /// Compose another mixin (appended after any already composed).
    pub fn mixin(mut self, mixin: Bindings) -> Self {
        self.mixins.push(mixin);
        self
    }
}

// =============================================================================
// Lifecycle Phase
// =============================================================================

/// Where an instance is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Exists structurally; no cells or properties yet.
    PreCreate,
    /// `before_create` ran: cells defined, properties installed.
    CellsInstalled,
    /// `created` ran: subscriptions active.
    Live,
    /// `before_destroy` ran: subscriptions disposed, cells removed. Terminal.
    TornDown,
}

// =============================================================================
// Component Instance
// =============================================================================

/// A host-visible property installed by the orchestrator.
struct Property {
    /// Reads the shadow cell (tracked).
    get: Rc<dyn Fn() -> Value>,
    /// Delegates to the binding's setter, if one was declared.
    set: Option<Setter>,
}

/// One component instance as seen by the bridge.
pub struct ComponentInstance {
    id: InstanceId,
    options: ComponentOptions,
    /// Resolved binding list; populated by `before_create`.
    bindings: RefCell<Vec<BindingEntry>>,
    /// Installed host-visible properties, by key.
    properties: RefCell<HashMap<String, Property>>,
    phase: Cell<Phase>,
}

impl ComponentInstance {
    /// Create an instance in the `PreCreate` phase.
    pub fn new(options: ComponentOptions) -> Rc<Self> {
        Rc::new(Self {
            id: next_instance_id(),
            options,
            bindings: RefCell::new(Vec::new()),
            properties: RefCell::new(HashMap::new()),
            phase: Cell::new(Phase::PreCreate),
        })
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    /// The declarations this instance was created with.
    pub fn options(&self) -> &ComponentOptions {
        &self.options
    }

    /// Read a host-visible property.
    ///
    /// A tracked read of the backing shadow cell. Unknown keys read
    /// `Value::Null`, matching the host's absent-property semantics.
    pub fn get(&self, key: &str) -> Value {
        let getter = self
            .properties
            .borrow()
            .get(key)
            .map(|property| property.get.clone());
        match getter {
            Some(get) => get(),
            None => Value::Null,
        }
    }

    /// Write a host-visible property.
    ///
    /// Delegates to the binding's setter with this instance as context. The
    /// shadow cell is untouched here; it only updates when the store's
    /// notification arrives through the subscription.
    pub fn set(&self, key: &str, value: Value) -> Result<(), BridgeError> {
        let setter = {
            let properties = self.properties.borrow();
            let Some(property) = properties.get(key) else {
                return Err(BridgeError::UnknownProperty(key.to_string()));
            };
            match &property.set {
                Some(set) => set.clone(),
                None => return Err(BridgeError::ReadOnlyProperty(key.to_string())),
            }
        };
        setter(self, value);
        Ok(())
    }

    /// Whether a property is installed under `key`.
    pub fn has(&self, key: &str) -> bool {
        self.properties.borrow().contains_key(key)
    }

    /// Installed property keys, in binding order.
    pub fn keys(&self) -> Vec<String> {
        self.bindings
            .borrow()
            .iter()
            .map(|entry| entry.key.clone())
            .collect()
    }

    // =========================================================================
    // Orchestrator surface
    // =========================================================================

    /// Record the resolved bindings and install one property per entry.
    pub(crate) fn install_properties(&self, entries: Vec<BindingEntry>) {
        {
            let mut properties = self.properties.borrow_mut();
            for entry in &entries {
                let get: Rc<dyn Fn() -> Value> = {
                    let id = self.id;
                    let key = entry.key.clone();
                    Rc::new(move || cells::read(id, &key))
                };
                properties.insert(
                    entry.key.clone(),
                    Property {
                        get,
                        set: entry.set.clone(),
                    },
                );
            }
        }
        *self.bindings.borrow_mut() = entries;
    }

    /// Snapshot of the resolved binding list.
    pub(crate) fn bindings(&self) -> Vec<BindingEntry> {
        self.bindings.borrow().clone()
    }

    /// Whether any bindings resolved for this instance.
    pub(crate) fn has_bindings(&self) -> bool {
        !self.bindings.borrow().is_empty()
    }

    pub(crate) fn set_phase(&self, phase: Phase) {
        self.phase.set(phase);
    }
}

impl fmt::Debug for ComponentInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("id", &self.id)
            .field("phase", &self.phase.get())
            .field("keys", &self.keys())
            .finish()
    }
}

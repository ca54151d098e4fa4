//! Shadow Cell Store - per-instance reactive cells.
//!
//! One cell per `(instance, key)` address, each a `Signal<Value>` living in
//! the dependency-tracking system. Reading a cell inside a derived or an
//! effect registers a dependency; writing it re-triggers dependents when the
//! value changes. Cells exist from `define()` on - before the first
//! subscription emission a cell reads `Value::Null` but is already trackable,
//! so a computation that reads it early still re-runs on the first write.
//!
//! Addressing is a typed two-level map (instance id, then key), so no two
//! instances can collide and removing an instance drops all of its cells in
//! one step. `write`/`remove` against a missing address are no-ops: teardown
//! ordering may leave stragglers and those must stay silent.

use std::cell::RefCell;
use std::collections::HashMap;

use spark_signals::{Signal, signal};
use tracing::trace;

use crate::instance::InstanceId;
use crate::types::Value;

// =============================================================================
// Store State
// =============================================================================

thread_local! {
    /// Shadow cells, addressed by instance id then property key.
    static CELLS: RefCell<HashMap<InstanceId, HashMap<String, Signal<Value>>>> =
        RefCell::new(HashMap::new());
}

// =============================================================================
// Operations
// =============================================================================

/// Create the cell at `(id, key)`, initially `Value::Null`.
///
/// The intended call sequence defines each address exactly once (in
/// `before_create`); re-defining an address keeps the existing cell so
/// dependents already tracking it are not orphaned.
pub fn define(id: InstanceId, key: &str) {
    CELLS.with(|cells| {
        let mut cells = cells.borrow_mut();
        let instance_cells = cells.entry(id).or_default();
        if instance_cells.contains_key(key) {
            return;
        }
        instance_cells.insert(key.to_string(), signal(Value::Null));
        trace!(instance = %id, key, "defined shadow cell");
    });
}

/// Read the cell at `(id, key)`.
///
/// A tracked read: calling this inside a derived or an effect registers the
/// cell as a dependency. A missing address reads `Value::Null` (the host's
/// absent-property semantics, and what a torn-down instance's properties
/// resolve to).
pub fn read(id: InstanceId, key: &str) -> Value {
    let cell = CELLS.with(|cells| {
        cells
            .borrow()
            .get(&id)
            .and_then(|instance_cells| instance_cells.get(key))
            .cloned()
    });
    match cell {
        Some(cell) => cell.get(),
        None => Value::Null,
    }
}

/// Write the cell at `(id, key)`.
///
/// Dependents re-run per the tracking system's equality gating. A missing
/// address is a no-op.
pub fn write(id: InstanceId, key: &str, value: Value) {
    let cell = CELLS.with(|cells| {
        cells
            .borrow()
            .get(&id)
            .and_then(|instance_cells| instance_cells.get(key))
            .cloned()
    });
    if let Some(cell) = cell {
        cell.set(value);
    }
}

/// Whether a cell exists at `(id, key)`.
pub fn defined(id: InstanceId, key: &str) -> bool {
    CELLS.with(|cells| {
        cells
            .borrow()
            .get(&id)
            .is_some_and(|instance_cells| instance_cells.contains_key(key))
    })
}

/// Delete the cell at `(id, key)`. Missing addresses are a no-op.
pub fn remove(id: InstanceId, key: &str) {
    CELLS.with(|cells| {
        let mut cells = cells.borrow_mut();
        let Some(instance_cells) = cells.get_mut(&id) else {
            return;
        };
        if instance_cells.remove(key).is_some() {
            trace!(instance = %id, key, "removed shadow cell");
        }
        if instance_cells.is_empty() {
            cells.remove(&id);
        }
    });
}

/// Delete every cell addressed by `id`. Missing instances are a no-op.
pub fn remove_instance(id: InstanceId) {
    CELLS.with(|cells| {
        if let Some(instance_cells) = cells.borrow_mut().remove(&id) {
            trace!(instance = %id, count = instance_cells.len(), "removed shadow cells");
        }
    });
}

/// Number of live cells for an instance.
pub fn count(id: InstanceId) -> usize {
    CELLS.with(|cells| {
        cells
            .borrow()
            .get(&id)
            .map_or(0, |instance_cells| instance_cells.len())
    })
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Drop every cell (for testing).
pub fn reset() {
    CELLS.with(|cells| cells.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::ComponentOptions;

    fn fresh_id() -> InstanceId {
        crate::instance::ComponentInstance::new(ComponentOptions::default()).id()
    }

    fn setup() {
        reset();
    }

    #[test]
    fn test_define_read_write() {
        setup();
        let id = fresh_id();

        define(id, "foo");
        assert!(defined(id, "foo"));
        assert_eq!(read(id, "foo"), Value::Null);

        write(id, "foo", Value::Int(7));
        assert_eq!(read(id, "foo"), Value::Int(7));
    }

    #[test]
    fn test_missing_address_reads_null() {
        setup();
        let id = fresh_id();

        assert!(!defined(id, "absent"));
        assert_eq!(read(id, "absent"), Value::Null);
    }

    #[test]
    fn test_write_to_missing_address_is_noop() {
        setup();
        let id = fresh_id();

        write(id, "absent", Value::Int(1));
        assert!(!defined(id, "absent"));
        assert_eq!(read(id, "absent"), Value::Null);
    }

    #[test]
    fn test_redefine_keeps_existing_cell() {
        setup();
        let id = fresh_id();

        define(id, "foo");
        write(id, "foo", Value::Int(3));
        define(id, "foo");
        assert_eq!(read(id, "foo"), Value::Int(3));
    }

    #[test]
    fn test_remove_is_idempotent() {
        setup();
        let id = fresh_id();

        define(id, "foo");
        remove(id, "foo");
        assert!(!defined(id, "foo"));

        // Second remove, and removes for never-defined addresses, are no-ops
        remove(id, "foo");
        remove(id, "never-defined");
    }

    #[test]
    fn test_remove_instance_drops_all_cells() {
        setup();
        let id = fresh_id();
        let other = fresh_id();

        define(id, "a");
        define(id, "b");
        define(other, "a");
        assert_eq!(count(id), 2);

        remove_instance(id);
        assert_eq!(count(id), 0);
        assert!(!defined(id, "a"));
        assert!(!defined(id, "b"));

        // Unrelated instance untouched
        assert!(defined(other, "a"));

        // Idempotent
        remove_instance(id);
    }

    #[test]
    fn test_instances_do_not_collide_on_keys() {
        setup();
        let first = fresh_id();
        let second = fresh_id();

        define(first, "foo");
        define(second, "foo");

        write(first, "foo", Value::Int(1));
        write(second, "foo", Value::Int(2));

        assert_eq!(read(first, "foo"), Value::Int(1));
        assert_eq!(read(second, "foo"), Value::Int(2));
    }
}

//! Subscription Manager - per-instance disposer lists.
//!
//! For every resolved binding, `start()` opens one subscription against the
//! installed store primitive: the tracked computation evaluates the binding's
//! getter with the instance as context, and each emission writes the
//! instance's shadow cell for that key. Subscriptions fire immediately so a
//! cell holds a real value before any host computation reads it.
//!
//! Disposers collect per instance, in binding order. `stop()` drains the list
//! and invokes each disposer exactly once (they are `FnOnce` by type); a
//! second `stop`, or a `stop` for an unknown instance, is a no-op.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::cells;
use crate::instance::{ComponentInstance, InstanceId};
use crate::types::{Compute, Disposer, OnEmit, SubscribeFn};

// =============================================================================
// Manager State
// =============================================================================

thread_local! {
    /// Active disposers per instance, in binding order.
    static DISPOSERS: RefCell<HashMap<InstanceId, Vec<Disposer>>> = RefCell::new(HashMap::new());
}

// =============================================================================
// Operations
// =============================================================================

/// Open one subscription per resolved binding of `vm`.
///
/// Shadow cells for every binding must already be defined (the orchestrator
/// sequences `before_create` ahead of this): the immediate fire writes a cell
/// before `subscribe` returns. A panicking computation propagates out of this
/// call with no disposer recorded for the failed binding.
pub fn start(vm: &Rc<ComponentInstance>, subscribe: &SubscribeFn) {
    let id = vm.id();
    let entries = vm.bindings();

    for entry in &entries {
        let compute: Compute = {
            let vm = Rc::clone(vm);
            let get = entry.get.clone();
            Box::new(move || get(&vm))
        };
        let on_emit: OnEmit = {
            let key = entry.key.clone();
            Box::new(move |value| cells::write(id, &key, value))
        };

        let disposer = subscribe(compute, on_emit, true);
        DISPOSERS.with(|disposers| {
            disposers
                .borrow_mut()
                .entry(id)
                .or_default()
                .push(disposer);
        });
        trace!(instance = %id, key = entry.key.as_str(), "subscription started");
    }
}

/// Dispose every subscription for `id`, in binding order, and clear the list.
///
/// No list (never started, or already stopped) is a no-op.
pub fn stop(id: InstanceId) {
    let drained = DISPOSERS.with(|disposers| disposers.borrow_mut().remove(&id));
    let Some(drained) = drained else {
        return;
    };

    debug!(instance = %id, count = drained.len(), "disposing subscriptions");
    for dispose in drained {
        dispose();
    }
}

/// Number of live subscriptions for an instance.
pub fn active(id: InstanceId) -> usize {
    DISPOSERS.with(|disposers| disposers.borrow().get(&id).map_or(0, Vec::len))
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Drop every disposer list without invoking the disposers (for testing).
pub fn reset() {
    DISPOSERS.with(|disposers| disposers.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::Bindings;
    use crate::instance::ComponentOptions;
    use crate::lifecycle;
    use crate::types::Value;
    use std::cell::Cell;

    fn setup() {
        lifecycle::reset();
    }

    /// A subscription primitive that records calls and counts disposals.
    /// The immediate fire is honored; nothing ever re-fires.
    fn counting_subscriber(disposed: Rc<Cell<usize>>) -> SubscribeFn {
        Rc::new(move |compute: Compute, on_emit: OnEmit, fire_immediately: bool| {
            if fire_immediately {
                on_emit(compute());
            }
            let disposed = disposed.clone();
            Box::new(move || disposed.set(disposed.get() + 1)) as Disposer
        })
    }

    fn instance_with_bindings() -> Rc<ComponentInstance> {
        let vm = ComponentInstance::new(ComponentOptions {
            from_store: Bindings::new()
                .getter("a", |_| Value::Int(1))
                .getter("b", |_| Value::Int(2)),
            mixins: Vec::new(),
        });
        lifecycle::before_create(&vm);
        vm
    }

    #[test]
    fn test_start_fires_immediately_into_cells() {
        setup();
        let vm = instance_with_bindings();
        let subscribe = counting_subscriber(Rc::new(Cell::new(0)));

        start(&vm, &subscribe);

        assert_eq!(active(vm.id()), 2);
        assert_eq!(cells::read(vm.id(), "a"), Value::Int(1));
        assert_eq!(cells::read(vm.id(), "b"), Value::Int(2));
    }

    #[test]
    fn test_stop_disposes_each_once_and_clears() {
        setup();
        let vm = instance_with_bindings();
        let disposed = Rc::new(Cell::new(0));
        let subscribe = counting_subscriber(disposed.clone());

        start(&vm, &subscribe);
        assert_eq!(disposed.get(), 0);

        stop(vm.id());
        assert_eq!(disposed.get(), 2);
        assert_eq!(active(vm.id()), 0);

        // Second stop observes no list: disposers are not re-invoked
        stop(vm.id());
        assert_eq!(disposed.get(), 2);
    }

    #[test]
    fn test_stop_unknown_instance_is_noop() {
        setup();
        let vm = ComponentInstance::new(ComponentOptions::default());
        stop(vm.id());
        assert_eq!(active(vm.id()), 0);
    }

    #[test]
    fn test_disposers_run_in_binding_order() {
        setup();
        let vm = instance_with_bindings();
        let order: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

        let labels = Rc::new(RefCell::new(vec!["a", "b"]));
        let subscribe: SubscribeFn = {
            let order = order.clone();
            Rc::new(move |compute: Compute, on_emit: OnEmit, fire_immediately: bool| {
                if fire_immediately {
                    on_emit(compute());
                }
                let label = labels.borrow_mut().remove(0);
                let order = order.clone();
                Box::new(move || order.borrow_mut().push(label)) as Disposer
            })
        };

        start(&vm, &subscribe);
        stop(vm.id());
        assert_eq!(*order.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_no_fire_without_fire_immediately() {
        setup();
        let vm = instance_with_bindings();

        // A primitive that ignores the immediate-fire request entirely
        let subscribe: SubscribeFn =
            Rc::new(|_compute: Compute, _on_emit: OnEmit, _fire: bool| Box::new(|| {}) as Disposer);

        start(&vm, &subscribe);
        assert_eq!(cells::read(vm.id(), "a"), Value::Null);
    }
}

//! Lifecycle orchestration - install + the three host hooks.
//!
//! The host component system fires `before_create`, `created`, and
//! `before_destroy` exactly once each, in that order, per instance. The
//! orchestrator sequences the bridge's work across them:
//!
//! 1. `before_create` - resolve bindings, define one shadow cell per binding,
//!    install the host-visible properties
//! 2. `created` - start one subscription per binding (cells already exist, so
//!    the immediate fire always has somewhere to land)
//! 3. `before_destroy` - dispose subscriptions first, then remove cells
//!
//! [`install`] registers the subscription primitive the subscriptions run
//! against. It is expected to run once per process, before the first
//! `created`; re-installing replaces the primitive (precondition, not
//! enforced).
//!
//! [`mount`]/[`unmount`] sequence the hooks the way a host would, for code
//! (and tests) that drive the bridge directly.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::bindings;
use crate::cells;
use crate::error::BridgeError;
use crate::instance::{ComponentInstance, ComponentOptions, Phase};
use crate::subscriptions;
use crate::types::SubscribeFn;

// =============================================================================
// Install
// =============================================================================

thread_local! {
    /// The installed subscription primitive.
    static SUBSCRIBER: RefCell<Option<SubscribeFn>> = const { RefCell::new(None) };
}

/// Register the external store's subscription primitive.
///
/// Runs once per process, before any component reaches `created`. The
/// bridge's logic is independent of the specific primitive: swapping store
/// implementations means swapping this argument.
pub fn install(subscribe: SubscribeFn) {
    SUBSCRIBER.with(|slot| {
        *slot.borrow_mut() = Some(subscribe);
    });
    debug!("subscription primitive installed");
}

fn installed_subscriber() -> Option<SubscribeFn> {
    SUBSCRIBER.with(|slot| slot.borrow().clone())
}

// =============================================================================
// Lifecycle Hooks
// =============================================================================

/// `before_create`: define shadow cells and install properties.
///
/// After this returns the instance is in [`Phase::CellsInstalled`]: every
/// bound key has a trackable cell (reading `Value::Null`) and a host-visible
/// property.
pub fn before_create(vm: &Rc<ComponentInstance>) {
    let entries = bindings::resolve(vm.options());
    for entry in &entries {
        cells::define(vm.id(), &entry.key);
    }
    debug!(instance = %vm.id(), bindings = entries.len(), "cells installed");
    vm.install_properties(entries);
    vm.set_phase(Phase::CellsInstalled);
}

/// `created`: start one subscription per binding.
///
/// Each subscription fires immediately, so by the time this returns every
/// bound property reflects the store's current state. An instance with no
/// bindings short-circuits without touching the installed primitive.
///
/// # Errors
///
/// [`BridgeError::NotInstalled`] when bindings exist but no subscription
/// primitive was installed.
pub fn created(vm: &Rc<ComponentInstance>) -> Result<(), BridgeError> {
    if vm.has_bindings() {
        let subscribe = installed_subscriber().ok_or(BridgeError::NotInstalled)?;
        subscriptions::start(vm, &subscribe);
    }
    vm.set_phase(Phase::Live);
    debug!(instance = %vm.id(), "live");
    Ok(())
}

/// `before_destroy`: dispose subscriptions, then remove shadow cells.
///
/// Order matters: subscriptions stop first so no emission can write a cell
/// that is already gone. Safe to call more than once; the second call finds
/// nothing to dispose and nothing to remove.
pub fn before_destroy(vm: &Rc<ComponentInstance>) {
    subscriptions::stop(vm.id());
    cells::remove_instance(vm.id());
    vm.set_phase(Phase::TornDown);
    debug!(instance = %vm.id(), "torn down");
}

// =============================================================================
// Mount / Unmount
// =============================================================================

/// Create an instance and run it through `before_create` + `created`.
pub fn mount(options: ComponentOptions) -> Result<Rc<ComponentInstance>, BridgeError> {
    let vm = ComponentInstance::new(options);
    before_create(&vm);
    created(&vm)?;
    Ok(vm)
}

/// Tear an instance down (`before_destroy`) and drop this handle.
pub fn unmount(vm: Rc<ComponentInstance>) {
    before_destroy(&vm);
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Clear the installed primitive, all cells, and all disposer lists
/// (for testing).
pub fn reset() {
    SUBSCRIBER.with(|slot| {
        *slot.borrow_mut() = None;
    });
    subscriptions::reset();
    cells::reset();
}

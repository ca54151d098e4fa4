//! Default subscription primitive - reactions over spark-signals.
//!
//! A reaction pairs a tracked computation with an emission callback: the
//! computation runs inside an effect (so every signal it reads becomes a
//! dependency), and each run hands the computed value to the callback. The
//! first run establishes dependencies and emits only when `fire_immediately`
//! is requested; every later run emits.
//!
//! `flush_sync()` before returning guarantees the first run (and its
//! immediate emission) lands before the subscription call returns, whatever
//! the signal runtime's delivery scheduling is.

use std::cell::Cell;
use std::rc::Rc;

use spark_signals::{effect, flush_sync};

use crate::types::{Compute, Disposer, OnEmit, SubscribeFn};

/// Open one reaction: track `compute`, deliver each value to `on_emit`.
///
/// The returned disposer stops the effect; after it runs, no further
/// emissions occur. A panicking computation propagates to the caller (on the
/// first run) or to whatever mutation triggered the re-run.
pub fn reaction(compute: Compute, on_emit: OnEmit, fire_immediately: bool) -> Disposer {
    let first = Cell::new(true);
    let stop = effect(move || {
        let value = compute();
        if first.replace(false) {
            if fire_immediately {
                on_emit(value);
            }
        } else {
            on_emit(value);
        }
    });
    // Deliver the dependency-establishing first run before returning.
    flush_sync();
    Box::new(stop)
}

/// The installable handle for [`reaction`].
///
/// ```ignore
/// spark_bridge::install(spark_bridge::subscriber());
/// ```
pub fn subscriber() -> SubscribeFn {
    Rc::new(|compute, on_emit, fire_immediately| reaction(compute, on_emit, fire_immediately))
}

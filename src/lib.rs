//! # spark-bridge
//!
//! Reactive store bridge for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals),
//! spark-bridge makes values that live in a push-based observable store show
//! up on components as ordinary dependency-tracked properties. Each bound
//! field gets a per-instance shadow cell (a signal) inside the tracking
//! system; a subscription against the store forwards every recomputed value
//! into that cell, and a getter/setter pair installed on the instance exposes
//! it to the host.
//!
//! ## Architecture
//!
//! ```text
//! Store computation → subscription → shadow cell (Signal) → installed getter
//!                                                            ↑ tracked reads
//! installed setter → binding setter → store mutation
//! ```
//!
//! Lifecycle per instance:
//! 1. `before_create` - resolve bindings, define shadow cells, install
//!    properties
//! 2. `created` - start one subscription per binding (fires immediately)
//! 3. `before_destroy` - dispose subscriptions, remove shadow cells
//!
//! ## Modules
//!
//! - [`types`] - `Value` and the getter/setter/subscription contracts
//! - [`bindings`] - binding declaration, builder, and mixin resolution
//! - [`cells`] - shadow cell store (per-instance reactive cells)
//! - [`subscriptions`] - per-instance subscription disposer lists
//! - [`instance`] - component instances and identity
//! - [`lifecycle`] - install + the three lifecycle hooks, mount/unmount
//! - [`reaction`] - default subscription primitive over spark-signals
//! - [`helpers`] - declarative field/method re-exposure

pub mod bindings;
pub mod cells;
pub mod error;
pub mod helpers;
pub mod instance;
pub mod lifecycle;
pub mod reaction;
pub mod subscriptions;
pub mod types;

// Re-export commonly used items
pub use types::{Compute, Disposer, Getter, OnEmit, Setter, SubscribeFn, Value};

pub use bindings::{BindingDecl, BindingEntry, Bindings, resolve};

pub use error::BridgeError;

pub use instance::{ComponentInstance, ComponentOptions, InstanceId, Phase};

pub use lifecycle::{before_create, before_destroy, created, install, mount, unmount};

pub use reaction::{reaction, subscriber};

pub use helpers::{
    FieldSource, Method, MethodSource, map_fields, map_fields_as, map_methods, map_methods_as,
};

//! Declarative re-exposure helpers - map store fields and methods.
//!
//! Pure object mapping, no lifecycle or cells involved: [`map_fields`] turns
//! a list of store field names into a read-only [`Bindings`] map (one getter
//! per field), and [`map_methods`] turns a list of store method names into
//! store-bound callables a component can re-expose. The `_as` variants accept
//! `(alias, name)` pairs for renaming.
//!
//! Stores opt in through the [`FieldSource`]/[`MethodSource`] seams; by the
//! time the bridge runs, only normalized closures remain.

use std::collections::HashMap;
use std::rc::Rc;

use crate::bindings::Bindings;
use crate::types::Value;

// =============================================================================
// Store Seams
// =============================================================================

/// Field access by name, for declarative field re-exposure.
pub trait FieldSource {
    /// Read the named field's current value.
    fn read_field(&self, name: &str) -> Value;
}

/// Method invocation by name, for declarative method re-exposure.
pub trait MethodSource {
    /// Invoke the named method with one argument (pass [`Value::Null`] for
    /// none) and return its result.
    fn call_method(&self, name: &str, arg: Value) -> Value;
}

/// A store-bound callable produced by [`map_methods`].
pub type Method = Rc<dyn Fn(Value) -> Value>;

// =============================================================================
// Field Mapping
// =============================================================================

/// One read-only binding per listed field, keyed by the field name.
pub fn map_fields<S>(store: &Rc<S>, names: &[&str]) -> Bindings
where
    S: FieldSource + 'static,
{
    names.iter().fold(Bindings::new(), |bindings, name| {
        let store = Rc::clone(store);
        let field = name.to_string();
        bindings.getter(name, move |_| store.read_field(&field))
    })
}

/// Like [`map_fields`], with `(alias, field)` pairs: the binding is keyed by
/// `alias` and reads `field`.
pub fn map_fields_as<S>(store: &Rc<S>, fields: &[(&str, &str)]) -> Bindings
where
    S: FieldSource + 'static,
{
    fields
        .iter()
        .fold(Bindings::new(), |bindings, (alias, field)| {
            let store = Rc::clone(store);
            let field = field.to_string();
            bindings.getter(alias, move |_| store.read_field(&field))
        })
}

// =============================================================================
// Method Mapping
// =============================================================================

/// One store-bound callable per listed method, keyed by the method name.
pub fn map_methods<S>(store: &Rc<S>, names: &[&str]) -> HashMap<String, Method>
where
    S: MethodSource + 'static,
{
    names
        .iter()
        .map(|name| {
            let store = Rc::clone(store);
            let method = name.to_string();
            let bound: Method = Rc::new(move |arg| store.call_method(&method, arg));
            (name.to_string(), bound)
        })
        .collect()
}

/// Like [`map_methods`], with `(alias, method)` pairs.
pub fn map_methods_as<S>(store: &Rc<S>, methods: &[(&str, &str)]) -> HashMap<String, Method>
where
    S: MethodSource + 'static,
{
    methods
        .iter()
        .map(|(alias, method)| {
            let store = Rc::clone(store);
            let method = method.to_string();
            let bound: Method = Rc::new(move |arg| store.call_method(&method, arg));
            (alias.to_string(), bound)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::resolve;
    use crate::instance::{ComponentInstance, ComponentOptions};
    use std::cell::Cell;

    /// A counter store exposing `num`/`num_plus` fields and `plus`/`reset`
    /// methods.
    struct Counter {
        num: Cell<i64>,
    }

    impl Counter {
        fn new() -> Rc<Self> {
            Rc::new(Self { num: Cell::new(0) })
        }
    }

    impl FieldSource for Counter {
        fn read_field(&self, name: &str) -> Value {
            match name {
                "num" => Value::Int(self.num.get()),
                "num_plus" => Value::Int(self.num.get() + 1),
                _ => Value::Null,
            }
        }
    }

    impl MethodSource for Counter {
        fn call_method(&self, name: &str, _arg: Value) -> Value {
            match name {
                "plus" => self.num.set(self.num.get() + 1),
                "reset" => self.num.set(0),
                _ => {}
            }
            Value::Null
        }
    }

    fn probe_instance() -> Rc<ComponentInstance> {
        ComponentInstance::new(ComponentOptions::default())
    }

    #[test]
    fn test_map_fields_one_getter_per_name() {
        let counter = Counter::new();
        let bindings = map_fields(&counter, &["num", "num_plus"]);

        let resolved = resolve(&ComponentOptions::new().bindings(bindings));
        assert_eq!(resolved.len(), 2);

        let vm = probe_instance();
        assert_eq!((resolved[0].get)(&vm), Value::Int(0));
        assert_eq!((resolved[1].get)(&vm), Value::Int(1));

        counter.num.set(5);
        assert_eq!((resolved[0].get)(&vm), Value::Int(5));
        assert_eq!((resolved[1].get)(&vm), Value::Int(6));
    }

    #[test]
    fn test_map_fields_as_renames() {
        let counter = Counter::new();
        let bindings = map_fields_as(&counter, &[("my_num", "num"), ("bigger", "num_plus")]);

        let resolved = resolve(&ComponentOptions::new().bindings(bindings));
        let keys: Vec<&str> = resolved.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["my_num", "bigger"]);

        let vm = probe_instance();
        assert_eq!((resolved[1].get)(&vm), Value::Int(1));
    }

    #[test]
    fn test_map_methods_bind_to_store() {
        let counter = Counter::new();
        let methods = map_methods(&counter, &["plus", "reset"]);

        let plus = methods.get("plus").expect("mapped");
        let reset = methods.get("reset").expect("mapped");

        plus(Value::Null);
        plus(Value::Null);
        assert_eq!(counter.num.get(), 2);

        reset(Value::Null);
        assert_eq!(counter.num.get(), 0);
    }

    #[test]
    fn test_map_methods_as_renames() {
        let counter = Counter::new();
        let methods = map_methods_as(&counter, &[("my_plus", "plus"), ("my_reset", "reset")]);

        methods.get("my_plus").expect("mapped")(Value::Null);
        assert_eq!(counter.num.get(), 1);

        methods.get("my_reset").expect("mapped")(Value::Null);
        assert_eq!(counter.num.get(), 0);
    }

    #[test]
    fn test_unknown_field_reads_null() {
        let counter = Counter::new();
        let bindings = map_fields(&counter, &["missing"]);
        let resolved = resolve(&ComponentOptions::new().bindings(bindings));

        let vm = probe_instance();
        assert_eq!((resolved[0].get)(&vm), Value::Null);
    }
}

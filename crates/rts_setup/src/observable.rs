//! Per-property watcher lists.
//!
//! An [`Observable`] is embedded by value in every attribute. It holds, per
//! property name, an ordered list of "on-set" watchers and an ordered list of
//! "on-change" watchers. Watchers are plain function pointers that receive the
//! owning context mutably, so a watcher can call setters on any other
//! attribute and the whole chain runs synchronously before the original
//! setter returns.
//!
//! There is no cycle detection. A watcher must not unconditionally write the
//! property that triggered it.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Callback invoked when a watched property is assigned.
pub type WatchFn<C> = fn(&mut C, &Change);

/// Describes one property assignment delivered to watchers.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    /// Name of the attribute that owns the property.
    pub attribute: &'static str,
    /// Property that was assigned.
    pub property: &'static str,
    /// Value before the assignment.
    pub old: Value,
}

impl Change {
    /// Decode the previous value, `None` if it was unset or of another type.
    #[must_use]
    pub fn old_as<T: DeserializeOwned>(&self) -> Option<T> {
        if self.old.is_null() {
            return None;
        }
        serde_json::from_value(self.old.clone()).ok()
    }
}

/// Ordered watcher registry for a single state object.
pub struct Observable<C> {
    on_set: HashMap<&'static str, Vec<WatchFn<C>>>,
    on_change: HashMap<&'static str, Vec<WatchFn<C>>>,
}

impl<C> Observable<C> {
    /// Create an observable with no watchers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            on_set: HashMap::new(),
            on_change: HashMap::new(),
        }
    }

    /// Register `callback` for every name in `properties`.
    ///
    /// With `only_change` the callback runs only when the new value differs
    /// from the old one; otherwise it runs on every assignment.
    pub fn watch(&mut self, callback: WatchFn<C>, properties: &[&'static str], only_change: bool) {
        let table = if only_change {
            &mut self.on_change
        } else {
            &mut self.on_set
        };
        for property in properties {
            table.entry(*property).or_default().push(callback);
        }
    }

    /// Watchers due for an assignment to `property`.
    ///
    /// Set watchers come first, then change watchers when `changed`; each
    /// group in registration order. The list is copied out so the caller can
    /// dispatch while holding the context mutably.
    #[must_use]
    pub fn watchers(&self, property: &str, changed: bool) -> Vec<WatchFn<C>> {
        let mut due: Vec<WatchFn<C>> = self.on_set.get(property).cloned().unwrap_or_default();
        if changed {
            if let Some(list) = self.on_change.get(property) {
                due.extend_from_slice(list);
            }
        }
        due
    }

    /// Total number of watchers registered for `property`.
    #[must_use]
    pub fn watcher_count(&self, property: &str) -> usize {
        self.on_set.get(property).map_or(0, Vec::len)
            + self.on_change.get(property).map_or(0, Vec::len)
    }
}

impl<C> Default for Observable<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Observable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut properties: Vec<&&str> = self.on_set.keys().chain(self.on_change.keys()).collect();
        properties.sort_unstable();
        properties.dedup();
        f.debug_struct("Observable")
            .field("watched", &properties)
            .finish()
    }
}

/// Run `watchers` against `cx` in order.
pub fn dispatch<C>(cx: &mut C, watchers: &[WatchFn<C>], change: &Change) {
    for watcher in watchers {
        watcher(cx, change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Gauge {
        observable: Observable<Gauge>,
        level: i32,
        mirror: i32,
        log: Vec<&'static str>,
    }

    impl Gauge {
        fn set_level(&mut self, level: i32) {
            let old = std::mem::replace(&mut self.level, level);
            let watchers = self.observable.watchers("level", old != level);
            let change = Change {
                attribute: "gauge",
                property: "level",
                old: Value::from(old),
            };
            dispatch(self, &watchers, &change);
        }
    }

    fn on_any_set(gauge: &mut Gauge, _: &Change) {
        gauge.log.push("set");
    }

    fn on_change(gauge: &mut Gauge, change: &Change) {
        gauge.log.push("change");
        gauge.mirror = change.old_as::<i32>().unwrap_or(-1);
    }

    fn on_change_second(gauge: &mut Gauge, _: &Change) {
        gauge.log.push("second");
    }

    #[test]
    fn test_change_watchers_skip_equal_values() {
        let mut gauge = Gauge::default();
        gauge.observable.watch(on_change, &["level"], true);

        gauge.set_level(3);
        gauge.set_level(3);

        assert_eq!(gauge.log, vec!["change"]);
        assert_eq!(gauge.mirror, 0);
    }

    #[test]
    fn test_set_watchers_fire_on_every_assignment() {
        let mut gauge = Gauge::default();
        gauge.observable.watch(on_any_set, &["level"], false);

        gauge.set_level(0);
        gauge.set_level(0);

        assert_eq!(gauge.log, vec!["set", "set"]);
    }

    #[test]
    fn test_registration_order_is_preserved() {
        let mut gauge = Gauge::default();
        gauge.observable.watch(on_change, &["level"], true);
        gauge.observable.watch(on_change_second, &["level"], true);
        gauge.observable.watch(on_any_set, &["level"], false);

        gauge.set_level(7);

        assert_eq!(gauge.log, vec!["set", "change", "second"]);
        assert_eq!(gauge.observable.watcher_count("level"), 3);
        assert_eq!(gauge.observable.watcher_count("other"), 0);
    }

    #[test]
    fn test_old_value_decoding() {
        let change = Change {
            attribute: "map",
            property: "type",
            old: Value::Null,
        };
        assert_eq!(change.old_as::<String>(), None);

        let change = Change {
            old: Value::from("random"),
            ..change
        };
        assert_eq!(change.old_as::<String>().as_deref(), Some("random"));
        assert_eq!(change.old_as::<u32>(), None);
    }
}

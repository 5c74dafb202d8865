//! Observer decoration.
//!
//! [`decorate`] turns a component definition into one whose render re-runs
//! automatically when any signal it read changes. Function components are
//! normalized to stateful ones first; optional store names are injected from
//! the mount context.
//!
//! ```ignore
//! use spark_observer::{decorate, mount, Node};
//! use spark_signals::signal;
//!
//! let count = signal(0);
//! let read = count.clone();
//! let counter = decorate(
//!     Some(ComponentDef::stateful("Counter", move |_| Ok(Node::text(read.get().to_string())))),
//!     (),
//! )?;
//!
//! let handle = mount(counter, Props::new())?;
//! count.set(1);
//! tick()?; // one re-render, output "1"
//! ```

mod binding;

use crate::component::{normalize, ComponentDef, Markers};
use crate::config::ObserverConfig;
use crate::error::{ObserverError, RenderError};
use crate::types::Node;

pub use binding::ReactiveBinding;

// =============================================================================
// Store names
// =============================================================================

/// Store names passed to [`decorate`].
///
/// Only an ordered list is accepted; a single bare name is rejected as
/// ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoreNames {
    #[default]
    None,
    List(Vec<String>),
    Single(String),
}

impl From<()> for StoreNames {
    fn from(_: ()) -> Self {
        StoreNames::None
    }
}

impl From<&str> for StoreNames {
    fn from(name: &str) -> Self {
        StoreNames::Single(name.to_string())
    }
}

impl From<String> for StoreNames {
    fn from(name: String) -> Self {
        StoreNames::Single(name)
    }
}

impl From<Vec<String>> for StoreNames {
    fn from(names: Vec<String>) -> Self {
        StoreNames::List(names)
    }
}

impl From<Vec<&str>> for StoreNames {
    fn from(names: Vec<&str>) -> Self {
        StoreNames::List(names.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for StoreNames {
    fn from(names: &[&str]) -> Self {
        StoreNames::List(names.iter().map(|n| n.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for StoreNames {
    fn from(names: [&str; N]) -> Self {
        StoreNames::List(names.iter().map(|n| n.to_string()).collect())
    }
}

// =============================================================================
// Decoration
// =============================================================================

/// Decorate `target` as an observer, injecting `stores` from the mount context.
pub fn decorate(
    target: Option<ComponentDef>,
    stores: impl Into<StoreNames>,
) -> Result<ComponentDef, ObserverError> {
    decorate_with(target, stores, ObserverConfig::new())
}

/// [`decorate`] with per-binding configuration.
pub fn decorate_with(
    target: Option<ComponentDef>,
    stores: impl Into<StoreNames>,
    config: ObserverConfig,
) -> Result<ComponentDef, ObserverError> {
    let stores = stores.into();
    if let StoreNames::Single(name) = stores {
        return Err(ObserverError::AmbiguousStoreNames(name));
    }
    let target = target.ok_or(ObserverError::InvalidTarget)?;

    let observed = make_observer(target, config);
    match stores {
        StoreNames::List(names) if !names.is_empty() => Ok(inject(observed, names)),
        _ => Ok(observed),
    }
}

/// Decorate with the process-wide defaults and no stores.
pub fn observer(target: ComponentDef) -> ComponentDef {
    make_observer(target, ObserverConfig::new())
}

/// Inject `stores` into a definition. Each name is resolved from the mount
/// context into a prop of the same name unless the prop is already set.
pub fn inject<I, S>(mut def: ComponentDef, stores: I) -> ComponentDef
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for store in stores {
        let store = store.into();
        if !def.stores.contains(&store) {
            def.stores.push(store);
        }
    }
    def.markers |= Markers::INJECTED;
    def
}

/// Inline observer: a component whose only content is `render`, tracked.
pub fn observer_block(
    name: impl Into<String>,
    render: impl Fn() -> Result<Node, RenderError> + 'static,
) -> ComponentDef {
    observer(ComponentDef::stateful(name, move |_| render()))
}

fn make_observer(target: ComponentDef, config: ObserverConfig) -> ComponentDef {
    if target.markers.contains(Markers::INJECTED) {
        tracing::warn!(
            component = %target.name,
            "observer applied to a component that already injects stores; apply observer before inject"
        );
    }
    if target.is_observer() {
        return target;
    }

    let mut def = normalize(target);
    binding::install(&mut def, config);
    def.markers |= Markers::OBSERVER;
    tracing::debug!(component = %def.name, "component decorated as observer");
    def
}

//! Function → stateful normalization.
//!
//! The binding needs a lifecycle to hook into, which function components do
//! not have. Normalization wraps the function in a stateful definition that
//! keeps the outward shape: display name, default props and validation
//! metadata. The wrapper's render calls the function with whatever props and
//! context the instance holds at call time.

use super::def::Body;
use crate::engine::Phase;
use super::{ComponentDef, ComponentKind, Markers};

/// Turn a function definition into an equivalent stateful one.
///
/// Stateful definitions pass through unchanged.
pub fn normalize(def: ComponentDef) -> ComponentDef {
    if def.kind() == ComponentKind::Stateful {
        return def;
    }

    let render = def.base_render();
    let has_hooks = Phase::ALL.iter().any(|phase| def.hooks.has(*phase));
    if has_hooks || def.should_update.is_some() {
        tracing::warn!(
            component = %def.name,
            "function component carries lifecycle hooks; they are dropped by normalization"
        );
    }

    tracing::debug!(component = %def.name, "normalized function component");
    ComponentDef {
        name: def.name,
        body: Body::Stateful(render),
        hooks: Default::default(),
        should_update: None,
        default_props: def.default_props,
        prop_types: def.prop_types,
        context_types: def.context_types,
        stores: def.stores,
        markers: def.markers | Markers::NORMALIZED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::PropType;
    use crate::types::{Node, Props};

    #[test]
    fn test_stateful_passes_through() {
        let def = ComponentDef::stateful("Panel", |_| Ok(Node::Empty));
        let out = normalize(def);

        assert_eq!(out.kind(), ComponentKind::Stateful);
        assert!(!out.markers().contains(Markers::NORMALIZED));
    }

    #[test]
    fn test_function_keeps_outward_shape() {
        let def = ComponentDef::function("Label", |props, _| {
            Ok(Node::text(props.get("text").and_then(|v| v.as_str()).unwrap_or("")))
        })
        .with_default_props(Props::new().with("text", "untitled"))
        .with_prop_type(PropType::required("text"))
        .with_context_type(PropType::optional("theme"));

        let out = normalize(def);

        assert_eq!(out.kind(), ComponentKind::Stateful);
        assert_eq!(out.name(), "Label");
        assert!(out.markers().contains(Markers::NORMALIZED));
        assert_eq!(out.default_props().get("text").and_then(|v| v.as_str()), Some("untitled"));
        assert_eq!(out.prop_types().len(), 1);
        assert_eq!(out.context_types().len(), 1);
    }
}

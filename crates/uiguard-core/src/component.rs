//! Component descriptors.
//!
//! Compound components (a `Card` exposing `Header`, `Body`, `Footer`) are
//! explicit values whose renderer slots are fixed when they are built. The
//! validators only see them through [`ComponentShape`], a capability
//! descriptor that answers "which parts do you expose".

use std::{fmt, sync::Arc};

use im::OrdMap;
use serde_json::{Map, Value};

/// Live property bag of a component instance.
pub type Props = Map<String, Value>;

/// Renders a component or one of its parts.
pub type Renderer = Arc<dyn Fn(&Props) -> String + Send + Sync>;

/// What a validator needs to know about a component value.
pub trait ComponentShape {
    fn component_name(&self) -> &str;

    /// Whether the named sub-component is attached.
    fn has_part(&self, part: &str) -> bool;

    /// Whether the component's source declares the client boundary
    /// directive.
    fn declares_client_directive(&self) -> bool;
}

/// A component with a root renderer and a fixed set of named parts.
#[derive(Clone)]
pub struct CompoundComponent {
    name: String,
    client_directive: bool,
    root: Renderer,
    parts: OrdMap<String, Renderer>,
}

impl fmt::Debug for CompoundComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompoundComponent")
            .field("name", &self.name)
            .field("client_directive", &self.client_directive)
            .field("parts", &self.part_names())
            .finish_non_exhaustive()
    }
}

impl CompoundComponent {
    pub fn builder(name: impl Into<String>) -> CompoundComponentBuilder {
        CompoundComponentBuilder {
            name: name.into(),
            client_directive: false,
            root: None,
            parts: OrdMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attached part names in sorted order.
    pub fn part_names(&self) -> Vec<String> {
        self.parts.keys().cloned().collect()
    }

    pub fn render(&self, props: &Props) -> String {
        (self.root)(props)
    }

    /// Render a named part, `None` when no such part is attached.
    pub fn render_part(&self, part: &str, props: &Props) -> Option<String> {
        self.parts.get(part).map(|renderer| renderer(props))
    }
}

impl ComponentShape for CompoundComponent {
    fn component_name(&self) -> &str {
        &self.name
    }

    fn has_part(&self, part: &str) -> bool {
        self.parts.contains_key(part)
    }

    fn declares_client_directive(&self) -> bool {
        self.client_directive
    }
}

/// Builder for [`CompoundComponent`]. Parts cannot be attached after
/// [`CompoundComponentBuilder::build`].
pub struct CompoundComponentBuilder {
    name: String,
    client_directive: bool,
    root: Option<Renderer>,
    parts: OrdMap<String, Renderer>,
}

impl CompoundComponentBuilder {
    pub fn client(mut self, declared: bool) -> Self {
        self.client_directive = declared;
        self
    }

    pub fn root(mut self, renderer: impl Fn(&Props) -> String + Send + Sync + 'static) -> Self {
        self.root = Some(Arc::new(renderer));
        self
    }

    pub fn part(
        mut self,
        name: impl Into<String>,
        renderer: impl Fn(&Props) -> String + Send + Sync + 'static,
    ) -> Self {
        self.parts.insert(name.into(), Arc::new(renderer));
        self
    }

    pub fn build(self) -> CompoundComponent {
        let name = self.name;
        let root = self.root.unwrap_or_else(|| {
            let tag = name.clone();
            Arc::new(move |_: &Props| format!("<{tag} />"))
        });
        CompoundComponent {
            name,
            client_directive: self.client_directive,
            root,
            parts: self.parts,
        }
    }
}

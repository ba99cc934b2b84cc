//! Hover/interaction controller.
//!
//! Every frame the controller casts the pointer ray against the registered
//! interactive nodes and moves between three states:
//!
//! - `Unloaded`: the model is not loaded yet, or none of the registered
//!   names exist in it. No ray test is attempted.
//! - `Idle`: targets resolved, pointer over none of them.
//! - `Hovered`: pointer over a target (nearest hit wins).
//!
//! Only state *changes* are reported; a steady state produces no
//! transitions, so callers never rewrite uniforms or the cursor every frame.

use crate::constants::{PORTAL_LINK_URL, PORTAL_NODE};
use crate::raycast::{self, Ray};
use crate::scene::{NodeId, SceneGraph};
use crate::uniforms::GlowPreset;
use fnv::FnvHashMap;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HoverState {
    #[default]
    Unloaded,
    Idle,
    Hovered {
        target: NodeId,
    },
}

impl HoverState {
    pub fn is_hovered(&self) -> bool {
        matches!(self, HoverState::Hovered { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: HoverState,
    pub to: HoverState,
}

impl Transition {
    /// Node the pointer just left, if any.
    pub fn left(&self) -> Option<NodeId> {
        match (self.from, self.to) {
            (HoverState::Hovered { target: a }, HoverState::Hovered { target: b }) if a == b => {
                None
            }
            (HoverState::Hovered { target }, _) => Some(target),
            _ => None,
        }
    }

    /// Node the pointer just entered, if any.
    pub fn entered(&self) -> Option<NodeId> {
        match (self.from, self.to) {
            (HoverState::Hovered { target: a }, HoverState::Hovered { target: b }) if a == b => {
                None
            }
            (_, HoverState::Hovered { target }) => Some(target),
            _ => None,
        }
    }
}

/// At most two transitions fire in one frame (`Unloaded → Idle → Hovered`).
pub type Transitions = SmallVec<[Transition; 2]>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickAction {
    /// Open a URL in a new browsing context.
    OpenUrl(String),
    Log(String),
}

/// Glow presets swapped on enter/leave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverPresets {
    pub idle: GlowPreset,
    pub hovered: GlowPreset,
}

impl Default for HoverPresets {
    fn default() -> Self {
        Self {
            idle: GlowPreset::BASELINE,
            hovered: GlowPreset::HOVERED,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Interaction {
    pub action: ClickAction,
    pub presets: Option<HoverPresets>,
}

impl Interaction {
    pub fn link(url: impl Into<String>) -> Self {
        Self {
            action: ClickAction::OpenUrl(url.into()),
            presets: Some(HoverPresets::default()),
        }
    }

    pub fn log(message: impl Into<String>) -> Self {
        Self {
            action: ClickAction::Log(message.into()),
            presets: None,
        }
    }
}

/// Node name → behavior. Registration order decides ties.
#[derive(Clone, Debug, Default)]
pub struct InteractionRegistry {
    entries: Vec<(String, Interaction)>,
    by_name: FnvHashMap<String, usize>,
}

impl InteractionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The portal opens the author's page; nothing else is interactive.
    pub fn with_defaults() -> Self {
        let mut r = Self::new();
        r.register(PORTAL_NODE, Interaction::link(PORTAL_LINK_URL));
        r
    }

    /// Registering a name twice replaces its behavior.
    pub fn register(&mut self, name: impl Into<String>, interaction: Interaction) {
        let name = name.into();
        match self.by_name.get(&name) {
            Some(&i) => self.entries[i].1 = interaction,
            None => {
                self.by_name.insert(name.clone(), self.entries.len());
                self.entries.push((name, interaction));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Interaction> {
        self.by_name.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (i, name.as_str()))
    }
}

#[derive(Clone, Debug)]
pub struct HoverController {
    registry: InteractionRegistry,
    // (node, registry index), filled once after the model appears
    resolved: Vec<(NodeId, usize)>,
    state: HoverState,
    // set when the installed scene holds none of the registered names
    unresolvable: bool,
}

impl HoverController {
    pub fn new(registry: InteractionRegistry) -> Self {
        Self {
            registry,
            resolved: Vec::new(),
            state: HoverState::Unloaded,
            unresolvable: false,
        }
    }

    pub fn state(&self) -> HoverState {
        self.state
    }

    pub fn registry(&self) -> &InteractionRegistry {
        &self.registry
    }

    /// Behavior bound to a resolved node.
    pub fn interaction_for(&self, node: NodeId) -> Option<&Interaction> {
        self.resolved
            .iter()
            .find(|(n, _)| *n == node)
            .map(|&(_, i)| &self.registry.entries[i].1)
    }

    /// Per-frame evaluation. `scene` is `None` until the model has loaded.
    pub fn evaluate(&mut self, scene: Option<&SceneGraph>, ray: &Ray) -> Transitions {
        let mut out = Transitions::new();
        let Some(scene) = scene else {
            return out;
        };
        if self.state == HoverState::Unloaded {
            if self.unresolvable || !self.resolve(scene) {
                return out;
            }
            self.set_state(HoverState::Idle, &mut out);
        }

        let nearest = self
            .resolved
            .iter()
            .filter_map(|&(node, _)| raycast::intersect_node(ray, scene, node).first().copied())
            .min_by(|a, b| a.distance.total_cmp(&b.distance));
        let next = match nearest {
            Some(hit) => HoverState::Hovered { target: hit.node },
            None => HoverState::Idle,
        };
        self.set_state(next, &mut out);
        out
    }

    /// The action for a click in the current state; `None` unless hovered.
    pub fn click(&self) -> Option<&ClickAction> {
        match self.state {
            HoverState::Hovered { target } => self.interaction_for(target).map(|i| &i.action),
            HoverState::Idle | HoverState::Unloaded => None,
        }
    }

    fn set_state(&mut self, next: HoverState, out: &mut Transitions) {
        if next != self.state {
            log::debug!("[hover] {:?} -> {:?}", self.state, next);
            out.push(Transition {
                from: self.state,
                to: next,
            });
            self.state = next;
        }
    }

    fn resolve(&mut self, scene: &SceneGraph) -> bool {
        self.resolved = self
            .registry
            .iter()
            .filter_map(|(i, name)| scene.find_by_name(name, true).map(|node| (node, i)))
            .collect();
        if self.resolved.is_empty() {
            log::warn!(
                "[hover] none of {} interactive node(s) found in the scene; picking disabled",
                self.registry.len()
            );
            self.unresolvable = true;
        }
        !self.resolved.is_empty()
    }
}

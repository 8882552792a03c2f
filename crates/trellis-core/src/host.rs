use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashSet};
use std::rc::Rc;

use crate::binding::StoreBinding;
use crate::error::{DuplicateType, NoProviderFound};
use crate::provider::ProviderChain;
use crate::registry::{AnyStore, Registry};

pub type NodeId = u64;

/// A mountable consumer in the component tree.
///
/// The host calls `mount` once per mount cycle (create bindings there),
/// `view` on the initial mount and on every re-render, and `unmount` once
/// when the node leaves the tree (tear bindings down there). If `mount`
/// fails, the host calls `unmount` immediately, so `unmount` must tolerate
/// partially-created bindings.
pub trait Component: 'static {
    fn mount(&mut self, cx: &mut MountCx<'_>) -> Result<(), NoProviderFound>;
    fn view(&self) -> String;
    fn unmount(&mut self);
}

/// An unmounted tree description: provider scopes and components.
pub enum Node {
    Provide {
        registry: Rc<Registry>,
        children: Vec<Node>,
    },
    Component(Box<dyn Component>),
}

impl Node {
    /// Provider scope holding `stores` for its subtree.
    ///
    /// Duplicate store types are rejected here, while the tree is being
    /// described, not later during the mount walk.
    pub fn provide(stores: Vec<AnyStore>, children: Vec<Node>) -> Result<Node, DuplicateType> {
        Ok(Node::Provide {
            registry: Rc::new(Registry::new(stores)?),
            children,
        })
    }

    pub fn component(component: impl Component) -> Node {
        Node::Component(Box::new(component))
    }
}

/// Passed to [`Component::mount`]; exposes the enclosing providers and the
/// component's re-render scheduling handle.
pub struct MountCx<'a> {
    chain: &'a ProviderChain,
    shared: &'a Rc<Shared>,
    id: NodeId,
}

impl MountCx<'_> {
    pub fn providers(&self) -> &ProviderChain {
        self.chain
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Handle that marks this component dirty for the next frame.
    ///
    /// Cheap to clone into observers; marks coalesce, so several store
    /// notifications before a frame produce a single re-render.
    pub fn rerender(&self) -> impl Fn() + use<> {
        let shared = Rc::downgrade(self.shared);
        let id = self.id;
        move || {
            let Some(shared) = shared.upgrade() else {
                return;
            };
            if shared.live.borrow().contains(&id) {
                log::trace!("component #{id} marked dirty");
                shared.dirty.borrow_mut().insert(id);
            } else {
                log::warn!("re-render requested for unmounted component #{id}; ignoring");
            }
        }
    }

    /// Resolve a store of state type `S` and subscribe this component's
    /// re-render handle to it, in one step.
    pub fn bind<S: Clone + 'static>(&self) -> Result<StoreBinding<S>, NoProviderFound> {
        StoreBinding::mount(self.chain, self.rerender())
    }
}

struct Shared {
    next_id: Cell<NodeId>,
    live: RefCell<HashSet<NodeId>>,
    dirty: RefCell<BTreeSet<NodeId>>,
}

enum MountedNode {
    Provide {
        // Keeps the registry alive for exactly the mount span of its node.
        _registry: Rc<Registry>,
        children: Vec<MountedNode>,
    },
    Component {
        id: NodeId,
        component: Box<dyn Component>,
        output: String,
    },
}

/// Minimal host runtime: mounts a [`Node`] tree, walks providers into a
/// [`ProviderChain`], and re-renders dirty components one frame at a time.
///
/// This is the shim side of the rendering-engine contract; a real renderer
/// would replace it wholesale and only needs to offer the same three
/// capabilities (mount/unmount transitions, per-component re-render
/// scheduling, ancestor provider lookup).
pub struct Host {
    shared: Rc<Shared>,
    root: Option<MountedNode>,
}

impl Host {
    pub fn new() -> Self {
        Self {
            shared: Rc::new(Shared {
                next_id: Cell::new(1),
                live: RefCell::new(HashSet::new()),
                dirty: RefCell::new(BTreeSet::new()),
            }),
            root: None,
        }
    }

    /// Mounts `node` as the root, replacing (and unmounting) any previous
    /// root. Fails fast if any component's stores cannot be resolved; in
    /// that case every component mounted so far is unmounted again and
    /// nothing stays live.
    pub fn mount(&mut self, node: Node) -> Result<(), NoProviderFound> {
        self.unmount();
        let chain = ProviderChain::root();
        let mounted = self.mount_node(node, &chain)?;
        self.root = Some(mounted);
        Ok(())
    }

    fn mount_node(
        &mut self,
        node: Node,
        chain: &ProviderChain,
    ) -> Result<MountedNode, NoProviderFound> {
        match node {
            Node::Provide { registry, children } => {
                let child_chain = chain.extend(registry.clone());
                let mut mounted = Vec::with_capacity(children.len());
                for child in children {
                    match self.mount_node(child, &child_chain) {
                        Ok(m) => mounted.push(m),
                        Err(err) => {
                            for m in mounted.drain(..).rev() {
                                unmount_tree(m, &self.shared);
                            }
                            return Err(err);
                        }
                    }
                }
                Ok(MountedNode::Provide {
                    _registry: registry,
                    children: mounted,
                })
            }
            Node::Component(mut component) => {
                let id = self.shared.next_id.get();
                self.shared.next_id.set(id + 1);
                let mut cx = MountCx {
                    chain,
                    shared: &self.shared,
                    id,
                };
                if let Err(err) = component.mount(&mut cx) {
                    // release any binding the component managed to create
                    // before the failing one
                    component.unmount();
                    return Err(err);
                }
                self.shared.live.borrow_mut().insert(id);
                let output = component.view();
                log::debug!("mounted component #{id}");
                Ok(MountedNode::Component {
                    id,
                    component,
                    output,
                })
            }
        }
    }

    /// Unmounts the whole tree, depth-first. Idempotent.
    pub fn unmount(&mut self) {
        if let Some(root) = self.root.take() {
            unmount_tree(root, &self.shared);
        }
    }

    /// Re-renders every component marked dirty since the previous frame and
    /// returns how many were re-rendered.
    pub fn render_frame(&mut self) -> usize {
        let dirty: BTreeSet<NodeId> = std::mem::take(&mut *self.shared.dirty.borrow_mut());
        if dirty.is_empty() {
            return 0;
        }
        match self.root.as_mut() {
            Some(root) => rerender_tree(root, &dirty),
            None => 0,
        }
    }

    /// Rendered output of a mounted component.
    pub fn view_of(&self, id: NodeId) -> Option<&str> {
        self.root.as_ref().and_then(|root| view_of(root, id))
    }

    /// Ids of mounted components, in depth-first mount order.
    pub fn component_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        if let Some(root) = self.root.as_ref() {
            collect_ids(root, &mut ids);
        }
        ids
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

fn unmount_tree(node: MountedNode, shared: &Shared) {
    match node {
        MountedNode::Provide { children, .. } => {
            for child in children {
                unmount_tree(child, shared);
            }
        }
        MountedNode::Component {
            id, mut component, ..
        } => {
            component.unmount();
            shared.live.borrow_mut().remove(&id);
            shared.dirty.borrow_mut().remove(&id);
            log::debug!("unmounted component #{id}");
        }
    }
}

fn rerender_tree(node: &mut MountedNode, dirty: &BTreeSet<NodeId>) -> usize {
    match node {
        MountedNode::Provide { children, .. } => children
            .iter_mut()
            .map(|child| rerender_tree(child, dirty))
            .sum(),
        MountedNode::Component {
            id,
            component,
            output,
        } => {
            if dirty.contains(id) {
                *output = component.view();
                1
            } else {
                0
            }
        }
    }
}

fn view_of<'a>(node: &'a MountedNode, id: NodeId) -> Option<&'a str> {
    match node {
        MountedNode::Provide { children, .. } => {
            children.iter().find_map(|child| view_of(child, id))
        }
        MountedNode::Component {
            id: node_id,
            output,
            ..
        } => (*node_id == id).then_some(output.as_str()),
    }
}

fn collect_ids(node: &MountedNode, ids: &mut Vec<NodeId>) {
    match node {
        MountedNode::Provide { children, .. } => {
            for child in children {
                collect_ids(child, ids);
            }
        }
        MountedNode::Component { id, .. } => ids.push(*id),
    }
}

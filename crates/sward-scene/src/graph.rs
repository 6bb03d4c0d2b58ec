//! SceneGraph - named node tree the vegetation field attaches itself to

use crate::geometry::{BufferGeometry, InstancedGeometry};
use crate::material::ShaderMaterial;
use glam::Vec3;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use sward_core::{NodeId, Result, SwardError};

/// A renderable that draws one shared geometry many times
#[derive(Debug, Clone)]
pub struct InstancedMesh {
    pub geometry: Rc<RefCell<InstancedGeometry>>,
    pub material: Rc<RefCell<ShaderMaterial>>,
}

/// What a node carries
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure container
    Group,
    /// Plain indexed mesh (terrain planes, props)
    Mesh(Rc<BufferGeometry>),
    /// Instanced mesh
    Instanced(InstancedMesh),
}

/// A node in the scene graph
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub position: Vec3,
    pub cast_shadow: bool,
    pub kind: NodeKind,
}

impl SceneNode {
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, geometry: Rc<BufferGeometry>) -> Self {
        Self::new(name, NodeKind::Mesh(geometry))
    }

    pub fn instanced(name: impl Into<String>, mesh: InstancedMesh) -> Self {
        Self::new(name, NodeKind::Instanced(mesh))
    }

    fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            cast_shadow: false,
            kind,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_cast_shadow(mut self, cast_shadow: bool) -> Self {
        self.cast_shadow = cast_shadow;
        self
    }

    pub fn as_mesh(&self) -> Option<&Rc<BufferGeometry>> {
        match &self.kind {
            NodeKind::Mesh(geometry) => Some(geometry),
            _ => None,
        }
    }

    pub fn as_instanced(&self) -> Option<&InstancedMesh> {
        match &self.kind {
            NodeKind::Instanced(mesh) => Some(mesh),
            _ => None,
        }
    }
}

/// The scene graph
///
/// Nodes are stored flat with:
/// - Stable NodeId handles
/// - Ordered child lists (top-level order is insertion order)
/// - Child -> parent relationships
///
/// Names are not unique; name lookups return the first match in child order.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: HashMap<NodeId, SceneNode>,
    /// Top-level nodes in insertion order
    roots: Vec<NodeId>,
    /// Parent -> ordered children
    children: HashMap<NodeId, Vec<NodeId>>,
    /// Parent relationships: child -> parent
    parents: HashMap<NodeId, NodeId>,
}

impl SceneGraph {
    /// Create a new empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node at the top level
    pub fn add(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId::new();
        self.nodes.insert(id, node);
        self.roots.push(id);
        id
    }

    /// Insert a node as the last child of `parent`
    pub fn add_child(&mut self, parent: NodeId, node: SceneNode) -> Result<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return Err(SwardError::NodeNotFound(parent.to_string()));
        }
        let id = NodeId::new();
        self.nodes.insert(id, node);
        self.children.entry(parent).or_default().push(id);
        self.parents.insert(id, parent);
        Ok(id)
    }

    /// Remove a node and its whole subtree. Returns the removed node, or
    /// `None` if it was not in the scene.
    pub fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        let node = self.nodes.remove(&id)?;

        match self.parents.remove(&id) {
            Some(parent) => {
                if let Some(siblings) = self.children.get_mut(&parent) {
                    siblings.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }

        let mut stack = self.children.remove(&id).unwrap_or_default();
        while let Some(child) = stack.pop() {
            self.nodes.remove(&child);
            self.parents.remove(&child);
            if let Some(grandchildren) = self.children.remove(&child) {
                stack.extend(grandchildren);
            }
        }

        Some(node)
    }

    /// Remove the first top-level node called `name`. Removes at most one.
    pub fn remove_by_name(&mut self, name: &str) -> Option<SceneNode> {
        let id = self.find_by_name(name)?;
        self.remove(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(&id).copied()
    }

    /// Top-level nodes in insertion order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Children of a node in insertion order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First top-level node called `name`
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.roots
            .iter()
            .copied()
            .find(|id| self.nodes.get(id).is_some_and(|n| n.name == name))
    }

    /// First direct child of `container` called `name`
    pub fn find_child_by_name(&self, container: NodeId, name: &str) -> Option<NodeId> {
        self.children(container)
            .iter()
            .copied()
            .find(|id| self.nodes.get(id).is_some_and(|n| n.name == name))
    }

    /// Look for `name` at the top level, or one level inside a top-level
    /// node called `container`, scanning top-level nodes in order.
    pub fn find_nested(&self, container: &str, name: &str) -> Option<NodeId> {
        self.roots.iter().copied().find_map(|id| {
            let node = self.nodes.get(&id)?;
            if node.name == name {
                Some(id)
            } else if node.name == container {
                self.find_child_by_name(id, name)
            } else {
                None
            }
        })
    }

    /// Number of top-level nodes called `name`
    pub fn count_named(&self, name: &str) -> usize {
        self.roots
            .iter()
            .filter(|id| self.nodes.get(*id).is_some_and(|n| n.name == name))
            .count()
    }

    /// Total number of nodes, nested ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

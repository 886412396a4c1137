//! Parent/child links between entities
//!
//! Children form an intrusive doubly-linked list: the parent stores its
//! first child and a child count, every child stores its siblings. The
//! helpers here only rewrite links; callers are responsible for rejecting
//! cycles before calling [`attach`].

use crate::ecs::components::TransformComponent;
use crate::ecs::{Component, Entity, World};
use crate::foundation::math::Mat4;

/// Position of an entity in the scene tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HierarchyComponent {
    /// Parent entity, `None` for roots
    pub parent: Option<Entity>,
    /// First child
    pub first: Option<Entity>,
    /// Previous sibling
    pub prev: Option<Entity>,
    /// Next sibling
    pub next: Option<Entity>,
    /// Number of children
    pub children: usize,
}

impl HierarchyComponent {
    /// True when the entity has at least one child
    pub fn has_children(&self) -> bool {
        self.first.is_some()
    }
}

impl Component for HierarchyComponent {}

/// Unlink `entity` from its parent and siblings
pub fn detach(world: &mut World, entity: Entity) {
    let Some(node) = world.get_component::<HierarchyComponent>(entity).copied() else {
        return;
    };

    if let Some(prev) = node.prev {
        if let Some(prev_node) = world.get_component_mut::<HierarchyComponent>(prev) {
            prev_node.next = node.next;
        }
    }
    if let Some(next) = node.next {
        if let Some(next_node) = world.get_component_mut::<HierarchyComponent>(next) {
            next_node.prev = node.prev;
        }
    }
    if let Some(parent) = node.parent {
        if let Some(parent_node) = world.get_component_mut::<HierarchyComponent>(parent) {
            if parent_node.first == Some(entity) {
                parent_node.first = node.next;
            }
            parent_node.children = parent_node.children.saturating_sub(1);
        }
    }

    if let Some(node) = world.get_component_mut::<HierarchyComponent>(entity) {
        node.parent = None;
        node.prev = None;
        node.next = None;
    }
}

/// Append a detached `child` as the last child of `parent`
pub fn attach(world: &mut World, child: Entity, parent: Entity) {
    let last = last_child(world, parent);

    if let Some(last) = last {
        if let Some(last_node) = world.get_component_mut::<HierarchyComponent>(last) {
            last_node.next = Some(child);
        }
    }
    if let Some(parent_node) = world.get_component_mut::<HierarchyComponent>(parent) {
        if parent_node.first.is_none() {
            parent_node.first = Some(child);
        }
        parent_node.children += 1;
    }
    if let Some(node) = world.get_component_mut::<HierarchyComponent>(child) {
        node.parent = Some(parent);
        node.prev = last;
        node.next = None;
    }
}

/// Children of `entity` in list order
pub fn children(world: &World, entity: Entity) -> Vec<Entity> {
    let mut result = Vec::new();
    let mut cursor = world
        .get_component::<HierarchyComponent>(entity)
        .and_then(|node| node.first);
    while let Some(child) = cursor {
        result.push(child);
        cursor = world.get_component::<HierarchyComponent>(child).and_then(|node| node.next);
    }
    result
}

/// True when `ancestor` is `entity` or one of its parents
pub fn is_ancestor_or_self(world: &World, ancestor: Entity, entity: Entity) -> bool {
    let mut cursor = Some(entity);
    while let Some(current) = cursor {
        if current == ancestor {
            return true;
        }
        cursor = world.get_component::<HierarchyComponent>(current).and_then(|node| node.parent);
    }
    false
}

/// Local matrices composed from the root down to `entity`
pub fn world_matrix(world: &World, entity: Entity) -> Mat4 {
    let mut matrix = Mat4::identity();
    let mut cursor = Some(entity);
    while let Some(current) = cursor {
        if let Some(transform) = world.get_component::<TransformComponent>(current) {
            matrix = transform.local_matrix() * matrix;
        }
        cursor = world.get_component::<HierarchyComponent>(current).and_then(|node| node.parent);
    }
    matrix
}

fn last_child(world: &World, parent: Entity) -> Option<Entity> {
    let mut cursor = world.get_component::<HierarchyComponent>(parent)?.first?;
    while let Some(next) = world.get_component::<HierarchyComponent>(cursor).and_then(|node| node.next) {
        cursor = next;
    }
    Some(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    fn node(world: &mut World) -> Entity {
        let entity = world.create_entity();
        world.add_component(entity, HierarchyComponent::default());
        entity
    }

    #[test]
    fn test_attach_appends_in_order() {
        let mut world = World::new();
        let parent = node(&mut world);
        let (a, b, c) = (node(&mut world), node(&mut world), node(&mut world));
        for child in [a, b, c] {
            attach(&mut world, child, parent);
        }

        assert_eq!(children(&world, parent), vec![a, b, c]);
        let parent_node = world.get_component::<HierarchyComponent>(parent).unwrap();
        assert_eq!(parent_node.children, 3);
        assert_eq!(world.get_component::<HierarchyComponent>(b).unwrap().prev, Some(a));
    }

    #[test]
    fn test_detach_relinks_siblings() {
        let mut world = World::new();
        let parent = node(&mut world);
        let (a, b, c) = (node(&mut world), node(&mut world), node(&mut world));
        for child in [a, b, c] {
            attach(&mut world, child, parent);
        }

        detach(&mut world, a);
        detach(&mut world, c);
        assert_eq!(children(&world, parent), vec![b]);
        let b_node = world.get_component::<HierarchyComponent>(b).unwrap();
        assert_eq!((b_node.prev, b_node.next), (None, None));
        assert_eq!(world.get_component::<HierarchyComponent>(parent).unwrap().children, 1);
        assert_eq!(world.get_component::<HierarchyComponent>(a).unwrap().parent, None);
    }

    #[test]
    fn test_ancestry_and_world_matrix() {
        let mut world = World::new();
        let root = node(&mut world);
        let child = node(&mut world);
        attach(&mut world, child, root);
        world.add_component(root, TransformComponent::from_position(Vec3::new(1.0, 0.0, 0.0)));
        world.add_component(child, TransformComponent::from_position(Vec3::new(0.0, 2.0, 0.0)));

        assert!(is_ancestor_or_self(&world, root, child));
        assert!(!is_ancestor_or_self(&world, child, root));
        let matrix = world_matrix(&world, child);
        assert_relative_eq!(matrix[(0, 3)], 1.0);
        assert_relative_eq!(matrix[(1, 3)], 2.0);
    }
}

//! ECS World implementation

use super::{Component, Entity};
use slotmap::{SecondaryMap, SlotMap};
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Type-erased view of one component storage
trait AnyStorage: Send + Sync {
    fn remove_entity(&mut self, entity: Entity);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Dense-enough storage for a single component type
///
/// `order` keeps insertion order so queries are stable across frames.
struct ComponentStorage<T: Component> {
    components: SecondaryMap<Entity, T>,
    order: Vec<Entity>,
}

impl<T: Component> ComponentStorage<T> {
    fn new() -> Self {
        Self {
            components: SecondaryMap::new(),
            order: Vec::new(),
        }
    }

    fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        let previous = self.components.insert(entity, component);
        if previous.is_none() {
            self.order.push(entity);
        }
        previous
    }

    fn remove(&mut self, entity: Entity) -> Option<T> {
        let removed = self.components.remove(entity);
        if removed.is_some() {
            self.order.retain(|e| *e != entity);
        }
        removed
    }

    fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.order
            .iter()
            .filter_map(move |entity| self.components.get(*entity).map(|c| (*entity, c)))
    }
}

impl<T: Component> AnyStorage for ComponentStorage<T> {
    fn remove_entity(&mut self, entity: Entity) {
        self.remove(entity);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// ECS World containing all entities and components
pub struct World {
    entities: SlotMap<Entity, ()>,
    creation_order: Vec<Entity>,
    component_storages: HashMap<TypeId, Box<dyn AnyStorage>>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            creation_order: Vec::new(),
            component_storages: HashMap::new(),
        }
    }

    /// Create a new entity
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.entities.insert(());
        self.creation_order.push(entity);
        log::trace!("Created entity {:?}", entity);
        entity
    }

    /// Destroy an entity and drop all of its components
    ///
    /// Returns `false` when the entity was already dead.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if self.entities.remove(entity).is_none() {
            return false;
        }
        for storage in self.component_storages.values_mut() {
            storage.remove_entity(entity);
        }
        self.creation_order.retain(|e| *e != entity);
        log::trace!("Destroyed entity {:?}", entity);
        true
    }

    /// Whether the handle still refers to a live entity
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Add a component to an entity, replacing any previous one of that type
    ///
    /// Adding to a dead entity is ignored and returns the component back.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Option<T> {
        if !self.is_alive(entity) {
            log::warn!("Ignoring component {} for dead entity {:?}", std::any::type_name::<T>(), entity);
            return Some(component);
        }
        self.storage_mut_or_insert::<T>().insert(entity, component)
    }

    /// Remove a component from an entity
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.storage_mut::<T>()?.remove(entity)
    }

    /// Get a component from an entity
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.components.get(entity)
    }

    /// Get a mutable component from an entity
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_mut::<T>()?.components.get_mut(entity)
    }

    /// Whether the entity has a component of type `T`
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.get_component::<T>(entity).is_some()
    }

    /// All `(entity, component)` pairs of type `T` in insertion order
    pub fn query<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.storage::<T>().into_iter().flat_map(|storage| storage.iter())
    }

    /// Entities that carry a component of type `T`, in insertion order
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        self.query::<T>().map(|(entity, _)| entity).collect()
    }

    /// Live entities in creation order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.creation_order.iter().copied()
    }

    /// Destroy every entity
    pub fn clear(&mut self) {
        self.entities.clear();
        self.creation_order.clear();
        self.component_storages.clear();
    }

    fn storage<T: Component>(&self) -> Option<&ComponentStorage<T>> {
        self.component_storages
            .get(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any().downcast_ref::<ComponentStorage<T>>())
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut ComponentStorage<T>> {
        self.component_storages
            .get_mut(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any_mut().downcast_mut::<ComponentStorage<T>>())
    }

    fn storage_mut_or_insert<T: Component>(&mut self) -> &mut ComponentStorage<T> {
        let storage = self
            .component_storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentStorage::<T>::new()));
        match storage.as_any_mut().downcast_mut::<ComponentStorage<T>>() {
            Some(storage) => storage,
            None => unreachable!("component storage keyed by a different TypeId"),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

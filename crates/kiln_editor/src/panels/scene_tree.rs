//! Scene tree panel
//!
//! Headless model of the hierarchy view and the inspector next to it. The
//! panel owns the selection and search text; every edit goes through the
//! [`Scene`] so the tree links stay valid.

use kiln_engine::ecs::Entity;
use kiln_engine::scene::{ComponentKind, EntityTemplate, Scene, SceneError};

use super::inspector::{inspect_entity, InspectorSection};

/// One line of the hierarchy view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    /// Entity the row shows
    pub entity: Entity,
    /// Tag text
    pub name: String,
    /// Nesting level, roots are 0
    pub depth: usize,
    /// Whether the row gets an expand arrow
    pub has_children: bool,
    /// Whether the row is highlighted
    pub selected: bool,
}

/// Hierarchy and inspector state
#[derive(Debug, Clone)]
pub struct SceneTreePanel {
    /// Hidden panels list no rows and inspect nothing
    pub visible: bool,
    /// Name filter typed in the search bar
    pub search: String,
    selection: Option<Entity>,
}

impl Default for SceneTreePanel {
    fn default() -> Self {
        Self {
            visible: true,
            search: String::new(),
            selection: None,
        }
    }
}

impl SceneTreePanel {
    /// Visible panel with nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected entity
    pub fn selection(&self) -> Option<Entity> {
        self.selection
    }

    /// Depth-first rows from the roots, filtered by the search text
    pub fn rows(&self, scene: &Scene) -> Vec<TreeRow> {
        if !self.visible {
            return Vec::new();
        }
        let needle = self.search.trim().to_lowercase();
        scene
            .walk_depth_first()
            .into_iter()
            .filter_map(|(entity, depth)| {
                let name = scene.name_of(entity).unwrap_or_default();
                if !needle.is_empty() && !name.to_lowercase().contains(&needle) {
                    return None;
                }
                Some(TreeRow {
                    entity,
                    name: name.to_string(),
                    depth,
                    has_children: !scene.children(entity).is_empty(),
                    selected: self.selection == Some(entity),
                })
            })
            .collect()
    }

    /// Click on a row
    pub fn select(&mut self, entity: Entity) {
        self.selection = Some(entity);
    }

    /// Click on empty panel space
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Drop the selection if its entity no longer exists
    pub fn sync_selection(&mut self, scene: &Scene) {
        if self.selection.is_some_and(|entity| !scene.contains(entity)) {
            self.selection = None;
        }
    }

    /// Delete key: destroy the selected entity and its subtree
    pub fn delete_selected(&mut self, scene: &mut Scene) -> Result<bool, SceneError> {
        let Some(entity) = self.selection.take() else {
            return Ok(false);
        };
        scene.destroy_entity(entity)?;
        Ok(true)
    }

    /// Drag `dragged` onto `target`, or onto empty space to make it a root
    pub fn drop_entity_on(
        &mut self,
        scene: &mut Scene,
        dragged: Entity,
        target: Option<Entity>,
    ) -> Result<(), SceneError> {
        if !scene.contains(dragged) {
            return Err(SceneError::EntityNotFound(dragged));
        }
        if target == scene.parent(dragged) {
            return Ok(());
        }
        scene.reparent(dragged, target)?;
        log::debug!(
            "Moved '{}' under {}",
            scene.name_of(dragged).unwrap_or_default(),
            target.and_then(|t| scene.name_of(t)).unwrap_or("the root")
        );
        Ok(())
    }

    /// "Add Entity" menu: create from a template and select it
    pub fn create_entity(&mut self, scene: &mut Scene, template: EntityTemplate) -> Entity {
        let entity = scene.create_from_template(template);
        self.selection = Some(entity);
        entity
    }

    /// "Add Component" menu on the selection
    pub fn add_component(&mut self, scene: &mut Scene, kind: ComponentKind) -> Result<bool, SceneError> {
        match self.selection {
            Some(entity) => scene.add_component_kind(entity, kind),
            None => Ok(false),
        }
    }

    /// "Remove Component" on a section header of the selection
    pub fn remove_component(&mut self, scene: &mut Scene, kind: ComponentKind) -> Result<bool, SceneError> {
        match self.selection {
            Some(entity) => scene.remove_component_kind(entity, kind),
            None => Ok(false),
        }
    }

    /// Optional components the selection does not have yet
    pub fn addable_components(&self, scene: &Scene) -> Vec<ComponentKind> {
        let Some(entity) = self.selection.filter(|e| scene.contains(*e)) else {
            return Vec::new();
        };
        let present = scene.component_kinds(entity);
        ComponentKind::OPTIONAL
            .into_iter()
            .filter(|kind| !present.contains(*kind))
            .collect()
    }

    /// Inspector sections for the selection
    pub fn inspect(&self, scene: &Scene) -> Vec<InspectorSection> {
        match self.selection {
            Some(entity) if self.visible && scene.contains(entity) => inspect_entity(scene, entity),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with_tree() -> (Scene, Entity, Entity, Entity) {
        let mut scene = Scene::new("Tree");
        let parent = scene.create_entity("Ship");
        let child = scene.create_entity("Engine");
        let other = scene.create_entity("Station");
        scene.reparent(child, Some(parent)).unwrap();
        (scene, parent, child, other)
    }

    #[test]
    fn test_rows_are_depth_first() {
        let (scene, parent, child, other) = scene_with_tree();
        let mut panel = SceneTreePanel::new();
        panel.select(child);

        let rows = panel.rows(&scene);
        let listing: Vec<_> = rows.iter().map(|r| (r.entity, r.depth)).collect();
        assert_eq!(listing, vec![(parent, 0), (child, 1), (other, 0)]);
        assert!(rows[0].has_children);
        assert!(rows[1].selected);
        assert!(!rows[2].selected);
    }

    #[test]
    fn test_search_keeps_depth() {
        let (scene, _, child, _) = scene_with_tree();
        let mut panel = SceneTreePanel::new();
        panel.search = "ENG".to_string();
        let rows = panel.rows(&scene);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entity, child);
        assert_eq!(rows[0].depth, 1);

        panel.visible = false;
        assert!(panel.rows(&scene).is_empty());
    }

    #[test]
    fn test_delete_selected_removes_subtree() {
        let (mut scene, parent, child, other) = scene_with_tree();
        let mut panel = SceneTreePanel::new();
        assert!(!panel.delete_selected(&mut scene).unwrap());

        panel.select(parent);
        assert!(panel.delete_selected(&mut scene).unwrap());
        assert_eq!(panel.selection(), None);
        assert!(!scene.contains(child));
        assert_eq!(scene.roots(), vec![other]);
    }

    #[test]
    fn test_drop_reparents_and_rejects_cycles() {
        let (mut scene, parent, child, other) = scene_with_tree();
        let mut panel = SceneTreePanel::new();

        panel.drop_entity_on(&mut scene, other, Some(child)).unwrap();
        assert_eq!(scene.parent(other), Some(child));

        assert!(matches!(
            panel.drop_entity_on(&mut scene, parent, Some(other)),
            Err(SceneError::CyclicHierarchy { .. })
        ));

        panel.drop_entity_on(&mut scene, child, None).unwrap();
        assert_eq!(scene.roots(), vec![parent, child]);
    }

    #[test]
    fn test_drop_of_destroyed_entity_fails() {
        let (mut scene, _, _, other) = scene_with_tree();
        let mut panel = SceneTreePanel::new();
        scene.destroy_entity(other).unwrap();

        assert!(matches!(
            panel.drop_entity_on(&mut scene, other, None),
            Err(SceneError::EntityNotFound(e)) if e == other
        ));
    }

    #[test]
    fn test_create_entity_selects_it() {
        let mut scene = Scene::default();
        let mut panel = SceneTreePanel::new();
        let light = panel.create_entity(&mut scene, EntityTemplate::Light);
        assert_eq!(panel.selection(), Some(light));
        assert_eq!(scene.name_of(light), Some("Light"));

        let titles: Vec<_> = panel.inspect(&scene).iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Tag", "Transform", "Light"]);

        panel.clear_selection();
        assert!(panel.inspect(&scene).is_empty());
    }

    #[test]
    fn test_component_menu_acts_on_selection() {
        let mut scene = Scene::default();
        let mut panel = SceneTreePanel::new();
        assert!(!panel.add_component(&mut scene, ComponentKind::MESH).unwrap());

        let entity = panel.create_entity(&mut scene, EntityTemplate::Empty);
        assert_eq!(panel.addable_components(&scene).len(), ComponentKind::OPTIONAL.len());
        assert!(panel.add_component(&mut scene, ComponentKind::SCRIPT).unwrap());
        assert!(!panel.addable_components(&scene).contains(&ComponentKind::SCRIPT));
        assert!(panel.remove_component(&mut scene, ComponentKind::SCRIPT).unwrap());
        assert!(panel.remove_component(&mut scene, ComponentKind::TAG).is_err());

        scene.destroy_entity(entity).unwrap();
        panel.sync_selection(&scene);
        assert_eq!(panel.selection(), None);
    }
}

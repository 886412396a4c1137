//! Inspector model
//!
//! Turns the components of one entity into labelled sections. Which fields
//! appear depends on the component's state: a perspective camera shows its
//! field of view, an orthographic one its size, and lights only show range
//! and attenuation when their type uses them.

use std::fmt;
use std::sync::Arc;

use kiln_engine::ecs::components::{
    CameraComponent, EmissionShape, LightComponent, MaterialComponent, MeshComponent, ParticleSystemComponent,
    ScriptComponent, TagComponent, TransformComponent,
};
use kiln_engine::ecs::{Entity, World};
use kiln_engine::foundation::math::{Vec3, Vec4};
use kiln_engine::render::{ProjectionType, Texture2D};
use kiln_engine::scene::{ComponentKind, Scene};

/// Value shown next to a field label
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text box
    Text(String),
    /// Drag float
    Float(f32),
    /// Three-component drag
    Vector(Vec3),
    /// Colour picker
    Color(Vec4),
    /// Checkbox
    Flag(bool),
    /// Read-only counter
    Count(usize),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{}", text),
            Self::Float(value) => write!(f, "{:.3}", value),
            Self::Vector(v) => write!(f, "({:.2}, {:.2}, {:.2})", v.x, v.y, v.z),
            Self::Color(c) => write!(f, "rgba({:.2}, {:.2}, {:.2}, {:.2})", c.x, c.y, c.z, c.w),
            Self::Flag(value) => write!(f, "{}", if *value { "on" } else { "off" }),
            Self::Count(count) => write!(f, "{}", count),
        }
    }
}

/// One labelled value
#[derive(Debug, Clone, PartialEq)]
pub struct InspectorField {
    /// Text left of the control
    pub label: &'static str,
    /// Current value
    pub value: FieldValue,
}

/// Fields of one component
#[derive(Debug, Clone, PartialEq)]
pub struct InspectorSection {
    /// Header text
    pub title: &'static str,
    /// Component the section shows
    pub kind: ComponentKind,
    /// Whether the header offers "Remove Component"
    pub removable: bool,
    /// Rows in display order
    pub fields: Vec<InspectorField>,
}

impl InspectorSection {
    fn new(title: &'static str, kind: ComponentKind) -> Self {
        Self {
            title,
            kind,
            removable: !ComponentKind::REQUIRED.contains(kind),
            fields: Vec::new(),
        }
    }

    fn field(mut self, label: &'static str, value: FieldValue) -> Self {
        self.fields.push(InspectorField { label, value });
        self
    }

    fn field_if(self, condition: bool, label: &'static str, value: FieldValue) -> Self {
        if condition {
            self.field(label, value)
        } else {
            self
        }
    }

    /// Value of the first field with `label`
    pub fn get(&self, label: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.label == label).map(|f| &f.value)
    }

    /// Whether a field with `label` is shown
    pub fn has(&self, label: &str) -> bool {
        self.get(label).is_some()
    }
}

impl fmt::Display for InspectorSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.title)?;
        for field in &self.fields {
            writeln!(f, "  {:<22} {}", field.label, field.value)?;
        }
        Ok(())
    }
}

/// Sections for every component on `entity`, in inspector order
pub fn inspect_entity(scene: &Scene, entity: Entity) -> Vec<InspectorSection> {
    let world = scene.world();
    [
        tag_section(world, entity),
        transform_section(world, entity),
        camera_section(world, entity),
        light_section(world, entity),
        mesh_section(world, entity),
        material_section(world, entity),
        script_section(world, entity),
        particle_section(world, entity),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn texture_name(texture: Option<&Arc<Texture2D>>) -> FieldValue {
    FieldValue::Text(texture.map_or_else(|| "None".to_string(), |t| t.name().to_string()))
}

fn tag_section(world: &World, entity: Entity) -> Option<InspectorSection> {
    let tag = world.get_component::<TagComponent>(entity)?;
    Some(InspectorSection::new("Tag", ComponentKind::TAG).field("Tag", FieldValue::Text(tag.tag.clone())))
}

fn transform_section(world: &World, entity: Entity) -> Option<InspectorSection> {
    let transform = world.get_component::<TransformComponent>(entity)?;
    Some(
        InspectorSection::new("Transform", ComponentKind::TRANSFORM)
            .field("Position", FieldValue::Vector(transform.position))
            .field("Rotation", FieldValue::Vector(transform.rotation))
            .field("Scale", FieldValue::Vector(transform.scale)),
    )
}

fn camera_section(world: &World, entity: Entity) -> Option<InspectorSection> {
    let component = world.get_component::<CameraComponent>(entity)?;
    let camera = &component.camera.camera;
    let section = InspectorSection::new("Camera", ComponentKind::CAMERA).field("Primary", FieldValue::Flag(component.primary));
    let section = match camera.projection_type() {
        ProjectionType::Perspective => section
            .field("Projection Type", FieldValue::Text("Perspective".into()))
            .field("Field of View", FieldValue::Float(camera.fov())),
        ProjectionType::Orthographic => section
            .field("Projection Type", FieldValue::Text("Orthographic".into()))
            .field("Orthographic Size", FieldValue::Float(camera.fov())),
    };
    Some(
        section
            .field("Near Clip", FieldValue::Float(camera.near_clip()))
            .field("Far Clip", FieldValue::Float(camera.far_clip())),
    )
}

fn light_section(world: &World, entity: Entity) -> Option<InspectorSection> {
    let light = world.get_component::<LightComponent>(entity)?;
    let kind = light.light_type;
    Some(
        InspectorSection::new("Light", ComponentKind::LIGHT)
            .field("Light Type", FieldValue::Text(kind.label().into()))
            .field("Color", FieldValue::Color(Vec4::new(light.color.x, light.color.y, light.color.z, 1.0)))
            .field("Intensity", FieldValue::Float(light.intensity))
            .field_if(kind.has_range(), "Range", FieldValue::Float(light.range))
            .field_if(kind.has_attenuation(), "Attenuation", FieldValue::Float(light.attenuation)),
    )
}

fn mesh_section(world: &World, entity: Entity) -> Option<InspectorSection> {
    let mesh = world.get_component::<MeshComponent>(entity)?;
    Some(
        InspectorSection::new("Mesh", ComponentKind::MESH)
            .field("Mesh", FieldValue::Text(mesh.mesh_name().to_string()))
            .field("Primitive", FieldValue::Text(mesh.primitive.to_string()))
            .field("Triangles", FieldValue::Count(mesh.mesh.triangle_count()))
            .field("Draw AABB", FieldValue::Flag(mesh.draw_aabb)),
    )
}

fn material_section(world: &World, entity: Entity) -> Option<InspectorSection> {
    let material = &world.get_component::<MaterialComponent>(entity)?.material;
    let properties = &material.properties;
    let textures = &material.textures;
    Some(
        InspectorSection::new("Material", ComponentKind::MATERIAL)
            .field("Material", FieldValue::Text(material.name.clone()))
            .field("Albedo Color", FieldValue::Color(properties.color))
            .field("Albedo Texture", texture_name(textures.albedo.as_ref()))
            .field("Metallic", FieldValue::Float(properties.metallic))
            .field("Metallic Texture", texture_name(textures.metallic.as_ref()))
            .field("Roughness", FieldValue::Float(properties.roughness))
            .field("Roughness Texture", texture_name(textures.roughness.as_ref()))
            .field("Normal Texture", texture_name(textures.normal.as_ref()))
            .field("Emission", FieldValue::Vector(properties.emissive))
            .field("Emission Texture", texture_name(textures.emissive.as_ref()))
            .field("AO", FieldValue::Float(properties.ao))
            .field("AO Texture", texture_name(textures.ao.as_ref())),
    )
}

fn script_section(world: &World, entity: Entity) -> Option<InspectorSection> {
    let script = world.get_component::<ScriptComponent>(entity)?;
    Some(
        InspectorSection::new("Script", ComponentKind::SCRIPT)
            .field("Language", FieldValue::Text(script.language.label().into()))
            .field("Script Path", FieldValue::Text(script.path.display().to_string())),
    )
}

fn particle_section(world: &World, entity: Entity) -> Option<InspectorSection> {
    let emitter = world.get_component::<ParticleSystemComponent>(entity)?;
    let velocity = &emitter.velocity_range;
    let size = &emitter.size_range;
    let area = &emitter.emission_area;

    let section = InspectorSection::new("Particle System", ComponentKind::PARTICLE_SYSTEM)
        .field("Emitter Position", FieldValue::Vector(emitter.local_emitter_position))
        .field("Emission Rate", FieldValue::Float(emitter.emission_rate))
        .field("Particle Lifetime", FieldValue::Float(emitter.particle_lifetime))
        .field("Gravity", FieldValue::Vector(emitter.gravity))
        .field("Rotation", FieldValue::Float(emitter.rotation))
        .field("Particle Size", FieldValue::Float(emitter.particle_size))
        .field("Use Velocity Range", FieldValue::Flag(velocity.use_range))
        .field("Use Size Range", FieldValue::Flag(size.use_range))
        .field("Use Emission Area", FieldValue::Flag(area.use_emission_area))
        .field("Live Particle Count", FieldValue::Count(emitter.alive_count()))
        .field("Texture", texture_name(emitter.texture()))
        .field_if(velocity.use_range, "Min Velocity", FieldValue::Vector(velocity.min))
        .field_if(velocity.use_range, "Max Velocity", FieldValue::Vector(velocity.max))
        .field_if(velocity.use_range, "Change Interval", FieldValue::Float(emitter.velocity_change_interval))
        .field_if(size.use_range, "Min Size", FieldValue::Float(size.min))
        .field_if(size.use_range, "Max Size", FieldValue::Float(size.max))
        .field_if(size.use_range, "Size Change Interval", FieldValue::Float(emitter.size_change_interval))
        .field_if(size.use_range, "Repeat Size Interval", FieldValue::Flag(size.repeat_interval))
        .field_if(size.use_range, "Start with Min Size", FieldValue::Flag(size.start_with_min))
        .field_if(size.use_range, "Start with Max Size", FieldValue::Flag(size.start_with_max));

    let section = if area.use_emission_area {
        let section = section.field("Area Shape", FieldValue::Text(area.shape.label().into()));
        match area.shape {
            EmissionShape::Box => section.field("Size", FieldValue::Vector(area.size)),
            EmissionShape::Sphere => section.field("Radius", FieldValue::Float(area.size.x)),
            EmissionShape::Circle => {
                section.field("Radius (X,Z)", FieldValue::Vector(Vec3::new(area.size.x, 0.0, area.size.z)))
            }
        }
    } else {
        section
    };

    Some(
        section
            .field("Material", FieldValue::Text(emitter.material().name.clone()))
            .field("Mesh", FieldValue::Text(emitter.mesh().name.clone())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_engine::ecs::components::LightType;
    use kiln_engine::scene::EntityTemplate;

    fn section<'a>(sections: &'a [InspectorSection], title: &str) -> &'a InspectorSection {
        sections.iter().find(|s| s.title == title).unwrap()
    }

    #[test]
    fn test_camera_fields_follow_projection() {
        let mut scene = Scene::default();
        let entity = scene.create_from_template(EntityTemplate::Camera);

        let sections = inspect_entity(&scene, entity);
        let camera = section(&sections, "Camera");
        assert!(camera.has("Field of View"));
        assert!(!camera.has("Orthographic Size"));
        assert_eq!(camera.get("Near Clip"), Some(&FieldValue::Float(0.1)));

        scene
            .world_mut()
            .get_component_mut::<CameraComponent>(entity)
            .unwrap()
            .camera
            .camera
            .set_projection_type(ProjectionType::Orthographic);
        let sections = inspect_entity(&scene, entity);
        let camera = section(&sections, "Camera");
        assert!(camera.has("Orthographic Size"));
        assert!(!camera.has("Field of View"));
    }

    #[test]
    fn test_light_fields_follow_type() {
        let mut scene = Scene::default();
        let entity = scene.create_from_template(EntityTemplate::Light);
        let point = inspect_entity(&scene, entity);
        assert!(section(&point, "Light").has("Range"));
        assert!(section(&point, "Light").has("Attenuation"));

        scene.world_mut().get_component_mut::<LightComponent>(entity).unwrap().light_type = LightType::Spot;
        let spot = inspect_entity(&scene, entity);
        assert!(section(&spot, "Light").has("Range"));
        assert!(!section(&spot, "Light").has("Attenuation"));

        scene.world_mut().get_component_mut::<LightComponent>(entity).unwrap().light_type = LightType::Directional;
        let directional = inspect_entity(&scene, entity);
        assert!(!section(&directional, "Light").has("Range"));
    }

    #[test]
    fn test_sections_follow_component_order() {
        let mut scene = Scene::default();
        let entity = scene.create_from_template(EntityTemplate::Primitive);
        let titles: Vec<_> = inspect_entity(&scene, entity).iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Tag", "Transform", "Mesh", "Material"]);

        let sections = inspect_entity(&scene, entity);
        assert!(!section(&sections, "Transform").removable);
        assert!(section(&sections, "Mesh").removable);
        assert_eq!(section(&sections, "Mesh").get("Mesh"), Some(&FieldValue::Text("Cube".into())));
        assert_eq!(
            section(&sections, "Material").get("Albedo Texture"),
            Some(&FieldValue::Text("None".into()))
        );
    }

    #[test]
    fn test_particle_fields_expand_with_options() {
        let mut scene = Scene::default();
        let entity = scene.create_entity("Sparks");
        scene.add_component_kind(entity, ComponentKind::PARTICLE_SYSTEM).unwrap();

        let sections = inspect_entity(&scene, entity);
        let particles = section(&sections, "Particle System");
        assert_eq!(particles.get("Live Particle Count"), Some(&FieldValue::Count(0)));
        assert!(!particles.has("Min Velocity"));
        assert!(!particles.has("Area Shape"));
        assert_eq!(
            particles.get("Mesh"),
            Some(&FieldValue::Text(kiln_engine::assets::DEFAULT_QUAD_MESH.into()))
        );

        {
            let emitter = scene.world_mut().get_component_mut::<ParticleSystemComponent>(entity).unwrap();
            emitter.velocity_range.use_range = true;
            emitter.emission_area.use_emission_area = true;
            emitter.emission_area.shape = EmissionShape::Sphere;
        }
        let sections = inspect_entity(&scene, entity);
        let particles = section(&sections, "Particle System");
        assert!(particles.has("Min Velocity"));
        assert!(particles.has("Radius"));
        assert!(!particles.has("Size"));
    }

    #[test]
    fn test_display_formats_fields() {
        let section = InspectorSection::new("Light", ComponentKind::LIGHT).field("Intensity", FieldValue::Float(1.5));
        assert_eq!(section.to_string(), format!("[Light]\n  {:<22} 1.500\n", "Intensity"));
    }
}

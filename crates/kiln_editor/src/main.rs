//! Kiln headless editor
//!
//! Loads or builds a scene, steps it for a number of frames, then prints
//! the scene tree and the inspector of the primary camera.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use kiln_engine::config::Config;
use kiln_engine::core::config::EditorConfig;
use kiln_engine::ecs::components::{EmissionShape, MeshComponent, ParticleSystemComponent, TransformComponent};
use kiln_engine::foundation::logging;
use kiln_engine::foundation::math::Vec3;
use kiln_engine::input::InputState;
use kiln_engine::render::PrimitiveType;
use kiln_engine::scene::{ComponentKind, EntityTemplate, Scene, SceneError};

mod panels;
mod session;

use session::EditorSession;

const DEFAULT_FRAMES: u32 = 120;

fn main() -> Result<()> {
    let matches = Command::new("kiln_editor")
        .about("Headless Kiln scene editor")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Editor configuration (.toml or .ron)"),
        )
        .arg(
            Arg::new("scene")
                .short('s')
                .long("scene")
                .value_name("FILE")
                .help("Scene file to open"),
        )
        .arg(
            Arg::new("frames")
                .short('n')
                .long("frames")
                .value_name("N")
                .help("Number of frames to simulate")
                .value_parser(clap::value_parser!(u32))
                .default_value("120"),
        )
        .arg(
            Arg::new("save")
                .long("save")
                .value_name("FILE")
                .help("Save the scene as RON after simulating"),
        )
        .arg(
            Arg::new("demo")
                .long("demo")
                .help("Start from the demo scene instead of an empty one")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config = match matches.get_one::<String>("config") {
        Some(path) => EditorConfig::load_from_file(path).with_context(|| format!("Failed to load config {}", path))?,
        None => EditorConfig::default(),
    };
    config.validate().context("Invalid editor configuration")?;
    logging::init_with_level(&config.engine.log_level);

    let scene = if let Some(path) = matches.get_one::<String>("scene") {
        Scene::load_ron(path, &config.assets).with_context(|| format!("Failed to open scene {}", path))?
    } else if matches.get_flag("demo") {
        demo_scene().context("Failed to build the demo scene")?
    } else {
        Scene::new("Untitled")
    };

    let mut session = EditorSession::new(&config, scene).context("Failed to create the viewport")?;
    let frames = matches.get_one::<u32>("frames").copied().unwrap_or(DEFAULT_FRAMES);
    let input = InputState::new();
    let mut last = None;
    for _ in 0..frames {
        last = Some(session.step(config.engine.fixed_delta, &input));
    }
    if let Some(stats) = last {
        log::info!(
            "Simulated {} frames: {} entities, {} particles, {} billboard draws",
            stats.frame,
            stats.entities,
            stats.particles,
            stats.billboard_draws
        );
    }

    print_tree(&mut session);

    if let Some(path) = matches.get_one::<String>("save") {
        let path = PathBuf::from(path);
        session
            .scene()
            .save_ron(&path)
            .with_context(|| format!("Failed to save scene to {}", path.display()))?;
        println!("Saved scene to {}", path.display());
    }
    Ok(())
}

fn print_tree(session: &mut EditorSession) {
    let (scene, panel) = session.scene_and_panel();
    println!("Scene '{}'", scene.name());
    for row in panel.rows(scene) {
        let marker = if row.has_children { "v" } else { "-" };
        println!("{}{} {}", "  ".repeat(row.depth), marker, row.name);
    }

    match scene.primary_camera() {
        Some(camera) => {
            panel.select(camera);
            println!();
            for section in panel.inspect(scene) {
                print!("{}", section);
            }
        }
        None => println!("\nNo primary camera"),
    }
}

/// Camera, a lit crate and an ember emitter parented to the crate
fn demo_scene() -> Result<Scene, SceneError> {
    let mut scene = Scene::new("Demo");

    let camera = scene.create_from_template(EntityTemplate::Camera);
    set_position(&mut scene, camera, Vec3::new(0.0, 2.0, 8.0));

    let crate_entity = scene.create_from_template(EntityTemplate::Primitive);
    scene.rename(crate_entity, "Crate")?;

    let ball = scene.create_from_template(EntityTemplate::Primitive);
    scene.rename(ball, "Ball")?;
    if let Some(mesh) = scene.registry_mut().primitive_mesh(PrimitiveType::Sphere) {
        scene
            .world_mut()
            .add_component(ball, MeshComponent::new(PrimitiveType::Sphere, mesh));
    }
    set_position(&mut scene, ball, Vec3::new(2.5, 0.5, 0.0));

    let light = scene.create_from_template(EntityTemplate::Light);
    set_position(&mut scene, light, Vec3::new(0.0, 3.0, 0.0));
    scene.reparent(light, Some(crate_entity))?;

    let embers = scene.create_entity("Embers");
    scene.add_component_kind(embers, ComponentKind::PARTICLE_SYSTEM)?;
    if let Some(emitter) = scene.world_mut().get_component_mut::<ParticleSystemComponent>(embers) {
        emitter.local_emitter_position = Vec3::new(0.0, 0.6, 0.0);
        emitter.gravity = Vec3::new(0.0, -0.5, 0.0);
        emitter.particle_lifetime = 2.0;
        emitter.velocity_range.use_range = true;
        emitter.emission_area.use_emission_area = true;
        emitter.emission_area.shape = EmissionShape::Circle;
        emitter.set_emission_shape_size(Vec3::new(0.4, 0.0, 0.4));
        emitter.size_range.use_range = true;
        emitter.set_size_range_min(0.1);
        emitter.set_size_range_max(0.3);
    }
    scene.reparent(embers, Some(crate_entity))?;

    Ok(scene)
}

fn set_position(scene: &mut Scene, entity: kiln_engine::ecs::Entity, position: Vec3) {
    if let Some(transform) = scene.world_mut().get_component_mut::<TransformComponent>(entity) {
        transform.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_scene_layout() {
        let scene = demo_scene().unwrap();
        assert_eq!(scene.entity_count(), 5);
        assert_eq!(scene.roots().len(), 3);
        let crate_entity = scene.find_by_name("crate")[0];
        assert_eq!(scene.children(crate_entity).len(), 2);
        assert!(scene.primary_camera().is_some());

        let ball = scene.find_by_name("ball")[0];
        let mesh = scene.world().get_component::<MeshComponent>(ball).unwrap();
        assert_eq!(mesh.primitive, PrimitiveType::Sphere);
    }

    #[test]
    fn test_demo_scene_saves_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.ron");
        demo_scene().unwrap().save_ron(&path).unwrap();

        let config = EditorConfig::default();
        let loaded = Scene::load_ron(&path, &config.assets).unwrap();
        assert_eq!(loaded.entity_count(), 5);
        let embers = loaded.find_by_name("embers")[0];
        let emitter = loaded.world().get_component::<ParticleSystemComponent>(embers).unwrap();
        assert_eq!(emitter.emission_area.shape, EmissionShape::Circle);
        assert!(emitter.size_range.use_range);
    }
}

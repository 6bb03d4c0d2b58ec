//! End-to-end field lifecycle against a bare scene

use rand::rngs::StdRng;
use rand::SeedableRng;
use sward_grass::attributes::{
    HALF_ROOT_ANGLE_ATTRIBUTE, INDEX_ATTRIBUTE, NARROW_SCALE, OFFSET_ATTRIBUTE, SCALE_ATTRIBUTE,
    WIDE_SCALE,
};
use sward_grass::{FieldConfig, FieldOptions, VegetationField, FIELD_NODE};
use sward_scene::{QueuedTextureLoader, SceneGraph, SceneNode};
use sward_terrain::DEFAULT_CLEARANCE;

fn small_field(enabled: bool) -> VegetationField {
    let mut loader = QueuedTextureLoader::new();
    let options = FieldOptions {
        instance_count: 3,
        field_size: 10.0,
        enabled,
        ..FieldOptions::default()
    };
    VegetationField::with_rng(options, &mut loader, Box::new(StdRng::seed_from_u64(2024)))
}

#[test]
fn three_blades_on_placeholder_ground() {
    let mut scene = SceneGraph::new();
    let mut field = small_field(true);

    field.refresh(&mut scene);

    assert_eq!(scene.count_named(FIELD_NODE), 1);

    let geometry = field.geometry();
    let offsets = geometry.attribute(OFFSET_ATTRIBUTE).unwrap();
    assert_eq!(offsets.data.len(), 9);
    for offset in offsets.data.chunks_exact(3) {
        assert_eq!(offset[1], DEFAULT_CLEARANCE);
        assert!(offset[0] >= -5.0 && offset[0] < 4.0);
        assert!(offset[2] >= -5.0 && offset[2] < 4.0);
    }

    let scales = &geometry.attribute(SCALE_ATTRIBUTE).unwrap().data;
    assert_eq!(scales.len(), 3);
    assert!(NARROW_SCALE.contains(&scales[0]));
    assert!(WIDE_SCALE.contains(&scales[1]));
    assert!(WIDE_SCALE.contains(&scales[2]));

    assert_eq!(geometry.attribute(HALF_ROOT_ANGLE_ATTRIBUTE).unwrap().data.len(), 6);
    let index = &geometry.attribute(INDEX_ATTRIBUTE).unwrap().data;
    assert_eq!(index.len(), 3);
    assert!((index[1] - 1.0 / 3.0).abs() < 1e-6);

    let bounds = geometry.bounding_box.unwrap();
    assert!(!bounds.is_empty());
    assert!(geometry.bounding_sphere.unwrap().radius > 0.0);
}

#[test]
fn second_add_to_scene_leaves_one_mesh() {
    let mut scene = SceneGraph::new();
    let mut field = small_field(true);

    field.add_to_scene(&mut scene);
    field.add_to_scene(&mut scene);

    assert_eq!(scene.count_named(FIELD_NODE), 1);
    assert_eq!(field.regenerations(), 2);
}

#[test]
fn set_size_counts_regenerations() {
    let mut scene = SceneGraph::new();
    let mut field = small_field(true);
    field.refresh(&mut scene);
    let before = field.regenerations();

    field.set_size(&mut scene, 10.0);
    assert_eq!(field.regenerations(), before);

    field.set_size(&mut scene, 25.0);
    assert_eq!(field.regenerations(), before + 1);
}

#[test]
fn disabling_detaches_without_regenerating() {
    let mut scene = SceneGraph::new();
    scene.add(SceneNode::group("environment"));
    let mut field = small_field(true);

    field.refresh(&mut scene);
    assert_eq!(field.regenerations(), 1);
    assert_eq!(scene.len(), 2);

    field.set_enabled(false);
    field.refresh(&mut scene);
    assert_eq!(scene.count_named(FIELD_NODE), 0);
    assert_eq!(field.regenerations(), 1);
    assert_eq!(scene.len(), 1);

    // Re-enabling attaches a fresh mesh
    field.set_enabled(true);
    field.refresh(&mut scene);
    assert_eq!(scene.count_named(FIELD_NODE), 1);
    assert_eq!(field.regenerations(), 2);
}

#[test]
fn field_from_toml_config() {
    let config = FieldConfig::from_toml_str(
        r#"
[field]
instance_count = 40
size = 64.0
enabled = true
seed = 3
clearance = 0.5
"#,
    )
    .unwrap();

    let mut loader = QueuedTextureLoader::new();
    let mut field = VegetationField::new(config.into_options(), &mut loader);
    let mut scene = SceneGraph::new();
    field.refresh(&mut scene);

    let geometry = field.geometry();
    assert_eq!(geometry.instance_count(), 40);
    let offsets = &geometry.attribute(OFFSET_ATTRIBUTE).unwrap().data;
    assert!(offsets.chunks_exact(3).all(|o| o[1] == 0.5));
}

//! A grass field attached to one terrain tile

use glam::Vec3;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use sward_core::NodeId;
use sward_runtime::GameClock;
use sward_scene::{
    InstancedGeometry, InstancedMesh, SceneGraph, SceneNode, ShaderMaterial, TextureLoader,
};
use sward_terrain::{
    find_terrain_mesh, HeightSampler, MeshTerrain, TerrainProvider, DEFAULT_CLEARANCE,
};

use crate::attributes::generate_instances;
use crate::blade::{BladeParams, BladeTemplate};
use crate::material::{grass_material, LightingParams, TexturePaths, TIME_UNIFORM};

/// Scene node name of the field mesh
pub const FIELD_NODE: &str = "grass";

const DEFAULT_FIELD_SIZE: f32 = 10000.0;

/// Construction settings for a [`VegetationField`]
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOptions {
    /// Fixed for the lifetime of the field
    pub instance_count: usize,
    pub field_size: f32,
    pub enabled: bool,
    /// Seed for placement; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Lift above the sampled ground height
    pub clearance: f32,
    pub blade: BladeParams,
    pub lighting: LightingParams,
    pub textures: TexturePaths,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            instance_count: 1000,
            field_size: DEFAULT_FIELD_SIZE,
            enabled: false,
            seed: None,
            clearance: DEFAULT_CLEARANCE,
            blade: BladeParams::default(),
            lighting: LightingParams::default(),
            textures: TexturePaths::default(),
        }
    }
}

/// Thousands of instanced grass blades over one terrain tile.
///
/// The field is detached until the first enabled `refresh`, which attaches
/// a single instanced mesh named [`FIELD_NODE`]. Disabling it and
/// refreshing again detaches the mesh. The scene is passed into each call;
/// the field only remembers the id of the node it added.
pub struct VegetationField {
    instance_count: usize,
    field_size: f32,
    enabled: bool,
    clearance: f32,
    template: BladeTemplate,
    geometry: Rc<RefCell<InstancedGeometry>>,
    material: Rc<RefCell<ShaderMaterial>>,
    mesh: Option<NodeId>,
    clock: GameClock,
    rng: Box<dyn RngCore>,
    terrain: Option<Box<dyn TerrainProvider>>,
    regenerations: u64,
}

impl VegetationField {
    pub fn new(options: FieldOptions, textures: &mut dyn TextureLoader) -> Self {
        let rng: Box<dyn RngCore> = match options.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(StdRng::from_entropy()),
        };
        Self::with_rng(options, textures, rng)
    }

    /// Build with an explicit random source (ignores `options.seed`)
    pub fn with_rng(
        options: FieldOptions,
        textures: &mut dyn TextureLoader,
        rng: Box<dyn RngCore>,
    ) -> Self {
        let field_size = if options.field_size.is_finite() && options.field_size > 0.0 {
            options.field_size
        } else {
            warn!(
                "[grass] invalid field size {}, using {}",
                options.field_size, DEFAULT_FIELD_SIZE
            );
            DEFAULT_FIELD_SIZE
        };

        let template = BladeTemplate::build(&options.blade);
        let geometry = InstancedGeometry::new(Rc::clone(template.geometry()));
        let material = grass_material(field_size, &options.lighting, &options.textures, textures);

        info!(
            "[grass] field created: {} blades over {} units ({} vertices per blade)",
            options.instance_count,
            field_size,
            template.geometry().vertex_count()
        );

        Self {
            instance_count: options.instance_count,
            field_size,
            enabled: options.enabled,
            clearance: options.clearance,
            template,
            geometry: Rc::new(RefCell::new(geometry)),
            material: Rc::new(RefCell::new(material)),
            mesh: None,
            clock: GameClock::new(),
            rng,
            terrain: None,
            regenerations: 0,
        }
    }

    /// Sample heights from `provider` instead of looking the terrain mesh up
    /// in the scene
    pub fn with_terrain(mut self, provider: Box<dyn TerrainProvider>) -> Self {
        self.terrain = Some(provider);
        self
    }

    /// Per-frame update using wall-clock time
    pub fn refresh(&mut self, scene: &mut SceneGraph) {
        if self.sync_attachment(scene) {
            self.clock.tick();
            self.write_time();
        }
    }

    /// Per-frame update with an explicit frame delta in seconds
    pub fn advance(&mut self, scene: &mut SceneGraph, dt: f64) {
        if self.sync_attachment(scene) {
            self.clock.advance(dt);
            self.write_time();
        }
    }

    /// Detach when disabled, attach when enabled and not yet in the scene.
    /// Returns whether the field is live afterwards.
    fn sync_attachment(&mut self, scene: &mut SceneGraph) -> bool {
        if !self.enabled {
            self.destroy(scene);
            return false;
        }
        if !self.is_attached(scene) {
            self.add_to_scene(scene);
        }
        true
    }

    fn write_time(&mut self) {
        let elapsed = self.clock.elapsed();
        let mut material = self.material.borrow_mut();
        material.set_float(TIME_UNIFORM, elapsed);
        material.uniforms_need_update = true;
    }

    /// Regenerate placement and add a fresh mesh node, replacing any
    /// existing field mesh.
    pub fn add_to_scene(&mut self, scene: &mut SceneGraph) {
        if scene.remove_by_name(FIELD_NODE).is_some() {
            debug!("[grass] replaced existing '{}' node", FIELD_NODE);
        }
        // The name lookup may have hit a foreign node ahead of ours
        if let Some(stale) = self.mesh.take() {
            scene.remove(stale);
        }

        self.regenerate(scene);

        let mesh = InstancedMesh {
            geometry: Rc::clone(&self.geometry),
            material: Rc::clone(&self.material),
        };
        let node = SceneNode::instanced(FIELD_NODE, mesh)
            .with_cast_shadow(true)
            .with_position(self.mesh_position());
        let id = scene.add(node);
        self.mesh = Some(id);

        debug!("[grass] attached {} as {}", FIELD_NODE, id);
    }

    /// Change the tile size. Regenerates placement only when the size
    /// actually changes; the template and material are left alone.
    pub fn set_size(&mut self, scene: &mut SceneGraph, size: f32) {
        if !size.is_finite() || size <= 0.0 {
            warn!("[grass] ignoring field size {}", size);
            return;
        }
        if size == self.field_size {
            return;
        }

        self.field_size = size;
        self.regenerate(scene);

        let position = self.mesh_position();
        if let Some(node) = self.mesh.and_then(|id| scene.get_mut(id)) {
            node.position = position;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Takes effect on the next refresh
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        self.enabled = enabled;
        self.enabled
    }

    /// Remove the attached mesh, if any
    pub fn destroy(&mut self, scene: &mut SceneGraph) {
        if let Some(id) = self.mesh.take() {
            if scene.remove(id).is_some() {
                debug!("[grass] detached {}", id);
            }
        }
    }

    fn is_attached(&self, scene: &SceneGraph) -> bool {
        self.mesh.is_some_and(|id| scene.contains(id))
    }

    fn mesh_position(&self) -> Vec3 {
        Vec3::new(self.field_size / 2.0, 0.0, self.field_size / 2.0)
    }

    /// Rebuild all four instance attributes and the bounds in place
    fn regenerate(&mut self, scene: &SceneGraph) {
        let scene_terrain = match self.terrain {
            Some(_) => None,
            None => find_terrain_mesh(scene).map(MeshTerrain::from_geometry),
        };
        let provider: Option<&dyn TerrainProvider> = match (&self.terrain, &scene_terrain) {
            (Some(terrain), _) => Some(terrain.as_ref()),
            (None, Some(mesh)) => Some(mesh),
            (None, None) => None,
        };

        let sampler = HeightSampler::new(provider).with_clearance(self.clearance);
        if sampler.is_placeholder() {
            warn!(
                "[grass] no terrain heights available, placing blades at {}",
                sampler.placeholder_height()
            );
        }

        let buffers = generate_instances(
            self.instance_count,
            self.field_size,
            &sampler,
            &self.template,
            &mut *self.rng,
        );
        buffers.apply_to(&mut self.geometry.borrow_mut());
        self.regenerations += 1;

        debug!(
            "[grass] regenerated {} instances (size {}, pass {})",
            buffers.len(),
            self.field_size,
            self.regenerations
        );
    }

    pub fn instance_count(&self) -> usize {
        self.instance_count
    }

    pub fn field_size(&self) -> f32 {
        self.field_size
    }

    pub fn template(&self) -> &BladeTemplate {
        &self.template
    }

    pub fn geometry(&self) -> Ref<'_, InstancedGeometry> {
        self.geometry.borrow()
    }

    pub fn material(&self) -> Ref<'_, ShaderMaterial> {
        self.material.borrow()
    }

    /// Id of the attached mesh node
    pub fn mesh_id(&self) -> Option<NodeId> {
        self.mesh
    }

    /// How many times placement has been regenerated
    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }

    /// Seconds of animation time accumulated while live
    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }
}

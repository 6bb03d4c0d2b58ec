//! The grass shader material and its lighting inputs

use glam::Vec3;
use serde::{Deserialize, Serialize};
use sward_scene::{ShaderMaterial, ShaderProgram, TextureLoader, Uniform};

/// Uniform updated every frame with elapsed seconds
pub const TIME_UNIFORM: &str = "time";

/// Terrain subdivisions per tile side the `delta` uniform is derived from
const GROUND_RESOLUTION: f32 = 64.0;

const GRASS_SHADER: &str = include_str!("grass_shader.wgsl");

/// Sun placement and the lighting terms fed to the blade shader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingParams {
    /// Sun elevation in radians
    pub elevation: f32,
    /// Sun azimuth in radians
    pub azimuth: f32,
    pub camera_position: [f32; 3],
    pub ambient_strength: f32,
    pub translucency_strength: f32,
    pub diffuse_strength: f32,
    pub specular_strength: f32,
    pub shininess: f32,
    pub light_colour: [f32; 3],
    pub specular_colour: [f32; 3],
    /// Per-axis noise frequency for sway variation
    pub noise_scale: [f32; 3],
}

impl Default for LightingParams {
    fn default() -> Self {
        Self {
            elevation: 0.2,
            azimuth: 0.4,
            camera_position: [0.0, 50.0, 0.0],
            ambient_strength: 0.7,
            translucency_strength: 1.5,
            diffuse_strength: 1.5,
            specular_strength: 0.5,
            shininess: 256.0,
            light_colour: [1.0, 1.0, 1.0],
            specular_colour: [1.0, 1.0, 1.0],
            noise_scale: [0.01, 0.01, 0.01],
        }
    }
}

impl LightingParams {
    /// Unit vector towards the sun
    pub fn sun_direction(&self) -> Vec3 {
        Vec3::new(self.azimuth.sin(), self.elevation.sin(), -self.azimuth.cos())
    }
}

/// Blade texture locations handed to the texture loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TexturePaths {
    pub diffuse: String,
    pub alpha: String,
}

impl Default for TexturePaths {
    fn default() -> Self {
        Self {
            diffuse: "/assets/grass/blade_diffuse.jpg".into(),
            alpha: "/assets/grass/blade_alpha.jpg".into(),
        }
    }
}

/// The bundled WGSL program
pub fn grass_program() -> ShaderProgram {
    ShaderProgram {
        label: "Grass Shader".into(),
        source: GRASS_SHADER.into(),
        vertex_entry: "vs_main".into(),
        fragment_entry: "fs_main".into(),
    }
}

/// Build the double-sided grass material.
///
/// Texture loads are started here and resolve later; the material is
/// usable right away and draws with placeholder textures until then.
pub fn grass_material(
    field_size: f32,
    lighting: &LightingParams,
    textures: &TexturePaths,
    loader: &mut dyn TextureLoader,
) -> ShaderMaterial {
    let map = loader.load(&textures.diffuse);
    let alpha_map = loader.load(&textures.alpha);

    let mut material = ShaderMaterial::new(grass_program())
        .with_uniform(TIME_UNIFORM, Uniform::Float(0.0))
        .with_uniform("delta", Uniform::Float(field_size / GROUND_RESOLUTION))
        .with_uniform("posX", Uniform::Float(lighting.noise_scale[0]))
        .with_uniform("posY", Uniform::Float(lighting.noise_scale[1]))
        .with_uniform("posZ", Uniform::Float(lighting.noise_scale[2]))
        .with_uniform("width", Uniform::Float(field_size))
        .with_uniform("map", Uniform::Texture(map))
        .with_uniform("alphaMap", Uniform::Texture(alpha_map))
        .with_uniform("sunDirection", Uniform::Vec3(lighting.sun_direction()))
        .with_uniform(
            "cameraPosition",
            Uniform::Vec3(Vec3::from_array(lighting.camera_position)),
        )
        .with_uniform("ambientStrength", Uniform::Float(lighting.ambient_strength))
        .with_uniform(
            "translucencyStrength",
            Uniform::Float(lighting.translucency_strength),
        )
        .with_uniform("diffuseStrength", Uniform::Float(lighting.diffuse_strength))
        .with_uniform("specularStrength", Uniform::Float(lighting.specular_strength))
        .with_uniform("shininess", Uniform::Float(lighting.shininess))
        .with_uniform(
            "lightColour",
            Uniform::Vec3(Vec3::from_array(lighting.light_colour)),
        )
        .with_uniform(
            "specularColour",
            Uniform::Vec3(Vec3::from_array(lighting.specular_colour)),
        );
    material.double_sided = true;
    material
}

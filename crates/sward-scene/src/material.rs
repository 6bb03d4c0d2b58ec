//! Shader materials, named uniforms and deferred texture slots

use glam::Vec3;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Opaque handle to a texture owned by the external asset loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Load state of a requested texture
#[derive(Debug, Clone, PartialEq)]
pub enum TextureState {
    /// Requested, not yet delivered. The renderer binds a placeholder.
    Pending,
    Ready(TextureHandle),
    Failed(String),
}

/// A shared slot that the asset loader fills once a texture resolves.
///
/// Materials keep a clone of the slot, so they pick up the texture on the
/// first frame after it arrives without being rebuilt.
#[derive(Debug, Clone)]
pub struct TextureSlot {
    path: String,
    state: Rc<RefCell<TextureState>>,
}

impl TextureSlot {
    pub fn pending(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state: Rc::new(RefCell::new(TextureState::Pending)),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> TextureState {
        self.state.borrow().clone()
    }

    /// The resolved handle, if the texture has arrived
    pub fn handle(&self) -> Option<TextureHandle> {
        match *self.state.borrow() {
            TextureState::Ready(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.handle().is_some()
    }

    pub fn resolve(&self, handle: TextureHandle) {
        *self.state.borrow_mut() = TextureState::Ready(handle);
    }

    pub fn fail(&self, reason: impl Into<String>) {
        *self.state.borrow_mut() = TextureState::Failed(reason.into());
    }
}

/// Asynchronous texture source. `load` must return immediately; the slot
/// resolves later.
pub trait TextureLoader {
    fn load(&mut self, path: &str) -> TextureSlot;
}

/// Loader that records requests and resolves them when the host says so.
///
/// Repeated requests for the same path share a single slot.
#[derive(Debug, Default)]
pub struct QueuedTextureLoader {
    slots: HashMap<String, TextureSlot>,
    next_handle: u64,
}

impl QueuedTextureLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths requested but not yet resolved
    pub fn pending(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .slots
            .values()
            .filter(|s| s.state() == TextureState::Pending)
            .map(TextureSlot::path)
            .collect();
        paths.sort_unstable();
        paths
    }

    /// Mark `path` as loaded, handing out a fresh handle. Returns `None` if
    /// the path was never requested.
    pub fn complete(&mut self, path: &str) -> Option<TextureHandle> {
        let slot = self.slots.get(path)?;
        self.next_handle += 1;
        let handle = TextureHandle(self.next_handle);
        slot.resolve(handle);
        Some(handle)
    }

    /// Resolve every outstanding request
    pub fn complete_all(&mut self) {
        let pending: Vec<String> = self.pending().into_iter().map(str::to_string).collect();
        for path in pending {
            self.complete(&path);
        }
    }
}

impl TextureLoader for QueuedTextureLoader {
    fn load(&mut self, path: &str) -> TextureSlot {
        self.slots
            .entry(path.to_string())
            .or_insert_with(|| TextureSlot::pending(path))
            .clone()
    }
}

/// Value bound to a named shader input
#[derive(Debug, Clone)]
pub enum Uniform {
    Float(f32),
    Vec3(Vec3),
    Texture(TextureSlot),
}

impl Uniform {
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Uniform::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            Uniform::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_texture(&self) -> Option<&TextureSlot> {
        match self {
            Uniform::Texture(slot) => Some(slot),
            _ => None,
        }
    }
}

/// Pre-built shader program, opaque to this crate
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderProgram {
    pub label: String,
    pub source: String,
    pub vertex_entry: String,
    pub fragment_entry: String,
}

/// A shader program plus its named uniform values
#[derive(Debug, Clone)]
pub struct ShaderMaterial {
    pub program: ShaderProgram,
    uniforms: BTreeMap<String, Uniform>,
    pub double_sided: bool,
    /// Set when uniform values changed and need re-upload; the renderer clears it
    pub uniforms_need_update: bool,
}

impl ShaderMaterial {
    pub fn new(program: ShaderProgram) -> Self {
        Self {
            program,
            uniforms: BTreeMap::new(),
            double_sided: false,
            uniforms_need_update: true,
        }
    }

    pub fn with_uniform(mut self, name: impl Into<String>, value: Uniform) -> Self {
        self.uniforms.insert(name.into(), value);
        self
    }

    pub fn uniform(&self, name: &str) -> Option<&Uniform> {
        self.uniforms.get(name)
    }

    pub fn uniforms(&self) -> impl Iterator<Item = (&str, &Uniform)> {
        self.uniforms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overwrite a float uniform and flag the material dirty.
    /// Returns false if no float uniform with that name exists.
    pub fn set_float(&mut self, name: &str, value: f32) -> bool {
        match self.uniforms.get_mut(name) {
            Some(Uniform::Float(v)) => {
                *v = value;
                self.uniforms_need_update = true;
                true
            }
            _ => false,
        }
    }

    /// True once every texture uniform has resolved
    pub fn textures_ready(&self) -> bool {
        self.uniforms
            .values()
            .filter_map(Uniform::as_texture)
            .all(TextureSlot::is_ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program() -> ShaderProgram {
        ShaderProgram {
            label: "test".into(),
            source: String::new(),
            vertex_entry: "vs_main".into(),
            fragment_entry: "fs_main".into(),
        }
    }

    #[test]
    fn set_float_marks_dirty() {
        let mut mat = ShaderMaterial::new(program()).with_uniform("time", Uniform::Float(0.0));
        mat.uniforms_need_update = false;

        assert!(mat.set_float("time", 1.5));
        assert!(mat.uniforms_need_update);
        assert_eq!(mat.uniform("time").and_then(Uniform::as_float), Some(1.5));

        assert!(!mat.set_float("missing", 1.0));
    }

    #[test]
    fn material_sees_texture_after_loader_completes() {
        let mut loader = QueuedTextureLoader::new();
        let mat = ShaderMaterial::new(program())
            .with_uniform("map", Uniform::Texture(loader.load("diffuse.jpg")))
            .with_uniform("alphaMap", Uniform::Texture(loader.load("alpha.jpg")));

        assert!(!mat.textures_ready());
        assert_eq!(loader.pending(), vec!["alpha.jpg", "diffuse.jpg"]);

        loader.complete("diffuse.jpg");
        assert!(!mat.textures_ready());

        loader.complete_all();
        assert!(mat.textures_ready());
        assert!(loader.pending().is_empty());
    }

    #[test]
    fn repeated_load_shares_slot() {
        let mut loader = QueuedTextureLoader::new();
        let a = loader.load("blade.jpg");
        let b = loader.load("blade.jpg");
        let handle = loader.complete("blade.jpg");
        assert_eq!(a.handle(), handle);
        assert_eq!(b.handle(), handle);
        assert!(loader.complete("never-requested.jpg").is_none());
    }

    #[test]
    fn failed_slot_is_not_ready() {
        let slot = TextureSlot::pending("x.jpg");
        slot.fail("404");
        assert!(!slot.is_ready());
        assert_eq!(slot.state(), TextureState::Failed("404".into()));
    }
}

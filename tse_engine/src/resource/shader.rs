/// Multi-stage shader program with reflection and hot-reload.
///
/// Sources live in `<root>/<name>/` with one file per stage (`vert.glsl`,
/// `ctrl.glsl`, `eval.glsl`, `geom.glsl`, `comp.glsl`, `frag.glsl`), a local
/// include `incl.glsl`, and a shared include `<root>/includes/commondf.glsl`.
/// Each stage is compiled from:
///
/// ```text
/// #version 460
/// #define <STAGE>_SHADER 1
/// <shared include>
/// <local include>
/// <stage file>
/// ```
///
/// Loading is all-or-nothing: any compile or link failure tears every stage
/// down and leaves the program handle invalid (0), which makes `apply` a no-op.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::{engine_debug, engine_error, engine_info, engine_warn};
use crate::graphics_device::{
    GraphicsDevice, ProgramHandle, ShaderStage, ShaderStageHandle, VarType,
};
use super::dir_watcher::DirWatcher;
use super::resource_manager::{Resource, ResourceManager};

// ===== SHARED INCLUDE CACHE =====

/// Shared include text, read once per path for the whole process
static COMMON_INCLUDES: OnceLock<Mutex<FxHashMap<PathBuf, String>>> = OnceLock::new();

fn common_include(path: &Path) -> String {
    let cache = COMMON_INCLUDES.get_or_init(|| Mutex::new(FxHashMap::default()));
    let Ok(mut cache) = cache.lock() else {
        return std::fs::read_to_string(path).unwrap_or_default();
    };
    cache
        .entry(path.to_path_buf())
        .or_insert_with(|| match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => {
                engine_debug!("tse::Shader", "No shared include at '{}'", path.display());
                String::new()
            }
        })
        .clone()
}

/// Assemble the full source of one stage
pub fn assemble_stage_source(stage: ShaderStage, common: &str, local: &str, body: &str) -> String {
    format!(
        "#version 460\n#define {} 1\n{}\n{}\n{}",
        stage.define(),
        common,
        local,
        body
    )
}

// ===== REFLECTION ENTRIES =====

/// Reflected attribute or uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderVariable {
    pub var_type: VarType,
    pub location: i32,
}

/// Reflected shader-storage block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderBlock {
    pub index: u32,
    pub binding: u32,
}

// ===== SHADER =====

pub struct Shader {
    name: String,
    folder: PathBuf,
    common_include_path: PathBuf,
    program: ProgramHandle,
    stages: Vec<ShaderStageHandle>,
    attributes: FxHashMap<String, ShaderVariable>,
    uniforms: FxHashMap<String, ShaderVariable>,
    storage_blocks: FxHashMap<String, ShaderBlock>,
    watcher: DirWatcher,
    watch: bool,
    generation: u64,
}

impl Shader {
    /// Describe a shader `name` under `root` without loading it
    pub fn new(name: &str, root: &Path, watch: bool) -> Self {
        Self {
            name: name.to_string(),
            folder: root.join(name),
            common_include_path: root.join("includes").join("commondf.glsl"),
            program: ProgramHandle::INVALID,
            stages: Vec::new(),
            attributes: FxHashMap::default(),
            uniforms: FxHashMap::default(),
            storage_blocks: FxHashMap::default(),
            watcher: DirWatcher::new(),
            watch,
            generation: 0,
        }
    }

    /// Compile, link and reflect, then (re)start watching the folder
    ///
    /// Returns true when a valid program was produced.
    pub fn load(&mut self, device: &mut dyn GraphicsDevice) -> bool {
        self.release(device);
        match self.build(device) {
            Ok(()) => {
                self.generation += 1;
                engine_info!("tse::Shader", "Shader '{}' loaded ({} stage(s))", self.name, self.stages.len());
            }
            Err(e) => {
                engine_error!("tse::Shader", "Shader '{}' not loaded: {}", self.name, e);
                self.release(device);
            }
        }

        if self.watch {
            if let Err(e) = self.watcher.start(&self.folder) {
                engine_warn!("tse::Shader", "Hot-reload disabled for '{}': {}", self.name, e);
            }
        }
        self.program.is_valid()
    }

    fn build(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        let common = common_include(&self.common_include_path);
        let local = std::fs::read_to_string(self.folder.join("incl.glsl")).unwrap_or_default();

        for stage in ShaderStage::ALL {
            let path = self.folder.join(stage.file_name());
            let body = std::fs::read_to_string(&path).unwrap_or_default();
            if body.trim().is_empty() {
                if stage.is_required() {
                    return Err(Error::ShaderError(format!(
                        "required stage {:?} missing ('{}')",
                        stage,
                        path.display()
                    )));
                }
                continue;
            }

            let source = assemble_stage_source(stage, &common, &local, &body);
            let handle = device
                .compile_stage(stage, &source)
                .map_err(|e| Error::ShaderError(format!("{:?} stage: {}", stage, e)))?;
            self.stages.push(handle);
        }

        self.program = device.link_program(&self.stages)?;
        self.reflect(device);
        Ok(())
    }

    fn reflect(&mut self, device: &mut dyn GraphicsDevice) {
        let reflection = device.reflect_program(self.program);

        self.attributes = reflection
            .attributes
            .into_iter()
            .map(|v| (v.name, ShaderVariable { var_type: v.var_type, location: v.location }))
            .collect();
        self.uniforms = reflection
            .uniforms
            .into_iter()
            .map(|v| (v.name, ShaderVariable { var_type: v.var_type, location: v.location }))
            .collect();
        self.storage_blocks = reflection
            .storage_blocks
            .into_iter()
            .map(|b| (b.name, ShaderBlock { index: b.index, binding: b.binding }))
            .collect();
    }

    /// Delete the program and all stages, clear reflection
    fn release(&mut self, device: &mut dyn GraphicsDevice) {
        for stage in self.stages.drain(..) {
            device.delete_stage(stage);
        }
        if self.program.is_valid() {
            device.delete_program(self.program);
        }
        self.program = ProgramHandle::INVALID;
        self.attributes.clear();
        self.uniforms.clear();
        self.storage_blocks.clear();
    }

    /// Reload when the watched folder changed since the last call
    ///
    /// Returns true when a reload happened.
    pub fn update(&mut self, device: &mut dyn GraphicsDevice) -> bool {
        if !self.watcher.poll() {
            return false;
        }
        engine_info!("tse::Shader", "Reloading shader '{}'", self.name);
        self.free(device);
        self.load(device);
        true
    }

    /// Bind the program (no-op when invalid) and return its handle
    pub fn apply(&self, device: &mut dyn GraphicsDevice) -> ProgramHandle {
        if self.program.is_valid() {
            device.use_program(self.program);
        }
        self.program
    }

    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    pub fn is_valid(&self) -> bool {
        self.program.is_valid()
    }

    /// Bumped on every successful load; layouts bound against an older
    /// generation are stale
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn attribute(&self, name: &str) -> Option<&ShaderVariable> {
        self.attributes.get(name)
    }

    pub fn uniform(&self, name: &str) -> Option<&ShaderVariable> {
        self.uniforms.get(name)
    }

    pub fn storage_block(&self, name: &str) -> Option<&ShaderBlock> {
        self.storage_blocks.get(name)
    }

    pub fn attributes(&self) -> &FxHashMap<String, ShaderVariable> {
        &self.attributes
    }

    pub fn uniforms(&self) -> &FxHashMap<String, ShaderVariable> {
        &self.uniforms
    }

    pub fn storage_blocks(&self) -> &FxHashMap<String, ShaderBlock> {
        &self.storage_blocks
    }

    #[cfg(test)]
    pub(crate) fn watcher(&self) -> &DirWatcher {
        &self.watcher
    }
}

impl Resource for Shader {
    fn name(&self) -> &str {
        &self.name
    }

    fn free(&mut self, device: &mut dyn GraphicsDevice) {
        self.watcher.stop();
        self.release(device);
    }
}

// ===== SHADER MANAGER =====

impl ResourceManager<Shader, String> {
    /// Poll every shader for hot-reload. Returns the number reloaded.
    pub fn update_all(&mut self, device: &mut dyn GraphicsDevice) -> usize {
        let mut reloaded = 0;
        for (_, shader) in self.iter_mut() {
            if shader.update(device) {
                reloaded += 1;
            }
        }
        reloaded
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;

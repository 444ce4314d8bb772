//! Shader module loading and caching.
//!
//! Each pipeline's module is assembled from a list of WGSL files that are
//! concatenated in order (shared declarations first). Sources come from the
//! copies embedded at build time, or from a shader directory when one is
//! configured, in which case every file must exist there.

use log::{debug, info};
use std::{collections::HashMap, path::PathBuf, sync::Arc};
use thiserror::Error;
use wgpu::{ShaderModuleDescriptor, ShaderSource};

/// Files making up the terrain shader.
pub const TERRAIN_SHADER: &[&str] = &["common.wgsl", "heightfield.wgsl", "terrain.wgsl"];
/// Files making up the sky shader.
pub const SKY_SHADER: &[&str] = &["common.wgsl", "sky.wgsl"];
/// Files making up the water shader.
pub const OCEAN_SHADER: &[&str] = &["common.wgsl", "heightfield.wgsl", "ocean.wgsl"];

const EMBEDDED_SOURCES: &[(&str, &str)] = &[
    ("common.wgsl", include_str!("shaders/common.wgsl")),
    ("heightfield.wgsl", include_str!("shaders/heightfield.wgsl")),
    ("terrain.wgsl", include_str!("shaders/terrain.wgsl")),
    ("sky.wgsl", include_str!("shaders/sky.wgsl")),
    ("ocean.wgsl", include_str!("shaders/ocean.wgsl")),
];

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("shader file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read shader file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("no embedded shader source named '{name}'")]
    UnknownSource { name: String },
}

/// Registry of compiled shader modules.
pub struct ShaderLibrary {
    modules: HashMap<String, Arc<wgpu::ShaderModule>>,
    shader_dir: Option<PathBuf>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
            shader_dir: None,
        }
    }

    /// Read `.wgsl` files from `dir` instead of the embedded copies.
    pub fn with_shader_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.shader_dir = Some(dir.into());
        self
    }

    /// Compile a module from a WGSL source string and cache it under `name`.
    pub fn load_from_source(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        source: &str,
    ) -> Arc<wgpu::ShaderModule> {
        debug!("Compiling shader '{}' ({} bytes)", name, source.len());

        let module = Arc::new(device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        }));

        if self.modules.insert(name.to_string(), module.clone()).is_some() {
            info!("Replaced shader '{}'", name);
        } else {
            info!("Loaded shader '{}'", name);
        }
        module
    }

    /// Concatenate `files` and compile the result as `name`.
    pub fn load_composed(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        files: &[&str],
    ) -> Result<Arc<wgpu::ShaderModule>, ShaderError> {
        let source = self.compose(files)?;
        Ok(self.load_from_source(device, name, &source))
    }

    /// Source text of `files` joined in order.
    pub fn compose(&self, files: &[&str]) -> Result<String, ShaderError> {
        let mut source = String::new();
        for file in files {
            source.push_str(&self.read_source(file)?);
            source.push('\n');
        }
        Ok(source)
    }

    fn read_source(&self, filename: &str) -> Result<String, ShaderError> {
        match &self.shader_dir {
            Some(dir) => {
                let path = dir.join(filename);
                debug!("Reading shader source {:?}", path);
                if !path.exists() {
                    return Err(ShaderError::FileNotFound { path });
                }
                Ok(std::fs::read_to_string(&path)?)
            }
            None => EMBEDDED_SOURCES
                .iter()
                .find(|(name, _)| *name == filename)
                .map(|(_, source)| (*source).to_string())
                .ok_or_else(|| ShaderError::UnknownSource {
                    name: filename.to_string(),
                }),
        }
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for ShaderLibrary {
    fn default() -> Self {
        Self::new()
    }
}

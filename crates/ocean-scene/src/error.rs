use std::path::PathBuf;

/// Rejected parameter changes. The scene is left untouched when one is returned.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("unknown terrain preset {id} (have {count})")]
    UnknownPreset { id: usize, count: usize },

    #[error("unknown skybox preset {id} (have {count})")]
    UnknownSkybox { id: usize, count: usize },

    #[error("wave index {index} out of range (have {count})")]
    WaveIndex { index: usize, count: usize },
}

/// Failures while building skybox cube faces.
#[derive(Debug, thiserror::Error)]
pub enum SkyboxError {
    #[error("skybox face missing: {}", path.display())]
    MissingFace { path: PathBuf },

    #[error("failed to load skybox face {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("skybox face {} is {width}x{height}, expected {expected}x{expected}", path.display())]
    FaceSize {
        path: PathBuf,
        width: u32,
        height: u32,
        expected: u32,
    },
}

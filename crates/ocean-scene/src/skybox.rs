//! CPU-side skybox cube faces.
//!
//! Faces are stored in array-layer order +X, -X, +Y, -Y, +Z, -Z as tightly
//! packed RGBA8 (sRGB) rows.

use std::path::Path;

use glam::Vec3;

use crate::{SkyboxError, SkyboxPreset};

/// File stems of the six faces inside a skybox directory.
pub const CUBE_FACE_NAMES: [&str; 6] = ["px", "nx", "py", "ny", "pz", "nz"];

/// World direction through texel coordinate `(u, v)` in `[0, 1]` of `face`.
///
/// Follows the usual cubemap layout where `v` grows downward on the side
/// faces and toward +Z on the top face.
pub fn cube_face_direction(face: usize, u: f32, v: f32) -> Vec3 {
    let s = u * 2.0 - 1.0;
    let t = v * 2.0 - 1.0;
    let dir = match face {
        0 => Vec3::new(1.0, -t, -s),
        1 => Vec3::new(-1.0, -t, s),
        2 => Vec3::new(s, 1.0, t),
        3 => Vec3::new(s, -1.0, -t),
        4 => Vec3::new(s, -t, 1.0),
        _ => Vec3::new(-s, -t, -1.0),
    };
    dir.normalize()
}

/// Six square RGBA8 faces ready for upload.
#[derive(Debug, Clone)]
pub struct SkyboxFaces {
    pub face_size: u32,
    pub faces: [Vec<u8>; 6],
}

impl SkyboxFaces {
    /// Paints a vertical gradient with a sun disc.
    pub fn procedural(preset: &SkyboxPreset, face_size: u32) -> Self {
        let face_size = face_size.max(1);
        let zenith = Vec3::from(preset.zenith);
        let horizon = Vec3::from(preset.horizon);
        let ground = Vec3::from(preset.ground);
        let sun_dir = Vec3::from(preset.sun_direction).try_normalize().unwrap_or(Vec3::Y);
        let sun_color = Vec3::from(preset.sun_color);
        let sun_cos = preset.sun_radius.cos();
        let glow_cos = (preset.sun_radius * 4.0).cos();

        let faces = std::array::from_fn(|face| {
            let mut data = Vec::with_capacity((face_size * face_size * 4) as usize);
            for y in 0..face_size {
                for x in 0..face_size {
                    let u = (x as f32 + 0.5) / face_size as f32;
                    let v = (y as f32 + 0.5) / face_size as f32;
                    let dir = cube_face_direction(face, u, v);

                    let mut color = if dir.y >= 0.0 {
                        horizon.lerp(zenith, dir.y.sqrt())
                    } else {
                        horizon.lerp(ground, (-dir.y).sqrt())
                    };

                    if preset.sun_radius > 0.0 {
                        let c = dir.dot(sun_dir);
                        if c >= sun_cos {
                            color = sun_color;
                        } else if c > glow_cos {
                            let glow = (c - glow_cos) / (sun_cos - glow_cos);
                            color = color.lerp(sun_color, glow * glow * 0.5);
                        }
                    }

                    let c = color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
                    data.extend_from_slice(&[c.x.round() as u8, c.y.round() as u8, c.z.round() as u8, 255]);
                }
            }
            data
        });

        Self { face_size, faces }
    }

    /// Loads `<dir>/{px,nx,py,ny,pz,nz}.png`. Every face must exist and be
    /// square with the same size as the first.
    pub fn load_dir(dir: &Path) -> Result<Self, SkyboxError> {
        let mut face_size = 0;
        let mut faces: [Vec<u8>; 6] = Default::default();

        for (i, name) in CUBE_FACE_NAMES.iter().enumerate() {
            let path = dir.join(format!("{name}.png"));
            if !path.exists() {
                return Err(SkyboxError::MissingFace { path });
            }
            let img = image::open(&path)
                .map_err(|source| SkyboxError::Image {
                    path: path.clone(),
                    source,
                })?
                .to_rgba8();
            let (width, height) = img.dimensions();
            if i == 0 {
                face_size = width;
            }
            if width != height || width != face_size {
                return Err(SkyboxError::FaceSize {
                    path,
                    width,
                    height,
                    expected: face_size,
                });
            }
            faces[i] = img.into_raw();
        }

        Ok(Self { face_size, faces })
    }

    /// RGBA of texel `(x, y)` on `face`.
    pub fn texel(&self, face: usize, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.face_size + x) * 4) as usize;
        let f = &self.faces[face];
        [f[i], f[i + 1], f[i + 2], f[i + 3]]
    }
}

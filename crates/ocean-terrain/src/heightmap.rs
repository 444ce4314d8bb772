//! Heightmap storage and generation.
//!
//! Raw samples are kept in `[-0.5, 0.5]`; scale and offset are applied by the
//! sampler so presets can reuse one map with different relief.

use std::path::{Path, PathBuf};

use noise::{NoiseFn, Perlin};

/// Errors raised while building a heightmap.
#[derive(Debug, thiserror::Error)]
pub enum HeightmapError {
    #[error("heightmap dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("heightmap data has {actual} samples, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("failed to load heightmap image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Multi-octave fBm over Perlin noise.
#[derive(Clone, Debug, PartialEq)]
pub struct FbmParams {
    pub seed: u32,
    pub octaves: u32,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Noise-space units covered by the whole map.
    pub frequency: f64,
    /// Noise-space offset, lets one seed produce distinct neighbouring maps.
    pub offset: [f64; 2],
}

impl Default for FbmParams {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 8,
            lacunarity: 1.9,
            persistence: 0.5,
            frequency: 1.0,
            offset: [0.0, 0.0],
        }
    }
}

impl FbmParams {
    /// Sum of all octave amplitudes, used to normalise the fBm to `[-1, 1]`.
    pub fn max_amplitude(&self) -> f64 {
        let mut sum = 0.0;
        let mut amp = 1.0;
        for _ in 0..self.octaves {
            sum += amp;
            amp *= self.persistence;
        }
        sum
    }
}

/// Row-major grid of height samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Heightmap {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl Heightmap {
    /// Wraps existing samples (row `j` starts at `j * width`).
    pub fn from_raw(width: u32, height: u32, values: Vec<f32>) -> Result<Self, HeightmapError> {
        if width == 0 || height == 0 {
            return Err(HeightmapError::ZeroDimensions { width, height });
        }
        let expected = width as usize * height as usize;
        if values.len() != expected {
            return Err(HeightmapError::SizeMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// A map of zeros.
    pub fn flat(width: u32, height: u32) -> Result<Self, HeightmapError> {
        Self::from_raw(width, height, vec![0.0; width as usize * height as usize])
    }

    /// Generates a map from fBm noise. Texel `(i, j)` samples noise at
    /// `((i / (w-1) + offset.x) * frequency, (j / (h-1) + offset.y) * frequency)`.
    pub fn from_fbm(width: u32, height: u32, params: &FbmParams) -> Result<Self, HeightmapError> {
        if width == 0 || height == 0 {
            return Err(HeightmapError::ZeroDimensions { width, height });
        }
        let noise = Perlin::new(params.seed);
        let norm = params.max_amplitude().max(f64::EPSILON);
        let step_x = 1.0 / (width.max(2) - 1) as f64;
        let step_y = 1.0 / (height.max(2) - 1) as f64;

        let mut values = Vec::with_capacity(width as usize * height as usize);
        for j in 0..height {
            for i in 0..width {
                let x = (i as f64 * step_x + params.offset[0]) * params.frequency;
                let y = (j as f64 * step_y + params.offset[1]) * params.frequency;

                let mut total = 0.0;
                let mut frequency = 1.0;
                let mut amplitude = 1.0;
                for _ in 0..params.octaves {
                    total += noise.get([x * frequency, y * frequency]) * amplitude;
                    frequency *= params.lacunarity;
                    amplitude *= params.persistence;
                }

                values.push(((total / norm) * 0.5).clamp(-0.5, 0.5) as f32);
            }
        }

        Self::from_raw(width, height, values)
    }

    /// Loads a grayscale image; black maps to -0.5 and white to 0.5.
    pub fn from_image(path: &Path) -> Result<Self, HeightmapError> {
        let img = image::open(path).map_err(|source| HeightmapError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        let luma = img.to_luma16();
        let (width, height) = luma.dimensions();
        let values = luma
            .pixels()
            .map(|p| p.0[0] as f32 / u16::MAX as f32 - 0.5)
            .collect();
        Self::from_raw(width, height, values)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Sample at integer texel coordinates, clamped to the edge.
    pub fn texel(&self, i: i64, j: i64) -> f32 {
        let x = i.clamp(0, self.width as i64 - 1) as usize;
        let y = j.clamp(0, self.height as i64 - 1) as usize;
        self.values[y * self.width as usize + x]
    }

    /// Bilinear sample at UV where `(0,0)` and `(1,1)` hit the corner texel centres.
    pub fn sample_bilinear(&self, u: f32, v: f32) -> f32 {
        let tx = u * (self.width - 1) as f32;
        let ty = v * (self.height - 1) as f32;
        let x0 = tx.floor();
        let y0 = ty.floor();
        let fx = tx - x0;
        let fy = ty - y0;
        let (i, j) = (x0 as i64, y0 as i64);

        let h00 = self.texel(i, j);
        let h10 = self.texel(i + 1, j);
        let h01 = self.texel(i, j + 1);
        let h11 = self.texel(i + 1, j + 1);

        let top = h00 + (h10 - h00) * fx;
        let bottom = h01 + (h11 - h01) * fx;
        top + (bottom - top) * fy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fbm_values_stay_in_half_range() {
        let map = Heightmap::from_fbm(65, 65, &FbmParams::default()).unwrap();
        assert!(map.values().iter().all(|v| (-0.5..=0.5).contains(v)));
    }

    #[test]
    fn test_fbm_is_deterministic() {
        let params = FbmParams {
            seed: 42,
            offset: [-1.0, 0.0],
            ..Default::default()
        };
        let a = Heightmap::from_fbm(33, 33, &params).unwrap();
        let b = Heightmap::from_fbm(33, 33, &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fbm_offset_changes_map() {
        let a = Heightmap::from_fbm(33, 33, &FbmParams::default()).unwrap();
        let b = Heightmap::from_fbm(
            33,
            33,
            &FbmParams {
                offset: [0.37, 0.61],
                ..Default::default()
            },
        )
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let err = Heightmap::from_fbm(0, 16, &FbmParams::default()).unwrap_err();
        assert!(matches!(err, HeightmapError::ZeroDimensions { width: 0, .. }));
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let err = Heightmap::from_raw(4, 4, vec![0.0; 15]).unwrap_err();
        assert!(matches!(
            err,
            HeightmapError::SizeMismatch {
                expected: 16,
                actual: 15
            }
        ));
    }

    #[test]
    fn test_texel_clamps_to_edge() {
        let map = Heightmap::from_raw(2, 2, vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_eq!(map.texel(-5, -5), 0.1);
        assert_eq!(map.texel(9, 0), 0.2);
        assert_eq!(map.texel(9, 9), 0.4);
    }

    #[test]
    fn test_bilinear_hits_texels_and_midpoints() {
        let map = Heightmap::from_raw(3, 1, vec![0.0, 0.4, -0.2]).unwrap();
        assert_eq!(map.sample_bilinear(0.0, 0.0), 0.0);
        assert!((map.sample_bilinear(0.5, 0.0) - 0.4).abs() < 1e-6);
        assert!((map.sample_bilinear(0.25, 0.0) - 0.2).abs() < 1e-6);
        assert!((map.sample_bilinear(1.0, 0.0) + 0.2).abs() < 1e-6);
        // no wrap past the far edge
        assert!((map.sample_bilinear(1.5, 0.0) + 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_image_roundtrip_maps_luma() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ramp.png");
        let img = image::GrayImage::from_fn(3, 1, |x, _| image::Luma([[0u8, 255, 128][x as usize]]));
        img.save(&path).unwrap();

        let map = Heightmap::from_image(&path).unwrap();
        assert_eq!((map.width(), map.height()), (3, 1));
        assert!((map.texel(0, 0) + 0.5).abs() < 1e-4);
        assert!((map.texel(1, 0) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_missing_image_is_an_error() {
        let err = Heightmap::from_image(Path::new("/nonexistent/heightmap.png")).unwrap_err();
        assert!(matches!(err, HeightmapError::Image { .. }));
    }
}

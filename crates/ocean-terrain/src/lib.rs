//! Terrain for the ocean demo.
//!
//! A heightmap texel grid is stretched over a world-space rectangle and
//! sampled with clamp-to-edge bilinear filtering. The same mapping drives the
//! terrain vertex shader, the coast mask of the ocean waves and any CPU-side
//! height queries, so all three agree on where the shoreline is.

mod bounds;
mod grid;
mod heightmap;
mod sampler;
mod tiles;

pub use bounds::HeightfieldBounds;
pub use grid::{GridMesh, GridVertex};
pub use heightmap::{FbmParams, Heightmap, HeightmapError};
pub use sampler::{HeightSample, HeightfieldParams, HeightfieldSampler};
pub use tiles::{TERRAIN_TILES, TILE_SCALE, TilePlacement};

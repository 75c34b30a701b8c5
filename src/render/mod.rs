//! World rendering: meshes, the rasterizer seam and per-player views

pub mod mesh;
pub mod raster;
pub mod scene;

pub use mesh::Mesh;
pub use raster::SoftwareRasterizer;
pub use scene::SceneRenderer;

use crate::util::math::{Mat4, Vec3};

/// Fixed capture resolution
pub const FRAME_WIDTH: u32 = 640;
pub const FRAME_HEIGHT: u32 = 480;

/// Drawing backend. Receives "draw mesh X with transform M and colour C"
/// and hands back the finished colour buffer.
pub trait Rasterizer {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Clear colour and depth for a new view
    fn begin_frame(&mut self, clear: Vec3);

    /// Draw `mesh` transformed by `view_projection * model`, tinted by `color`
    fn draw_mesh(&mut self, mesh: &Mesh, model: &Mat4, view_projection: &Mat4, color: Vec3);

    /// Tightly packed RGB8 rows, bottom row first
    fn read_pixels(&self) -> Result<Vec<u8>, RenderError>;
}

/// Renderer setup and readback errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("Mesh has {positions} positions but {colors} colors")]
    AttributeMismatch { positions: usize, colors: usize },

    #[error("Mesh index count {0} is not a multiple of 3")]
    PartialTriangle(usize),

    #[error("Mesh index {index} out of range for {vertices} vertices")]
    IndexOutOfRange { index: u32, vertices: usize },

    #[error("Readback failed: {0}")]
    Readback(String),
}

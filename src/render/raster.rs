//! CPU rasterizer with a depth buffer and GL-style conventions
//!
//! Clip space follows OpenGL: visible depth is `-w <= z <= w`, window
//! coordinates have their origin at the bottom-left, and the colour buffer is
//! stored bottom row first, exactly what a GL readback would return.

use nalgebra::Vector4;

use crate::util::math::{Mat4, Vec3};

use super::{Mesh, Rasterizer, RenderError};

/// Vertex after the vertex stage, before the perspective divide
#[derive(Debug, Clone, Copy)]
struct ClipVertex {
    position: Vector4<f32>,
    color: Vec3,
}

impl ClipVertex {
    fn lerp(&self, other: &ClipVertex, t: f32) -> ClipVertex {
        ClipVertex {
            position: self.position.lerp(&other.position, t),
            color: self.color.lerp(&other.color, t),
        }
    }

    /// Signed distance to the near plane (positive inside)
    fn near_distance(&self) -> f32 {
        self.position.z + self.position.w
    }
}

/// Vertex in window space, carrying 1/w for perspective-correct shading
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
    inv_w: f32,
    color_over_w: Vec3,
}

/// Software implementation of [`Rasterizer`]
pub struct SoftwareRasterizer {
    width: u32,
    height: u32,
    color: Vec<u8>,
    depth: Vec<f32>,
}

impl SoftwareRasterizer {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidViewport { width, height });
        }
        let pixels = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            color: vec![0; pixels * 3],
            depth: vec![1.0; pixels],
        })
    }

    /// Colour at window coordinates (origin bottom-left)
    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        [self.color[i], self.color[i + 1], self.color[i + 2]]
    }

    /// Sutherland-Hodgman against the near plane. A triangle becomes at most
    /// a quad; returns the vertex count written into `out`.
    fn clip_near(input: &[ClipVertex; 3], out: &mut [ClipVertex; 4]) -> usize {
        let mut count = 0;
        for i in 0..3 {
            let a = &input[i];
            let b = &input[(i + 1) % 3];
            let da = a.near_distance();
            let db = b.near_distance();

            if da >= 0.0 {
                out[count] = *a;
                count += 1;
            }
            if (da >= 0.0) != (db >= 0.0) {
                out[count] = a.lerp(b, da / (da - db));
                count += 1;
            }
        }
        count
    }

    fn to_screen(&self, v: &ClipVertex) -> ScreenVertex {
        let inv_w = 1.0 / v.position.w;
        let ndc_x = v.position.x * inv_w;
        let ndc_y = v.position.y * inv_w;
        let ndc_z = v.position.z * inv_w;
        ScreenVertex {
            x: (ndc_x + 1.0) * 0.5 * self.width as f32,
            y: (ndc_y + 1.0) * 0.5 * self.height as f32,
            depth: ndc_z * 0.5 + 0.5,
            inv_w,
            color_over_w: v.color * inv_w,
        }
    }

    fn fill_triangle(&mut self, v0: &ScreenVertex, v1: &ScreenVertex, v2: &ScreenVertex) {
        let area = edge(v0.x, v0.y, v1.x, v1.y, v2.x, v2.y);
        if area.abs() < f32::EPSILON {
            return;
        }

        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;
        let min_px = v0.x.min(v1.x).min(v2.x).floor().clamp(0.0, max_x) as u32;
        let max_px = v0.x.max(v1.x).max(v2.x).ceil().clamp(0.0, max_x) as u32;
        let min_py = v0.y.min(v1.y).min(v2.y).floor().clamp(0.0, max_y) as u32;
        let max_py = v0.y.max(v1.y).max(v2.y).ceil().clamp(0.0, max_y) as u32;

        for py in min_py..=max_py {
            let cy = py as f32 + 0.5;
            for px in min_px..=max_px {
                let cx = px as f32 + 0.5;

                // Normalised barycentrics; dividing by the signed area makes
                // both windings positive inside
                let b0 = edge(v1.x, v1.y, v2.x, v2.y, cx, cy) / area;
                let b1 = edge(v2.x, v2.y, v0.x, v0.y, cx, cy) / area;
                let b2 = edge(v0.x, v0.y, v1.x, v1.y, cx, cy) / area;
                if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                    continue;
                }

                let depth = b0 * v0.depth + b1 * v1.depth + b2 * v2.depth;
                if !(0.0..=1.0).contains(&depth) {
                    continue;
                }

                let idx = py as usize * self.width as usize + px as usize;
                if depth >= self.depth[idx] {
                    continue;
                }
                self.depth[idx] = depth;

                let inv_w = b0 * v0.inv_w + b1 * v1.inv_w + b2 * v2.inv_w;
                let color = (v0.color_over_w * b0 + v1.color_over_w * b1 + v2.color_over_w * b2) / inv_w;

                let out = idx * 3;
                self.color[out] = to_byte(color.x);
                self.color[out + 1] = to_byte(color.y);
                self.color[out + 2] = to_byte(color.z);
            }
        }
    }
}

impl Rasterizer for SoftwareRasterizer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn begin_frame(&mut self, clear: Vec3) {
        let rgb = [to_byte(clear.x), to_byte(clear.y), to_byte(clear.z)];
        for pixel in self.color.chunks_exact_mut(3) {
            pixel.copy_from_slice(&rgb);
        }
        self.depth.fill(1.0);
    }

    fn draw_mesh(&mut self, mesh: &Mesh, model: &Mat4, view_projection: &Mat4, color: Vec3) {
        let mvp = view_projection * model;
        let clip: Vec<ClipVertex> = mesh
            .positions()
            .iter()
            .zip(mesh.colors())
            .map(|(p, c)| ClipVertex {
                position: mvp * Vector4::new(p.x, p.y, p.z, 1.0),
                color: c.component_mul(&color),
            })
            .collect();

        let mut polygon = [ClipVertex {
            position: Vector4::zeros(),
            color: Vec3::zeros(),
        }; 4];
        for tri in mesh.indices().chunks_exact(3) {
            let corners = [
                clip[tri[0] as usize],
                clip[tri[1] as usize],
                clip[tri[2] as usize],
            ];
            let count = Self::clip_near(&corners, &mut polygon);
            if count < 3 {
                continue;
            }

            let first = self.to_screen(&polygon[0]);
            for i in 1..count - 1 {
                let b = self.to_screen(&polygon[i]);
                let c = self.to_screen(&polygon[i + 1]);
                self.fill_triangle(&first, &b, &c);
            }
        }
    }

    fn read_pixels(&self) -> Result<Vec<u8>, RenderError> {
        Ok(self.color.clone())
    }
}

/// Twice the signed area of (a, b, c)
fn edge(ax: f32, ay: f32, bx: f32, by: f32, cx: f32, cy: f32) -> f32 {
    (bx - ax) * (cy - ay) - (by - ay) * (cx - ax)
}

fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::math::Point3;

    fn camera() -> Mat4 {
        let view = Mat4::look_at_rh(
            &Point3::new(0.0, 0.0, 5.0),
            &Point3::new(0.0, 0.0, 0.0),
            &Vec3::y(),
        );
        let projection = Mat4::new_perspective(4.0 / 3.0, 60f32.to_radians(), 0.1, 200.0);
        projection * view
    }

    fn white_quad() -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
            ],
            vec![Vec3::new(1.0, 1.0, 1.0); 4],
            vec![0, 1, 2, 2, 3, 0],
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_viewport() {
        assert!(SoftwareRasterizer::new(0, 480).is_err());
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut raster = SoftwareRasterizer::new(8, 4).unwrap();
        raster.begin_frame(Vec3::new(0.0, 0.0, 1.0));
        let pixels = raster.read_pixels().unwrap();
        assert_eq!(pixels.len(), 8 * 4 * 3);
        assert!(pixels.chunks_exact(3).all(|p| p == [0, 0, 255]));
    }

    #[test]
    fn draws_tinted_quad_in_centre() {
        let mut raster = SoftwareRasterizer::new(64, 48).unwrap();
        raster.begin_frame(Vec3::zeros());
        raster.draw_mesh(&white_quad(), &Mat4::identity(), &camera(), Vec3::new(1.0, 0.0, 0.0));

        assert_eq!(raster.pixel(32, 24), [255, 0, 0]);
        assert_eq!(raster.pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn nearer_geometry_wins() {
        let mut raster = SoftwareRasterizer::new(64, 48).unwrap();
        raster.begin_frame(Vec3::zeros());
        let near = Mat4::new_translation(&Vec3::new(0.0, 0.0, 1.0));

        raster.draw_mesh(&white_quad(), &near, &camera(), Vec3::new(0.0, 1.0, 0.0));
        raster.draw_mesh(&white_quad(), &Mat4::identity(), &camera(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(raster.pixel(32, 24), [0, 255, 0]);
    }

    #[test]
    fn buffer_is_stored_bottom_row_first() {
        let mut raster = SoftwareRasterizer::new(64, 48).unwrap();
        raster.begin_frame(Vec3::zeros());
        // Quad pushed up so it only covers the top of the view
        let up = Mat4::new_translation(&Vec3::new(0.0, 2.0, 0.0));
        raster.draw_mesh(&white_quad(), &up, &camera(), Vec3::new(1.0, 1.0, 1.0));

        let pixels = raster.read_pixels().unwrap();
        let row = |y: usize| &pixels[y * 64 * 3..(y + 1) * 64 * 3];
        assert!(row(0).iter().all(|&b| b == 0));
        assert!(row(47).iter().any(|&b| b == 255));
    }

    #[test]
    fn geometry_behind_camera_is_clipped() {
        let mut raster = SoftwareRasterizer::new(64, 48).unwrap();
        raster.begin_frame(Vec3::zeros());
        let behind = Mat4::new_translation(&Vec3::new(0.0, 0.0, 10.0));
        raster.draw_mesh(&white_quad(), &behind, &camera(), Vec3::new(1.0, 1.0, 1.0));
        assert!(raster.read_pixels().unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn long_bar_through_near_plane_still_draws() {
        let mut raster = SoftwareRasterizer::new(64, 48).unwrap();
        raster.begin_frame(Vec3::zeros());
        let cube = Mesh::cube().unwrap();
        // Runs from behind the camera to far in front of it, below eye level
        let bar = Mat4::new_translation(&Vec3::new(0.0, -1.0, 0.0))
            * Mat4::new_nonuniform_scaling(&Vec3::new(0.5, 0.1, 100.0));
        raster.draw_mesh(&cube, &bar, &camera(), Vec3::new(1.0, 1.0, 1.0));
        assert!(raster.read_pixels().unwrap().iter().any(|&b| b > 0));
    }
}

//! Reusable indexed meshes with per-vertex colour

use std::f32::consts::PI;

use crate::util::math::Vec3;

use super::RenderError;

/// Indexed triangle list. Built once and drawn many times with different
/// model transforms; vertex data is never touched after construction.
#[derive(Debug, Clone)]
pub struct Mesh {
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
    indices: Vec<u32>,
}

impl Mesh {
    /// Validate and wrap vertex/index data
    pub fn new(positions: Vec<Vec3>, colors: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, RenderError> {
        if positions.len() != colors.len() {
            return Err(RenderError::AttributeMismatch {
                positions: positions.len(),
                colors: colors.len(),
            });
        }
        if indices.len() % 3 != 0 {
            return Err(RenderError::PartialTriangle(indices.len()));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(RenderError::IndexOutOfRange {
                index: bad,
                vertices: positions.len(),
            });
        }

        Ok(Self {
            positions,
            colors,
            indices,
        })
    }

    /// Unit cube centred on the origin with a distinct colour per corner
    pub fn cube() -> Result<Self, RenderError> {
        let positions = vec![
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
        ];
        let colors = vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.5, 0.5, 0.5),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 1, 2, 2, 3, 0,
            4, 5, 6, 6, 7, 4,
            0, 3, 7, 7, 4, 0,
            1, 2, 6, 6, 5, 1,
            3, 2, 6, 6, 7, 3,
            0, 1, 5, 5, 4, 0,
        ];

        Self::new(positions, colors, indices)
    }

    /// Unit-radius UV sphere, white, split into `rings` x `segments` quads
    pub fn uv_sphere(rings: u32, segments: u32) -> Result<Self, RenderError> {
        let mut positions = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
        for ring in 0..=rings {
            let phi = PI * ring as f32 / rings as f32;
            for segment in 0..=segments {
                let theta = 2.0 * PI * segment as f32 / segments as f32;
                positions.push(Vec3::new(
                    phi.sin() * theta.cos(),
                    phi.cos(),
                    phi.sin() * theta.sin(),
                ));
            }
        }
        let colors = vec![Vec3::new(1.0, 1.0, 1.0); positions.len()];

        let mut indices = Vec::with_capacity((rings * segments * 6) as usize);
        for ring in 0..rings {
            for segment in 0..segments {
                let current = ring * (segments + 1) + segment;
                let next = current + segments + 1;
                indices.extend_from_slice(&[current, next, current + 1]);
                indices.extend_from_slice(&[current + 1, next, next + 1]);
            }
        }

        Self::new(positions, colors, indices)
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_twelve_triangles() {
        let cube = Mesh::cube().unwrap();
        assert_eq!(cube.positions().len(), 8);
        assert_eq!(cube.indices().len(), 36);
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn sphere_layout() {
        let sphere = Mesh::uv_sphere(12, 12).unwrap();
        assert_eq!(sphere.positions().len(), 13 * 13);
        assert_eq!(sphere.indices().len(), 12 * 12 * 6);
        for p in sphere.positions() {
            assert!((p.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn rejects_bad_indices() {
        let err = Mesh::new(vec![Vec3::zeros(); 3], vec![Vec3::zeros(); 3], vec![0, 1, 3]).unwrap_err();
        assert!(matches!(err, RenderError::IndexOutOfRange { index: 3, vertices: 3 }));

        let err = Mesh::new(vec![Vec3::zeros(); 3], vec![Vec3::zeros(); 2], vec![0, 1, 2]).unwrap_err();
        assert!(matches!(err, RenderError::AttributeMismatch { .. }));

        let err = Mesh::new(vec![Vec3::zeros(); 3], vec![Vec3::zeros(); 3], vec![0, 1]).unwrap_err();
        assert!(matches!(err, RenderError::PartialTriangle(2)));
    }
}

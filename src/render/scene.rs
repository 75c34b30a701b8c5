//! Per-player chase views of the arena

use tracing::info;

use crate::game::{PlayerId, Projectile, Ship, World};
use crate::util::math::{Mat4, Point3, Vec3};

use super::{Mesh, Rasterizer, RenderError};

const CLEAR_COLOR: Vec3 = Vec3::new(0.0, 0.0, 0.05);
const GRID_COLOR: Vec3 = Vec3::new(0.1, 0.1, 0.2);
const COCKPIT_COLOR: Vec3 = Vec3::new(0.3, 0.7, 1.0);
const PROJECTILE_RADIUS: f32 = 0.2;
const SPHERE_RINGS: u32 = 12;
const SPHERE_SEGMENTS: u32 = 12;

/// Hull colour per player
pub fn ship_color(id: PlayerId) -> Vec3 {
    match id {
        PlayerId::One => Vec3::new(0.0, 1.0, 0.0),
        PlayerId::Two => Vec3::new(1.0, 0.0, 0.0),
    }
}

/// Shot colour per owner
pub fn projectile_color(owner: PlayerId) -> Vec3 {
    match owner {
        PlayerId::One => Vec3::new(0.0, 1.0, 0.5),
        PlayerId::Two => Vec3::new(1.0, 0.5, 0.0),
    }
}

/// Perspective camera pose
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Third-person camera behind and above `ship`, looking past its nose
    pub fn chase(ship: &Ship, aspect: f32) -> Self {
        let forward = ship.forward();
        let up = Vec3::y();
        Self {
            position: ship.position - forward * 5.0 + up * 2.0,
            target: ship.position + forward * 3.0,
            up,
            fov_y: 60f32.to_radians(),
            aspect,
            near: 0.1,
            far: 200.0,
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        )
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, self.fov_y, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

/// Draws the arena from any player's point of view using two shared meshes
pub struct SceneRenderer {
    cube: Mesh,
    sphere: Mesh,
}

impl SceneRenderer {
    /// Build the shared meshes. Failure here is fatal at startup.
    pub fn new() -> Result<Self, RenderError> {
        let renderer = Self {
            cube: Mesh::cube()?,
            sphere: Mesh::uv_sphere(SPHERE_RINGS, SPHERE_SEGMENTS)?,
        };
        info!(
            cube_triangles = renderer.cube.triangle_count(),
            sphere_triangles = renderer.sphere.triangle_count(),
            "Scene meshes ready"
        );
        Ok(renderer)
    }

    /// Render `viewer`'s chase view of `world` into `raster`
    pub fn render_view<R: Rasterizer + ?Sized>(&self, raster: &mut R, world: &World, viewer: PlayerId) {
        let aspect = raster.width() as f32 / raster.height() as f32;
        let camera = Camera::chase(world.ship(viewer), aspect);
        let view_projection = camera.view_projection();

        raster.begin_frame(CLEAR_COLOR);
        self.draw_grid(raster, &view_projection);

        for ship in world.ships().iter().filter(|s| s.alive) {
            self.draw_ship(raster, &view_projection, ship);
        }

        for projectile in world.projectiles() {
            self.draw_projectile(raster, &view_projection, projectile);
        }
    }

    /// Static reference bars on the floor below the arena
    fn draw_grid<R: Rasterizer + ?Sized>(&self, raster: &mut R, view_projection: &Mat4) {
        for step in (-50..=50).step_by(5) {
            let offset = step as f32;

            let along_z = model_matrix(
                Vec3::new(offset, -5.0, 0.0),
                Vec3::new(0.1, 0.1, 100.0),
                0.0,
                0.0,
            );
            raster.draw_mesh(&self.cube, &along_z, view_projection, GRID_COLOR);

            let along_x = model_matrix(
                Vec3::new(0.0, -5.0, offset),
                Vec3::new(100.0, 0.1, 0.1),
                0.0,
                0.0,
            );
            raster.draw_mesh(&self.cube, &along_x, view_projection, GRID_COLOR);
        }
    }

    /// Body, cockpit and wings, all sharing the ship's orientation
    fn draw_ship<R: Rasterizer + ?Sized>(&self, raster: &mut R, view_projection: &Mat4, ship: &Ship) {
        let color = ship_color(ship.id);
        let forward = ship.forward();

        let body = model_matrix(ship.position, Vec3::new(0.8, 0.4, 1.5), ship.yaw, ship.pitch);
        raster.draw_mesh(&self.cube, &body, view_projection, color);

        let cockpit = model_matrix(
            ship.position + forward * 0.3 + Vec3::y() * 0.3,
            Vec3::new(0.5, 0.3, 0.8),
            ship.yaw,
            ship.pitch,
        );
        raster.draw_mesh(&self.cube, &cockpit, view_projection, COCKPIT_COLOR);

        let wings = model_matrix(
            ship.position - forward * 0.3,
            Vec3::new(2.0, 0.1, 0.8),
            ship.yaw,
            ship.pitch,
        );
        raster.draw_mesh(&self.cube, &wings, view_projection, color * 0.7);
    }

    fn draw_projectile<R: Rasterizer + ?Sized>(&self, raster: &mut R, view_projection: &Mat4, projectile: &Projectile) {
        let model = Mat4::new_translation(&projectile.position) * Mat4::new_scaling(PROJECTILE_RADIUS);
        raster.draw_mesh(&self.sphere, &model, view_projection, projectile_color(projectile.owner));
    }

    /// Drop the shared meshes. Consuming `self` makes a second release
    /// impossible and keeps it after the last draw call.
    pub fn release(self) {
        info!("Scene meshes released");
    }
}

/// Scale, then yaw about Y, then pitch about X, then translate
fn model_matrix(position: Vec3, scale: Vec3, yaw: f32, pitch: f32) -> Mat4 {
    Mat4::new_translation(&position)
        * Mat4::from_axis_angle(&Vec3::x_axis(), pitch)
        * Mat4::from_axis_angle(&Vec3::y_axis(), yaw)
        * Mat4::new_nonuniform_scaling(&scale)
}

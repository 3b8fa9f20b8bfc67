//! Render-side surface mesh displaced by the simulation fields.

use std::io::{self, Write};

use bytemuck::{Pod, Zeroable};

use crate::controller::OceanSimulation;
use crate::error::SimulationError;

/// Vertex data for the surface mesh (position + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Flat (N+1) x (N+1) grid over one simulation patch.
///
/// The extra row and column duplicate the periodic seam so UVs reach 1.0;
/// seam vertices sample cell 0 again, which is what lets adjacent tiles of
/// the patch join without cracks.
pub struct SurfaceMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    grid_size: usize,
    spacing: f32,
}

impl SurfaceMesh {
    /// Builds the rest-state grid, centered on the origin in the XZ plane.
    pub fn new(grid_size: usize, domain_size: f32) -> Self {
        let spacing = domain_size / grid_size as f32;
        let half_size = domain_size / 2.0;

        let mut vertices = Vec::with_capacity((grid_size + 1) * (grid_size + 1));
        let mut indices = Vec::with_capacity(grid_size * grid_size * 6);

        // Generate flat XZ plane grid
        for z in 0..=grid_size {
            for x in 0..=grid_size {
                let x_pos = x as f32 * spacing - half_size;
                let z_pos = z as f32 * spacing - half_size;

                vertices.push(Vertex {
                    position: [x_pos, 0.0, z_pos],
                    uv: [x as f32 / grid_size as f32, z as f32 / grid_size as f32],
                });
            }
        }

        // Generate triangle indices (counter-clockwise winding)
        for z in 0..grid_size {
            for x in 0..grid_size {
                let top_left = (z * (grid_size + 1) + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * (grid_size + 1) + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Self {
            vertices,
            indices,
            grid_size,
            spacing,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Moves every vertex to the current simulated surface: height drives y,
    /// the horizontal displacement field drives x and z.
    ///
    /// Mesh and field share the cell spacing, so vertex (i, j) reads cell
    /// (i mod N, j mod N) directly with no interpolation; the modulo is what
    /// closes the periodic seam.
    pub fn displace(&mut self, sim: &OceanSimulation) -> Result<(), SimulationError> {
        let height = sim.height_field()?;
        let displacement = sim.displacement_field()?;
        let n = height.resolution();
        assert_eq!(self.grid_size, n, "mesh was built for a different grid");

        let half_size = self.grid_size as f32 * self.spacing / 2.0;
        for j in 0..=self.grid_size {
            let cell_z = j % n;
            for i in 0..=self.grid_size {
                let cell_x = i % n;
                let rest_x = i as f32 * self.spacing - half_size;
                let rest_z = j as f32 * self.spacing - half_size;

                let [dx, dz] = displacement.get(cell_x, cell_z);
                let vertex = &mut self.vertices[j * (self.grid_size + 1) + i];
                vertex.position = [rest_x + dx, height.get(cell_x, cell_z), rest_z + dz];
            }
        }
        Ok(())
    }

    /// Writes the mesh as Wavefront OBJ (positions, UVs, triangles).
    pub fn write_obj(&self, out: &mut impl Write) -> io::Result<()> {
        for v in &self.vertices {
            writeln!(
                out,
                "v {} {} {}",
                v.position[0], v.position[1], v.position[2]
            )?;
        }
        for v in &self.vertices {
            writeln!(out, "vt {} {}", v.uv[0], v.uv[1])?;
        }
        for tri in self.indices.chunks(3) {
            // OBJ indices are 1-based.
            writeln!(
                out,
                "f {0}/{0} {1}/{1} {2}/{2}",
                tri[0] + 1,
                tri[1] + 1,
                tri[2] + 1
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::OceanParameters;

    #[test]
    fn test_grid_dimensions() {
        let mesh = SurfaceMesh::new(8, 100.0);
        assert_eq!(mesh.vertex_count(), 81);
        assert_eq!(mesh.triangle_count(), 128);
        assert_eq!(mesh.indices.len(), 8 * 8 * 6);
    }

    #[test]
    fn test_grid_is_centered_with_unit_uvs() {
        let mesh = SurfaceMesh::new(8, 100.0);
        let first = &mesh.vertices[0];
        let last = &mesh.vertices[80];
        assert_eq!(first.position, [-50.0, 0.0, -50.0]);
        assert_eq!(last.position, [50.0, 0.0, 50.0]);
        assert_eq!(first.uv, [0.0, 0.0]);
        assert_eq!(last.uv, [1.0, 1.0]);
    }

    #[test]
    fn test_first_quad_winding() {
        let mesh = SurfaceMesh::new(4, 10.0);
        // Top-left quad splits into (tl, bl, tr) and (tr, bl, br).
        assert_eq!(&mesh.indices[0..6], &[0, 5, 1, 1, 5, 6]);
    }

    #[test]
    fn test_displace_applies_simulation_fields() {
        let mut sim = OceanSimulation::new();
        sim.initialize(OceanParameters {
            resolution: 8,
            domain_size: 100.0,
            wind_speed: 5.0,
            amplitude: 1e-3,
            ..Default::default()
        })
        .unwrap();
        sim.step(0.6).unwrap();

        let mut mesh = SurfaceMesh::new(8, 100.0);
        mesh.displace(&sim).unwrap();

        let height = sim.height_field().unwrap();
        let displacement = sim.displacement_field().unwrap();

        let v = &mesh.vertices[0];
        let [dx, dz] = displacement.get(0, 0);
        assert!((v.position[0] - (-50.0 + dx)).abs() < 1e-5);
        assert!((v.position[1] - height.get(0, 0)).abs() < 1e-6);
        assert!((v.position[2] - (-50.0 + dz)).abs() < 1e-5);

        // The seam vertex re-samples cell 0 at the far edge.
        let seam = &mesh.vertices[8];
        assert!((seam.position[1] - height.get(0, 0)).abs() < 1e-6);
        assert!((seam.position[0] - (50.0 + dx)).abs() < 1e-5);
    }

    #[test]
    fn test_displace_requires_initialized_sim() {
        let sim = OceanSimulation::new();
        let mut mesh = SurfaceMesh::new(8, 100.0);
        assert!(mesh.displace(&sim).is_err());
    }

    #[test]
    fn test_obj_output_shape() {
        let mut mesh = SurfaceMesh::new(2, 10.0);
        mesh.vertices[0].position[1] = 1.5;
        let mut buf = Vec::new();
        mesh.write_obj(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let positions = text.lines().filter(|l| l.starts_with("v ")).count();
        let uvs = text.lines().filter(|l| l.starts_with("vt ")).count();
        let faces = text.lines().filter(|l| l.starts_with("f ")).count();
        assert_eq!(positions, 9);
        assert_eq!(uvs, 9);
        assert_eq!(faces, 8);
        assert!(text.contains("v -5 1.5 -5"));
    }
}

use crate::error::MeshError;
use crate::geometry::{self, COMPONENTS};
use crate::render::{AttributeScope, DrawPass, GraphicsBackend};
use crate::shader::ShaderProgram;

/// Shader input fed from [`Mesh::positions`].
pub const POSITION_ATTRIBUTE: &str = "inPosition";
/// Shader input fed from [`Mesh::colors`].
pub const COLOR_ATTRIBUTE: &str = "inColor";
/// Shader input fed from [`Mesh::normals`].
pub const NORMAL_ATTRIBUTE: &str = "inNormal";

/// Attribute arrays of one shape plus the GPU buffers they were uploaded to.
///
/// Invariants:
/// - every array length is a multiple of 3
/// - colors and normals, when present, hold as many vertices as positions
/// - a `None` buffer means the array has not been uploaded
///
/// Uploading an array again releases the previous buffer first. All buffers
/// are released when the mesh is dropped.
pub struct Mesh<B: GraphicsBackend> {
    label: &'static str,

    positions: Vec<f32>,
    colors: Vec<f32>,
    normals: Vec<f32>,

    position_buffer: Option<B::Buffer>,
    color_buffer: Option<B::Buffer>,
    normal_buffer: Option<B::Buffer>,
}

impl<B: GraphicsBackend> Mesh<B> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            positions: Vec::new(),
            colors: Vec::new(),
            normals: Vec::new(),
            position_buffer: None,
            color_buffer: None,
            normal_buffer: None,
        }
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    #[inline]
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        geometry::vertex_count(&self.positions) as u32
    }

    #[inline]
    pub fn is_positions_uploaded(&self) -> bool {
        self.position_buffer.is_some()
    }

    #[inline]
    pub fn is_colors_uploaded(&self) -> bool {
        self.color_buffer.is_some()
    }

    #[inline]
    pub fn is_normals_uploaded(&self) -> bool {
        self.normal_buffer.is_some()
    }

    #[inline]
    pub fn is_fully_uploaded(&self) -> bool {
        self.is_positions_uploaded() && self.is_colors_uploaded() && self.is_normals_uploaded()
    }

    /// Replaces the position array and uploads it.
    ///
    /// If the vertex count changes, colors and normals no longer match and
    /// are dropped together with their buffers.
    pub fn upload_positions(&mut self, gpu: &B, positions: Vec<f32>) -> Result<(), MeshError> {
        check_triples("positions", &positions)?;
        if positions.len() != self.positions.len() {
            if self.color_buffer.is_some() || self.normal_buffer.is_some() {
                log::debug!(
                    "{}: vertex count changed to {}, dropping colors and normals",
                    self.label,
                    geometry::vertex_count(&positions)
                );
            }
            self.colors.clear();
            self.normals.clear();
            self.color_buffer = None;
            self.normal_buffer = None;
        }
        self.position_buffer = None;
        self.position_buffer = Some(gpu.create_vertex_buffer(
            &format!("{} positions", self.label),
            &positions,
        ));
        self.positions = positions;
        Ok(())
    }

    /// Replaces the color array and uploads it.
    pub fn upload_colors(&mut self, gpu: &B, colors: Vec<f32>) -> Result<(), MeshError> {
        self.check_matches_positions("colors", &colors)?;
        self.color_buffer = None;
        self.color_buffer =
            Some(gpu.create_vertex_buffer(&format!("{} colors", self.label), &colors));
        self.colors = colors;
        Ok(())
    }

    /// Replaces the normal array and uploads it.
    pub fn upload_normals(&mut self, gpu: &B, normals: Vec<f32>) -> Result<(), MeshError> {
        self.check_matches_positions("normals", &normals)?;
        self.normal_buffer = None;
        self.normal_buffer =
            Some(gpu.create_vertex_buffer(&format!("{} normals", self.label), &normals));
        self.normals = normals;
        Ok(())
    }

    /// Copies the mesh into fresh GPU buffers.
    ///
    /// Only arrays that were uploaded on `self` are copied and uploaded; no
    /// buffer is shared between the two meshes.
    pub fn duplicate(&self, gpu: &B) -> Self {
        let mut copy = Self::new(self.label);

        // Arrays already satisfied the invariants when they were uploaded here.
        if self.is_positions_uploaded() {
            copy.positions = self.positions.clone();
            copy.position_buffer = Some(gpu.create_vertex_buffer(
                &format!("{} positions", self.label),
                &copy.positions,
            ));
        }
        if self.is_colors_uploaded() {
            copy.colors = self.colors.clone();
            copy.color_buffer =
                Some(gpu.create_vertex_buffer(&format!("{} colors", self.label), &copy.colors));
        }
        if self.is_normals_uploaded() {
            copy.normals = self.normals.clone();
            copy.normal_buffer =
                Some(gpu.create_vertex_buffer(&format!("{} normals", self.label), &copy.normals));
        }

        copy
    }

    /// Binds every uploaded buffer to the matching program attribute and
    /// draws all vertices as a triangle list.
    ///
    /// Buffers without a matching attribute in `program` (or attributes
    /// without an uploaded buffer) are skipped. Bindings are released before
    /// returning.
    pub fn draw(&self, program: &ShaderProgram<B>, pass: &mut dyn DrawPass<B>) {
        let vertices = self.vertex_count();
        if vertices == 0 || self.position_buffer.is_none() {
            return;
        }

        let attributes = [
            (POSITION_ATTRIBUTE, self.position_buffer.as_ref()),
            (COLOR_ATTRIBUTE, self.color_buffer.as_ref()),
            (NORMAL_ATTRIBUTE, self.normal_buffer.as_ref()),
        ];

        let mut scope = AttributeScope::new(pass);
        for (name, buffer) in attributes {
            if let (Some(location), Some(buffer)) = (program.attribute_location(name), buffer) {
                scope.enable(location, buffer);
            }
        }
        scope.draw_triangles(vertices);
    }

    fn check_matches_positions(&self, attribute: &'static str, data: &[f32]) -> Result<(), MeshError> {
        check_triples(attribute, data)?;
        if data.len() != self.positions.len() {
            return Err(MeshError::AttributeLength {
                attribute,
                expected: geometry::vertex_count(&self.positions),
                actual: geometry::vertex_count(data),
            });
        }
        Ok(())
    }
}

fn check_triples(attribute: &'static str, data: &[f32]) -> Result<(), MeshError> {
    if data.len() % COMPONENTS != 0 {
        return Err(MeshError::NotTriples {
            attribute,
            len: data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_program, BackendEvent, PassEvent, RecordingBackend, RecordingPass};

    fn triangle() -> Vec<f32> {
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
    }

    fn released(gpu: &RecordingBackend) -> Vec<u32> {
        gpu.events()
            .into_iter()
            .filter_map(|e| match e {
                BackendEvent::ReleaseBuffer { id } => Some(id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn fresh_mesh_has_nothing_uploaded() {
        let mesh = Mesh::<RecordingBackend>::new("m");
        assert!(!mesh.is_positions_uploaded());
        assert!(!mesh.is_fully_uploaded());
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn rejects_partial_vertices() {
        let gpu = RecordingBackend::new();
        let mut mesh = Mesh::new("m");
        let err = mesh.upload_positions(&gpu, vec![0.0; 4]).unwrap_err();
        assert_eq!(err, MeshError::NotTriples { attribute: "positions", len: 4 });
        assert!(gpu.events().is_empty());
    }

    #[test]
    fn rejects_color_count_mismatch() {
        let gpu = RecordingBackend::new();
        let mut mesh = Mesh::new("m");
        mesh.upload_positions(&gpu, triangle()).unwrap();

        let err = mesh.upload_colors(&gpu, vec![1.0; 6]).unwrap_err();
        assert_eq!(
            err,
            MeshError::AttributeLength { attribute: "colors", expected: 3, actual: 2 }
        );
        assert!(!mesh.is_colors_uploaded());
    }

    #[test]
    fn reupload_releases_previous_buffer() {
        let gpu = RecordingBackend::new();
        let mut mesh = Mesh::new("m");
        mesh.upload_positions(&gpu, triangle()).unwrap();
        mesh.upload_positions(&gpu, triangle()).unwrap();

        assert_eq!(released(&gpu), vec![1]);
        assert!(mesh.is_positions_uploaded());
    }

    #[test]
    fn resized_positions_drop_stale_colors_and_normals() {
        let gpu = RecordingBackend::new();
        let program = test_program(&gpu);
        let mut mesh = Mesh::new("m");
        mesh.upload_positions(&gpu, triangle()).unwrap();
        mesh.upload_colors(&gpu, vec![0.5; 9]).unwrap();
        mesh.upload_normals(&gpu, vec![0.0; 9]).unwrap();

        mesh.upload_positions(&gpu, triangle().repeat(2)).unwrap();

        assert_eq!(mesh.vertex_count(), 6);
        assert!(mesh.colors().is_empty());
        assert!(mesh.normals().is_empty());
        assert!(!mesh.is_colors_uploaded());
        assert!(!mesh.is_normals_uploaded());
        let mut ids = released(&gpu);
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3]);

        let mut pass = RecordingPass::default();
        mesh.draw(&program, &mut pass);
        assert_eq!(
            pass.events,
            vec![
                PassEvent::Enable { location: 0, buffer: 4 },
                PassEvent::Draw { vertices: 6 },
                PassEvent::Disable { location: 0 },
            ]
        );
    }

    #[test]
    fn same_size_positions_keep_colors() {
        let gpu = RecordingBackend::new();
        let mut mesh = Mesh::new("m");
        mesh.upload_positions(&gpu, triangle()).unwrap();
        mesh.upload_colors(&gpu, vec![0.5; 9]).unwrap();

        mesh.upload_positions(&gpu, vec![2.0; 9]).unwrap();

        assert!(mesh.is_colors_uploaded());
        assert_eq!(mesh.colors(), &[0.5; 9][..]);
        assert_eq!(released(&gpu), vec![1]);
    }

    #[test]
    fn drop_releases_every_buffer_once() {
        let gpu = RecordingBackend::new();
        let mut mesh = Mesh::new("m");
        mesh.upload_positions(&gpu, triangle()).unwrap();
        mesh.upload_colors(&gpu, vec![0.5; 9]).unwrap();
        mesh.upload_normals(&gpu, vec![0.0; 9]).unwrap();
        assert!(mesh.is_fully_uploaded());

        drop(mesh);
        let mut ids = released(&gpu);
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn duplicate_reuploads_only_initialized_buffers() {
        let gpu = RecordingBackend::new();
        let mut mesh = Mesh::new("m");
        mesh.upload_positions(&gpu, triangle()).unwrap();
        mesh.upload_normals(&gpu, vec![0.0, 0.0, 1.0].repeat(3)).unwrap();
        gpu.clear();

        let copy = mesh.duplicate(&gpu);

        assert_eq!(copy.positions(), mesh.positions());
        assert_eq!(copy.normals(), mesh.normals());
        assert!(copy.is_positions_uploaded());
        assert!(!copy.is_colors_uploaded());
        assert!(copy.is_normals_uploaded());
        assert_eq!(copy.position_buffer.as_ref().unwrap().data, triangle());
        assert_eq!(copy.normal_buffer.as_ref().unwrap().data, mesh.normals());

        let created: Vec<u32> = gpu
            .events()
            .into_iter()
            .filter_map(|e| match e {
                BackendEvent::CreateBuffer { id, .. } => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(created, vec![3, 4]);
    }

    #[test]
    fn draw_binds_present_attributes_and_releases_them() {
        let gpu = RecordingBackend::new();
        let program = test_program(&gpu);
        let mut mesh = Mesh::new("m");
        mesh.upload_positions(&gpu, triangle()).unwrap();
        mesh.upload_normals(&gpu, vec![0.0; 9]).unwrap();

        let mut pass = RecordingPass::default();
        mesh.draw(&program, &mut pass);

        assert_eq!(
            pass.events,
            vec![
                PassEvent::Enable { location: 0, buffer: 1 },
                PassEvent::Enable { location: 2, buffer: 2 },
                PassEvent::Draw { vertices: 3 },
                PassEvent::Disable { location: 2 },
                PassEvent::Disable { location: 0 },
            ]
        );
    }

    #[test]
    fn empty_mesh_issues_no_draw() {
        let gpu = RecordingBackend::new();
        let program = test_program(&gpu);
        let mut mesh = Mesh::new("m");
        mesh.upload_positions(&gpu, Vec::new()).unwrap();

        let mut pass = RecordingPass::default();
        mesh.draw(&program, &mut pass);
        assert!(pass.events.is_empty());
    }
}

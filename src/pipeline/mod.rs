use glam::{Mat4, Vec3};

use crate::core::{Color, Vertex};
use crate::error::{RenderError, Result};

pub mod buffer;
pub mod present;
pub mod rasterizer;
pub mod resources;
pub mod transform;
pub mod uniforms;

pub use buffer::PixelBuffer;
pub use present::{Frame, Present};
pub use resources::{BufferKind, Bindings, Handle, ResourceStore};
pub use transform::Viewport;
pub use uniforms::{UniformStore, MODEL_MATRIX, PROJECTION_MATRIX, VIEW_MATRIX};

/// Whether anything has been drawn since the last clear. Drawing without a
/// clear in between accumulates wireframes in the same buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Idle,
    Dirty,
}

/// What one [`Renderer::draw`] call did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrawStats {
    /// Triangles whose edges were rasterized
    pub triangles: usize,
    /// Line rasterizer invocations, always `3 * triangles`
    pub lines: usize,
    /// Triangles dropped because a vertex had w == 0
    pub skipped_degenerate: usize,
    /// Triangles dropped because an index pointed past the vertex buffer
    pub skipped_out_of_range: usize,
}

/// Software wireframe renderer.
///
/// Owns the uploaded buffers, the binding slots, the uniforms and the pixel
/// buffer, and pushes every finished frame to its presenter. Single threaded:
/// wrap the whole renderer in one lock if it must be shared.
pub struct Renderer<P: Present> {
    width: usize,
    height: usize,
    pixels: PixelBuffer,
    clear_color: Color,
    resources: ResourceStore,
    bindings: Bindings,
    uniforms: UniformStore,
    viewport: Viewport,
    state: FrameState,
    presenter: P,
}

impl<P: Present> Renderer<P> {
    pub fn new(width: usize, height: usize, presenter: P) -> Result<Self> {
        let clear_color = Color::BLACK;
        let pixels = PixelBuffer::new(width, height, clear_color)?;
        log::info!("Created {}x{} software renderer", width, height);

        Ok(Self {
            width,
            height,
            pixels,
            clear_color,
            resources: ResourceStore::new(),
            bindings: Bindings::default(),
            uniforms: UniformStore::default(),
            viewport: Viewport::new(width, height),
            state: FrameState::Idle,
            presenter,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        self.pixels.data()
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        self.pixels.get(x, y)
    }

    pub fn frame_state(&self) -> FrameState {
        self.state
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Stores a copy of `vertices` under a fresh handle.
    ///
    /// The new buffer is bound and immediately unbound again, so the vertex slot
    /// is empty afterwards: bind the returned handle before drawing with it.
    pub fn upload_vertices(&mut self, vertices: &[Vertex]) -> Result<Handle> {
        let handle = self.resources.insert_vertices(vertices.to_vec())?;
        self.bind_vertex_buffer(handle);
        self.unbind_vertex_buffer();
        log::debug!("Uploaded {} vertices as {}", vertices.len(), handle);
        Ok(handle)
    }

    /// Stores a copy of `indices` under a fresh handle. The length must be a
    /// multiple of 3. Leaves the index slot unbound, like [`upload_vertices`](Self::upload_vertices).
    pub fn upload_indices(&mut self, indices: &[u16]) -> Result<Handle> {
        let handle = self.resources.insert_indices(indices.to_vec())?;
        self.bind_index_buffer(handle);
        self.unbind_index_buffer();
        log::debug!("Uploaded {} indices as {}", indices.len(), handle);
        Ok(handle)
    }

    pub fn bind_vertex_buffer(&mut self, handle: Handle) {
        self.bindings.bind(BufferKind::Vertex, handle);
    }

    pub fn unbind_vertex_buffer(&mut self) {
        self.bindings.unbind(BufferKind::Vertex);
    }

    pub fn bind_index_buffer(&mut self, handle: Handle) {
        self.bindings.bind(BufferKind::Index, handle);
    }

    pub fn unbind_index_buffer(&mut self) {
        self.bindings.unbind(BufferKind::Index);
    }

    pub fn bound(&self, kind: BufferKind) -> Handle {
        self.bindings.current(kind)
    }

    pub fn set_uniform(&mut self, name: impl Into<String>, matrix: Mat4) {
        self.uniforms.set(name, matrix);
    }

    pub fn uniforms(&self) -> &UniformStore {
        &self.uniforms
    }

    /// Resets every pixel to the clear color.
    pub fn clear(&mut self) {
        self.pixels.clear(self.clear_color);
        self.state = FrameState::Idle;
    }

    /// Rasterizes one flat colored segment between screen space points. Depth is ignored.
    pub fn draw_line(&mut self, start: Vec3, end: Vec3, color: Color) {
        self.pixels.draw_line(start.truncate(), end.truncate(), color);
    }

    /// Draws the outline of every triangle in the bound index buffer, then
    /// presents the pixel buffer.
    ///
    /// Each edge takes the color of its first vertex: (v0, v1) in v0's color,
    /// (v1, v2) in v1's, (v2, v0) in v2's.
    ///
    /// Fails before touching the pixel buffer if any of the model, view or
    /// projection matrices is unset. A bound handle that names no stored buffer
    /// draws nothing (the frame is still presented). Triangles with a vertex at
    /// w == 0, or with an index past the end of the vertex buffer, are skipped.
    pub fn draw(&mut self) -> Result<DrawStats> {
        let mvp = self.uniforms.model_view_projection()?;

        let vertex_handle = self.bindings.current(BufferKind::Vertex);
        let index_handle = self.bindings.current(BufferKind::Index);

        let mut stats = DrawStats::default();
        let mut lines = Vec::new();

        match (
            self.resources.vertices(vertex_handle),
            self.resources.indices(index_handle),
        ) {
            (Ok(vertices), Ok(indices)) => {
                lines.reserve(indices.len());
                for tri in indices.chunks_exact(3) {
                    match project_triangle(&mvp, &self.viewport, vertices, [tri[0], tri[1], tri[2]]) {
                        Ok(v) => {
                            lines.push((v[0].position, v[1].position, v[0].color));
                            lines.push((v[1].position, v[2].position, v[1].color));
                            lines.push((v[2].position, v[0].position, v[2].color));
                            stats.triangles += 1;
                        }
                        Err(RenderError::DegenerateProjection) => {
                            log::trace!("Skipping triangle {:?}: w == 0", tri);
                            stats.skipped_degenerate += 1;
                        }
                        Err(e) => {
                            log::trace!("Skipping triangle {:?}: {}", tri, e);
                            stats.skipped_out_of_range += 1;
                        }
                    }
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("Nothing drawn: {}", e);
            }
        }

        for (start, end, color) in lines {
            self.draw_line(start, end, color);
            stats.lines += 1;
        }

        if stats.skipped_out_of_range > 0 {
            log::warn!(
                "{} triangles reference vertices outside buffer {}",
                stats.skipped_out_of_range,
                vertex_handle
            );
        }
        log::debug!("Draw: {:?}", stats);

        self.state = FrameState::Dirty;
        self.present()?;
        Ok(stats)
    }

    /// Pushes the current pixel buffer to the presenter without drawing.
    pub fn present(&mut self) -> Result<()> {
        let frame = Frame::new(self.pixels.data(), self.width, self.height);
        self.presenter.present(&frame)
    }
}

impl<P: Present> Drop for Renderer<P> {
    fn drop(&mut self) {
        log::info!(
            "Releasing renderer ({} buffers, {}x{} pixels)",
            self.resources.len(),
            self.width,
            self.height
        );
    }
}

/// Screen space copies of the three vertices a triangle names.
fn project_triangle(
    mvp: &Mat4,
    viewport: &Viewport,
    vertices: &[Vertex],
    tri: [u16; 3],
) -> Result<[Vertex; 3]> {
    let mut out = [Vertex::default(); 3];
    for (slot, &index) in out.iter_mut().zip(tri.iter()) {
        let vertex = vertices
            .get(index as usize)
            .ok_or(RenderError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            })?;
        *slot = Vertex {
            position: transform::project(mvp, vertex.position, viewport)?,
            color: vertex.color,
        };
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Counts presents and keeps a copy of the last frame.
    #[derive(Default)]
    struct RecordingPresenter {
        presents: usize,
        last: Vec<Color>,
        size: (usize, usize),
    }

    impl Present for RecordingPresenter {
        fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
            self.presents += 1;
            self.last = frame.pixels().to_vec();
            self.size = (frame.width(), frame.height());
            Ok(())
        }
    }

    fn renderer(width: usize, height: usize) -> Renderer<RecordingPresenter> {
        let mut r = Renderer::new(width, height, RecordingPresenter::default()).unwrap();
        r.set_uniform(MODEL_MATRIX, Mat4::IDENTITY);
        r.set_uniform(VIEW_MATRIX, Mat4::IDENTITY);
        r.set_uniform(PROJECTION_MATRIX, Mat4::IDENTITY);
        r
    }

    fn rgb_triangle() -> Vec<Vertex> {
        vec![
            Vertex::new(Vec3::new(0.0, 0.5, 0.0), Color::RED),
            Vertex::new(Vec3::new(-0.5, -0.5, 0.0), Color::GREEN),
            Vertex::new(Vec3::new(0.5, -0.5, 0.0), Color::BLUE),
        ]
    }

    fn lit(r: &Renderer<RecordingPresenter>) -> BTreeSet<(usize, usize)> {
        let mut set = BTreeSet::new();
        for y in 0..r.height() {
            for x in 0..r.width() {
                if r.pixel(x, y) != Some(r.clear_color()) {
                    set.insert((x, y));
                }
            }
        }
        set
    }

    fn line_pixels(a: (f32, f32), b: (f32, f32), w: usize, h: usize) -> BTreeSet<(usize, usize)> {
        let mut buffer = PixelBuffer::new(w, h, Color::BLACK).unwrap();
        buffer.draw_line(glam::Vec2::new(a.0, a.1), glam::Vec2::new(b.0, b.1), Color::WHITE);
        (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .filter(|&(x, y)| buffer.get(x, y) == Some(Color::WHITE))
            .collect()
    }

    #[test]
    fn upload_leaves_nothing_bound() {
        let mut r = renderer(8, 8);
        let vb = r.upload_vertices(&rgb_triangle()).unwrap();
        let ib = r.upload_indices(&[0, 1, 2]).unwrap();
        assert_ne!(vb, ib);
        assert!(r.bound(BufferKind::Vertex).is_null());
        assert!(r.bound(BufferKind::Index).is_null());

        r.bind_vertex_buffer(vb);
        r.bind_index_buffer(ib);
        assert_eq!(r.bound(BufferKind::Vertex), vb);
        r.unbind_index_buffer();
        assert!(r.bound(BufferKind::Index).is_null());
    }

    #[test]
    fn malformed_indices_fail_at_upload() {
        let mut r = renderer(8, 8);
        assert!(matches!(
            r.upload_indices(&[0, 1]),
            Err(RenderError::MalformedIndexBuffer { len: 2 })
        ));
    }

    #[test]
    fn rgb_triangle_end_to_end() {
        let mut r = renderer(100, 100);
        r.clear();
        let vb = r.upload_vertices(&rgb_triangle()).unwrap();
        let ib = r.upload_indices(&[0, 1, 2]).unwrap();
        r.bind_vertex_buffer(vb);
        r.bind_index_buffer(ib);

        let stats = r.draw().unwrap();
        assert_eq!(stats.triangles, 1);
        assert_eq!(stats.lines, 3);

        let edge_a = line_pixels((50.0, 75.0), (25.0, 25.0), 100, 100);
        let edge_b = line_pixels((25.0, 25.0), (75.0, 25.0), 100, 100);
        let edge_c = line_pixels((75.0, 25.0), (50.0, 75.0), 100, 100);

        let expected: BTreeSet<_> = edge_a.union(&edge_b).chain(edge_c.iter()).copied().collect();
        assert_eq!(lit(&r), expected);

        // shared endpoints keep the color of the edge drawn last
        assert_eq!(r.pixel(50, 25), Some(Color::GREEN));
        assert_eq!(r.pixel(25, 25), Some(Color::GREEN));
        assert_eq!(r.pixel(75, 25), Some(Color::BLUE));
        assert_eq!(r.pixel(50, 75), Some(Color::BLUE));
        assert!(edge_a.iter().filter(|p| !edge_b.contains(p) && !edge_c.contains(p))
            .all(|&(x, y)| r.pixel(x, y) == Some(Color::RED)));
        assert!(edge_c.iter().filter(|p| !edge_b.contains(p))
            .all(|&(x, y)| r.pixel(x, y) == Some(Color::BLUE)));

        assert_eq!(r.presenter().presents, 1);
        assert_eq!(r.presenter().size, (100, 100));
        assert_eq!(r.presenter().last, r.pixels());
    }

    #[test]
    fn three_lines_per_triangle() {
        let mesh = crate::core::Mesh::create_cube();
        let mut r = renderer(64, 64);
        r.set_uniform(PROJECTION_MATRIX, Mat4::from_scale(Vec3::splat(0.5)));
        let vb = r.upload_vertices(&mesh.vertices).unwrap();
        let ib = r.upload_indices(&mesh.indices).unwrap();
        r.bind_vertex_buffer(vb);
        r.bind_index_buffer(ib);

        let stats = r.draw().unwrap();
        assert_eq!(stats.triangles, 12);
        assert_eq!(stats.lines, 36);
    }

    #[test]
    fn near_zero_w_draws_the_visible_part_of_far_edges() {
        let mut r = renderer(64, 48);
        let mut projection = Mat4::IDENTITY;
        projection.w_axis.w = 1e-30;
        r.set_uniform(PROJECTION_MATRIX, projection);

        let vb = r
            .upload_vertices(&[
                Vertex::new(Vec3::new(-1.0, -1.0, 0.0), Color::RED),
                Vertex::new(Vec3::new(1.0, 1.0, 0.0), Color::GREEN),
                Vertex::new(Vec3::ZERO, Color::BLUE),
            ])
            .unwrap();
        let ib = r.upload_indices(&[0, 1, 2]).unwrap();
        r.bind_vertex_buffer(vb);
        r.bind_index_buffer(ib);

        let stats = r.draw().unwrap();
        assert_eq!(stats.triangles, 1);
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.skipped_degenerate, 0);
        // both ends saturate, leaving the buffer's main diagonal
        assert_eq!(r.pixel(0, 0), Some(Color::RED));
        assert_eq!(r.pixel(47, 47), Some(Color::RED));
        assert_eq!(r.presenter().presents, 1);
    }

    #[test]
    fn missing_uniform_fails_fast() {
        let mut r = Renderer::new(8, 8, RecordingPresenter::default()).unwrap();
        r.set_uniform(MODEL_MATRIX, Mat4::IDENTITY);
        r.set_uniform(VIEW_MATRIX, Mat4::IDENTITY);
        match r.draw() {
            Err(RenderError::MissingUniform(name)) => assert_eq!(name, PROJECTION_MATRIX),
            other => panic!("expected MissingUniform, got {other:?}"),
        }
        assert_eq!(r.presenter().presents, 0);
        assert_eq!(r.frame_state(), FrameState::Idle);
    }

    #[test]
    fn unknown_handles_draw_nothing_but_still_present() {
        let mut r = renderer(16, 16);
        r.upload_vertices(&rgb_triangle()).unwrap();
        r.bind_vertex_buffer(Handle::from_raw(99));
        r.bind_index_buffer(Handle::NULL);

        let stats = r.draw().unwrap();
        assert_eq!(stats, DrawStats::default());
        assert!(lit(&r).is_empty());
        assert_eq!(r.presenter().presents, 1);
    }

    #[test]
    fn vertex_handle_bound_as_index_buffer_is_invalid() {
        let mut r = renderer(16, 16);
        let vb = r.upload_vertices(&rgb_triangle()).unwrap();
        r.bind_vertex_buffer(vb);
        r.bind_index_buffer(vb);
        assert_eq!(r.draw().unwrap().triangles, 0);
    }

    #[test]
    fn degenerate_w_skips_only_that_triangle() {
        let mut r = renderer(32, 32);
        // w = 1 - z, so a vertex at z = 1 divides by zero
        let mut projection = Mat4::IDENTITY;
        projection.z_axis.w = -1.0;
        r.set_uniform(PROJECTION_MATRIX, projection);

        let mut vertices = rgb_triangle();
        vertices.push(Vertex::new(Vec3::new(0.0, 0.0, 1.0), Color::WHITE));
        let vb = r.upload_vertices(&vertices).unwrap();
        let ib = r.upload_indices(&[0, 1, 2, 0, 1, 3]).unwrap();
        r.bind_vertex_buffer(vb);
        r.bind_index_buffer(ib);

        let stats = r.draw().unwrap();
        assert_eq!(stats.triangles, 1);
        assert_eq!(stats.skipped_degenerate, 1);
        assert_eq!(stats.lines, 3);
        assert!(r.pixels().iter().all(|c| c.r.is_finite()));
        assert!(!r.pixels().contains(&Color::WHITE));
    }

    #[test]
    fn out_of_range_index_skips_triangle() {
        let mut r = renderer(32, 32);
        let vb = r.upload_vertices(&rgb_triangle()).unwrap();
        let ib = r.upload_indices(&[0, 1, 2, 0, 1, 7]).unwrap();
        r.bind_vertex_buffer(vb);
        r.bind_index_buffer(ib);

        let stats = r.draw().unwrap();
        assert_eq!(stats.triangles, 1);
        assert_eq!(stats.skipped_out_of_range, 1);
    }

    #[test]
    fn geometry_far_off_screen_leaves_buffer_untouched() {
        let mut r = renderer(20, 20);
        r.set_uniform(MODEL_MATRIX, Mat4::from_translation(Vec3::new(50.0, 0.0, 0.0)));
        let vb = r.upload_vertices(&rgb_triangle()).unwrap();
        let ib = r.upload_indices(&[0, 1, 2]).unwrap();
        r.bind_vertex_buffer(vb);
        r.bind_index_buffer(ib);

        assert_eq!(r.draw().unwrap().lines, 3);
        assert!(lit(&r).is_empty());
    }

    #[test]
    fn clear_is_idempotent_and_uses_clear_color() {
        let mut r = renderer(10, 10);
        r.draw_line(Vec3::ZERO, Vec3::new(9.0, 9.0, 0.0), Color::RED);
        r.set_clear_color(Color::CYAN);
        r.clear();
        let once = r.pixels().to_vec();
        r.clear();
        assert_eq!(r.pixels(), once.as_slice());
        assert!(once.iter().all(|&c| c == Color::CYAN));
    }

    #[test]
    fn repeated_draws_accumulate_until_cleared() {
        let mut r = renderer(40, 40);
        let vb = r.upload_vertices(&rgb_triangle()).unwrap();
        let ib = r.upload_indices(&[0, 1, 2]).unwrap();
        r.bind_vertex_buffer(vb);
        r.bind_index_buffer(ib);

        assert_eq!(r.frame_state(), FrameState::Idle);
        r.draw().unwrap();
        let first = lit(&r);
        assert_eq!(r.frame_state(), FrameState::Dirty);

        r.set_uniform(MODEL_MATRIX, Mat4::from_translation(Vec3::new(0.3, 0.0, 0.0)));
        r.draw().unwrap();
        let both = lit(&r);
        assert!(both.is_superset(&first));
        assert!(both.len() > first.len());

        r.clear();
        assert!(lit(&r).is_empty());
        assert_eq!(r.frame_state(), FrameState::Idle);
        assert_eq!(r.presenter().presents, 2);
    }

    #[test]
    fn instances_do_not_share_state() {
        let mut a = renderer(8, 8);
        let mut b = renderer(8, 8);
        let ha = a.upload_vertices(&rgb_triangle()).unwrap();
        let hb = b.upload_vertices(&rgb_triangle()).unwrap();
        assert_eq!(ha, hb);
        a.bind_vertex_buffer(ha);
        assert!(b.bound(BufferKind::Vertex).is_null());
    }
}

use crate::context::GraphicsContext;
use crate::geometry_buffers::GeometryBuffers;
use crate::mesh::{AttributeKind, Vector3};
use crate::render_state::{RenderMode, RenderState};
use gl_thin::gl_helper::{ArrayBufferType, BufferUsage, GLErrorWrapper};
use std::mem::size_of;

/// What one call to [FrameUpdater::update] did
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UpdateOutcome {
    /// dynamic update is switched off
    Frozen,
    /// there is no position buffer to update
    NoGeometry,
    /// the whole CPU copy was sent with `glBufferData`
    FullUpload,
    /// only the first half of the CPU copy was sent with `glBufferSubData`
    PartialUpload,
    /// the GPU copy was edited in place through a mapping
    Mapped,
    /// the driver would not map the buffer; try again next frame
    MappingUnavailable,
}

/// Moves the cube's top and bottom faces up and down over time, keeping the
/// GPU position buffer in step with one of three strategies picked by the
/// [RenderMode].
#[derive(Debug, Default)]
pub struct FrameUpdater {
    skipped_mappings: u64,
}

impl FrameUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    /// how many frames were skipped because the buffer could not be mapped
    pub fn skipped_mappings(&self) -> u64 {
        self.skipped_mappings
    }

    /// `positions` is the CPU working copy that `geometry`'s position buffer was made from.
    /// In [RenderMode::Plain] it is left alone and the GPU copy is edited instead.
    pub fn update<C: GraphicsContext>(
        &mut self,
        ctx: &mut C,
        geometry: &GeometryBuffers<C>,
        positions: &mut [Vector3],
        state: &RenderState,
        elapsed_seconds: f64,
    ) -> Result<UpdateOutcome, GLErrorWrapper> {
        if !state.dynamic_update {
            return Ok(UpdateOutcome::Frozen);
        }
        let Some(position_buffer) = geometry.buffer(AttributeKind::Position) else {
            return Ok(UpdateOutcome::NoGeometry);
        };

        ctx.bind_buffer::<ArrayBufferType>(Some(position_buffer))?;
        let rval = match state.render_mode() {
            RenderMode::Lit => {
                oscillate_all(positions, elapsed_seconds);
                ctx.buffer_data::<ArrayBufferType>(
                    bytemuck::cast_slice(&*positions),
                    BufferUsage::DynamicDraw,
                )
                .map(|_| UpdateOutcome::FullUpload)
            }
            RenderMode::Textured => {
                oscillate_all(positions, elapsed_seconds);
                // everything changed locally, but only the first half goes to the GPU
                let bytes: &[u8] = bytemuck::cast_slice(&*positions);
                ctx.buffer_sub_data::<ArrayBufferType>(0, &bytes[..bytes.len() / 2])
                    .map(|_| UpdateOutcome::PartialUpload)
            }
            RenderMode::Plain => ctx
                .map_buffer::<ArrayBufferType, _>(|bytes| oscillate_bytes(bytes, elapsed_seconds))
                .map(|mapped| match mapped {
                    Some(()) => UpdateOutcome::Mapped,
                    None => UpdateOutcome::MappingUnavailable,
                }),
        };
        let unbound = ctx.bind_buffer::<ArrayBufferType>(None);
        let outcome = rval?;
        unbound?;

        if outcome == UpdateOutcome::MappingUnavailable {
            self.skipped_mappings += 1;
            log::debug!(
                "could not map the position buffer, skipped {} frames so far",
                self.skipped_mappings
            );
        }
        Ok(outcome)
    }
}

/// The new height of a vertex at `y`: vertices below the origin swing around -1,
/// the rest around +1, in opposite directions.
pub fn oscillate(y: f32, elapsed_seconds: f64) -> f32 {
    let swing = (elapsed_seconds * 2.0).sin() as f32 / 2.0;
    if y < 0.0 {
        -1.0 + swing
    } else {
        1.0 - swing
    }
}

fn oscillate_all(positions: &mut [Vector3], elapsed_seconds: f64) {
    for position in positions.iter_mut() {
        position[1] = oscillate(position[1], elapsed_seconds);
    }
}

/// same as [oscillate_all] on raw buffer bytes, which need not be aligned
fn oscillate_bytes(bytes: &mut [u8], elapsed_seconds: f64) {
    for chunk in bytes.chunks_exact_mut(size_of::<Vector3>()) {
        let mut position: Vector3 = bytemuck::pod_read_unaligned(chunk);
        position[1] = oscillate(position[1], elapsed_seconds);
        chunk.copy_from_slice(bytemuck::bytes_of(&position));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording_context::{RecordingContext, Upload};
    use crate::shapes::cube;

    fn state(lighting: bool, texturing: bool) -> RenderState {
        RenderState {
            lighting,
            texturing,
            dynamic_update: true,
        }
    }

    fn expected(previous: &[Vector3], elapsed_seconds: f64) -> Vec<Vector3> {
        previous
            .iter()
            .map(|&[x, y, z]| [x, oscillate(y, elapsed_seconds), z])
            .collect()
    }

    struct Fixture {
        ctx: RecordingContext,
        geometry: GeometryBuffers<RecordingContext>,
        positions: Vec<Vector3>,
        position_id: u32,
        updater: FrameUpdater,
    }

    impl Fixture {
        fn new() -> Self {
            let mut ctx = RecordingContext::new();
            let mesh = cube();
            let geometry = GeometryBuffers::new(&mut ctx, &mesh).unwrap();
            let position_id = geometry.buffer(AttributeKind::Position).unwrap().id();
            Self {
                ctx,
                geometry,
                positions: mesh.positions.unwrap(),
                position_id,
                updater: FrameUpdater::new(),
            }
        }

        fn update(&mut self, state: &RenderState, elapsed_seconds: f64) -> UpdateOutcome {
            self.updater
                .update(
                    &mut self.ctx,
                    &self.geometry,
                    &mut self.positions,
                    state,
                    elapsed_seconds,
                )
                .unwrap()
        }

        fn gpu_positions(&self) -> Vec<Vector3> {
            self.ctx.positions(self.position_id)
        }
    }

    #[test]
    fn oscillation_keeps_each_vertex_on_its_side() {
        let t = 0.3;
        let s = (0.6f64).sin() as f32 / 2.0;
        assert_eq!(-1.0 + s, oscillate(-1.0, t));
        assert_eq!(1.0 - s, oscillate(1.0, t));
        assert_eq!(1.0 - s, oscillate(0.0, t));
        // stays negative, so the next frame picks the same branch
        assert!(oscillate(oscillate(-1.0, t), 2.0) < 0.0);
    }

    #[test]
    fn lit_mode_reuploads_everything() {
        let mut fixture = Fixture::new();
        let before = fixture.positions.clone();
        let t = 1.25;

        assert_eq!(UpdateOutcome::FullUpload, fixture.update(&state(true, true), t));

        assert_eq!(expected(&before, t), fixture.positions);
        assert_eq!(fixture.positions, fixture.gpu_positions());
        assert_eq!(
            Some(&Upload::Full {
                buffer: fixture.position_id,
                len: before.len() * 12,
                usage: BufferUsage::DynamicDraw,
            }),
            fixture.ctx.gpu().uploads.last()
        );
        assert_eq!(None, fixture.ctx.gpu().array_binding);
    }

    #[test]
    fn textured_mode_sends_only_the_first_half() {
        let mut fixture = Fixture::new();
        let before = fixture.positions.clone();
        let half = before.len() / 2;
        let t = 0.7;

        assert_eq!(
            UpdateOutcome::PartialUpload,
            fixture.update(&state(false, true), t)
        );

        let mutated = expected(&before, t);
        assert_eq!(mutated, fixture.positions);

        let gpu = fixture.gpu_positions();
        assert_eq!(mutated[..half], gpu[..half]);
        assert_eq!(before[half..], gpu[half..]);
        assert_ne!(mutated[half..], gpu[half..]);

        assert_eq!(
            Some(&Upload::Partial {
                buffer: fixture.position_id,
                offset: 0,
                len: before.len() * 12 / 2,
            }),
            fixture.ctx.gpu().uploads.last()
        );
    }

    #[test]
    fn a_full_upload_catches_up_the_stale_half() {
        let mut fixture = Fixture::new();
        fixture.update(&state(false, true), 0.7);
        fixture.update(&state(true, false), 0.9);

        assert_eq!(fixture.positions, fixture.gpu_positions());
    }

    #[test]
    fn plain_mode_edits_gpu_memory_in_place() {
        let mut fixture = Fixture::new();
        // leave the GPU copy different from the CPU copy first
        fixture.update(&state(false, true), 0.7);
        let cpu_before = fixture.positions.clone();
        let gpu_before = fixture.gpu_positions();
        let t = 2.0;

        assert_eq!(UpdateOutcome::Mapped, fixture.update(&state(false, false), t));

        assert_eq!(expected(&gpu_before, t), fixture.gpu_positions());
        assert_eq!(cpu_before, fixture.positions);
        let gpu = fixture.ctx.gpu();
        assert_eq!(1, gpu.maps);
        assert_eq!(1, gpu.unmaps);
        assert_eq!(None, gpu.array_binding);
    }

    #[test]
    fn failed_mapping_skips_the_frame_and_retries_next_time() {
        let mut fixture = Fixture::new();
        let gpu_before = fixture.gpu_positions();
        fixture.ctx.gpu_mut().refuse_mapping = true;

        assert_eq!(
            UpdateOutcome::MappingUnavailable,
            fixture.update(&state(false, false), 1.0)
        );
        assert_eq!(gpu_before, fixture.gpu_positions());
        assert_eq!(1, fixture.updater.skipped_mappings());
        assert_eq!(0, fixture.ctx.gpu().unmaps);
        assert_eq!(None, fixture.ctx.gpu().array_binding);

        fixture.ctx.gpu_mut().refuse_mapping = false;
        assert_eq!(UpdateOutcome::Mapped, fixture.update(&state(false, false), 1.0));
        assert_eq!(expected(&gpu_before, 1.0), fixture.gpu_positions());
        assert_eq!(2, fixture.ctx.gpu().map_attempts);
        assert_eq!(1, fixture.ctx.gpu().unmaps);
    }

    #[test]
    fn frozen_positions_stay_put() {
        let mut fixture = Fixture::new();
        fixture.update(&state(true, true), 0.4);
        let cpu = fixture.positions.clone();
        let gpu = fixture.gpu_positions();
        let uploads = fixture.ctx.gpu().uploads.len();

        let mut frozen = state(true, true);
        frozen.dynamic_update = false;
        for (frame, mode) in [(true, true), (false, true), (false, false)].iter().enumerate() {
            frozen.lighting = mode.0;
            frozen.texturing = mode.1;
            let elapsed = 1.0 + frame as f64;
            assert_eq!(UpdateOutcome::Frozen, fixture.update(&frozen, elapsed));
        }

        assert_eq!(cpu, fixture.positions);
        assert_eq!(gpu, fixture.gpu_positions());
        assert_eq!(uploads, fixture.ctx.gpu().uploads.len());
        assert_eq!(0, fixture.ctx.gpu().map_attempts);
    }

    #[test]
    fn upload_failure_is_reported_ahead_of_a_failed_unbind() {
        let mut fixture = Fixture::new();
        fixture.ctx.gpu_mut().stores.insert(fixture.position_id, Vec::new());
        fixture.ctx.gpu_mut().fail_unbind = true;

        let err = fixture
            .updater
            .update(
                &mut fixture.ctx,
                &fixture.geometry,
                &mut fixture.positions,
                &state(false, true),
                1.0,
            )
            .err()
            .unwrap();

        assert_eq!(gl::INVALID_VALUE, err.code);
    }

    #[test]
    fn empty_geometry_has_nothing_to_update() {
        let mut ctx = RecordingContext::new();
        let geometry = GeometryBuffers::<RecordingContext>::empty();
        let mut positions = vec![[0.0, -1.0, 0.0]];

        let outcome = FrameUpdater::new()
            .update(&mut ctx, &geometry, &mut positions, &state(true, true), 1.0)
            .unwrap();

        assert_eq!(UpdateOutcome::NoGeometry, outcome);
        assert_eq!(vec![[0.0, -1.0, 0.0]], positions);
    }
}

use crate::config::DemoConfig;
use crate::draw::draw;
use crate::frame_updater::{FrameUpdater, UpdateOutcome};
use crate::geometry_buffers::GeometryBuffers;
use crate::mesh::Vector3;
use crate::render_state::RenderState;
use crate::shapes::cube;
use crate::texture::DecodedImage;
use gl::types::GLsizei;
use gl_thin::gl_fancy::{GPUState, VertexStreams};
use gl_thin::gl_helper::{explode_if_gl_error, GLErrorWrapper, Texture, VertexArray};
use gl_thin::linear::{
    matrix4x4f_create_perspective, matrix4x4f_create_rotation_y, matrix4x4f_look_at, Matrix4x4f,
    Vector3f,
};
use std::error::Error;
use std::f32::consts::FRAC_PI_4;
use vbo_shaders::fixed_function_shader::{FixedFunctionParams, FixedFunctionShader};

/// where the default light sits: straight behind the viewer
const LIGHT_DIRECTION: [f32; 3] = [0.0, 0.0, 1.0];

/// degrees of cube rotation per second of animation
const SPIN_RATE: f64 = 100.0;

/// The rotating cube with everything it needs to draw itself.  Requires a current GL context
/// for its whole life.
pub struct VboScene {
    pub state: RenderState,
    // the buffers must go before the vertex array and the context
    geometry: GeometryBuffers<GPUState>,
    positions: Vec<Vector3>,
    texture: Texture,
    shader: FixedFunctionShader,
    streams: VertexStreams,
    vertex_array: VertexArray,
    updater: FrameUpdater,
    projection: Matrix4x4f,
    gpu_state: GPUState,
}

impl VboScene {
    pub fn new(config: &DemoConfig, width: u32, height: u32) -> Result<Self, Box<dyn Error>> {
        let mut gpu_state = GPUState::new();

        unsafe {
            gl::ClearColor(0.1, 0.1, 0.5, 0.0);
            gl::Enable(gl::DEPTH_TEST);
        }
        explode_if_gl_error()?;

        // core profile draws need a vertex array object to hold the attribute setup
        let vertex_array = VertexArray::new()?;
        vertex_array.bind()?;

        let shader = FixedFunctionShader::new()?;
        let streams = shader.vertex_streams();

        let mesh = cube();
        let geometry = GeometryBuffers::new(&mut gpu_state, &mesh)?;
        let positions = mesh.positions.unwrap_or_default();

        let texture = DecodedImage::load_or_checkerboard(&config.texture_path).upload()?;

        let mut rval = Self {
            state: RenderState::default(),
            geometry,
            positions,
            texture,
            shader,
            streams,
            vertex_array,
            updater: FrameUpdater::new(),
            projection: projection_for(width, height),
            gpu_state,
        };
        rval.resize(width, height)?;
        Ok(rval)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), GLErrorWrapper> {
        unsafe { gl::Viewport(0, 0, width as GLsizei, height as GLsizei) };
        explode_if_gl_error()?;
        self.projection = projection_for(width, height);
        Ok(())
    }

    /// move the vertices for this frame
    pub fn update_frame(&mut self, elapsed_seconds: f64) -> Result<UpdateOutcome, GLErrorWrapper> {
        self.updater.update(
            &mut self.gpu_state,
            &self.geometry,
            &mut self.positions,
            &self.state,
            elapsed_seconds,
        )
    }

    /// paint the cube as posed at `elapsed_seconds`; the caller swaps buffers
    pub fn render_frame(&mut self, elapsed_seconds: f64) -> Result<(), GLErrorWrapper> {
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT) };
        explode_if_gl_error()?;

        self.vertex_array.bind()?;

        unsafe { gl::ActiveTexture(gl::TEXTURE0) };
        explode_if_gl_error()?;
        self.texture.bind(gl::TEXTURE_2D)?;

        let modelview = modelview_at(elapsed_seconds);
        self.shader.set_params(&FixedFunctionParams {
            projection: &self.projection,
            modelview: &modelview,
            lighting: self.state.lighting,
            texturing: self.state.texturing,
            light_direction: LIGHT_DIRECTION,
            texture_unit: 0,
        })?;
        self.shader.set_default_attributes()?;

        draw(
            &mut self.gpu_state,
            &self.geometry,
            &self.state,
            &self.streams,
        )
    }
}

/// 45 degree vertical field of view, depth range 1..64
pub fn projection_for(width: u32, height: u32) -> Matrix4x4f {
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    matrix4x4f_create_perspective(FRAC_PI_4, aspect, 1.0, 64.0)
}

/// camera up and back from the origin, cube spun about Y as time passes
pub fn modelview_at(elapsed_seconds: f64) -> Matrix4x4f {
    let view = matrix4x4f_look_at(
        &Vector3f::new(0.0, 3.5, 3.5),
        &Vector3f::default(),
        &Vector3f::new(0.0, 1.0, 0.0),
    );
    let degrees = (elapsed_seconds * SPIN_RATE) % 360.0;
    view * matrix4x4f_create_rotation_y((degrees as f32).to_radians())
}

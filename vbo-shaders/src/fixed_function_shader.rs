use gl::types::{GLint, GLuint};
use gl_thin::gl_fancy::VertexStreams;
use gl_thin::gl_helper::{explode_if_gl_error, GLErrorWrapper, Program};
use gl_thin::linear::Matrix4x4f;

/// Mimics the old fixed-function pipeline: per-vertex color, or a single white
/// directional light over per-vertex normals, optionally modulated by a texture.
///
/// Attribute arrays that are not enabled fall back to the constant values set by
/// [FixedFunctionShader::set_default_attributes], just like the legacy
/// `glColor`/`glNormal`/`glTexCoord` current values.
pub struct FixedFunctionShader {
    pub program: Program,
    pub sal_position: GLuint,
    pub sal_normal: GLuint,
    pub sal_tex_coord: GLuint,
    pub sal_color: GLuint,
    pub sul_projection: GLint,
    pub sul_modelview: GLint,
    pub sul_lighting: GLint,
    pub sul_texturing: GLint,
    pub sul_light_direction: GLint,
    pub sul_tex: GLint,
}

/// Parameters for one frame's worth of drawing
pub struct FixedFunctionParams<'a> {
    pub projection: &'a Matrix4x4f,
    pub modelview: &'a Matrix4x4f,
    pub lighting: bool,
    pub texturing: bool,
    /// eye-space direction *towards* the light
    pub light_direction: [f32; 3],
    pub texture_unit: GLint,
}

impl FixedFunctionShader {
    pub fn new() -> Result<Self, GLErrorWrapper> {
        let program = Program::compile(shader_v_src(), shader_f_src())?;

        let sal_position = program.get_attribute_location("a_position")?;
        let sal_normal = program.get_attribute_location("a_normal")?;
        let sal_tex_coord = program.get_attribute_location("a_tex_coord")?;
        let sal_color = program.get_attribute_location("a_color")?;

        let sul_projection = program.get_uniform_location("u_projection")?;
        let sul_modelview = program.get_uniform_location("u_modelview")?;
        let sul_lighting = program.get_uniform_location("u_lighting")?;
        let sul_texturing = program.get_uniform_location("u_texturing")?;
        let sul_light_direction = program.get_uniform_location("u_light_direction")?;
        let sul_tex = program.get_uniform_location("u_tex")?;

        log::debug!(
            "attribute locations {} {} {} {}, uniform locations {} {} {} {} {} {}",
            sal_position,
            sal_normal,
            sal_tex_coord,
            sal_color,
            sul_projection,
            sul_modelview,
            sul_lighting,
            sul_texturing,
            sul_light_direction,
            sul_tex,
        );

        Ok(Self {
            program,
            sal_position,
            sal_normal,
            sal_tex_coord,
            sal_color,
            sul_projection,
            sul_modelview,
            sul_lighting,
            sul_texturing,
            sul_light_direction,
            sul_tex,
        })
    }

    pub fn vertex_streams(&self) -> VertexStreams {
        VertexStreams {
            position: self.sal_position,
            normal: self.sal_normal,
            tex_coord: self.sal_tex_coord,
            color: self.sal_color,
        }
    }

    /// The values disabled attribute arrays read: white, facing +Z, texel (0,0).
    pub fn set_default_attributes(&self) -> Result<(), GLErrorWrapper> {
        unsafe {
            gl::VertexAttrib4f(self.sal_color, 1.0, 1.0, 1.0, 1.0);
            gl::VertexAttrib3f(self.sal_normal, 0.0, 0.0, 1.0);
            gl::VertexAttrib2f(self.sal_tex_coord, 0.0, 0.0);
        }
        explode_if_gl_error()
    }

    pub fn set_params(&self, params: &FixedFunctionParams) -> Result<(), GLErrorWrapper> {
        self.program.use_()?;

        self.program
            .set_mat4u(self.sul_projection, params.projection.slice())?;
        self.program
            .set_mat4u(self.sul_modelview, params.modelview.slice())?;
        self.program
            .set_uniform_1i(self.sul_lighting, params.lighting as GLint)?;
        self.program
            .set_uniform_1i(self.sul_texturing, params.texturing as GLint)?;
        let [x, y, z] = params.light_direction;
        self.program
            .set_uniform_3f(self.sul_light_direction, x, y, z)?;
        self.program.set_uniform_1i(self.sul_tex, params.texture_unit)
    }
}

fn shader_v_src() -> &'static str {
    "#version 330 core
in vec3 a_position;
in vec3 a_normal;
in vec2 a_tex_coord;
in vec4 a_color;

uniform mat4 u_projection;
uniform mat4 u_modelview;

out vec3 v_normal;
out vec2 v_tex_coord;
out vec4 v_color;

void main()
{
    gl_Position = u_projection * u_modelview * vec4(a_position, 1.0);
    v_normal = mat3(u_modelview) * a_normal;
    v_tex_coord = a_tex_coord;
    v_color = a_color;
}
"
}

fn shader_f_src() -> &'static str {
    "#version 330 core
in vec3 v_normal;
in vec2 v_tex_coord;
in vec4 v_color;

uniform int u_lighting;
uniform int u_texturing;
uniform vec3 u_light_direction;
uniform sampler2D u_tex;

out vec4 frag_color;

void main()
{
    vec4 color = v_color;
    if (u_lighting != 0) {
        // default material: 0.2 ambient, 0.8 diffuse
        vec3 N = normalize(v_normal);
        vec3 L = normalize(u_light_direction);
        float lum = 0.2 * 0.2 + 0.8 * max(0.0, dot(N, L));
        color = vec4(vec3(lum), 1.0);
    }
    if (u_texturing != 0) {
        color *= texture(u_tex, v_tex_coord);
    }
    frag_color = color;
}
"
}

use crate::gl_helper::{explode_if_gl_error, GLBufferType, GLErrorWrapper};
use gl::types::{GLenum, GLint, GLsizei, GLuint};
use std::mem::size_of;
use std::ptr::null;

/// Stand-in for the global GL state machine.  Holding `&mut GPUState` is how code
/// proves it is the only thing poking at bindings right now.
pub struct GPUState {}

impl GPUState {
    pub fn new() -> Self {
        Self {}
    }

    pub fn is_attrib_array_enabled(&mut self, location: GLuint) -> Result<bool, GLErrorWrapper> {
        let mut rval: GLint = 0;
        unsafe { gl::GetVertexAttribiv(location, gl::VERTEX_ATTRIB_ARRAY_ENABLED, &mut rval) };
        explode_if_gl_error()?;
        Ok(rval != 0)
    }

    pub fn set_attrib_array_enabled(
        &mut self,
        location: GLuint,
        enabled: bool,
    ) -> Result<(), GLErrorWrapper> {
        unsafe {
            if enabled {
                gl::EnableVertexAttribArray(location)
            } else {
                gl::DisableVertexAttribArray(location)
            }
        }
        explode_if_gl_error()
    }

    /// point `location` at the start of the buffer currently bound to `GL_ARRAY_BUFFER`
    pub fn rig_one_attribute(
        &mut self,
        location: GLuint,
        layout: AttributeLayout,
    ) -> Result<(), GLErrorWrapper> {
        unsafe {
            gl::VertexAttribPointer(
                location,
                layout.components,
                layout.component_type,
                if layout.normalized { gl::TRUE } else { gl::FALSE },
                layout.stride,
                null(),
            );
        }
        explode_if_gl_error()
    }

    /// draw `n_indices` u32 indices from the bound element array buffer as triangles
    pub fn draw_triangles_u32(&mut self, n_indices: GLsizei) -> Result<(), GLErrorWrapper> {
        unsafe {
            gl::DrawElements(gl::TRIANGLES, n_indices, u32::TYPE_CODE, null());
        }
        explode_if_gl_error()
    }
}

impl Default for GPUState {
    fn default() -> Self {
        Self::new()
    }
}

//

/// How one tightly packed vertex attribute is laid out in its own buffer
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AttributeLayout {
    /// would be 3 for a vec3 or 2 for a vec2
    pub components: GLint,
    pub component_type: GLenum,
    /// integer components are scaled into 0..1
    pub normalized: bool,
    /// bytes from one vertex to the next
    pub stride: GLsizei,
}

impl AttributeLayout {
    pub fn floats(components: GLint) -> Self {
        Self {
            components,
            component_type: f32::TYPE_CODE,
            normalized: false,
            stride: components * size_of::<f32>() as GLsizei,
        }
    }

    pub fn normalized_bytes(components: GLint) -> Self {
        Self {
            components,
            component_type: u8::TYPE_CODE,
            normalized: true,
            stride: components * size_of::<u8>() as GLsizei,
        }
    }
}

/// The program attribute locations that each per-vertex stream feeds
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexStreams {
    pub position: GLuint,
    pub normal: GLuint,
    pub tex_coord: GLuint,
    pub color: GLuint,
}

impl VertexStreams {
    pub fn all(&self) -> [GLuint; 4] {
        [self.position, self.normal, self.tex_coord, self.color]
    }
}

use crate::context::GraphicsContext;
use gl::types::{GLsizei, GLuint};
use gl_thin::gl_fancy::{AttributeLayout, GPUState};
use gl_thin::gl_helper::{
    self, unbind_buffer, Buffer, BufferTarget, BufferUsage, GLErrorWrapper, MappedBuffer,
};

impl GraphicsContext for GPUState {
    type Buffer = Buffer;

    fn create_buffer(&mut self) -> Result<Buffer, GLErrorWrapper> {
        Buffer::new()
    }

    fn bind_buffer<B: BufferTarget>(&mut self, buffer: Option<&Buffer>) -> Result<(), GLErrorWrapper> {
        match buffer {
            Some(buffer) => buffer.bind::<B>(),
            None => unbind_buffer::<B>(),
        }
    }

    fn buffer_data<B: BufferTarget>(
        &mut self,
        bytes: &[u8],
        usage: BufferUsage,
    ) -> Result<(), GLErrorWrapper> {
        gl_helper::buffer_data::<B>(bytes, usage)
    }

    fn buffer_sub_data<B: BufferTarget>(
        &mut self,
        offset: usize,
        bytes: &[u8],
    ) -> Result<(), GLErrorWrapper> {
        gl_helper::buffer_sub_data::<B>(offset, bytes)
    }

    fn buffer_size<B: BufferTarget>(&mut self) -> Result<usize, GLErrorWrapper> {
        gl_helper::bound_buffer_size::<B>()
    }

    fn map_buffer<B: BufferTarget, R>(
        &mut self,
        mutate: impl FnOnce(&mut [u8]) -> R,
    ) -> Result<Option<R>, GLErrorWrapper> {
        // SAFETY: `&mut self` keeps every other buffer operation out until the guard drops
        let mapped = unsafe { MappedBuffer::<B>::map_bound_read_write() }?;
        Ok(mapped.map(|mut mapped| mutate(&mut mapped[..])))
    }

    fn is_attrib_array_enabled(&mut self, location: GLuint) -> Result<bool, GLErrorWrapper> {
        GPUState::is_attrib_array_enabled(self, location)
    }

    fn set_attrib_array_enabled(
        &mut self,
        location: GLuint,
        enabled: bool,
    ) -> Result<(), GLErrorWrapper> {
        GPUState::set_attrib_array_enabled(self, location, enabled)
    }

    fn attrib_pointer(
        &mut self,
        location: GLuint,
        layout: AttributeLayout,
    ) -> Result<(), GLErrorWrapper> {
        self.rig_one_attribute(location, layout)
    }

    fn draw_triangles(&mut self, index_count: usize) -> Result<(), GLErrorWrapper> {
        self.draw_triangles_u32(index_count as GLsizei)
    }
}

use gl::types::GLuint;
use gl_thin::gl_fancy::AttributeLayout;
use gl_thin::gl_helper::{BufferTarget, BufferUsage, GLErrorWrapper};

/// The slice of a graphics API that the vertex buffer code needs.
///
/// Buffer operations act on whatever buffer is currently bound to the target `B`,
/// exactly like the underlying GL calls do.  Implemented for the real GL state in
/// [crate::gl_context], and by a recording fake in the tests.
pub trait GraphicsContext {
    /// An allocated buffer object.  Dropping it releases the GPU storage.
    type Buffer;

    fn create_buffer(&mut self) -> Result<Self::Buffer, GLErrorWrapper>;

    /// `None` unbinds the target
    fn bind_buffer<B: BufferTarget>(
        &mut self,
        buffer: Option<&Self::Buffer>,
    ) -> Result<(), GLErrorWrapper>;

    fn buffer_data<B: BufferTarget>(
        &mut self,
        bytes: &[u8],
        usage: BufferUsage,
    ) -> Result<(), GLErrorWrapper>;

    fn buffer_sub_data<B: BufferTarget>(
        &mut self,
        offset: usize,
        bytes: &[u8],
    ) -> Result<(), GLErrorWrapper>;

    /// the byte length the driver reports for the bound buffer
    fn buffer_size<B: BufferTarget>(&mut self) -> Result<usize, GLErrorWrapper>;

    /// Map the bound buffer read/write, hand its bytes to `mutate`, then unmap.
    /// The unmap happens no matter how `mutate` returns.
    /// `Ok(None)` means the mapping could not be obtained and `mutate` never ran.
    fn map_buffer<B: BufferTarget, R>(
        &mut self,
        mutate: impl FnOnce(&mut [u8]) -> R,
    ) -> Result<Option<R>, GLErrorWrapper>;

    fn is_attrib_array_enabled(&mut self, location: GLuint) -> Result<bool, GLErrorWrapper>;

    fn set_attrib_array_enabled(
        &mut self,
        location: GLuint,
        enabled: bool,
    ) -> Result<(), GLErrorWrapper>;

    /// source attribute `location` from the buffer bound to the array target
    fn attrib_pointer(
        &mut self,
        location: GLuint,
        layout: AttributeLayout,
    ) -> Result<(), GLErrorWrapper>;

    /// one indexed triangle draw of `index_count` u32 indices from the bound element array
    fn draw_triangles(&mut self, index_count: usize) -> Result<(), GLErrorWrapper>;
}

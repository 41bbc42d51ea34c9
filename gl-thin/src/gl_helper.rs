use gl::types::{GLchar, GLenum, GLint, GLintptr, GLsizei, GLsizeiptr, GLuint};
use std::ffi::{c_void, CString};
use std::fmt::{Debug, Display, Formatter};
use std::marker::PhantomData;
use std::mem::{size_of, MaybeUninit};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

/// `loader` is typically the `get_proc_address` of whatever created the GL context
pub fn initialize_gl_with(mut loader: impl FnMut(&str) -> *const c_void) {
    gl::load_with(|name| loader(name));
}

pub fn explode_if_gl_error() -> Result<(), GLErrorWrapper> {
    let mut last_err = None;
    loop {
        let err = unsafe { gl::GetError() };
        if err == gl::NO_ERROR {
            break;
        } else {
            last_err = Some(err);
        }
    }

    match last_err {
        Some(e) => Err(GLErrorWrapper::new(e)),
        None => Ok(()),
    }
}

//

#[derive(Clone)]
pub enum MessageForError {
    None,
    CStr(CString),
    Str(String),
}

#[derive(Clone)]
pub struct GLErrorWrapper {
    pub code: GLenum,
    pub message: MessageForError,
}

impl GLErrorWrapper {
    pub fn with_info_log(msg: CString) -> Self {
        Self {
            code: 0,
            message: MessageForError::CStr(msg),
        }
    }

    pub fn with_message(msg: impl Into<String>) -> Self {
        Self {
            code: 0,
            message: MessageForError::Str(msg.into()),
        }
    }

    pub fn new(code: GLenum) -> Self {
        Self {
            code,
            message: MessageForError::None,
        }
    }
}

impl Debug for GLErrorWrapper {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            MessageForError::CStr(msg) => write!(f, "{:?}", msg),
            MessageForError::Str(msg) => write!(f, "{:?}", msg),
            MessageForError::None => write!(f, "GL error 0x{:x}", self.code),
        }
    }
}

impl Display for GLErrorWrapper {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        <Self as Debug>::fmt(self, f)
    }
}

impl std::error::Error for GLErrorWrapper {}

//

pub trait BufferTarget {
    const TARGET: GLenum;
}

pub struct ArrayBufferType {}
impl BufferTarget for ArrayBufferType {
    const TARGET: GLenum = gl::ARRAY_BUFFER;
}

pub struct ElementArrayBufferType {}
impl BufferTarget for ElementArrayBufferType {
    const TARGET: GLenum = gl::ELEMENT_ARRAY_BUFFER;
}

/// The usage hint handed to `glBufferData`
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferUsage {
    /// written once, drawn many times
    StaticDraw,
    /// rewritten often, drawn many times
    DynamicDraw,
}

impl BufferUsage {
    pub fn gl_enum(self) -> GLenum {
        match self {
            BufferUsage::StaticDraw => gl::STATIC_DRAW,
            BufferUsage::DynamicDraw => gl::DYNAMIC_DRAW,
        }
    }
}

//

pub struct VertexArray(GLuint);

impl VertexArray {
    pub fn new() -> Result<Self, GLErrorWrapper> {
        let mut rval = MaybeUninit::uninit();
        unsafe { gl::GenVertexArrays(1, rval.as_mut_ptr()) };
        explode_if_gl_error()?;
        Ok(Self(unsafe { rval.assume_init() }))
    }

    pub fn bind(&self) -> Result<(), GLErrorWrapper> {
        unsafe { gl::BindVertexArray(self.0) }
        explode_if_gl_error()
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        unsafe { gl::DeleteVertexArrays(1, &self.0) }
    }
}

//

/// A GL buffer object.  It is not tied to a target until it is bound;
/// the object is deleted when this is dropped.
pub struct Buffer {
    handle: GLuint,
}

impl Buffer {
    pub fn new() -> Result<Self, GLErrorWrapper> {
        let mut rval = MaybeUninit::uninit();
        unsafe { gl::GenBuffers(1, rval.as_mut_ptr()) };
        explode_if_gl_error()?;

        Ok(Buffer {
            handle: unsafe { rval.assume_init() },
        })
    }

    pub fn bind<B: BufferTarget>(&self) -> Result<(), GLErrorWrapper> {
        unsafe { gl::BindBuffer(B::TARGET, self.handle) };
        explode_if_gl_error()
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe { gl::DeleteBuffers(1, &self.handle) }
    }
}

pub fn unbind_buffer<B: BufferTarget>() -> Result<(), GLErrorWrapper> {
    unsafe { gl::BindBuffer(B::TARGET, 0) };
    explode_if_gl_error()
}

/// replace the whole data store of whatever buffer is bound to `B`
pub fn buffer_data<B: BufferTarget>(bytes: &[u8], usage: BufferUsage) -> Result<(), GLErrorWrapper> {
    unsafe {
        gl::BufferData(
            B::TARGET,
            bytes.len() as GLsizeiptr,
            bytes.as_ptr() as *const c_void,
            usage.gl_enum(),
        )
    }
    explode_if_gl_error()
}

/// overwrite `bytes.len()` bytes starting at `offset` of the buffer bound to `B`
pub fn buffer_sub_data<B: BufferTarget>(offset: usize, bytes: &[u8]) -> Result<(), GLErrorWrapper> {
    unsafe {
        gl::BufferSubData(
            B::TARGET,
            offset as GLintptr,
            bytes.len() as GLsizeiptr,
            bytes.as_ptr() as *const c_void,
        )
    }
    explode_if_gl_error()
}

/// the size of the bound buffer's data store as reported by the driver
pub fn bound_buffer_size<B: BufferTarget>() -> Result<usize, GLErrorWrapper> {
    let mut rval: GLint = 0;
    unsafe { gl::GetBufferParameteriv(B::TARGET, gl::BUFFER_SIZE, &mut rval) };
    explode_if_gl_error()?;
    Ok(rval.max(0) as usize)
}

//

/// A read/write CPU view of the data store of the buffer bound to `B`.
/// The view is released with `glUnmapBuffer` when this is dropped.
pub struct MappedBuffer<B: BufferTarget> {
    ptr: NonNull<u8>,
    len: usize,
    phantom_data: PhantomData<(*mut u8, B)>,
}

impl<B: BufferTarget> MappedBuffer<B> {
    /// Returns `Ok(None)` when the driver declines to map the buffer.
    ///
    /// # Safety
    /// The buffer bound to `B` must stay bound and alive until the returned guard is dropped,
    /// and nothing else may touch that buffer in the meantime.
    pub unsafe fn map_bound_read_write() -> Result<Option<Self>, GLErrorWrapper> {
        let len = bound_buffer_size::<B>()?;
        let raw = unsafe { gl::MapBuffer(B::TARGET, gl::READ_WRITE) };
        let ptr = NonNull::new(raw as *mut u8);
        if ptr.is_none() {
            // a failed map leaves an error in the queue; drain it, the caller just skips
            let _ = explode_if_gl_error();
        }
        Ok(ptr.map(|ptr| Self {
            ptr,
            len,
            phantom_data: PhantomData,
        }))
    }
}

impl<B: BufferTarget> Deref for MappedBuffer<B> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<B: BufferTarget> DerefMut for MappedBuffer<B> {
    fn deref_mut(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<B: BufferTarget> Drop for MappedBuffer<B> {
    fn drop(&mut self) {
        let intact = unsafe { gl::UnmapBuffer(B::TARGET) };
        // drain here so the next call is not blamed for an unmap error
        report_unmap(B::TARGET, intact != gl::FALSE, explode_if_gl_error());
    }
}

/// Log anything that went wrong releasing a mapping.  Returns true for a clean unmap.
fn report_unmap(target: GLenum, intact: bool, drained: Result<(), GLErrorWrapper>) -> bool {
    if let Err(e) = &drained {
        log::warn!("unmapping target 0x{:x} raised {}", target, e);
    }
    if !intact {
        log::warn!("buffer contents were lost while mapped (target 0x{:x})", target);
    }
    intact && drained.is_ok()
}

//

pub trait ShaderFlavor {
    const FLAVOR: GLenum;
}

pub struct VertexShader {}
impl ShaderFlavor for VertexShader {
    const FLAVOR: GLenum = gl::VERTEX_SHADER;
}

pub struct FragmentShader {}
impl ShaderFlavor for FragmentShader {
    const FLAVOR: GLenum = gl::FRAGMENT_SHADER;
}

//

pub struct Shader<T> {
    handle: GLuint,
    phantom_data: PhantomData<T>,
}

impl<F: ShaderFlavor> Shader<F> {
    pub fn new_raw() -> Result<Self, GLErrorWrapper> {
        let rval = unsafe { gl::CreateShader(F::FLAVOR) };
        explode_if_gl_error()?;
        Ok(Self {
            handle: rval,
            phantom_data: Default::default(),
        })
    }

    pub fn compile(source: impl AsRef<str>) -> Result<Self, GLErrorWrapper> {
        let rval = Self::new_raw()?;
        let bytes = source.as_ref().as_bytes();
        let strings = [bytes.as_ptr() as *const GLchar];
        let lengths = [bytes.len() as GLint];
        unsafe { gl::ShaderSource(rval.borrow(), 1, strings.as_ptr(), lengths.as_ptr()) };
        explode_if_gl_error()?;
        unsafe { gl::CompileShader(rval.borrow()) };
        explode_if_gl_error()?;

        let mut is_compiled = 0;
        unsafe { gl::GetShaderiv(rval.borrow(), gl::COMPILE_STATUS, &mut is_compiled) };
        if is_compiled == 0 {
            Err(GLErrorWrapper::with_info_log(rval.get_shader_info_log()))
        } else {
            Ok(rval)
        }
    }
}

impl<F> Shader<F> {
    /// get access to the GL handle in case you need to call some low-level stuff
    pub fn borrow(&self) -> GLuint {
        self.handle
    }

    pub fn get_shader_info_log(&self) -> CString {
        let mut max_length = 0;
        unsafe { gl::GetShaderiv(self.borrow(), gl::INFO_LOG_LENGTH, &mut max_length) };
        let mut error_log: Vec<GLchar> = Vec::with_capacity(max_length.max(0) as usize);
        unsafe {
            gl::GetShaderInfoLog(
                self.borrow(),
                max_length,
                &mut max_length,
                error_log.as_mut_ptr(),
            );
            error_log.set_len(max_length.max(0) as usize);
        }
        info_log_to_cstring(error_log)
    }
}

impl<F> Drop for Shader<F> {
    fn drop(&mut self) {
        unsafe { gl::DeleteShader(self.handle) }
    }
}

//

pub struct Program(GLuint);

impl Program {
    pub fn new_empty() -> Result<Self, GLErrorWrapper> {
        let rval = unsafe { gl::CreateProgram() };
        explode_if_gl_error()?;
        Ok(Self(rval))
    }

    pub fn compile(
        vertex_shader: impl AsRef<str>,
        fragment_shader: impl AsRef<str>,
    ) -> Result<Self, GLErrorWrapper> {
        let vertex_shader = Shader::<VertexShader>::compile(vertex_shader.as_ref())?;
        let fragment_shader = Shader::<FragmentShader>::compile(fragment_shader.as_ref())?;

        let mut rval = Self::new_empty()?;
        rval.attach(&vertex_shader)?;
        rval.attach(&fragment_shader)?;

        unsafe { gl::LinkProgram(rval.borrow()) };
        explode_if_gl_error()?;

        let mut link_status = 0;
        unsafe { gl::GetProgramiv(rval.borrow(), gl::LINK_STATUS, &mut link_status) };
        explode_if_gl_error()?;
        if link_status == 0 {
            return Err(GLErrorWrapper::with_info_log(rval.get_program_info_log()));
        }

        rval.detach(&vertex_shader);
        rval.detach(&fragment_shader);

        Ok(rval)
    }

    pub fn borrow(&self) -> GLuint {
        self.0
    }

    fn attach<T>(&mut self, shader: &Shader<T>) -> Result<(), GLErrorWrapper> {
        unsafe { gl::AttachShader(self.borrow(), shader.borrow()) };
        explode_if_gl_error()
    }

    fn detach<T>(&mut self, shader: &Shader<T>) {
        unsafe { gl::DetachShader(self.borrow(), shader.borrow()) };
    }

    pub fn use_(&self) -> Result<(), GLErrorWrapper> {
        unsafe { gl::UseProgram(self.0) }
        explode_if_gl_error()
    }

    pub fn get_uniform_location(&self, name: &str) -> Result<GLint, GLErrorWrapper> {
        let c_name = CString::new(name)
            .map_err(|_| GLErrorWrapper::with_message(format!("bad uniform name {:?}", name)))?;
        let rval = unsafe { gl::GetUniformLocation(self.0, c_name.as_ptr()) };
        explode_if_gl_error()?;
        if rval < 0 {
            return Err(GLErrorWrapper::with_message(format!(
                "no uniform named {}",
                name
            )));
        }
        Ok(rval)
    }

    pub fn get_attribute_location(&self, name: &str) -> Result<GLuint, GLErrorWrapper> {
        let c_name = CString::new(name)
            .map_err(|_| GLErrorWrapper::with_message(format!("bad attribute name {:?}", name)))?;
        let rval = unsafe { gl::GetAttribLocation(self.0, c_name.as_ptr()) };
        explode_if_gl_error()?;
        if rval < 0 {
            Err(GLErrorWrapper::with_message(format!(
                "no attribute named {} on this program",
                name
            )))
        } else {
            Ok(rval as GLuint)
        }
    }

    //

    pub fn set_uniform_1i(&self, location: GLint, v0: GLint) -> Result<(), GLErrorWrapper> {
        unsafe { gl::Uniform1i(location, v0) }
        explode_if_gl_error()
    }

    pub fn set_uniform_3f(
        &self,
        location: GLint,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<(), GLErrorWrapper> {
        unsafe { gl::Uniform3f(location, x, y, z) }
        explode_if_gl_error()
    }

    pub fn set_mat4u(&self, location: GLint, val: &[f32; 16]) -> Result<(), GLErrorWrapper> {
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, val.as_ptr()) }
        explode_if_gl_error()
    }

    pub fn get_program_info_log(&self) -> CString {
        let mut max_length = 0;
        unsafe { gl::GetProgramiv(self.borrow(), gl::INFO_LOG_LENGTH, &mut max_length) };
        let mut error_log: Vec<GLchar> = Vec::with_capacity(max_length.max(0) as usize);
        unsafe {
            gl::GetProgramInfoLog(
                self.borrow(),
                max_length,
                &mut max_length,
                error_log.as_mut_ptr(),
            );
            error_log.set_len(max_length.max(0) as usize);
        }
        info_log_to_cstring(error_log)
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.0) }
    }
}

fn info_log_to_cstring(src: Vec<GLchar>) -> CString {
    let bytes: Vec<u8> = src
        .into_iter()
        .map(|x| x as u8)
        .take_while(|&x| x != 0)
        .collect();
    // interior NULs were cut off above
    CString::new(bytes).unwrap_or_default()
}

//

pub struct Texture(GLuint);

impl Texture {
    pub fn new() -> Result<Self, GLErrorWrapper> {
        let mut rval = MaybeUninit::uninit();
        unsafe { gl::GenTextures(1, rval.as_mut_ptr()) };
        explode_if_gl_error()?;
        Ok(Self(unsafe { rval.assume_init() }))
    }

    pub fn borrow(&self) -> GLuint {
        self.0
    }

    pub fn bind(&self, target: GLenum) -> Result<(), GLErrorWrapper> {
        unsafe { gl::BindTexture(target, self.0) };
        explode_if_gl_error()
    }

    /// bind before calling this
    pub fn set_linear_filtering(&self, target: GLenum) -> Result<(), GLErrorWrapper> {
        unsafe {
            gl::TexParameteri(target, gl::TEXTURE_MIN_FILTER, gl::LINEAR as GLint);
            gl::TexParameteri(target, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
        }
        explode_if_gl_error()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn write_pixels<T: GLBufferType>(
        &mut self,
        target: GLenum,
        level: GLint,
        internal_format: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        pixels: &[T],
    ) -> Result<(), GLErrorWrapper> {
        let bpp = bytes_per_pixel::<T>(format)?;
        if (width * height) as usize * bpp != pixels.len() * size_of::<T>() {
            return Err(GLErrorWrapper::with_message(format!(
                "size mismatch : {}*{}*{} != {}",
                width,
                height,
                bpp,
                pixels.len()
            )));
        }
        self.bind(target)?;
        unsafe {
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                target,
                level,
                internal_format,
                width,
                height,
                0,
                format,
                T::TYPE_CODE,
                pixels.as_ptr() as *const _,
            );
        }
        explode_if_gl_error()
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe { gl::DeleteTextures(1, &self.0) }
    }
}

//

pub trait GLBufferType {
    const TYPE_CODE: GLenum;
}

impl GLBufferType for f32 {
    const TYPE_CODE: GLenum = gl::FLOAT;
}

impl GLBufferType for u8 {
    const TYPE_CODE: GLenum = gl::UNSIGNED_BYTE;
}

impl GLBufferType for u32 {
    const TYPE_CODE: GLenum = gl::UNSIGNED_INT;
}

pub fn bytes_per_pixel<T: GLBufferType>(format: GLenum) -> Result<usize, GLErrorWrapper> {
    let channels = match format {
        gl::RGB => 3,
        gl::RED => 1,
        gl::RGBA => 4,
        _ => {
            return Err(GLErrorWrapper::with_message(format!(
                "unhandled format 0x{:x}",
                format
            )));
        }
    };

    Ok(channels * size_of::<T>())
}

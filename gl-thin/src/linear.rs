// column-major 4x4 matrices, laid out the way glUniformMatrix4fv wants them

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix4x4f {
    m: [f32; 16],
}

impl Matrix4x4f {
    pub fn slice(&self) -> &[f32; 16] {
        &self.m
    }
}

impl From<[f32; 16]> for Matrix4x4f {
    fn from(m: [f32; 16]) -> Self {
        Self { m }
    }
}

impl<'a, 'b> std::ops::Mul<&'a Matrix4x4f> for &'b Matrix4x4f {
    type Output = Matrix4x4f;

    fn mul(self, rhs: &Matrix4x4f) -> Self::Output {
        matrix4x4f_multiply(self, rhs)
    }
}

impl std::ops::Mul<Matrix4x4f> for Matrix4x4f {
    type Output = Matrix4x4f;

    fn mul(self, rhs: Matrix4x4f) -> Self::Output {
        matrix4x4f_multiply(&self, &rhs)
    }
}

//

#[derive(Default, Copy, Clone, Debug, PartialEq)]
pub struct Vector3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3f {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, rhs: &Vector3f) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn cross(&self, rhs: &Vector3f) -> Vector3f {
        Vector3f {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    pub fn normalized(&self) -> Vector3f {
        let len = self.dot(self).sqrt();
        if len == 0.0 {
            *self
        } else {
            Vector3f::new(self.x / len, self.y / len, self.z / len)
        }
    }
}

impl std::ops::Sub for Vector3f {
    type Output = Vector3f;

    fn sub(self, rhs: Self) -> Self::Output {
        Vector3f::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

//

/// OpenGL style perspective projection with a [-1,1] Z clip space.
/// `fov_y` is the full vertical field of view in radians.
pub fn matrix4x4f_create_perspective(fov_y: f32, aspect: f32, near_z: f32, far_z: f32) -> Matrix4x4f {
    let f = 1.0 / (fov_y / 2.0).tan();
    let depth = near_z - far_z;

    let mut m = [0.0; 16];
    m[0] = f / aspect;
    m[5] = f;
    m[10] = (far_z + near_z) / depth;
    m[11] = -1.0;
    m[14] = 2.0 * far_z * near_z / depth;
    m.into()
}

/// view matrix for a camera at `eye` looking at `target`
pub fn matrix4x4f_look_at(eye: &Vector3f, target: &Vector3f, up: &Vector3f) -> Matrix4x4f {
    let f = (*target - *eye).normalized();
    let s = f.cross(up).normalized();
    let u = s.cross(&f);

    #[rustfmt::skip]
    let m = [
        s.x, u.x, -f.x, 0.0,
        s.y, u.y, -f.y, 0.0,
        s.z, u.z, -f.z, 0.0,
        -s.dot(eye), -u.dot(eye), f.dot(eye), 1.0,
    ];
    m.into()
}

/// right-handed rotation of `radians` about the +Y axis
pub fn matrix4x4f_create_rotation_y(radians: f32) -> Matrix4x4f {
    let (sin, cos) = radians.sin_cos();
    #[rustfmt::skip]
    let m = [
        cos, 0.0, -sin, 0.0,
        0.0, 1.0, 0.0, 0.0,
        sin, 0.0, cos, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ];
    m.into()
}

pub fn matrix4x4f_multiply(a: &Matrix4x4f, b: &Matrix4x4f) -> Matrix4x4f {
    let mut m = [0.0; 16];
    for col in 0..4 {
        for row in 0..4 {
            m[col * 4 + row] = (0..4).map(|k| a.m[k * 4 + row] * b.m[col * 4 + k]).sum();
        }
    }
    m.into()
}

pub fn matrix4x4f_transform_vector3f(m: &Matrix4x4f, v: &Vector3f) -> Vector3f {
    let m = &m.m;
    let w = m[3] * v.x + m[7] * v.y + m[11] * v.z + m[15];
    let w = if w.abs() > f32::EPSILON { w } else { 1.0 };
    Vector3f::new(
        (m[0] * v.x + m[4] * v.y + m[8] * v.z + m[12]) / w,
        (m[1] * v.x + m[5] * v.y + m[9] * v.z + m[13]) / w,
        (m[2] * v.x + m[6] * v.y + m[10] * v.z + m[14]) / w,
    )
}

use std::f64::consts::PI;

/// Element tolerance used by [`Matrix3::is_identity`].
const EPSILON: f64 = 1e-6;

/// A 3x3 matrix representing a 2D transform in homogeneous coordinates.
///
/// The coefficients are stored row-major, so a point `(x, y)` maps to
/// `(m[0][0] * x + m[0][1] * y + m[0][2], m[1][0] * x + m[1][1] * y + m[1][2])`
/// divided by the homogeneous `w` of the last row.
///
/// The in-place builders [`Matrix3::scale`], [`Matrix3::translate`] and
/// [`Matrix3::rotate`] left-multiply the current matrix, so each call applies
/// its transform *after* everything composed so far.
///
/// # Example
///
/// ```
/// use brushstamp_imgproc::matrix::Matrix3;
///
/// let mut m = Matrix3::identity();
/// m.scale(2.0, 2.0);
/// m.translate(1.0, 0.0);
///
/// assert_eq!(m.transform_point(1.0, 1.0), (3.0, 2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3 {
    /// The matrix coefficients, `coeff[row][col]`.
    pub coeff: [[f64; 3]; 3],
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix3 {
    /// The identity matrix.
    pub fn identity() -> Self {
        Self {
            coeff: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Create a matrix from row-major coefficients.
    pub fn from_rows(coeff: [[f64; 3]; 3]) -> Self {
        Self { coeff }
    }

    /// Translate by `(x, y)` after the current transform.
    pub fn translate(&mut self, x: f64, y: f64) {
        let [g, h, i] = self.coeff[2];

        self.coeff[0][0] += x * g;
        self.coeff[0][1] += x * h;
        self.coeff[0][2] += x * i;
        self.coeff[1][0] += y * g;
        self.coeff[1][1] += y * h;
        self.coeff[1][2] += y * i;
    }

    /// Scale by `(x, y)` after the current transform.
    pub fn scale(&mut self, x: f64, y: f64) {
        self.coeff[0].iter_mut().for_each(|c| *c *= x);
        self.coeff[1].iter_mut().for_each(|c| *c *= y);
    }

    /// Rotate by `theta` radians after the current transform.
    ///
    /// With y pointing down, a positive angle turns clockwise on screen.
    pub fn rotate(&mut self, theta: f64) {
        let (sint, cost) = theta.sin_cos();

        for i in 0..3 {
            let t1 = self.coeff[0][i];
            let t2 = self.coeff[1][i];

            self.coeff[0][i] = cost * t1 - sint * t2;
            self.coeff[1][i] = sint * t1 + cost * t2;
        }
    }

    /// Rotate by a fraction of a full turn, e.g. `0.25` for a quarter turn.
    pub fn rotate_turns(&mut self, turns: f64) {
        self.rotate(2.0 * PI * turns);
    }

    /// Determinant of the matrix.
    pub fn determinant(&self) -> f64 {
        let m = &self.coeff;

        let mut determinant = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1]);
        determinant -= m[1][0] * (m[0][1] * m[2][2] - m[0][2] * m[2][1]);
        determinant += m[2][0] * (m[0][1] * m[1][2] - m[0][2] * m[1][1]);

        determinant
    }

    /// Invert the matrix in place.
    ///
    /// A singular matrix is left untouched and `false` is returned.
    pub fn invert(&mut self) -> bool {
        let det = self.determinant();
        if det == 0.0 {
            return false;
        }
        let det = 1.0 / det;
        let m = self.coeff;

        self.coeff = [
            [
                (m[1][1] * m[2][2] - m[2][1] * m[1][2]) * det,
                -(m[0][1] * m[2][2] - m[2][1] * m[0][2]) * det,
                (m[0][1] * m[1][2] - m[1][1] * m[0][2]) * det,
            ],
            [
                -(m[1][0] * m[2][2] - m[2][0] * m[1][2]) * det,
                (m[0][0] * m[2][2] - m[2][0] * m[0][2]) * det,
                -(m[0][0] * m[1][2] - m[1][0] * m[0][2]) * det,
            ],
            [
                (m[1][0] * m[2][1] - m[2][0] * m[1][1]) * det,
                -(m[0][0] * m[2][1] - m[2][0] * m[0][1]) * det,
                (m[0][0] * m[1][1] - m[1][0] * m[0][1]) * det,
            ],
        ];

        true
    }

    /// Return the inverse of the matrix, or `None` if it is singular.
    pub fn inverted(&self) -> Option<Matrix3> {
        let mut inv = *self;
        inv.invert().then_some(inv)
    }

    /// Map a point through the matrix.
    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.coeff;

        let w = m[2][0] * x + m[2][1] * y + m[2][2];
        let w = if w == 0.0 { 1.0 } else { 1.0 / w };

        (
            (m[0][0] * x + m[0][1] * y + m[0][2]) * w,
            (m[1][0] * x + m[1][1] * y + m[1][2]) * w,
        )
    }

    /// Whether the matrix equals the identity within `1e-6` per element.
    pub fn is_identity(&self) -> bool {
        self.coeff.iter().enumerate().all(|(i, row)| {
            row.iter().enumerate().all(|(j, &c)| {
                let expected = if i == j { 1.0 } else { 0.0 };
                (c - expected).abs() <= EPSILON
            })
        })
    }
}

// Matrix-matrix multiplication
impl std::ops::Mul<Matrix3> for Matrix3 {
    type Output = Matrix3;

    fn mul(self, rhs: Matrix3) -> Self::Output {
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = (0..3).map(|k| self.coeff[i][k] * rhs.coeff[k][j]).sum();
            }
        }
        Matrix3 { coeff: out }
    }
}

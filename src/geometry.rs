//! Small fixed-size linear algebra used by the hull builder and the sphere solvers.
//!
//! Points are plain `[f64; 3]` arrays throughout the crate, matching the flat
//! coordinate style of the rest of the library.

#[inline]
pub fn sub(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn add(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn scale(a: &[f64; 3], s: f64) -> [f64; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn norm_sq(a: &[f64; 3]) -> f64 {
    dot(a, a)
}

#[inline]
pub fn norm(a: &[f64; 3]) -> f64 {
    norm_sq(a).sqrt()
}

#[inline]
pub fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    norm(&sub(a, b))
}

/// Linear interpolation `a + (b - a) * t`.
#[inline]
pub fn lerp(a: &[f64; 3], b: &[f64; 3], t: f64) -> [f64; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Determinant of a 3x3 matrix given by rows.
#[inline]
pub fn det3(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Determinant of a 4x4 matrix by cofactor expansion along the first row.
pub fn det4(m: &[[f64; 4]; 4]) -> f64 {
    let mut det = 0.0;
    for col in 0..4 {
        let mut minor = [[0.0; 3]; 3];
        for row in 1..4 {
            let mut k = 0;
            for c in 0..4 {
                if c == col {
                    continue;
                }
                minor[row - 1][k] = m[row][c];
                k += 1;
            }
        }
        let sign = if col % 2 == 0 { 1.0 } else { -1.0 };
        det += sign * m[0][col] * det3(&minor);
    }
    det
}

/// Determinant of an arbitrary square matrix by Gaussian elimination with partial pivoting.
pub fn determinant<const N: usize>(mut m: [[f64; N]; N]) -> f64 {
    let mut det = 1.0;
    for col in 0..N {
        let mut pivot = col;
        for row in (col + 1)..N {
            if m[row][col].abs() > m[pivot][col].abs() {
                pivot = row;
            }
        }
        if m[pivot][col] == 0.0 {
            return 0.0;
        }
        if pivot != col {
            m.swap(pivot, col);
            det = -det;
        }
        det *= m[col][col];
        for row in (col + 1)..N {
            let factor = m[row][col] / m[col][col];
            for c in col..N {
                m[row][c] -= factor * m[col][c];
            }
        }
    }
    det
}

/// Generalized cross product of the `D - 1` edge vectors spanning a hyperplane.
///
/// Component `k` is the determinant of the matrix whose first row is the unit
/// vector `e_k` and whose remaining rows are the edges, so the result is
/// orthogonal to every edge. A zero vector means the edges are linearly dependent.
pub fn hyperplane_normal<const D: usize>(edges: &[[f64; D]]) -> [f64; D] {
    debug_assert_eq!(edges.len() + 1, D, "a hyperplane in {} dimensions needs {} edges", D, D - 1);
    let mut normal = [0.0; D];
    for (k, n) in normal.iter_mut().enumerate() {
        let mut m = [[0.0; D]; D];
        m[0][k] = 1.0;
        for (row, edge) in edges.iter().enumerate() {
            m[row + 1] = *edge;
        }
        *n = determinant(m);
    }
    normal
}

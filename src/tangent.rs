//! Closed-form sphere solvers.
//!
//! [`circumsphere`] follows the classic 4x4 minor expansion of the augmented
//! coordinate matrix; [`tangent_sphere`] turns it into the sphere tangent to
//! four equal spheres, and [`tangent_sphere_of_three`] solves the tangency
//! problem for the three (possibly unequal) spheres of a gate.

use crate::error::GeometryError;
use crate::geometry::{self, det4};
use crate::sphere::Sphere;

/// Sphere through four points.
///
/// The points are shifted so the first one sits at the origin before the
/// minors are expanded, which keeps the squared-norm column small.
pub fn circumsphere(points: &[[f64; 3]; 4]) -> Result<Sphere, GeometryError> {
    let origin = points[0];
    let rel: Vec<[f64; 3]> = points.iter().map(|p| geometry::sub(p, &origin)).collect();
    let sq: Vec<f64> = rel.iter().map(geometry::norm_sq).collect();

    let mut m11 = [[0.0; 4]; 4];
    let mut m12 = [[0.0; 4]; 4];
    let mut m13 = [[0.0; 4]; 4];
    let mut m14 = [[0.0; 4]; 4];
    let mut m15 = [[0.0; 4]; 4];
    for i in 0..4 {
        let [x, y, z] = rel[i];
        let s = sq[i];
        m11[i] = [x, y, z, 1.0];
        m12[i] = [s, y, z, 1.0];
        m13[i] = [s, x, z, 1.0];
        m14[i] = [s, x, y, 1.0];
        m15[i] = [s, x, y, z];
    }

    let d11 = det4(&m11);
    if d11 == 0.0 {
        return Err(GeometryError::Coplanar { determinant: d11 });
    }

    let cx = 0.5 * det4(&m12) / d11;
    let cy = -0.5 * det4(&m13) / d11;
    let cz = 0.5 * det4(&m14) / d11;
    let r_sq = cx * cx + cy * cy + cz * cz - det4(&m15) / d11;

    let sphere = Sphere::new([cx + origin[0], cy + origin[1], cz + origin[2]], r_sq.max(0.0).sqrt());
    if !sphere.is_finite() {
        return Err(GeometryError::NonFinite);
    }
    Ok(sphere)
}

/// Sphere tangent to four spheres of the common radius `radius` centered at `points`.
///
/// The result is the circumsphere shrunk by `radius`; a negative radius means
/// the four spheres overlap around their Voronoi vertex.
pub fn tangent_sphere(points: &[[f64; 3]; 4], radius: f64) -> Result<Sphere, GeometryError> {
    let sphere = circumsphere(points)?;
    Ok(Sphere::new(sphere.center, sphere.radius - radius))
}

/// Smallest sphere externally tangent to three spheres, centered in their plane.
pub fn tangent_sphere_of_three(a: &Sphere, b: &Sphere, c: &Sphere) -> Result<Sphere, GeometryError> {
    let ab = geometry::sub(&b.center, &a.center);
    let ac = geometry::sub(&c.center, &a.center);
    let normal = geometry::cross(&ab, &ac);
    let d = geometry::norm(&ab);
    let normal_len = geometry::norm(&normal);
    if d == 0.0 || normal_len <= 1e-12 * d * geometry::norm(&ac) {
        return Err(GeometryError::Collinear);
    }

    // Orthonormal frame of the plane with `a` at the origin and `b` on the first axis.
    let e1 = geometry::scale(&ab, 1.0 / d);
    let e2 = geometry::cross(&geometry::scale(&normal, 1.0 / normal_len), &e1);
    let px = geometry::dot(&ac, &e1);
    let py = geometry::dot(&ac, &e2);

    let (r1, r2, r3) = (a.radius, b.radius, c.radius);

    // Pairwise differences of |x - c_i|^2 = (r + r_i)^2 are linear in (u, v, r):
    // u = au + bu * r and v = av + bv * r.
    let au = (d * d + r1 * r1 - r2 * r2) / (2.0 * d);
    let bu = -(r2 - r1) / d;
    let av = (px * px + py * py + r1 * r1 - r3 * r3 - 2.0 * px * au) / (2.0 * py);
    let bv = (-2.0 * px * bu - 2.0 * (r3 - r1)) / (2.0 * py);

    // Substituting into u^2 + v^2 = (r + r1)^2 leaves a quadratic in r.
    let qa = bu * bu + bv * bv - 1.0;
    let qb = 2.0 * (au * bu + av * bv - r1);
    let qc = au * au + av * av - r1 * r1;

    let min_radius = -r1.min(r2).min(r3);
    let mut roots = Vec::with_capacity(2);
    if qa.abs() < 1e-12 {
        if qb != 0.0 {
            roots.push(-qc / qb);
        }
    } else {
        let disc = qb * qb - 4.0 * qa * qc;
        if disc < 0.0 {
            return Err(GeometryError::NoTangentSphere);
        }
        let sq = disc.sqrt();
        roots.push((-qb - sq) / (2.0 * qa));
        roots.push((-qb + sq) / (2.0 * qa));
    }

    let r = roots
        .into_iter()
        .filter(|r| r.is_finite() && *r >= min_radius)
        .fold(f64::INFINITY, f64::min);
    if !r.is_finite() {
        return Err(GeometryError::NoTangentSphere);
    }

    let u = au + bu * r;
    let v = av + bv * r;
    let center = geometry::add(
        &a.center,
        &geometry::add(&geometry::scale(&e1, u), &geometry::scale(&e2, v)),
    );
    Ok(Sphere::new(center, r))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circumsphere_unit_corner() {
        let s = circumsphere(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ])
        .unwrap();
        for i in 0..3 {
            assert!((s.center[i] - 0.5).abs() < 1e-12);
        }
        assert!((s.radius - 0.75f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_tangent_sphere_of_points_on_known_sphere() {
        let center = [12.5, -3.25, 40.0];
        let r0 = 2.75;
        let offset = 1.5;
        let dirs = [
            [0.3, 0.4, 0.866_025_403_784_438_6],
            [-0.8, 0.6, 0.0],
            [0.0, -1.0, 0.0],
            [0.6, 0.0, -0.8],
        ];
        let mut points = [[0.0; 3]; 4];
        for (p, d) in points.iter_mut().zip(&dirs) {
            let n = geometry::norm(d);
            *p = geometry::add(&center, &geometry::scale(d, (r0 + offset) / n));
        }
        let s = tangent_sphere(&points, offset).unwrap();
        for i in 0..3 {
            assert!((s.center[i] - center[i]).abs() < 1e-6, "center mismatch on axis {}", i);
        }
        assert!((s.radius - r0).abs() < 1e-6, "expected radius {}, got {}", r0, s.radius);
    }

    #[test]
    fn test_coplanar_points_fail() {
        let err = circumsphere(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ])
        .unwrap_err();
        assert!(matches!(err, GeometryError::Coplanar { .. }));
    }

    #[test]
    fn test_three_equal_spheres() {
        // Equilateral triangle with circumradius 2.
        let h = 3.0f64.sqrt();
        let a = Sphere::new([2.0, 0.0, 5.0], 1.0);
        let b = Sphere::new([-1.0, h, 5.0], 1.0);
        let c = Sphere::new([-1.0, -h, 5.0], 1.0);
        let t = tangent_sphere_of_three(&a, &b, &c).unwrap();
        assert!((t.radius - 1.0).abs() < 1e-9);
        assert!(geometry::distance(&t.center, &[0.0, 0.0, 5.0]) < 1e-9);
    }

    #[test]
    fn test_three_unequal_spheres_are_touched() {
        let spheres = [
            Sphere::new([0.0, 0.0, 0.0], 1.0),
            Sphere::new([6.0, 0.0, 0.0], 2.0),
            Sphere::new([1.0, 5.0, 1.0], 1.5),
        ];
        let t = tangent_sphere_of_three(&spheres[0], &spheres[1], &spheres[2]).unwrap();
        for s in &spheres {
            let gap = geometry::distance(&t.center, &s.center) - (t.radius + s.radius);
            assert!(gap.abs() < 1e-9, "tangent sphere misses {:?} by {}", s, gap);
        }
        let normal = geometry::cross(
            &geometry::sub(&spheres[1].center, &spheres[0].center),
            &geometry::sub(&spheres[2].center, &spheres[0].center),
        );
        let off_plane = geometry::dot(&normal, &geometry::sub(&t.center, &spheres[0].center));
        assert!(off_plane.abs() < 1e-9);
    }

    #[test]
    fn test_three_collinear_spheres() {
        let a = Sphere::new([0.0, 0.0, 0.0], 1.0);
        let b = Sphere::new([1.0, 1.0, 1.0], 1.0);
        let c = Sphere::new([3.0, 3.0, 3.0], 1.0);
        assert_eq!(tangent_sphere_of_three(&a, &b, &c), Err(GeometryError::Collinear));
    }
}

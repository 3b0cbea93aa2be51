use glam::DVec3;

pub trait FloatExt {
    fn approximately_eq(self, other: Self) -> bool;
}

impl FloatExt for f32 {
    fn approximately_eq(self, other: Self) -> bool {
        (self - other).abs() < crate::EPSILON as f32
    }
}

impl FloatExt for f64 {
    fn approximately_eq(self, other: Self) -> bool {
        (self - other).abs() < crate::EPSILON
    }
}

/// Component-wise comparison; every axis must be within `EPSILON`.
impl FloatExt for DVec3 {
    fn approximately_eq(self, other: Self) -> bool {
        self.x.approximately_eq(other.x)
            && self.y.approximately_eq(other.y)
            && self.z.approximately_eq(other.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_approximately_eq() {
        assert!(1.0_f64.approximately_eq(1.0));
        assert!((0.1_f64 + 0.2_f64).approximately_eq(0.3));
        assert!(!1.0_f64.approximately_eq(1.0001));
    }

    #[test]
    fn nan_is_never_equal() {
        assert!(!f64::NAN.approximately_eq(f64::NAN));
        assert!(!f32::NAN.approximately_eq(0.0));
    }

    #[test]
    fn dvec3_requires_every_axis() {
        let a = DVec3::new(1.0, 2.0, 3.0);
        assert!(a.approximately_eq(DVec3::new(1.0, 2.0, 3.0 + 1e-9)));
        assert!(!a.approximately_eq(DVec3::new(1.0, 2.001, 3.0)));
    }
}

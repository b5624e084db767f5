//! 2D/3D vector algebra
//!
//! `Vector2` and `Vector3` are small value types used for positions,
//! dimensions and velocities throughout the engine. Every operation returns a
//! new vector; operands are never mutated. Arithmetic results carry `w = 1`.
//!
//! Vectors can be built from any [`VectorLike`] shape: another vector, an
//! ordered sequence of components, or a field record with optional `z`/`w`.

use std::ops::{Add, Mul, Neg, Sub};

use glam::{IVec2, Vec2, Vec3};
use serde::{Deserialize, Serialize};

fn one() -> f32 {
    1.0
}

/// A 2D vector with a homogeneous `w` component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
    /// Homogeneous component, 1 unless stated otherwise
    #[serde(default = "one")]
    pub w: f32,
}

/// A 3D vector with a homogeneous `w` component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    /// Homogeneous component, 1 unless stated otherwise
    #[serde(default = "one")]
    pub w: f32,
}

/// A plain field record describing a vector
///
/// Missing `z` defaults to 0 and missing `w` defaults to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: Option<f32>,
    #[serde(default)]
    pub w: Option<f32>,
}

/// Any input shape a vector can be created from
///
/// Level files deserialize either a sequence (`[16.0, 16.0]`) or a record
/// (`(x: 16.0, y: 16.0)`); the vector variants exist for in-code callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VectorLike {
    /// Ordered components `[x, y, (z,) (w)]`
    Sequence(Vec<f32>),
    /// Field-keyed record
    Record(VectorRecord),
    /// An existing 2D vector
    #[serde(skip)]
    Vector2(Vector2),
    /// An existing 3D vector
    #[serde(skip)]
    Vector3(Vector3),
}

/// Errors raised while building vectors
#[derive(Debug, Clone, PartialEq)]
pub enum VectorError {
    /// Input was not vector-like
    InvalidArgument(String),
}

impl std::fmt::Display for VectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(e) => write!(f, "Invalid vector argument: {e}"),
        }
    }
}

impl std::error::Error for VectorError {}

impl Vector2 {
    /// The zero vector (with `w = 1`)
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new vector with `w = 1`
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, w: 1.0 }
    }

    /// Create a new vector with an explicit `w`
    #[must_use]
    pub const fn with_w(x: f32, y: f32, w: f32) -> Self {
        Self { x, y, w }
    }

    /// Create a vector of the same value on both axes
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v)
    }

    /// Build a vector from any vector-like input
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::InvalidArgument`] when a sequence does not hold
    /// 2 or 3 components
    pub fn create_from(value: impl Into<VectorLike>) -> Result<Self, VectorError> {
        Self::try_from(value.into())
    }

    /// Build a vector from loosely-typed JSON data
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::InvalidArgument`] when the value is neither an
    /// array nor a record with numeric `x`/`y` fields
    pub fn from_value(value: &serde_json::Value) -> Result<Self, VectorError> {
        Self::create_from(parse_value(value)?)
    }

    /// Unit vector pointing at `angle` radians
    #[must_use]
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Euclidean distance between two points
    #[must_use]
    pub fn dist(a: Self, b: Self) -> f32 {
        a.distance(b)
    }

    /// Length of the vector
    #[must_use]
    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Angle of the vector in radians, measured from the positive X axis
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.y.atan2(self.x)
    }

    #[must_use]
    pub fn add(&self, other: Self) -> Self {
        Self::from(self.xy() + other.xy())
    }

    #[must_use]
    pub fn sub(&self, other: Self) -> Self {
        Self::from(self.xy() - other.xy())
    }

    #[must_use]
    pub fn scale(&self, s: f32) -> Self {
        Self::from(self.xy() * s)
    }

    /// `self + other * s`
    #[must_use]
    pub fn add_scale(&self, other: Self, s: f32) -> Self {
        Self::from(self.xy() + other.xy() * s)
    }

    /// Component-wise product
    #[must_use]
    pub fn mult(&self, other: Self) -> Self {
        Self::from(self.xy() * other.xy())
    }

    #[must_use]
    pub fn dot(&self, other: Self) -> f32 {
        self.xy().dot(other.xy())
    }

    /// Cosine of the angle between two vectors
    ///
    /// NaN when either vector has zero length.
    #[must_use]
    pub fn angle_between(&self, other: Self) -> f32 {
        self.dot(other) / (self.length() * other.length())
    }

    /// Distance from this point to `other`
    #[must_use]
    pub fn distance(&self, other: Self) -> f32 {
        other.sub(*self).length()
    }

    /// Reciprocal of each component (infinite on a zero component)
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self::new(1.0 / self.x, 1.0 / self.y)
    }

    /// Unit vector in the same direction, or zero for a zero-length vector
    #[must_use]
    pub fn normalise(&self) -> Self {
        let length = self.length();
        if length == 0.0 {
            return Self::ZERO;
        }
        self.scale(1.0 / length)
    }

    /// Unit vector rotated a quarter turn counter-clockwise from this one
    #[must_use]
    pub fn orthogonal(&self) -> Self {
        Self::from_angle(self.angle() + std::f32::consts::FRAC_PI_2)
    }

    /// Apply a scalar function (e.g. `f32::floor`) to every spatial component
    #[must_use]
    pub fn apply_func(&self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.x), f(self.y))
    }

    /// Map normalised device coordinates (`-1..1`) into `0..2 * viewport`
    #[must_use]
    pub fn to_screen(&self, viewport: Self) -> Self {
        Self::new((self.x + 1.0) * viewport.x, (self.y + 1.0) * viewport.y)
    }

    #[must_use]
    pub const fn to_array(&self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Spatial components as a glam vector
    #[must_use]
    pub const fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Extend to 3D with the given `z`, keeping `w`
    #[must_use]
    pub const fn extend(&self, z: f32) -> Vector3 {
        Vector3::with_w(self.x, self.y, z, self.w)
    }

    /// Truncate toward negative infinity into integer tile coordinates
    #[must_use]
    pub fn floor_to_ivec(&self) -> IVec2 {
        IVec2::new(self.x.floor() as i32, self.y.floor() as i32)
    }
}

impl Vector3 {
    /// The zero vector (with `w = 1`)
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a new vector with `w = 1`
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    /// Create a new vector with an explicit `w`
    #[must_use]
    pub const fn with_w(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Build a vector from any vector-like input
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::InvalidArgument`] when a sequence does not hold
    /// 2 to 4 components
    pub fn create_from(value: impl Into<VectorLike>) -> Result<Self, VectorError> {
        Self::try_from(value.into())
    }

    /// Build a vector from loosely-typed JSON data
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::InvalidArgument`] when the value is neither an
    /// array nor a record with numeric fields
    pub fn from_value(value: &serde_json::Value) -> Result<Self, VectorError> {
        Self::create_from(parse_value(value)?)
    }

    /// Euclidean distance between two points
    #[must_use]
    pub fn dist(a: Self, b: Self) -> f32 {
        a.distance(b)
    }

    #[must_use]
    pub fn length(&self) -> f32 {
        self.xyz().length()
    }

    /// Angle of the XY projection in radians
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.y.atan2(self.x)
    }

    #[must_use]
    pub fn add(&self, other: Self) -> Self {
        Self::from(self.xyz() + other.xyz())
    }

    #[must_use]
    pub fn sub(&self, other: Self) -> Self {
        Self::from(self.xyz() - other.xyz())
    }

    #[must_use]
    pub fn scale(&self, s: f32) -> Self {
        Self::from(self.xyz() * s)
    }

    /// `self + other * s`
    #[must_use]
    pub fn add_scale(&self, other: Self, s: f32) -> Self {
        Self::from(self.xyz() + other.xyz() * s)
    }

    /// Component-wise product
    #[must_use]
    pub fn mult(&self, other: Self) -> Self {
        Self::from(self.xyz() * other.xyz())
    }

    #[must_use]
    pub fn dot(&self, other: Self) -> f32 {
        self.xyz().dot(other.xyz())
    }

    #[must_use]
    pub fn cross(&self, other: Self) -> Self {
        Self::from(self.xyz().cross(other.xyz()))
    }

    /// Cosine of the angle between two vectors
    ///
    /// NaN when either vector has zero length.
    #[must_use]
    pub fn angle_between(&self, other: Self) -> f32 {
        self.dot(other) / (self.length() * other.length())
    }

    #[must_use]
    pub fn distance(&self, other: Self) -> f32 {
        other.sub(*self).length()
    }

    /// Reciprocal of each component (infinite on a zero component)
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self::new(1.0 / self.x, 1.0 / self.y, 1.0 / self.z)
    }

    /// Unit vector in the same direction, or zero for a zero-length vector
    #[must_use]
    pub fn normalise(&self) -> Self {
        let length = self.length();
        if length == 0.0 {
            return Self::ZERO;
        }
        self.scale(1.0 / length)
    }

    #[must_use]
    pub fn apply_func(&self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.x), f(self.y), f(self.z))
    }

    /// Map normalised device coordinates into screen space, keeping `z`/`w`
    #[must_use]
    pub fn to_screen(&self, viewport: Vector2) -> Self {
        Self::with_w(
            (self.x + 1.0) * viewport.x,
            (self.y + 1.0) * viewport.y,
            self.z,
            self.w,
        )
    }

    #[must_use]
    pub const fn to_array(&self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    #[must_use]
    pub const fn xyz(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Drop `z`, keeping `w`
    #[must_use]
    pub const fn truncate(&self) -> Vector2 {
        Vector2::with_w(self.x, self.y, self.w)
    }
}

impl Default for Vector2 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Self::ZERO
    }
}

fn parse_value(value: &serde_json::Value) -> Result<VectorLike, VectorError> {
    serde_json::from_value(value.clone())
        .map_err(|_| VectorError::InvalidArgument(format!("not vector-like: {value}")))
}

impl TryFrom<VectorLike> for Vector2 {
    type Error = VectorError;

    fn try_from(value: VectorLike) -> Result<Self, Self::Error> {
        match value {
            VectorLike::Vector2(v) => Ok(v),
            VectorLike::Vector3(v) => Ok(v.truncate()),
            VectorLike::Record(r) => Ok(Self::with_w(r.x, r.y, r.w.unwrap_or(1.0))),
            VectorLike::Sequence(s) => match s.as_slice() {
                [x, y] => Ok(Self::new(*x, *y)),
                [x, y, w] => Ok(Self::with_w(*x, *y, *w)),
                _ => Err(VectorError::InvalidArgument(format!(
                    "expected 2 or 3 components, got {}",
                    s.len()
                ))),
            },
        }
    }
}

impl TryFrom<VectorLike> for Vector3 {
    type Error = VectorError;

    fn try_from(value: VectorLike) -> Result<Self, Self::Error> {
        match value {
            VectorLike::Vector2(v) => Ok(v.extend(0.0)),
            VectorLike::Vector3(v) => Ok(v),
            VectorLike::Record(r) => Ok(Self::with_w(
                r.x,
                r.y,
                r.z.unwrap_or(0.0),
                r.w.unwrap_or(1.0),
            )),
            VectorLike::Sequence(s) => match s.as_slice() {
                [x, y] => Ok(Self::new(*x, *y, 0.0)),
                [x, y, z] => Ok(Self::new(*x, *y, *z)),
                [x, y, z, w] => Ok(Self::with_w(*x, *y, *z, *w)),
                _ => Err(VectorError::InvalidArgument(format!(
                    "expected 2 to 4 components, got {}",
                    s.len()
                ))),
            },
        }
    }
}

impl From<Vector2> for VectorLike {
    fn from(v: Vector2) -> Self {
        Self::Vector2(v)
    }
}

impl From<Vector3> for VectorLike {
    fn from(v: Vector3) -> Self {
        Self::Vector3(v)
    }
}

impl From<VectorRecord> for VectorLike {
    fn from(r: VectorRecord) -> Self {
        Self::Record(r)
    }
}

impl From<Vec<f32>> for VectorLike {
    fn from(s: Vec<f32>) -> Self {
        Self::Sequence(s)
    }
}

impl From<&[f32]> for VectorLike {
    fn from(s: &[f32]) -> Self {
        Self::Sequence(s.to_vec())
    }
}

impl<const N: usize> From<[f32; N]> for VectorLike {
    fn from(s: [f32; N]) -> Self {
        Self::Sequence(s.to_vec())
    }
}

impl From<Vec2> for VectorLike {
    fn from(v: Vec2) -> Self {
        Self::Vector2(v.into())
    }
}

impl From<Vec3> for VectorLike {
    fn from(v: Vec3) -> Self {
        Self::Vector3(v.into())
    }
}

impl From<Vec2> for Vector2 {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for Vec2 {
    fn from(v: Vector2) -> Self {
        v.xy()
    }
}

impl From<IVec2> for Vector2 {
    fn from(v: IVec2) -> Self {
        Self::new(v.x as f32, v.y as f32)
    }
}

impl From<Vec3> for Vector3 {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for Vec3 {
    fn from(v: Vector3) -> Self {
        v.xyz()
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Vector2::add(&self, rhs)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Vector2::sub(&self, rhs)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        self.scale(-1.0)
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Vector3::add(&self, rhs)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Vector3::sub(&self, rhs)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        self.scale(-1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn approx(a: Vector2, b: Vector2) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn test_add_sub_round_trip() {
        let samples = [
            (Vector2::new(1.5, -2.0), Vector2::new(0.25, 8.0)),
            (Vector2::new(-100.0, 3.0), Vector2::new(100.0, -3.0)),
            (Vector2::ZERO, Vector2::new(7.0, 7.0)),
        ];
        for (a, b) in samples {
            assert!(approx(a.add(b).sub(b), a));
        }

        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(-4.0, 0.5, 9.0);
        let back = a.add(b).sub(b);
        assert!((back.xyz() - a.xyz()).length() < EPS);
    }

    #[test]
    fn test_operations_do_not_mutate() {
        let a = Vector2::new(3.0, 4.0);
        let b = Vector2::new(1.0, 1.0);
        let _ = a.add(b);
        let _ = a.scale(10.0);
        let _ = a.normalise();
        assert_eq!(a, Vector2::new(3.0, 4.0));
        assert_eq!(b, Vector2::new(1.0, 1.0));
    }

    #[test]
    fn test_normalise() {
        let v = Vector2::new(3.0, 4.0);
        assert!((v.length() - 5.0).abs() < EPS);
        assert!((v.normalise().length() - 1.0).abs() < EPS);

        let v3 = Vector3::new(2.0, -3.0, 6.0);
        assert!((v3.normalise().length() - 1.0).abs() < EPS);

        assert_eq!(Vector2::ZERO.normalise(), Vector2::ZERO);
        assert_eq!(Vector3::ZERO.normalise(), Vector3::ZERO);
    }

    #[test]
    fn test_create_from_shapes_agree() {
        let from_seq = Vector2::create_from([3.0, 4.0]).unwrap();
        let from_record = Vector2::create_from(VectorRecord {
            x: 3.0,
            y: 4.0,
            z: None,
            w: None,
        })
        .unwrap();
        let from_vector = Vector2::create_from(Vector2::new(3.0, 4.0)).unwrap();

        assert_eq!(from_seq, from_record);
        assert_eq!(from_record, from_vector);
        assert_eq!(from_seq.w, 1.0);
    }

    #[test]
    fn test_create_from_defaults() {
        let v = Vector3::create_from([1.0, 2.0]).unwrap();
        assert_eq!(v, Vector3::with_w(1.0, 2.0, 0.0, 1.0));

        let v = Vector3::create_from([1.0, 2.0, 3.0, 0.0]).unwrap();
        assert_eq!(v.w, 0.0);

        let v = Vector2::create_from([1.0, 2.0, 0.5]).unwrap();
        assert_eq!(v.w, 0.5);

        let v = Vector3::create_from(Vector2::new(5.0, 6.0)).unwrap();
        assert_eq!(v, Vector3::new(5.0, 6.0, 0.0));
    }

    #[test]
    fn test_create_from_rejects_bad_input() {
        assert!(Vector2::create_from([1.0]).is_err());
        assert!(Vector2::create_from(vec![1.0, 2.0, 3.0, 4.0]).is_err());
        assert!(Vector3::create_from(Vec::<f32>::new()).is_err());

        assert!(Vector2::from_value(&serde_json::json!("left")).is_err());
        assert!(Vector2::from_value(&serde_json::json!({ "x": "a", "y": 1 })).is_err());
        assert!(Vector2::from_value(&serde_json::json!(12)).is_err());

        let v = Vector2::from_value(&serde_json::json!({ "x": 2, "y": 3 })).unwrap();
        assert_eq!(v, Vector2::new(2.0, 3.0));
        let v = Vector3::from_value(&serde_json::json!([2, 3, 4])).unwrap();
        assert_eq!(v, Vector3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_inverse_and_apply_func() {
        let size = Vector2::new(16.0, 32.0);
        let inv = size.inverse();
        assert!((inv.x - 0.0625).abs() < EPS);
        assert!((inv.y - 0.03125).abs() < EPS);

        assert!(Vector2::new(0.0, 1.0).inverse().x.is_infinite());

        let tiles = Vector2::new(40.0, 40.0).mult(inv).apply_func(f32::floor);
        assert_eq!(tiles, Vector2::new(2.0, 1.0));
        let tiles = Vector2::new(40.0, 40.0).mult(inv).apply_func(f32::ceil);
        assert_eq!(tiles, Vector2::new(3.0, 2.0));
    }

    #[test]
    fn test_dot_cross_and_angles() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(x.dot(y), 0.0);

        let a = Vector2::new(1.0, 0.0);
        let b = Vector2::new(1.0, 1.0);
        assert!((a.angle_between(b) - std::f32::consts::FRAC_1_SQRT_2).abs() < EPS);
        assert!(a.angle_between(Vector2::ZERO).is_nan());

        assert!((b.angle() - std::f32::consts::FRAC_PI_4).abs() < EPS);
        assert!(approx(a.orthogonal(), Vector2::new(0.0, 1.0)));
    }

    #[test]
    fn test_distance_and_scale() {
        let a = Vector2::new(1.0, 1.0);
        let b = Vector2::new(4.0, 5.0);
        assert!((Vector2::dist(a, b) - 5.0).abs() < EPS);
        assert!((a.distance(b) - 5.0).abs() < EPS);

        let c = Vector3::new(0.0, 0.0, 0.0);
        let d = Vector3::new(2.0, 3.0, 6.0);
        assert!((Vector3::dist(c, d) - 7.0).abs() < EPS);

        assert_eq!(a.add_scale(b, 2.0), Vector2::new(9.0, 11.0));
        assert_eq!(a + b, Vector2::new(5.0, 6.0));
        assert_eq!(-a * 2.0, Vector2::new(-2.0, -2.0));
    }

    #[test]
    fn test_to_screen() {
        let ndc = Vector2::new(0.0, -1.0);
        assert_eq!(
            ndc.to_screen(Vector2::new(400.0, 300.0)),
            Vector2::new(400.0, 0.0)
        );
        assert_eq!(ndc, Vector2::new(0.0, -1.0));
    }

    #[test]
    fn test_deserialize_from_ron() {
        let seq: VectorLike = ron::from_str("[16.0, 8.0]").unwrap();
        assert_eq!(Vector2::create_from(seq).unwrap(), Vector2::new(16.0, 8.0));

        let record: VectorLike = ron::from_str("(x: 16.0, y: 8.0, z: 2.0)").unwrap();
        assert_eq!(
            Vector3::create_from(record).unwrap(),
            Vector3::new(16.0, 8.0, 2.0)
        );
    }
}

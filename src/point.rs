/// A position in 3D space, `[x, y, z]`.
pub type Point3 = [f64; 3];

/// Squared Euclidean distance between two points.
#[inline]
pub fn distance_sq(a: &Point3, b: &Point3) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// Reflects a point across the `x = 0` plane.
#[inline]
pub fn mirror_x(p: &Point3) -> Point3 {
    [-p[0], p[1], p[2]]
}

/// Converts a flat array of coordinates `[x, y, z, x, y, z, ...]` into points.
/// Trailing coordinates that do not form a full point are ignored.
pub fn from_flat(coords: &[f64]) -> Vec<Point3> {
    coords
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect()
}

/// Flattens points into `[x, y, z, x, y, z, ...]`.
pub fn to_flat(points: &[Point3]) -> Vec<f64> {
    points.iter().flat_map(|p| p.iter().copied()).collect()
}

/// Axis-aligned bounds of a set of points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Point3,
    pub max: Point3,
}

impl BoundingBox {
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all `points`, or `None` when there are none.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Self::new(first, first);
        for p in iter {
            for i in 0..3 {
                if p[i] < bounds.min[i] { bounds.min[i] = p[i]; }
                if p[i] > bounds.max[i] { bounds.max[i] = p[i]; }
            }
        }
        Some(bounds)
    }

    /// Edge lengths along x, y and z.
    pub fn extent(&self) -> Point3 {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

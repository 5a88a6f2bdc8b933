use core::ops::{Add, Sub};

/// 2D point in tile units.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    #[inline]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl Point<i16> {
    /// Widens to `i32` so arithmetic near the i16 bounds cannot overflow.
    #[inline]
    pub fn widen(self) -> Point<i32> {
        Point::new(i32::from(self.x), i32::from(self.y))
    }
}

impl<T: Add<Output = T>> Add for Point<T> {
    type Output = Point<T>;
    #[inline]
    fn add(self, rhs: Point<T>) -> Point<T> {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Sub<Output = T>> Sub for Point<T> {
    type Output = Point<T>;
    #[inline]
    fn sub(self, rhs: Point<T>) -> Point<T> {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

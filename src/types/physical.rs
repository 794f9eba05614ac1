//! Physical quantity newtypes for the vertical coordinate.
//!
//! The beach-profile grid is expressed as depth below the still-water level
//! while the shoreline model reads land-surface elevation. Both wrap an `f64`
//! in meters and convert into each other by a sign flip.

use std::fmt;
use std::ops::{Add, Neg, Sub};

// =============================================================================
// Depth (positive downward)
// =============================================================================

/// Water depth below the still-water level, positive downward.
///
/// Land cells of a profile grid carry a negative depth (they stand above the
/// water level).
///
/// # Example
///
/// ```
/// use shoreline_coupler::types::Depth;
///
/// let h = Depth::new(12.5);
/// assert_eq!(h.meters(), 12.5);
/// assert!(h.is_submerged());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Depth(f64);

impl Depth {
    #[inline]
    pub const fn new(meters: f64) -> Self {
        Self(meters)
    }

    /// Still-water level.
    pub const ZERO: Self = Self(0.0);

    #[inline]
    pub fn meters(self) -> f64 {
        self.0
    }

    /// True if the point lies below the still-water level.
    #[inline]
    pub fn is_submerged(self) -> bool {
        self.0 > 0.0
    }

    /// Same point expressed as an elevation.
    #[inline]
    pub fn to_elevation(self) -> Elevation {
        Elevation(-self.0)
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}m", self.0)
    }
}

impl From<Depth> for f64 {
    #[inline]
    fn from(d: Depth) -> f64 {
        d.0
    }
}

// =============================================================================
// Elevation (positive upward)
// =============================================================================

/// Land-surface elevation relative to the still-water level, positive upward.
///
/// # Example
///
/// ```
/// use shoreline_coupler::types::Elevation;
///
/// let dune = Elevation::new(1.0);
/// let bar = Elevation::new(-2.0);
/// assert!(dune.is_land(Elevation::new(1.0)));
/// assert!(!bar.is_land(Elevation::new(1.0)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Elevation(f64);

impl Elevation {
    #[inline]
    pub const fn new(meters: f64) -> Self {
        Self(meters)
    }

    /// Still-water level.
    pub const ZERO: Self = Self(0.0);

    #[inline]
    pub fn meters(self) -> f64 {
        self.0
    }

    /// Land test against a threshold elevation (inclusive).
    #[inline]
    pub fn is_land(self, threshold: Elevation) -> bool {
        self.0 >= threshold.0
    }

    /// Same point expressed as a depth.
    #[inline]
    pub fn to_depth(self) -> Depth {
        Depth(-self.0)
    }
}

impl fmt::Display for Elevation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.2}m", self.0)
    }
}

impl From<Elevation> for f64 {
    #[inline]
    fn from(e: Elevation) -> f64 {
        e.0
    }
}

impl Add for Elevation {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Elevation {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Elevation {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

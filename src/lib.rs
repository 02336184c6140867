//! # axle2d
//!
//! axle2d is the joint/constraint core of a 2D rigid-body physics engine:
//! bodies linked in pairs by distance, revolute, prismatic, pulley, mouse,
//! gear, and wheel joints, resolved each step by a two-phase (velocity then
//! position) sequential Gauss-Seidel solver.
//!
//! The crate deliberately does *not* perform collision detection, island
//! building, or world stepping: it consumes body state through stable
//! handles, and exposes constraint impulses and corrected positions back
//! through the same handles.

#![deny(bare_trait_objects)]
#![warn(missing_docs)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]

pub extern crate nalgebra as na;
#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
extern crate num_traits as num;

pub(crate) const INVALID_U32: u32 = u32::MAX;

/// The string version of axle2d.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod data;
pub mod dynamics;
pub mod utils;

/// Elementary mathematical entities (vectors, points, isometries).
pub mod math {
    /// The scalar type used throughout the engine.
    pub type Real = f32;

    /// The vector type.
    pub type Vector<N> = na::Vector2<N>;

    /// The point type.
    pub type Point<N> = na::Point2<N>;

    /// The transform of a rigid body: a rotation followed by a translation.
    pub type Isometry<N> = na::Isometry2<N>;

    /// A 2D rotation, represented as a unit complex number.
    pub type Rotation<N> = na::UnitComplex<N>;

    /// The angular velocity/inertia type. A single scalar in 2D.
    pub type AngVector<N> = N;

    /// The translation type.
    pub type Translation<N> = na::Translation2<N>;
}

/// Prelude containing the common types defined by axle2d.
pub mod prelude {
    pub use crate::dynamics::*;
    pub use crate::math::*;
    pub use na::{point, vector};
}

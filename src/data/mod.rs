//! Data structures used by the joint and body sets.

pub use self::arena::{Arena, Index};

pub mod arena;

//! Constraint solver: velocity and position resolution of joint islands.

pub use self::island_solver::IslandSolver;
pub use self::jacobian::Jacobian;

pub(crate) use self::joint_constraint::{AnyJointPositionConstraint, AnyJointVelocityConstraint};
pub(crate) use self::position_solver::PositionSolver;
pub(crate) use self::solver_body::{SolverPosition, SolverVel};
pub(crate) use self::velocity_solver::VelocitySolver;

mod island_solver;
mod jacobian;
mod joint_constraint;
mod position_solver;
mod solver_body;
mod velocity_solver;

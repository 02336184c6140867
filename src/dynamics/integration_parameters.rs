use crate::math::Real;

/// Parameters for a time-step of the physics engine.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct IntegrationParameters {
    /// The timestep length (default: `1.0 / 60.0`).
    pub dt: Real,

    /// The coefficient in `[0, 1]` applied to accumulated impulses when
    /// they are reused as the initial solution of the next step
    /// (default: `1.0`).
    ///
    /// Setting this to `0.0` disables warm-starting entirely.
    pub warmstart_coeff: Real,

    /// The number of velocity-constraint iterations run by the solver for
    /// each island (default: `8`).
    pub max_velocity_iterations: usize,

    /// The maximum number of position-constraint (non-linear Gauss-Seidel)
    /// iterations run by the solver for each island (default: `3`).
    ///
    /// The solver exits this loop early once every constraint of the
    /// island reports a residual below the allowed error.
    pub max_position_iterations: usize,

    /// The linear residual below which a position constraint is considered
    /// converged (default: `0.005`).
    pub allowed_linear_error: Real,

    /// The angular residual below which a position constraint is
    /// considered converged (default: `2.0` degrees).
    pub allowed_angular_error: Real,

    /// The maximum linear correction applied by one position iteration of
    /// one constraint (default: `0.2`).
    ///
    /// Clamping the per-iteration correction avoids overshooting when a
    /// joint starts a step far from its target configuration.
    pub max_linear_correction: Real,

    /// The maximum angular correction applied by one position iteration of
    /// one constraint (default: `8.0` degrees).
    pub max_angular_correction: Real,
}

impl IntegrationParameters {
    /// The inverse of the time-stepping length, i.e. the steps per second.
    ///
    /// This is zero if `self.dt` is zero.
    #[inline(always)]
    pub fn inv_dt(&self) -> Real {
        if self.dt == 0.0 {
            0.0
        } else {
            1.0 / self.dt
        }
    }

    /// Sets the inverse time-stepping length (i.e. the frequency).
    ///
    /// This automatically recomputes `self.dt`.
    #[inline]
    pub fn set_inv_dt(&mut self, inv_dt: Real) {
        if inv_dt == 0.0 {
            self.dt = 0.0
        } else {
            self.dt = 1.0 / inv_dt
        }
    }
}

impl Default for IntegrationParameters {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            warmstart_coeff: 1.0,
            max_velocity_iterations: 8,
            max_position_iterations: 3,
            allowed_linear_error: 0.005,
            allowed_angular_error: 2.0 * std::f32::consts::PI / 180.0,
            max_linear_correction: 0.2,
            max_angular_correction: 8.0 * std::f32::consts::PI / 180.0,
        }
    }
}

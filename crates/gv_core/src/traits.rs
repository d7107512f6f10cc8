use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars in the background equations.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// A first-order ODE system `dy/dx = f(x, y)`.
pub trait DynamicalSystem<T: Scalar> {
    /// Failure raised when the vector field is not defined at `(x, y)`.
    type Error;

    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the vector field.
    /// x: current value of the independent variable
    /// y: current state
    /// out: buffer to write dy/dx into
    fn apply(&self, x: T, y: &[T], out: &mut [T]) -> Result<(), Self::Error>;
}

/// A trait for fixed-step solvers.
pub trait Steppable<T: Scalar> {
    /// Performs one step of size h. A negative h steps backward.
    /// x: independent variable (updated after a successful step)
    /// state: current state (updated after a successful step)
    ///
    /// On error neither `x` nor `state` is modified.
    fn step<S>(&mut self, system: &S, x: &mut T, state: &mut [T], h: T) -> Result<(), S::Error>
    where
        S: DynamicalSystem<T>;
}

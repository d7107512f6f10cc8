use crate::traits::{DynamicalSystem, Scalar, Steppable};

/// Classic Runge-Kutta 4th Order Solver
pub struct RK4<T: Scalar> {
    k1: Vec<T>,
    k2: Vec<T>,
    k3: Vec<T>,
    k4: Vec<T>,
    tmp: Vec<T>,
}

impl<T: Scalar> RK4<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            k1: vec![T::zero(); dim],
            k2: vec![T::zero(); dim],
            k3: vec![T::zero(); dim],
            k4: vec![T::zero(); dim],
            tmp: vec![T::zero(); dim],
        }
    }

    pub fn dimension(&self) -> usize {
        self.tmp.len()
    }
}

impl<T: Scalar> Steppable<T> for RK4<T> {
    fn step<S>(&mut self, system: &S, x: &mut T, state: &mut [T], h: T) -> Result<(), S::Error>
    where
        S: DynamicalSystem<T>,
    {
        debug_assert_eq!(state.len(), self.dimension());
        debug_assert_eq!(system.dimension(), self.dimension());

        let two = T::one() + T::one();
        let half = T::one() / two;
        let sixth = T::one() / (two + two + two);

        let x0 = *x;

        // k1 = f(x, y)
        system.apply(x0, state, &mut self.k1)?;

        // k2 = f(x + h/2, y + h*k1/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + h * half * self.k1[i];
        }
        system.apply(x0 + h * half, &self.tmp, &mut self.k2)?;

        // k3 = f(x + h/2, y + h*k2/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + h * half * self.k2[i];
        }
        system.apply(x0 + h * half, &self.tmp, &mut self.k3)?;

        // k4 = f(x + h, y + h*k3)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + h * self.k3[i];
        }
        system.apply(x0 + h, &self.tmp, &mut self.k4)?;

        // y_next = y + h/6 * (k1 + 2k2 + 2k3 + k4)
        for i in 0..state.len() {
            state[i] = state[i]
                + h * sixth * (self.k1[i] + two * self.k2[i] + two * self.k3[i] + self.k4[i]);
        }

        *x = x0 + h;
        Ok(())
    }
}

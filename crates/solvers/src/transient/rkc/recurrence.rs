use std::mem;

use chebstep_core::OdeProblem;

use super::stages::Chebyshev;

/// Stage vectors for one call to `advance`.
///
/// Only two previous stages are ever live, plus the stage being built and the
/// derivative at the previous stage.
pub(crate) struct StageBuffers {
    yjm1: Vec<f64>,
    yjm2: Vec<f64>,
    yj: Vec<f64>,
    fjm1: Vec<f64>,
}

impl StageBuffers {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            yjm1: vec![0.0; n],
            yjm2: vec![0.0; n],
            yj: vec![0.0; n],
            fjm1: vec![0.0; n],
        }
    }
}

/// Advances `y0` by `h` with an `stages`-stage RKC step and writes the result
/// into `out`.
///
/// `f0` must hold `f(t, y0)`. Each stage after the first costs one evaluation
/// of the right-hand side; the number of evaluations is returned.
///
/// The stages follow the three-term Chebyshev recurrence
///
/// ```text
/// y_1 = y_0 + μ̃_1 h f(y_0)
/// y_j = μ_j y_{j-1} + ν_j y_{j-2} + (1 - μ_j - ν_j) y_0
///       + μ̃_j h f(y_{j-1}) + γ̃_j h f(y_0)
/// ```
///
/// with `b_j = T_j''(w0) / T_j'(w0)²`, `a_j = 1 - b_j T_j(w0)`,
/// `μ_j = 2 w0 b_j / b_{j-1}`, `ν_j = -b_j / b_{j-2}`, `μ̃_j = μ_j w1 / w0` and
/// `γ̃_j = -a_{j-1} μ̃_j`. The first two `b` coefficients equal `b_2`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn step<P: OdeProblem>(
    problem: &P,
    t: f64,
    h: f64,
    stages: usize,
    y0: &[f64],
    f0: &[f64],
    buffers: &mut StageBuffers,
    out: &mut [f64],
) -> Result<usize, P::Error> {
    debug_assert!(stages >= 2, "RKC needs at least two stages");

    let Chebyshev { w0, w1, .. } = Chebyshev::new(stages);
    let StageBuffers {
        yjm1,
        yjm2,
        yj,
        fjm1,
    } = buffers;

    let mut bjm1 = 1.0 / (4.0 * w0 * w0);
    let mut bjm2 = bjm1;

    // First stage.
    let mus = w1 * bjm1;
    yjm2.copy_from_slice(y0);
    for ((y1, y), f) in yjm1.iter_mut().zip(y0).zip(f0) {
        *y1 = y + h * mus * f;
    }

    // Stage times as fractions of h.
    let mut thjm2 = 0.0;
    let mut thjm1 = mus;

    // T_j(w0) and its first two derivatives.
    let (mut zjm1, mut zjm2) = (w0, 1.0);
    let (mut dzjm1, mut dzjm2) = (1.0, 0.0);
    let (mut d2zjm1, mut d2zjm2) = (0.0, 0.0);

    let mut evaluations = 0;

    for _ in 2..=stages {
        let zj = 2.0 * w0 * zjm1 - zjm2;
        let dzj = 2.0 * w0 * dzjm1 - dzjm2 + 2.0 * zjm1;
        let d2zj = 2.0 * w0 * d2zjm1 - d2zjm2 + 4.0 * dzjm1;

        let bj = d2zj / (dzj * dzj);
        let ajm1 = 1.0 - zjm1 * bjm1;
        let mu = 2.0 * w0 * bj / bjm1;
        let nu = -bj / bjm2;
        let mus = mu * w1 / w0;

        problem.derivative(t + h * thjm1, yjm1, fjm1)?;
        evaluations += 1;

        let carry = 1.0 - mu - nu;
        for i in 0..y0.len() {
            yj[i] = mu * yjm1[i]
                + nu * yjm2[i]
                + carry * y0[i]
                + h * mus * (fjm1[i] - ajm1 * f0[i]);
        }

        let thj = mu * thjm1 + nu * thjm2 + mus * (1.0 - ajm1);

        // Shift: yjm2 <- yjm1 <- yj, and yj becomes scratch.
        mem::swap(yjm2, yjm1);
        mem::swap(yjm1, yj);

        thjm2 = thjm1;
        thjm1 = thj;
        bjm2 = bjm1;
        bjm1 = bj;
        zjm2 = zjm1;
        zjm1 = zj;
        dzjm2 = dzjm1;
        dzjm1 = dzj;
        d2zjm2 = d2zjm1;
        d2zjm1 = d2zj;
    }

    out.copy_from_slice(yjm1);
    Ok(evaluations)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;

    use crate::transient::rkc::stages::stability_boundary;

    struct Linear {
        lambda: f64,
    }

    impl OdeProblem for Linear {
        type Error = Infallible;

        fn derivative(&self, _t: f64, y: &[f64], dydt: &mut [f64]) -> Result<(), Self::Error> {
            dydt[0] = self.lambda * y[0];
            Ok(())
        }

        fn initial_condition(&self) -> Vec<f64> {
            vec![1.0]
        }
    }

    /// `y' = 1 + 2t`, exact for any second-order method.
    struct Quadratic;

    impl OdeProblem for Quadratic {
        type Error = Infallible;

        fn derivative(&self, t: f64, _y: &[f64], dydt: &mut [f64]) -> Result<(), Self::Error> {
            dydt[0] = 1.0 + 2.0 * t;
            Ok(())
        }

        fn initial_condition(&self) -> Vec<f64> {
            vec![0.0]
        }
    }

    fn single_step<P: OdeProblem>(problem: &P, t: f64, h: f64, stages: usize, y0: f64) -> f64 {
        let mut f0 = [0.0];
        problem.derivative(t, &[y0], &mut f0).unwrap();
        let mut buffers = StageBuffers::new(1);
        let mut out = [0.0];
        let evaluations = step(problem, t, h, stages, &[y0], &f0, &mut buffers, &mut out).unwrap();
        assert_eq!(evaluations, stages - 1);
        out[0]
    }

    #[test]
    fn integrates_quadratic_exactly() {
        // y(t) = t + t², so y(0.5) - y(0.25) = 0.25 + 0.1875.
        for stages in [2, 3, 7, 20] {
            let y1 = single_step(&Quadratic, 0.25, 0.25, stages, 0.0);
            assert_relative_eq!(y1, 0.4375, max_relative = 1e-12);
        }
    }

    #[test]
    fn stays_bounded_inside_stability_interval() {
        for stages in [3, 10, 50] {
            let lambda = -0.999 * stability_boundary(stages);
            let y1 = single_step(&Linear { lambda }, 0.0, 1.0, stages, 1.0);
            assert!(y1.abs() <= 1.0, "s = {stages}: |y1| = {}", y1.abs());
        }
    }

    #[test]
    fn matches_exponential_for_small_steps() {
        let lambda = -3.0;
        let h = 1e-3;
        let y1 = single_step(&Linear { lambda }, 0.0, h, 4, 1.0);
        assert_relative_eq!(y1, (lambda * h).exp(), max_relative = 1e-8);
    }
}

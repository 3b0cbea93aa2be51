//! Powell's direction-set method for derivative-free minimization.
//!
//! Each iteration runs a Brent line minimization along every direction of
//! the set, then considers replacing the direction of largest decrease with
//! the net displacement of the iteration. Parameters never need gradients,
//! which suits the Euler/scale model: it has no analytic derivative and its
//! SSE landscape has shallow, nearly flat valleys.

#![allow(clippy::needless_range_loop)]


use crate::registration::config::PowellConfig;
use crate::registration::result::RegistrationError;

/// Golden ratio used for bracket expansion.
const GOLD: f64 = 1.618_034;
/// Largest parabolic extrapolation step, in units of the current bracket.
const GROW_LIMIT: f64 = 110.0;
/// Guards the parabolic denominator in bracketing.
const TINY: f64 = 1e-21;
const MAX_BRACKET_ITER: usize = 1000;

/// Golden section fraction `(3 - sqrt(5)) / 2`.
const CGOLD: f64 = 0.381_966_0;
/// Absolute tolerance floor for Brent near zero.
const ZEPS: f64 = 1e-11;
const MAX_BRENT_ITER: usize = 500;

/// Result of a Powell minimization.
#[derive(Debug, Clone)]
pub struct PowellResult {
    /// Best parameters found.
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub fun: f64,
    /// Completed direction-set iterations.
    pub iterations: usize,
    /// Objective evaluations, including line searches.
    pub nfev: usize,
    /// Whether the relative objective tolerance was met.
    pub converged: bool,
    /// Whether `max_iter` or `max_fev` ended the search.
    pub budget_exceeded: bool,
}

/// Objective wrapper that counts evaluations.
struct Counted<F> {
    f: F,
    nfev: usize,
}

impl<F: FnMut(&[f64]) -> f64> Counted<F> {
    fn new(f: F) -> Self {
        Self { f, nfev: 0 }
    }

    #[inline]
    fn call(&mut self, x: &[f64]) -> f64 {
        self.nfev += 1;
        (self.f)(x)
    }
}

/// Minimize `f` starting from `x0`.
///
/// `f` may be `FnMut` so callers can record every evaluation. Reaching
/// `max_iter` or `max_fev` is not an error: the best point is returned with
/// `budget_exceeded` set.
pub fn powell<F>(
    f: F,
    x0: &[f64],
    config: &PowellConfig,
) -> Result<PowellResult, RegistrationError>
where
    F: FnMut(&[f64]) -> f64,
{
    let n = x0.len();
    if n == 0 {
        return Err(RegistrationError::InvalidInput(
            "powell: empty initial guess".to_string(),
        ));
    }
    if let Some(bad) = x0.iter().find(|v| !v.is_finite()) {
        return Err(RegistrationError::InvalidInput(format!(
            "powell: non-finite initial value {}",
            bad
        )));
    }

    let mut objective = Counted::new(f);
    let line_tol = config.x_tol * 100.0;

    // Start with the coordinate directions.
    let mut directions: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let mut d = vec![0.0; n];
            d[i] = 1.0;
            d
        })
        .collect();

    let mut x = x0.to_vec();
    let mut fval = objective.call(&x);
    let mut x_start = x.clone();
    let mut iterations = 0;
    let mut converged = false;
    let mut budget_exceeded = false;

    loop {
        let f_start = fval;
        let mut biggest_drop = 0.0;
        let mut biggest_idx = 0;

        for i in 0..n {
            let f_before = fval;
            let (f_new, x_new, _) =
                line_search(&mut objective, &x, &directions[i], fval, line_tol);
            x = x_new;
            fval = f_new;
            if f_before - fval > biggest_drop {
                biggest_drop = f_before - fval;
                biggest_idx = i;
            }
        }
        iterations += 1;

        tracing::trace!(
            "powell iteration {}: f = {:.6e} (nfev {})",
            iterations,
            fval,
            objective.nfev
        );

        let bound = config.f_tol * (f_start.abs() + fval.abs()) + 1e-20;
        if 2.0 * (f_start - fval) <= bound {
            converged = true;
            break;
        }
        if objective.nfev >= config.max_fev || iterations >= config.max_iter {
            budget_exceeded = true;
            break;
        }
        if fval.is_nan() {
            break;
        }

        // Net displacement of this iteration and the point extrapolated past it.
        let displacement: Vec<f64> = x.iter().zip(&x_start).map(|(a, b)| a - b).collect();
        let extrapolated: Vec<f64> = x.iter().zip(&x_start).map(|(a, b)| 2.0 * a - b).collect();
        x_start.clone_from(&x);
        let f_extrapolated = objective.call(&extrapolated);

        if f_start > f_extrapolated {
            let mut t = 2.0 * (f_start + f_extrapolated - 2.0 * fval);
            let temp = f_start - fval - biggest_drop;
            t *= temp * temp;
            let temp = f_start - f_extrapolated;
            t -= biggest_drop * temp * temp;

            if t < 0.0 {
                let (f_new, x_new, step) =
                    line_search(&mut objective, &x, &displacement, fval, line_tol);
                x = x_new;
                fval = f_new;
                if step.iter().any(|s| *s != 0.0) {
                    let last = std::mem::replace(&mut directions[n - 1], step);
                    if biggest_idx != n - 1 {
                        directions[biggest_idx] = last;
                    }
                }
            }
        }
    }

    if budget_exceeded {
        tracing::warn!(
            "Powell stopped at its budget after {} iterations and {} evaluations (f = {:.6e})",
            iterations,
            objective.nfev,
            fval
        );
    }

    Ok(PowellResult {
        x,
        fun: fval,
        iterations,
        nfev: objective.nfev,
        converged,
        budget_exceeded,
    })
}

/// Minimize along `direction` from `x`, where `fx = f(x)`.
///
/// Returns `(f_min, x_min, step)` with `x_min = x + step`. Never returns a
/// point worse than `x`.
fn line_search<F>(
    objective: &mut Counted<F>,
    x: &[f64],
    direction: &[f64],
    fx: f64,
    tol: f64,
) -> (f64, Vec<f64>, Vec<f64>)
where
    F: FnMut(&[f64]) -> f64,
{
    let mut point = vec![0.0; x.len()];
    let mut along = |alpha: f64| {
        for ((p, xi), di) in point.iter_mut().zip(x).zip(direction) {
            *p = xi + alpha * di;
        }
        objective.call(&point)
    };

    let bracket = bracket_minimum(&mut along, 0.0, 1.0, fx);
    let (alpha, f_min) = brent(&mut along, &bracket, tol);

    if f_min.is_nan() || f_min > fx {
        return (fx, x.to_vec(), vec![0.0; x.len()]);
    }

    let step: Vec<f64> = direction.iter().map(|d| alpha * d).collect();
    let x_min = x.iter().zip(&step).map(|(xi, s)| xi + s).collect();
    (f_min, x_min, step)
}

/// Three abscissas with `b` between `a` and `c` and `f(b) <= f(a), f(c)`.
#[derive(Debug, Clone, Copy)]
struct Bracket {
    a: f64,
    b: f64,
    c: f64,
    fa: f64,
    fb: f64,
    fc: f64,
}

/// Downhill bracket search from `a`, `b` using golden expansion with
/// parabolic extrapolation. `fa` is the known value at `a`.
fn bracket_minimum<G>(f: &mut G, a: f64, b: f64, fa: f64) -> Bracket
where
    G: FnMut(f64) -> f64,
{
    let (mut a, mut b, mut fa) = (a, b, fa);
    let mut fb = f(b);
    if fb > fa {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut fa, &mut fb);
    }
    let mut c = b + GOLD * (b - a);
    let mut fc = f(c);

    let mut iter = 0;
    while fb > fc {
        iter += 1;
        if iter > MAX_BRACKET_ITER {
            break;
        }

        let r = (b - a) * (fb - fc);
        let q = (b - c) * (fb - fa);
        let val = q - r;
        let denom = if val.abs() < TINY { 2.0 * TINY } else { 2.0 * val };
        let mut u = b - ((b - c) * q - (b - a) * r) / denom;
        let ulim = b + GROW_LIMIT * (c - b);
        let mut fu;

        if (b - u) * (u - c) > 0.0 {
            // Parabolic u between b and c.
            fu = f(u);
            if fu < fc {
                return Bracket {
                    a: b,
                    b: u,
                    c,
                    fa: fb,
                    fb: fu,
                    fc,
                };
            } else if fu > fb {
                return Bracket {
                    a,
                    b,
                    c: u,
                    fa,
                    fb,
                    fc: fu,
                };
            }
            u = c + GOLD * (c - b);
            fu = f(u);
        } else if (c - u) * (u - ulim) > 0.0 {
            // Parabolic u between c and its allowed limit.
            fu = f(u);
            if fu < fc {
                b = c;
                c = u;
                u = c + GOLD * (c - b);
                fb = fc;
                fc = fu;
                fu = f(u);
            }
        } else if (u - ulim) * (ulim - c) >= 0.0 {
            u = ulim;
            fu = f(u);
        } else {
            u = c + GOLD * (c - b);
            fu = f(u);
        }

        a = b;
        b = c;
        c = u;
        fa = fb;
        fb = fc;
        fc = fu;
    }

    Bracket {
        a,
        b,
        c,
        fa,
        fb,
        fc,
    }
}

/// Brent's method inside `bracket`, starting from its middle point.
///
/// `tol` is relative to the abscissa. Returns `(x_min, f_min)`.
fn brent<G>(f: &mut G, bracket: &Bracket, tol: f64) -> (f64, f64)
where
    G: FnMut(f64) -> f64,
{
    let (mut a, mut b) = if bracket.a < bracket.c {
        (bracket.a, bracket.c)
    } else {
        (bracket.c, bracket.a)
    };
    let mut x = bracket.b;
    let mut w = x;
    let mut v = x;
    let mut fx = bracket.fb;
    let mut fw = fx;
    let mut fv = fx;
    let mut d: f64 = 0.0;
    let mut e: f64 = 0.0;

    for _ in 0..MAX_BRENT_ITER {
        let xm = 0.5 * (a + b);
        let tol1 = tol * x.abs() + ZEPS;
        let tol2 = 2.0 * tol1;
        if (x - xm).abs() <= tol2 - 0.5 * (b - a) {
            break;
        }

        let golden = e.abs() <= tol1;
        if !golden {
            // Try a parabolic step through x, v, w.
            let r = (x - w) * (fx - fv);
            let mut q = (x - v) * (fx - fw);
            let mut p = (x - v) * q - (x - w) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            let e_prev = e;
            e = d;
            if p.abs() >= (0.5 * q * e_prev).abs() || p <= q * (a - x) || p >= q * (b - x) {
                e = if x >= xm { a - x } else { b - x };
                d = CGOLD * e;
            } else {
                d = p / q;
                let u = x + d;
                if u - a < tol2 || b - u < tol2 {
                    d = tol1.copysign(xm - x);
                }
            }
        } else {
            e = if x >= xm { a - x } else { b - x };
            d = CGOLD * e;
        }

        let u = if d.abs() >= tol1 {
            x + d
        } else {
            x + tol1.copysign(d)
        };
        let fu = f(u);

        if fu <= fx {
            if u >= x {
                a = x;
            } else {
                b = x;
            }
            v = w;
            fv = fw;
            w = x;
            fw = fx;
            x = u;
            fx = fu;
        } else {
            if u < x {
                a = u;
            } else {
                b = u;
            }
            if fu <= fw || w == x {
                v = w;
                fv = fw;
                w = u;
                fw = fu;
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        }
    }

    (x, fx)
}

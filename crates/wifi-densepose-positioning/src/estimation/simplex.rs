//! Derivative-free Nelder-Mead minimiser over the plane.

use crate::config::SimplexConfig;
use crate::domain::geometry::Point2;

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Result of a minimisation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplexOutcome {
    /// Best vertex found.
    pub point: Point2,
    /// Objective value at `point`.
    pub value: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether the tolerance was met before the iteration cap.
    pub converged: bool,
}

/// Minimise `objective` starting from `seed`.
///
/// The initial simplex is `seed` plus one vertex offset by
/// `config.initial_step` along each axis. The run stops when both the spread
/// of objective values and the distance of every vertex from the best one
/// fall below `config.tolerance`, or after `config.max_iterations`.
pub fn minimize<F>(mut objective: F, seed: Point2, config: &SimplexConfig) -> SimplexOutcome
where
    F: FnMut(Point2) -> f64,
{
    let step = config.initial_step;
    let mut simplex: [(Point2, f64); 3] = [seed, offset(seed, step, 0.0), offset(seed, 0.0, step)]
        .map(|p| (p, objective(p)));

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
        let (best, f_best) = simplex[0];
        let (_, f_second) = simplex[1];
        let (worst, f_worst) = simplex[2];

        let diameter = simplex[1..]
            .iter()
            .map(|(p, _)| p.distance_to(&best))
            .fold(0.0_f64, f64::max);
        if (f_worst - f_best).abs() <= config.tolerance && diameter <= config.tolerance {
            converged = true;
            break;
        }
        iterations += 1;

        let centroid = midpoint(best, simplex[1].0);
        let reflected = along(centroid, worst, -REFLECT);
        let f_reflected = objective(reflected);

        if f_reflected < f_best {
            let expanded = along(centroid, worst, -EXPAND);
            let f_expanded = objective(expanded);
            simplex[2] = if f_expanded < f_reflected {
                (expanded, f_expanded)
            } else {
                (reflected, f_reflected)
            };
            continue;
        }
        if f_reflected < f_second {
            simplex[2] = (reflected, f_reflected);
            continue;
        }

        // Contract towards the better of the worst and reflected vertices.
        let (toward, f_toward) = if f_reflected < f_worst {
            (reflected, f_reflected)
        } else {
            (worst, f_worst)
        };
        let contracted = along(centroid, toward, CONTRACT);
        let f_contracted = objective(contracted);
        if f_contracted < f_toward {
            simplex[2] = (contracted, f_contracted);
            continue;
        }

        for vertex in simplex.iter_mut().skip(1) {
            let p = along(best, vertex.0, SHRINK);
            *vertex = (p, objective(p));
        }
    }

    simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
    SimplexOutcome {
        point: simplex[0].0,
        value: simplex[0].1,
        iterations,
        converged,
    }
}

fn offset(p: Point2, dx: f64, dy: f64) -> Point2 {
    Point2::new(p.x + dx, p.y + dy)
}

fn midpoint(a: Point2, b: Point2) -> Point2 {
    Point2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// `origin + t * (target - origin)`.
fn along(origin: Point2, target: Point2, t: f64) -> Point2 {
    Point2::new(
        origin.x + t * (target.x - origin.x),
        origin.y + t * (target.y - origin.y),
    )
}

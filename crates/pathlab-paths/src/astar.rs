use std::fmt::Debug;

use pathlab_core::{Error, Result};

use crate::traits::Heuristic;

/// Check an A* request: a goal and a heuristic are required, the heuristic
/// must be zero at the goal and non-negative at the source.
///
/// A* itself runs through the shared best-first step with the heuristic
/// added to the priority key.
pub(crate) fn validate<'h, N: Copy + Debug>(
    source: N,
    goal: Option<N>,
    heuristic: Option<&'h dyn Heuristic<N>>,
) -> Result<&'h dyn Heuristic<N>> {
    let goal = goal.ok_or_else(|| Error::config("A* requires a goal"))?;
    let h = heuristic.ok_or_else(|| Error::config("A* requires a heuristic"))?;
    let at_goal = h.estimate(goal, goal);
    if at_goal != 0 {
        return Err(Error::config(format!(
            "heuristic must be 0 at the goal {goal:?}, got {at_goal}"
        )));
    }
    let at_source = h.estimate(source, goal);
    if at_source < 0 {
        return Err(Error::config(format!(
            "heuristic must be non-negative, got {at_source} at {source:?}"
        )));
    }
    Ok(h)
}

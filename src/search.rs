use crate::{ActionBase, GoapError, Result, WorldState};

/// Strategy used by the [`Planner`](crate::Planner) to turn a set of usable
/// actions into an ordered plan.
///
/// Implementations receive only the static side of each action. They return
/// positions into `actions`, in execution order.
///
/// # Examples
///
/// ```
/// use goap_agent::{ActionBase, GoapError, Result, SearchAlgorithm, Solution, WorldState};
///
/// /// Takes the first single action that reaches the goal.
/// struct OneStep;
///
/// impl SearchAlgorithm for OneStep {
///     fn search(
///         &self,
///         actions: &[&ActionBase],
///         start: &WorldState,
///         goal: &WorldState,
///     ) -> Result<Solution> {
///         actions
///             .iter()
///             .position(|a| a.can_perform(start) && start.with_effects(&a.effects).satisfies(goal))
///             .map(|i| Solution { steps: vec![i], cost: actions[i].cost() })
///             .ok_or(GoapError::NoPlanFound)
///     }
/// }
/// ```
pub trait SearchAlgorithm {
    fn search(
        &self,
        actions: &[&ActionBase],
        start: &WorldState,
        goal: &WorldState,
    ) -> Result<Solution>;
}

/// Result of a successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Positions into the searched action slice, first step first
    pub steps: Vec<usize>,
    /// Sum of the step costs
    pub cost: f32,
}

/// Forward branch-and-bound enumeration over action orderings.
///
/// Every ordering of usable actions whose preconditions chain from the start
/// state is expanded until it reaches the goal. Each action is used at most
/// once per path. Among all goal-reaching paths the cheapest wins; when
/// costs are equal the path found first in depth-first order wins, which
/// makes the result depend on the order of `actions`.
///
/// Worst case is factorial in the number of actions, so this is meant for
/// the small action sets a single agent carries.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExhaustiveSearch;

impl SearchAlgorithm for ExhaustiveSearch {
    fn search(
        &self,
        actions: &[&ActionBase],
        start: &WorldState,
        goal: &WorldState,
    ) -> Result<Solution> {
        let mut tree = SearchTree::new(actions, start, goal);
        let all: Vec<usize> = (0..actions.len()).collect();
        let found = tree.build(SearchTree::ROOT, &all);

        log::debug!(
            "search expanded {} nodes, {} leaves reach the goal",
            tree.nodes.len(),
            tree.leaves.len()
        );

        if !found {
            return Err(GoapError::NoPlanFound);
        }

        let leaf = tree.cheapest_leaf().ok_or(GoapError::NoPlanFound)?;
        Ok(Solution {
            steps: tree.path_to(leaf),
            cost: tree.nodes[leaf].cost,
        })
    }
}

/// Node of the search tree. Nodes own their state by value so siblings
/// never observe each other's effects.
#[derive(Debug, Clone)]
struct Node {
    parent: Option<usize>,
    cost: f32,
    state: WorldState,
    /// Position of the producing action, `None` for the root
    action: Option<usize>,
}

/// Arena holding the search tree. Children point to parents by index.
struct SearchTree<'a> {
    actions: &'a [&'a ActionBase],
    goal: &'a WorldState,
    nodes: Vec<Node>,
    leaves: Vec<usize>,
}

impl<'a> SearchTree<'a> {
    const ROOT: usize = 0;

    fn new(actions: &'a [&'a ActionBase], start: &WorldState, goal: &'a WorldState) -> Self {
        Self {
            actions,
            goal,
            nodes: vec![Node {
                parent: None,
                cost: 0.0,
                state: start.clone(),
                action: None,
            }],
            leaves: Vec::new(),
        }
    }

    /// Expands `parent` with every action in `usable` whose preconditions
    /// hold there. Returns whether any leaf was recorded below `parent`.
    fn build(&mut self, parent: usize, usable: &[usize]) -> bool {
        let mut found = false;

        for (pos, &idx) in usable.iter().enumerate() {
            let action = self.actions[idx];
            let goal = self.goal;

            if !action.can_perform(&self.nodes[parent].state) {
                continue;
            }

            let state = self.nodes[parent].state.with_effects(&action.effects);
            let cost = self.nodes[parent].cost + action.cost();
            let reached = state.satisfies(goal);
            let child = self.nodes.len();
            self.nodes.push(Node {
                parent: Some(parent),
                cost,
                state,
                action: Some(idx),
            });

            if reached {
                self.leaves.push(child);
                found = true;
            } else {
                let remaining: Vec<usize> = usable
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != pos)
                    .map(|(_, &a)| a)
                    .collect();
                if self.build(child, &remaining) {
                    found = true;
                }
            }
        }

        found
    }

    /// Strictly cheapest leaf; the earliest recorded leaf wins ties.
    fn cheapest_leaf(&self) -> Option<usize> {
        let mut cheapest: Option<usize> = None;
        for &leaf in &self.leaves {
            match cheapest {
                Some(best) if self.nodes[leaf].cost >= self.nodes[best].cost => {}
                _ => cheapest = Some(leaf),
            }
        }
        cheapest
    }

    fn path_to(&self, leaf: usize) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = Some(leaf);

        while let Some(idx) = current {
            let node = &self.nodes[idx];
            if let Some(action) = node.action {
                path.push(action);
            }
            current = node.parent;
        }

        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_action(
        name: &str,
        cost: f32,
        pre: Vec<(&str, bool)>,
        eff: Vec<(&str, bool)>,
    ) -> ActionBase {
        let mut action = ActionBase::new(name, cost).unwrap();
        for (k, v) in pre {
            action.preconditions.set(k, v);
        }
        for (k, v) in eff {
            action.effects.set(k, v);
        }
        action
    }

    fn search(actions: &[ActionBase], start: &WorldState, goal: &WorldState) -> Result<Solution> {
        let refs: Vec<&ActionBase> = actions.iter().collect();
        ExhaustiveSearch.search(&refs, start, goal)
    }

    #[test]
    fn test_picks_cheaper_branch() {
        let a = make_action("a", 1.0, vec![("start", true)], vec![("goal", true)]);
        let b = make_action("b", 5.0, vec![("start", true)], vec![("goal", true)]);

        let start = WorldState::new().with("start", true);
        let goal = WorldState::new().with("goal", true);

        let solution = search(&[b, a], &start, &goal).unwrap();
        assert_eq!(solution.steps, [1]);
        assert_eq!(solution.cost, 1.0);
    }

    #[test]
    fn test_multi_step_plan() {
        let action1 = make_action(
            "action1",
            1.0,
            vec![("condition1", true)],
            vec![("condition2", true)],
        );
        let action2 = make_action(
            "action2",
            1.0,
            vec![("condition2", true)],
            vec![("goal", true)],
        );

        let start = WorldState::new().with("condition1", true);
        let goal = WorldState::new().with("goal", true);

        let solution = search(&[action2, action1], &start, &goal).unwrap();
        assert_eq!(solution.steps, [1, 0]);
        assert_eq!(solution.cost, 2.0);
    }

    #[test]
    fn test_first_found_wins_ties() {
        let a = make_action("a", 3.0, vec![], vec![("goal", true)]);
        let b = make_action("b", 3.0, vec![], vec![("goal", true)]);
        let goal = WorldState::new().with("goal", true);

        let ab = search(&[a.clone(), b.clone()], &WorldState::new(), &goal).unwrap();
        let ba = search(&[b, a], &WorldState::new(), &goal).unwrap();
        assert_eq!(ab.steps, [0]);
        assert_eq!(ba.steps, [0]);
    }

    #[test]
    fn test_action_used_once_per_path() {
        // toggling back and forth could loop forever if actions repeated
        let on = make_action("on", 1.0, vec![("lit", false)], vec![("lit", true)]);
        let off = make_action("off", 1.0, vec![("lit", true)], vec![("lit", false)]);
        let goal = WorldState::new().with("lit", true).with("done", true);

        let result = search(&[on, off], &WorldState::new().with("lit", false), &goal);
        assert!(matches!(result, Err(GoapError::NoPlanFound)));
    }

    #[test]
    fn test_root_is_never_a_leaf() {
        let goal = WorldState::new().with("fed", true);
        let start = goal.clone();

        assert!(matches!(
            search(&[], &start, &goal),
            Err(GoapError::NoPlanFound)
        ));

        let noop = make_action("noop", 0.0, vec![], vec![]);
        let solution = search(&[noop], &start, &goal).unwrap();
        assert_eq!(solution.steps, [0]);
    }

    #[test]
    fn test_leaf_stops_expansion() {
        // b would also satisfy the goal after a, but a alone already does
        let a = make_action("a", 1.0, vec![], vec![("goal", true)]);
        let b = make_action("b", 0.0, vec![("goal", true)], vec![("extra", true)]);
        let goal = WorldState::new().with("goal", true);

        let actions = [a, b];
        let refs: Vec<&ActionBase> = actions.iter().collect();
        let start = WorldState::new();
        let mut tree = SearchTree::new(&refs, &start, &goal);
        assert!(tree.build(SearchTree::ROOT, &[0, 1]));
        assert_eq!(tree.leaves.len(), 1);
        assert_eq!(tree.nodes.len(), 2);
    }

    #[test]
    fn test_sibling_states_are_independent() {
        let a = make_action("a", 1.0, vec![], vec![("x", true)]);
        let b = make_action("b", 1.0, vec![("x", false)], vec![("goal", true)]);
        let goal = WorldState::new().with("goal", true);

        // a sets x, which must not leak into the sibling branch that starts with b
        let solution = search(&[a, b], &WorldState::new().with("x", false), &goal).unwrap();
        assert_eq!(solution.steps, [1]);
    }
}

use std::io::Write;

use crate::{ActionRegistry, Plan, Result, WorldState};

/// Renders a registry and a chosen plan as a Graphviz DOT digraph.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoapVisualizer;

impl GoapVisualizer {
    /// Creates a visualizer.
    pub fn new() -> Self {
        Self
    }

    /// Writes the DOT graph to `out`.
    ///
    /// Every registered action becomes a node. Actions applicable in
    /// `current_state` get an edge from the initial state. Actions whose
    /// effects on `current_state` satisfy `goal_state` get an edge to the
    /// goal. The plan is drawn as a red chain from initial state to goal.
    pub fn write_dot<C: ?Sized, W: Write>(
        &self,
        out: &mut W,
        registry: &ActionRegistry<C>,
        current_state: &WorldState,
        goal_state: &WorldState,
        plan: &Plan,
    ) -> Result<()> {
        writeln!(out, "digraph GOAP {{")?;
        writeln!(out, "    rankdir=LR;")?;
        writeln!(out, "    node [shape=box, style=filled, fillcolor=lightblue];")?;
        writeln!(out, "    edge [fontsize=10];")?;

        writeln!(
            out,
            "    initial [label=\"Initial State\\n{}\", fillcolor=lightgreen];",
            Self::state_label(current_state)
        )?;
        writeln!(
            out,
            "    goal [label=\"Goal State\\n{}\", fillcolor=lightpink];",
            Self::state_label(goal_state)
        )?;

        for (id, action) in registry.iter() {
            let fill = if plan.actions().contains(&id) {
                ", fillcolor=lightcoral"
            } else {
                ""
            };
            writeln!(
                out,
                "    action_{} [label=\"{}\\nCost: {}\\nPre: {}\\nEff: {}\"{}];",
                id.index(),
                action.name(),
                action.cost(),
                Self::state_label(action.preconditions()),
                Self::state_label(action.effects()),
                fill
            )?;
        }

        for (id, action) in registry.iter() {
            if current_state.satisfies(action.preconditions()) {
                writeln!(out, "    initial -> action_{} [label=\"possible\"];", id.index())?;
            }
            if current_state
                .with_effects(action.effects())
                .satisfies(goal_state)
            {
                writeln!(out, "    action_{} -> goal [label=\"achieves\"];", id.index())?;
            }
        }

        writeln!(out, "    edge [color=red, penwidth=2.0];")?;
        let mut previous = "initial".to_string();
        for id in plan.actions() {
            let node = format!("action_{}", id.index());
            writeln!(out, "    {} -> {};", previous, node)?;
            previous = node;
        }
        if !plan.is_empty() {
            writeln!(out, "    {} -> goal;", previous)?;
        }

        writeln!(out, "}}")?;
        Ok(())
    }

    /// Same as [`GoapVisualizer::write_dot`] but returns the graph.
    pub fn to_dot<C: ?Sized>(
        &self,
        registry: &ActionRegistry<C>,
        current_state: &WorldState,
        goal_state: &WorldState,
        plan: &Plan,
    ) -> Result<String> {
        let mut buf = Vec::new();
        self.write_dot(&mut buf, registry, current_state, goal_state, plan)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn state_label(state: &WorldState) -> String {
        state
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect::<Vec<_>>()
            .join("\\n")
    }
}

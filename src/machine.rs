//! Stage machine - transition graph over [`Stage`]
//!
//! The graph is static and small, so reachability is computed once per
//! process and shared read-only through [`ProcessStateMachine::global`].

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::OnceLock;

use crate::stage::Stage;

static MACHINE: OnceLock<ProcessStateMachine> = OnceLock::new();

/// Directed transition graph with precomputed reachability sets.
#[derive(Debug)]
pub struct ProcessStateMachine {
    /// Direct successors of each stage
    edges_from: HashMap<Stage, Vec<Stage>>,
    /// Every stage reachable in one or more steps, in canonical order
    reachable: HashMap<Stage, Vec<Stage>>,
    /// The stage itself followed by every other reachable stage
    next: HashMap<Stage, Vec<Stage>>,
}

impl ProcessStateMachine {
    /// Shared instance, built on first use
    pub fn global() -> &'static ProcessStateMachine {
        MACHINE.get_or_init(ProcessStateMachine::build)
    }

    fn build() -> Self {
        let mut edges_from: HashMap<Stage, Vec<Stage>> = HashMap::new();
        for (from, to) in transition_rules() {
            edges_from.entry(from).or_default().push(to);
        }

        let reachable: HashMap<Stage, Vec<Stage>> = Stage::all()
            .iter()
            .map(|&stage| (stage, bfs_reachable(&edges_from, stage)))
            .collect();

        let next = reachable
            .iter()
            .map(|(&stage, stages)| {
                let mut states = vec![stage];
                states.extend(stages.iter().copied().filter(|s| *s != stage));
                (stage, states)
            })
            .collect();

        Self {
            edges_from,
            reachable,
            next,
        }
    }

    /// Direct successors of `stage`
    pub fn successors(&self, stage: Stage) -> &[Stage] {
        self.edges_from.get(&stage).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// True if `from → to` is a single transition
    pub fn has_edge(&self, from: Stage, to: Stage) -> bool {
        self.successors(from).contains(&to)
    }

    /// True if `to` can follow `from` after any number of transitions
    pub fn can_reach(&self, from: Stage, to: Stage) -> bool {
        self.reachable
            .get(&from)
            .is_some_and(|stages| stages.contains(&to))
    }

    /// All stages that can follow `stage`, in canonical order.
    ///
    /// With `include_self` the stage itself is listed first.
    pub fn next_states(&self, stage: Stage, include_self: bool) -> &[Stage] {
        let states = self.next.get(&stage).map(|v| v.as_slice()).unwrap_or(&[]);
        if include_self || states.is_empty() {
            states
        } else {
            &states[1..]
        }
    }

    /// Every transition in the graph, grouped by source in canonical order
    pub fn edges(&self) -> Vec<(Stage, Stage)> {
        Stage::all()
            .iter()
            .flat_map(|&from| self.successors(from).iter().map(move |&to| (from, to)))
            .collect()
    }
}

fn transition_rules() -> Vec<(Stage, Stage)> {
    let mut rules = vec![
        (Stage::Understanding, Stage::Searching),
        (Stage::Searching, Stage::Planning),
        (Stage::Planning, Stage::Generating),
        (Stage::Generating, Stage::Correcting),
        (Stage::Correcting, Stage::Generating),
        (Stage::Generating, Stage::Finished),
        (Stage::Correcting, Stage::Finished),
    ];

    for stage in Stage::all().iter().filter(|s| !s.is_terminal()) {
        rules.push((*stage, Stage::Failed));
        rules.push((*stage, Stage::Stopped));
    }

    rules
}

fn bfs_reachable(edges_from: &HashMap<Stage, Vec<Stage>>, start: Stage) -> Vec<Stage> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for next in edges_from.get(&current).into_iter().flatten() {
            if visited.insert(*next) {
                queue.push_back(*next);
            }
        }
    }

    Stage::all()
        .iter()
        .copied()
        .filter(|s| visited.contains(s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_stages_have_no_successors() {
        let machine = ProcessStateMachine::global();
        assert!(machine.successors(Stage::Finished).is_empty());
        assert!(machine.successors(Stage::Failed).is_empty());
        assert!(machine.successors(Stage::Stopped).is_empty());
        assert!(machine.next_states(Stage::Failed, false).is_empty());
        assert_eq!(machine.next_states(Stage::Stopped, true), &[Stage::Stopped]);
    }

    #[test]
    fn test_failure_reachable_from_every_active_stage() {
        let machine = ProcessStateMachine::global();
        for stage in Stage::all().iter().filter(|s| !s.is_terminal()) {
            assert!(machine.has_edge(*stage, Stage::Failed), "{stage} -> FAILED");
            assert!(machine.has_edge(*stage, Stage::Stopped), "{stage} -> STOPPED");
        }
    }

    #[test]
    fn test_correcting_only_entered_from_generating() {
        let machine = ProcessStateMachine::global();
        let sources: Vec<Stage> = machine
            .edges()
            .into_iter()
            .filter(|(_, to)| *to == Stage::Correcting)
            .map(|(from, _)| from)
            .collect();
        assert_eq!(sources, vec![Stage::Generating]);

        let exits = machine.successors(Stage::Correcting);
        assert!(exits.iter().all(|s| *s == Stage::Generating || s.is_terminal()));
    }

    #[test]
    fn test_next_states() {
        let machine = ProcessStateMachine::global();
        assert_eq!(
            machine.next_states(Stage::Planning, true),
            &[
                Stage::Planning,
                Stage::Generating,
                Stage::Correcting,
                Stage::Finished,
                Stage::Failed,
                Stage::Stopped,
            ]
        );
        assert_eq!(
            machine.next_states(Stage::Generating, false),
            &[Stage::Correcting, Stage::Finished, Stage::Failed, Stage::Stopped]
        );
        assert!(!machine.next_states(Stage::Searching, false).contains(&Stage::Searching));
        assert!(machine.can_reach(Stage::Correcting, Stage::Generating));
        assert!(machine.can_reach(Stage::Generating, Stage::Generating));
        assert!(!machine.can_reach(Stage::Planning, Stage::Searching));
    }

    #[test]
    fn test_global_is_shared() {
        let a = ProcessStateMachine::global() as *const _;
        let b = ProcessStateMachine::global() as *const _;
        assert_eq!(a, b);
    }
}

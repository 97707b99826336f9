//! Finds released records that are only kept alive by each other.
//!
//! Starting from the released records, walk every value they can reach and
//! count the references found along the way. A record or heap value with
//! more strong references than the walk found is held from outside (an
//! active scope, the host, a Rust local) and keeps everything it reaches
//! alive. Released records left unmarked are unreachable.

use super::{EnvId, Environments};
use crate::value::{Callable, Value};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Node {
    Record(usize),
    Heap(usize),
}

struct Visited {
    /// Our own clone of a heap value, so it stays put during the walk
    value: Option<Value>,
    internal: usize,
    edges: Vec<Node>,
}

struct RetentionGraph<'a> {
    environments: &'a Environments,
    released: HashSet<usize>,
    nodes: HashMap<Node, Visited>,
    pending: Vec<Node>,
}

pub(super) fn unreachable_records(
    environments: &Environments,
    released: &[EnvId],
) -> HashSet<EnvId> {
    let mut graph = RetentionGraph {
        environments,
        released: released.iter().map(|id| id.0).collect(),
        nodes: HashMap::new(),
        pending: Vec::new(),
    };

    for id in released {
        graph.visit(Node::Record(id.0), None);
    }
    while let Some(node) = graph.pending.pop() {
        graph.expand(node);
    }

    let live = graph.live_nodes();
    released
        .iter()
        .copied()
        .filter(|id| !live.contains(&Node::Record(id.0)))
        .collect()
}

impl RetentionGraph<'_> {
    fn visit(&mut self, node: Node, value: Option<&Value>) {
        if !self.nodes.contains_key(&node) {
            self.nodes.insert(
                node,
                Visited {
                    value: value.cloned(),
                    internal: 0,
                    edges: Vec::new(),
                },
            );
            self.pending.push(node);
        }
    }

    fn edge(&mut self, from: Node, to: Node, value: Option<&Value>) {
        self.visit(to, value);
        if let Some(target) = self.nodes.get_mut(&to) {
            target.internal += 1;
        }
        if let Some(source) = self.nodes.get_mut(&from) {
            source.edges.push(to);
        }
    }

    fn value_edge(&mut self, from: Node, value: &Value) {
        if let Some(node) = heap_node(value) {
            self.edge(from, node, Some(value));
        }
    }

    fn expand(&mut self, node: Node) {
        match node {
            Node::Record(slot) => self.expand_record(slot),
            Node::Heap(_) => {
                let value = self.nodes.get(&node).and_then(|visited| visited.value.clone());
                if let Some(value) = value {
                    self.expand_value(node, &value);
                }
            }
        }
    }

    /// Only released records are walked; any other record is running or is
    /// the root, and is live regardless.
    fn expand_record(&mut self, slot: usize) {
        if !self.released.contains(&slot) {
            return;
        }
        let environments = self.environments;
        let record = &environments.records[slot];
        let from = Node::Record(slot);

        if record.handle.strong_count() > 0 {
            if let Some(parent) = record.parent {
                self.edge(from, Node::Record(parent.0), None);
            }
        }
        for binding in record.bindings.values() {
            self.value_edge(from, &binding.value);
        }
    }

    fn expand_value(&mut self, from: Node, value: &Value) {
        match value {
            Value::Array(elements) => {
                for element in elements.borrow().iter() {
                    self.value_edge(from, element);
                }
            }
            Value::Object(object) => {
                let object = object.borrow();
                for property in object.properties.values() {
                    self.value_edge(from, property);
                }
                if let Some(prototype) = &object.prototype {
                    self.value_edge(from, &Value::Object(Rc::clone(prototype)));
                }
            }
            Value::Function(function) => {
                for property in function.properties.borrow().values() {
                    self.value_edge(from, property);
                }
                if let Callable::Closure(closure) = &function.callable {
                    let slot = closure.scope.env().0;
                    let scope = Rc::as_ptr(&closure.scope);
                    let current = self
                        .environments
                        .records
                        .get(slot)
                        .is_some_and(|record| std::ptr::eq(record.handle.as_ptr(), scope));
                    if current {
                        self.edge(from, Node::Record(slot), None);
                    }
                }
            }
            _ => {}
        }
    }

    fn external_references(&self, node: Node, visited: &Visited) -> usize {
        let held = match node {
            Node::Record(slot) => self.environments.records[slot].handle.strong_count(),
            Node::Heap(_) => visited
                .value
                .as_ref()
                .map_or(0, |value| strong_count(value).saturating_sub(1)),
        };
        held.saturating_sub(visited.internal)
    }

    fn live_nodes(&self) -> HashSet<Node> {
        let mut live = HashSet::new();
        let mut stack: Vec<Node> = self
            .nodes
            .iter()
            .filter(|(node, visited)| self.external_references(**node, visited) > 0)
            .map(|(node, _)| *node)
            .collect();

        while let Some(node) = stack.pop() {
            if live.insert(node) {
                if let Some(visited) = self.nodes.get(&node) {
                    stack.extend(visited.edges.iter().copied());
                }
            }
        }
        live
    }
}

fn heap_node(value: &Value) -> Option<Node> {
    let address = match value {
        Value::Array(elements) => Rc::as_ptr(elements) as *const () as usize,
        Value::Object(object) => Rc::as_ptr(object) as *const () as usize,
        Value::Function(function) => Rc::as_ptr(function) as *const () as usize,
        _ => return None,
    };
    Some(Node::Heap(address))
}

fn strong_count(value: &Value) -> usize {
    match value {
        Value::Array(elements) => Rc::strong_count(elements),
        Value::Object(object) => Rc::strong_count(object),
        Value::Function(function) => Rc::strong_count(function),
        _ => 0,
    }
}

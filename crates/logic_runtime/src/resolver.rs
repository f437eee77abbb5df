// Port Resolver - Pull evaluation along data wires
//
// Resolving an input finds its producer and asks that node for a value:
// Logic nodes are recomputed from their own inputs, Get nodes read the actor
// live, and everything else (events, actions, casts) answers from the cache.
//
// Within one pull each Logic node is computed at most once. A Logic node met
// again while its own inputs are still being resolved closes a data cycle and
// resolves absent.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use logic_types::Value;

use crate::cache::ValueCache;
use crate::context::ActorContext;
use crate::index::{GraphIndex, IndexedNode};
use crate::nodes::{self, Behavior, NodeContext, VariableOp};

/// Resolves data inputs for one actor's graph
pub struct PortResolver<'a> {
    actor_id: &'a str,
    graph: &'a GraphIndex,
    cache: &'a ValueCache,
    max_depth: usize,
}

/// Bookkeeping for one top-level pull
#[derive(Default)]
struct Pull<'a> {
    /// Logic nodes whose inputs are being resolved
    active: HashSet<&'a str>,
    /// Logic results already computed
    done: HashMap<&'a str, Option<Value>>,
}

impl<'a> PortResolver<'a> {
    pub fn new(
        actor_id: &'a str,
        graph: &'a GraphIndex,
        cache: &'a ValueCache,
        max_depth: usize,
    ) -> Self {
        Self {
            actor_id,
            graph,
            cache,
            max_depth,
        }
    }

    /// Value arriving at `node_id.input_id` over a wire, or `None` if the
    /// input is unwired or its producer has nothing to give
    pub fn resolve_input(
        &self,
        node_id: &str,
        input_id: &str,
        actor: &ActorContext,
    ) -> Option<Value> {
        self.resolve_at(node_id, input_id, actor, &mut Pull::default(), 0)
    }

    /// Build the context a node's behavior runs with. Each data input is the
    /// wired value if any, else a property literal of the same name.
    pub fn gather_inputs<'n>(
        &self,
        node: &'n IndexedNode,
        actor: &ActorContext,
    ) -> NodeContext<'n> {
        self.gather_at(node, actor, &mut Pull::default(), 0)
    }

    fn gather_at<'n>(
        &self,
        node: &'n IndexedNode,
        actor: &ActorContext,
        pull: &mut Pull<'a>,
        depth: usize,
    ) -> NodeContext<'n> {
        let mut inputs = HashMap::new();
        for input in &node.data_inputs {
            let value = self
                .resolve_at(&node.id, input, actor, pull, depth)
                .or_else(|| node.property(input).map(Value::from));
            if let Some(value) = value {
                inputs.insert(input.clone(), value);
            }
        }
        NodeContext::new(&node.id, &node.properties, inputs)
    }

    fn resolve_at(
        &self,
        node_id: &str,
        input_id: &str,
        actor: &ActorContext,
        pull: &mut Pull<'a>,
        depth: usize,
    ) -> Option<Value> {
        let graph = self.graph;
        let source = graph.source_of(node_id, input_id)?;
        let producer = graph.node(&source.node_id)?;

        match producer.behavior {
            Behavior::Variable(Some(VariableOp::Get)) => {
                Some(nodes::variable::read(producer, actor))
            }
            Behavior::Variable(None) => None,
            Behavior::Logic(op) => {
                let id = producer.id.as_str();
                if let Some(value) = pull.done.get(id) {
                    return value.clone();
                }
                if pull.active.contains(id) {
                    warn!(
                        actor_id = %self.actor_id,
                        node_id = %id,
                        "Data cycle through logic node, treating input as absent"
                    );
                    return None;
                }
                if depth >= self.max_depth {
                    warn!(
                        actor_id = %self.actor_id,
                        node_id = %id,
                        limit = self.max_depth,
                        "Pull depth limit reached, treating input as absent"
                    );
                    return None;
                }

                pull.active.insert(id);
                let ctx = self.gather_at(producer, actor, pull, depth + 1);
                pull.active.remove(id);

                let value = op.map(|op| nodes::logic::evaluate(op, &ctx));
                pull.done.insert(id, value.clone());
                value
            }
            Behavior::Event(_) | Behavior::Flow(_) | Behavior::Action(_) | Behavior::Cast(_) => self
                .cache
                .get_output(self.actor_id, &source.node_id, &source.port_id)
                .cloned(),
        }
    }
}

// Graph Walker - Push execution along exec wires
//
// Starting from an exec output, every destination node runs to completion in
// connection order, depth first. Flow nodes pick which of their exec outputs
// to follow; actions and casts always continue along "exec".

use tracing::{debug, error};

use crate::cache::ValueCache;
use crate::config::InterpreterConfig;
use crate::context::{ActorContext, EngineContext};
use crate::error::WalkError;
use crate::index::{GraphIndex, IndexedNode};
use crate::nodes::{self, Behavior, ExecRoute, NodeOutput};
use crate::resolver::PortResolver;

/// Walks one actor's graph, writing node outputs into the shared cache
pub struct GraphWalker<'a> {
    actor_id: &'a str,
    graph: &'a GraphIndex,
    cache: &'a mut ValueCache,
    config: &'a InterpreterConfig,
}

impl<'a> GraphWalker<'a> {
    pub fn new(
        actor_id: &'a str,
        graph: &'a GraphIndex,
        cache: &'a mut ValueCache,
        config: &'a InterpreterConfig,
    ) -> Self {
        Self {
            actor_id,
            graph,
            cache,
            config,
        }
    }

    /// Run everything wired to `node_id.exec_port`
    pub fn walk_from_output(
        &mut self,
        node_id: &str,
        exec_port: &str,
        actor: &mut ActorContext,
        engine: &mut dyn EngineContext,
    ) -> Result<(), WalkError> {
        self.walk_at(node_id, exec_port, actor, engine, 0)
    }

    fn walk_at(
        &mut self,
        node_id: &str,
        exec_port: &str,
        actor: &mut ActorContext,
        engine: &mut dyn EngineContext,
        depth: usize,
    ) -> Result<(), WalkError> {
        let graph = self.graph;
        for target in graph.destinations(node_id, exec_port) {
            let Some(node) = graph.node(&target.node_id) else {
                continue;
            };
            self.execute_node(node, actor, engine, depth + 1)?;
        }
        Ok(())
    }

    fn execute_node(
        &mut self,
        node: &IndexedNode,
        actor: &mut ActorContext,
        engine: &mut dyn EngineContext,
        depth: usize,
    ) -> Result<(), WalkError> {
        if depth > self.config.max_exec_depth {
            error!(
                actor_id = %self.actor_id,
                node_id = %node.id,
                limit = self.config.max_exec_depth,
                "Exec depth limit exceeded, aborting traversal"
            );
            return Err(WalkError::DepthExceeded {
                actor_id: self.actor_id.to_string(),
                node_id: node.id.clone(),
                limit: self.config.max_exec_depth,
            });
        }

        debug!(
            actor_id = %self.actor_id,
            node_id = %node.id,
            subtype = %node.subtype,
            depth,
            "Executing node"
        );

        let output = match node.behavior {
            // Entry points and pure nodes do nothing when pushed into
            Behavior::Event(_) | Behavior::Variable(_) | Behavior::Logic(_) => return Ok(()),
            Behavior::Flow(None) => {
                debug!(node_id = %node.id, subtype = %node.subtype, "Unknown flow subtype, branch ends");
                return Ok(());
            }
            Behavior::Flow(Some(op)) => {
                let ctx = self.resolver().gather_inputs(node, actor);
                nodes::flow::execute(op, &ctx)
            }
            Behavior::Action(op) => match op {
                Some(op) => {
                    let ctx = self.resolver().gather_inputs(node, actor);
                    nodes::action::execute(op, &ctx, actor, engine, self.config)
                }
                None => NodeOutput::continue_default(Default::default()),
            },
            Behavior::Cast(op) => match op {
                Some(op) => {
                    let ctx = self.resolver().gather_inputs(node, actor);
                    nodes::cast::execute(op, &ctx)
                }
                None => NodeOutput::continue_default(Default::default()),
            },
        };

        for (port, value) in output.values {
            self.cache.set_output(self.actor_id, &node.id, &port, value);
        }

        match output.route {
            ExecRoute::Continue(port) => self.walk_at(&node.id, &port, actor, engine, depth),
            ExecRoute::Sequence(ports) => {
                for port in ports {
                    self.walk_at(&node.id, &port, actor, engine, depth)?;
                }
                Ok(())
            }
            ExecRoute::End => Ok(()),
        }
    }

    fn resolver(&self) -> PortResolver<'_> {
        PortResolver::new(self.actor_id, self.graph, self.cache, self.config.max_pull_depth)
    }
}

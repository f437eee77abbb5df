// Logic Interpreter - Host-facing entry points
//
// Owns the loaded graph for every actor and the single shared value cache.
// Each entry point scans one actor's event nodes in document order, seeds the
// trigger data, and walks from each match. The host must call `clear_tick`
// once per tick before dispatching anything.

use std::collections::HashMap;

use tracing::{debug, error, info, warn};

use logic_types::{ActorRef, LogicSheet, SheetIssue, Value};

use crate::cache::ValueCache;
use crate::catalog::NodeCatalog;
use crate::config::InterpreterConfig;
use crate::context::{ActorContext, Edge, EngineContext};
use crate::error::GraphError;
use crate::index::GraphIndex;
use crate::nodes::event::Trigger;
use crate::nodes::Behavior;
use crate::resolver::PortResolver;
use crate::walker::GraphWalker;

/// Per-actor graphs plus the shared per-tick cache
pub struct LogicInterpreter {
    catalog: NodeCatalog,
    config: InterpreterConfig,
    graphs: HashMap<String, GraphIndex>,
    cache: ValueCache,
}

impl Default for LogicInterpreter {
    fn default() -> Self {
        Self::new(InterpreterConfig::default())
    }
}

impl LogicInterpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            catalog: NodeCatalog::builtin(),
            config,
            graphs: HashMap::new(),
            cache: ValueCache::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────────

    /// Load (or replace) the graph for an actor.
    ///
    /// A sheet with duplicate node ids is rejected and any graph already
    /// loaded for the actor stays in place. Other issues are logged and
    /// returned. Cached values from a replaced graph are not cleared.
    pub fn load_graph(
        &mut self,
        actor_id: &str,
        sheet: &LogicSheet,
    ) -> Result<Vec<SheetIssue>, GraphError> {
        let issues = sheet.validate(&self.catalog);

        if let Some(SheetIssue::DuplicateNodeId { node_id }) =
            issues.iter().find(|i| i.is_error())
        {
            return Err(GraphError::DuplicateNodeId {
                actor_id: actor_id.to_string(),
                node_id: node_id.clone(),
            });
        }

        for issue in &issues {
            warn!(actor_id = %actor_id, "{}", issue);
        }

        let graph = GraphIndex::build(sheet, &self.catalog);
        info!(
            actor_id = %actor_id,
            nodes = graph.len(),
            connections = graph.connection_count(),
            warnings = issues.len(),
            "Loaded logic sheet"
        );
        self.graphs.insert(actor_id.to_string(), graph);

        Ok(issues)
    }

    /// Parse and load a sheet document
    pub fn load_graph_json(
        &mut self,
        actor_id: &str,
        json: &str,
    ) -> Result<Vec<SheetIssue>, GraphError> {
        let sheet = LogicSheet::from_json(json)?;
        self.load_graph(actor_id, &sheet)
    }

    /// Drop an actor's graph. Returns whether one was loaded.
    pub fn unload_graph(&mut self, actor_id: &str) -> bool {
        self.graphs.remove(actor_id).is_some()
    }

    pub fn has_graph(&self, actor_id: &str) -> bool {
        self.graphs.contains_key(actor_id)
    }

    pub fn graph(&self, actor_id: &str) -> Option<&GraphIndex> {
        self.graphs.get(actor_id)
    }

    pub fn catalog(&self) -> &NodeCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn cache(&self) -> &ValueCache {
        &self.cache
    }

    /// Pull the value arriving at an input of an actor's graph right now
    pub fn resolve_input(
        &self,
        actor_id: &str,
        node_id: &str,
        input_id: &str,
        actor: &ActorContext,
    ) -> Option<Value> {
        let graph = self.graphs.get(actor_id)?;
        PortResolver::new(actor_id, graph, &self.cache, self.config.max_pull_depth)
            .resolve_input(node_id, input_id, actor)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Entry Points
    // ─────────────────────────────────────────────────────────────────────────

    /// Wipe every cached output for every actor
    pub fn clear_tick(&mut self) {
        self.cache.clear();
    }

    /// Fire the actor's Update events. Returns how many fired.
    pub fn on_tick(
        &mut self,
        actor_id: &str,
        actor: &mut ActorContext,
        delta_time: f64,
        engine: &mut dyn EngineContext,
    ) -> usize {
        self.dispatch(actor_id, Trigger::Update { delta_time }, actor, engine)
    }

    /// Fire the actor's Collision events whose tag filter accepts `other`
    pub fn on_collision(
        &mut self,
        actor_id: &str,
        actor: &mut ActorContext,
        other: &ActorRef,
        engine: &mut dyn EngineContext,
    ) -> usize {
        self.dispatch(actor_id, Trigger::Collision { other }, actor, engine)
    }

    /// Fire the actor's OutOfBounds events whose edge filter accepts `edge`
    pub fn on_out_of_bounds(
        &mut self,
        actor_id: &str,
        actor: &mut ActorContext,
        edge: Edge,
        engine: &mut dyn EngineContext,
    ) -> usize {
        self.dispatch(actor_id, Trigger::OutOfBounds { edge }, actor, engine)
    }

    fn dispatch(
        &mut self,
        actor_id: &str,
        trigger: Trigger<'_>,
        actor: &mut ActorContext,
        engine: &mut dyn EngineContext,
    ) -> usize {
        let Some(graph) = self.graphs.get(actor_id) else {
            return 0;
        };

        let mut fired = 0;
        for node in graph.events() {
            if node.behavior != Behavior::Event(Some(trigger.op())) {
                continue;
            }

            let ctx = PortResolver::new(actor_id, graph, &self.cache, self.config.max_pull_depth)
                .gather_inputs(node, actor);
            if !trigger.accepts(&ctx) {
                continue;
            }

            debug!(actor_id = %actor_id, node_id = %node.id, event = %node.subtype, "Event fired");
            fired += 1;

            for (port, value) in trigger.outputs() {
                self.cache.set_output(actor_id, &node.id, port, value);
            }

            let mut walker = GraphWalker::new(actor_id, graph, &mut self.cache, &self.config);
            if let Err(e) = walker.walk_from_output(&node.id, "exec", actor, engine) {
                error!(actor_id = %actor_id, node_id = %node.id, error = %e, "Event traversal aborted");
            }
        }

        fired
    }
}

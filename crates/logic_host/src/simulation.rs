//! Playfield Simulation
//!
//! Drives the interpreter the way a game loop would: one `step` clears the
//! tick cache, runs every actor's Update events, then reports edges crossed
//! and overlapping actors. Actor rectangles are axis aligned with `(x, y)` at
//! the top-left corner.

use std::collections::HashMap;

use tracing::{debug, info};

use logic_runtime::{ActorContext, Edge, EngineState, GraphError, LogicInterpreter};
use logic_types::ActorRef;

use crate::project::{ActorConfig, PlayfieldConfig, Project};

/// An actor in the running simulation
#[derive(Debug, Clone)]
pub struct SimActor {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub context: ActorContext,
}

impl SimActor {
    pub fn from_config(config: &ActorConfig) -> Self {
        let mut context = ActorContext::new(&config.tag, config.x, config.y);
        for (name, value) in config.initial_variables() {
            context.set_variable(name, value);
        }
        Self {
            id: config.id.clone(),
            width: config.width,
            height: config.height,
            context,
        }
    }

    pub fn actor_ref(&self) -> ActorRef {
        self.context.actor_ref(&self.id)
    }

    /// Playfield edges the actor's rectangle extends past
    pub fn crossed_edges(&self, playfield: &PlayfieldConfig) -> Vec<Edge> {
        let ctx = &self.context;
        Edge::ALL
            .into_iter()
            .filter(|edge| match edge {
                Edge::Left => ctx.x < 0.0,
                Edge::Right => ctx.x + self.width > playfield.width,
                Edge::Top => ctx.y < 0.0,
                Edge::Bottom => ctx.y + self.height > playfield.height,
            })
            .collect()
    }

    pub fn overlaps(&self, other: &SimActor) -> bool {
        let (a, b) = (&self.context, &other.context);
        a.x < b.x + other.width
            && b.x < a.x + self.width
            && a.y < b.y + other.height
            && b.y < a.y + self.height
    }
}

/// Counts from one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub ticks_fired: usize,
    pub bounds_fired: usize,
    pub collisions_fired: usize,
}

/// A running project
pub struct Simulation {
    interpreter: LogicInterpreter,
    actors: Vec<SimActor>,
    playfield: PlayfieldConfig,
    engine: EngineState,
    tick: u64,
}

impl Simulation {
    /// Build actors and load their sheets. Fails if any sheet is rejected.
    pub fn new(project: &Project) -> Result<Self, GraphError> {
        let mut interpreter = LogicInterpreter::new(project.manifest.interpreter.clone());
        let mut actors = Vec::with_capacity(project.actors().len());

        for config in project.actors() {
            if let Some(sheet) = project.sheet(&config.id) {
                interpreter.load_graph(&config.id, sheet)?;
            }
            actors.push(SimActor::from_config(config));
        }

        info!("Simulation ready with {} actors", actors.len());

        Ok(Self {
            interpreter,
            actors,
            playfield: project.manifest.playfield,
            engine: EngineState::new(),
            tick: 0,
        })
    }

    /// Advance one tick of `delta` seconds
    pub fn step(&mut self, delta: f64) -> StepReport {
        let mut report = StepReport::default();

        self.interpreter.clear_tick();
        self.engine.delta_time = Some(delta);

        for actor in &mut self.actors {
            report.ticks_fired +=
                self.interpreter
                    .on_tick(&actor.id, &mut actor.context, delta, &mut self.engine);
        }

        for actor in &mut self.actors {
            for edge in actor.crossed_edges(&self.playfield) {
                debug!(actor_id = %actor.id, %edge, "Actor out of bounds");
                report.bounds_fired +=
                    self.interpreter
                        .on_out_of_bounds(&actor.id, &mut actor.context, edge, &mut self.engine);
            }
        }

        // Pairs are taken before any handler runs so handlers that move actors
        // do not change which pairs fire this tick
        let mut pairs = Vec::new();
        for i in 0..self.actors.len() {
            for j in (i + 1)..self.actors.len() {
                if self.actors[i].overlaps(&self.actors[j]) {
                    pairs.push((i, j));
                }
            }
        }
        for (i, j) in pairs {
            report.collisions_fired += self.collide(i, j);
            report.collisions_fired += self.collide(j, i);
        }

        for sound in self.engine.drain_sounds() {
            info!(tick = self.tick, sound = %sound.id, volume = sound.volume, "Play sound");
        }

        self.tick += 1;
        report
    }

    fn collide(&mut self, actor: usize, other: usize) -> usize {
        let other = self.actors[other].actor_ref();
        let actor = &mut self.actors[actor];
        debug!(actor_id = %actor.id, other = %other.id, "Collision");
        self.interpreter
            .on_collision(&actor.id, &mut actor.context, &other, &mut self.engine)
    }

    /// Run `ticks` steps
    pub fn run(&mut self, ticks: u64, delta: f64) {
        for _ in 0..ticks {
            self.step(delta);
        }
    }

    pub fn actor(&self, id: &str) -> Option<&SimActor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn actor_mut(&mut self, id: &str) -> Option<&mut SimActor> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    pub fn actors(&self) -> &[SimActor] {
        &self.actors
    }

    pub fn game_state(&self) -> &HashMap<String, f64> {
        &self.engine.game_state
    }

    pub fn interpreter(&self) -> &LogicInterpreter {
        &self.interpreter
    }

    /// Number of completed steps
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use logic_types::{LogicNode, LogicSheet, NodeKind, Value};

    use super::*;
    use crate::project::{ProjectInfo, ProjectManifest};

    fn actor(id: &str, tag: &str, x: f64, y: f64) -> ActorConfig {
        ActorConfig {
            id: id.to_string(),
            tag: tag.to_string(),
            x,
            y,
            width: 10.0,
            height: 10.0,
            sheet: None,
            variables: HashMap::new(),
        }
    }

    fn project(actors: Vec<ActorConfig>, sheets: Vec<(&str, LogicSheet)>) -> Project {
        Project {
            path: PathBuf::from("."),
            manifest: ProjectManifest {
                project: ProjectInfo {
                    id: "test".to_string(),
                    name: "Test".to_string(),
                    version: "1.0.0".to_string(),
                    description: None,
                },
                interpreter: Default::default(),
                playfield: PlayfieldConfig {
                    width: 100.0,
                    height: 100.0,
                },
                actors,
            },
            sheets: sheets
                .into_iter()
                .map(|(id, sheet)| (id.to_string(), sheet))
                .collect(),
        }
    }

    fn ball_sheet() -> LogicSheet {
        LogicSheet::new()
            .with_node(LogicNode::new("tick", NodeKind::Event, "Update"))
            .with_node(LogicNode::new("move", NodeKind::Action, "Move"))
            .with_node(LogicNode::new("out", NodeKind::Event, "OutOfBounds").with_property("edge", "left"))
            .with_node(LogicNode::new("score", NodeKind::Action, "AddScore").with_property("key", "right"))
            .with_node(LogicNode::new("reset", NodeKind::Action, "ResetPosition"))
            .with_node(LogicNode::new("hit", NodeKind::Event, "Collision").with_property("tag", "Player"))
            .with_node(LogicNode::new("bounce", NodeKind::Action, "Bounce"))
            .with_node(LogicNode::new("beep", NodeKind::Action, "PlaySound").with_property("sound", "beep"))
            .connect("tick", "exec", "move", "exec")
            .connect("out", "exec", "score", "exec")
            .connect("score", "exec", "reset", "exec")
            .connect("hit", "exec", "bounce", "exec")
            .connect("bounce", "exec", "beep", "exec")
    }

    #[test]
    fn test_edges_and_overlap() {
        let playfield = PlayfieldConfig {
            width: 100.0,
            height: 100.0,
        };
        let a = SimActor::from_config(&actor("a", "Ball", -1.0, 95.0));
        assert_eq!(a.crossed_edges(&playfield), vec![Edge::Left, Edge::Bottom]);

        let b = SimActor::from_config(&actor("b", "Player", 5.0, 100.0));
        let c = SimActor::from_config(&actor("c", "Player", 50.0, 50.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_ball_leaves_left_edge_and_resets() {
        let mut ball = actor("ball", "Ball", 5.0, 50.0);
        ball.sheet = Some("ball.json".to_string());
        ball.variables.insert("velocityX".to_string(), serde_json::json!(-100));
        let project = project(vec![ball], vec![("ball", ball_sheet())]);

        let mut sim = Simulation::new(&project).unwrap();
        let report = sim.step(0.1);

        assert_eq!(
            report,
            StepReport {
                ticks_fired: 1,
                bounds_fired: 1,
                collisions_fired: 0,
            }
        );
        assert_eq!(sim.game_state()["right"], 1.0);
        let ball = sim.actor("ball").unwrap();
        assert_eq!((ball.context.x, ball.context.y), (5.0, 50.0));
        assert_eq!(sim.tick(), 1);
    }

    #[test]
    fn test_collision_fires_both_directions() {
        let mut ball = actor("ball", "Ball", 20.0, 20.0);
        ball.sheet = Some("ball.json".to_string());
        ball.variables.insert("velocityX".to_string(), serde_json::json!(-10));

        let mut paddle = actor("paddle", "Player", 15.0, 15.0);
        paddle.sheet = Some("paddle.json".to_string());
        let paddle_sheet = LogicSheet::new()
            .with_node(LogicNode::new("hit", NodeKind::Event, "Collision"))
            .with_node(LogicNode::new("note", NodeKind::Action, "SetVariable").with_property("name", "hitBy"))
            .connect("hit", "exec", "note", "exec")
            .connect("hit", "otherTag", "note", "value");

        let project = project(
            vec![ball, paddle],
            vec![("ball", ball_sheet()), ("paddle", paddle_sheet)],
        );
        let mut sim = Simulation::new(&project).unwrap();
        let report = sim.step(0.1);

        assert_eq!(report.collisions_fired, 2);
        let ball = sim.actor("ball").unwrap();
        assert_eq!(ball.context.variable("velocityX"), Some(&Value::Number(10.0)));
        assert_eq!(ball.context.x, 19.0);
        let paddle = sim.actor("paddle").unwrap();
        assert_eq!(paddle.context.variable("hitBy"), Some(&Value::from("Ball")));
    }

    #[tokio::test]
    async fn test_demo_project_runs() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demo");
        let project = crate::project::ProjectLoader::load(&path).await.unwrap();
        let mut sim = Simulation::new(&project).unwrap();

        for (actor_id, sheet) in &project.sheets {
            let issues = sheet.validate(sim.interpreter().catalog());
            assert!(issues.is_empty(), "{}: {:?}", actor_id, issues);
        }

        sim.run(600, 1.0 / 60.0);
        assert_eq!(sim.tick(), 600);

        // The ball never escapes for good
        let ball = sim.actor("ball").unwrap();
        assert!(ball.context.x > -50.0 && ball.context.x < 850.0);
    }

    #[test]
    fn test_rejected_sheet_fails_setup() {
        let mut ball = actor("ball", "Ball", 0.0, 0.0);
        ball.sheet = Some("ball.json".to_string());
        let broken = LogicSheet::new()
            .with_node(LogicNode::new("x", NodeKind::Event, "Update"))
            .with_node(LogicNode::new("x", NodeKind::Event, "Update"));
        let project = project(vec![ball], vec![("ball", broken)]);

        assert!(matches!(
            Simulation::new(&project),
            Err(GraphError::DuplicateNodeId { .. })
        ));
    }
}

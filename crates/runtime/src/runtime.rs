//! High-level runtime orchestrator.
//!
//! The runtime owns every enemy agent, the scripted player and the global
//! event bus, and exposes a builder-based API for hosts to drive the
//! simulation one rendered frame at a time. Physics runs on a fixed step
//! underneath, catching up on however much time the frame delta carried.

use std::rc::Rc;

use event_bus::BusRegistry;
use game_core::events::{AttackLaunched, EnemySpawned};
use game_core::{
    AnimationTrigger, Collaborators, ContextSteering, EnemyAgent, EnemyStateKind, EntityId,
    LastKnownTracker, Steering, StatModifier, Target, Vec2,
};

use crate::api::{PlayerDamaged, PlayerMoved, Result, RuntimeError, TickCompleted};
use crate::player::Player;
use crate::scenario::Scenario;

/// Runtime configuration shared across the orchestrator and agents.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Physics step length in seconds.
    pub fixed_dt: f32,
    /// Upper bound on physics steps run for one frame; the rest of the
    /// backlog is dropped.
    pub max_physics_steps: u32,
    /// Base seed for random behaviours; each enemy offsets it by its id.
    pub seed: u64,
    /// Raise `AttackHit` as soon as an attack is launched. Hosts with real
    /// animations turn this off and forward their own events.
    pub auto_attack_hit: bool,
    /// How far from the aimed point the player may be and still take the hit.
    pub hit_radius: f32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 0.02,
            max_physics_steps: 8,
            seed: 0,
            auto_attack_hit: true,
            hit_radius: Self::DEFAULT_HIT_RADIUS,
        }
    }
}

impl RuntimeConfig {
    pub const DEFAULT_HIT_RADIUS: f32 = 0.5;

    fn validate(&self) -> Result<()> {
        if !(self.fixed_dt.is_finite() && self.fixed_dt > 0.0) {
            return Err(RuntimeError::InvalidConfig(format!(
                "fixed_dt must be positive, got {}",
                self.fixed_dt
            )));
        }
        if self.max_physics_steps == 0 {
            return Err(RuntimeError::InvalidConfig(
                "max_physics_steps must be at least 1".into(),
            ));
        }
        if !(self.hit_radius.is_finite() && self.hit_radius > 0.0) {
            return Err(RuntimeError::InvalidConfig(format!(
                "hit_radius must be positive, got {}",
                self.hit_radius
            )));
        }
        Ok(())
    }
}

/// What one [`Runtime::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub frame: u64,
    pub physics_steps: u32,
    pub transitions: u32,
    pub attacks: u32,
}

/// Main runtime that drives enemies against the scripted player.
///
/// Single-threaded: the event bus hands out `Rc` bindings, so the runtime
/// lives on the thread that built it.
pub struct Runtime {
    config: RuntimeConfig,
    bus: Rc<BusRegistry>,
    agents: Vec<EnemyAgent>,
    player: Player,
    accumulator: f32,
    frame: u64,
    elapsed: f32,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The registry global events are published on. Register bindings here to
    /// observe the simulation.
    pub fn bus(&self) -> &Rc<BusRegistry> {
        &self.bus
    }

    pub fn agents(&self) -> &[EnemyAgent] {
        &self.agents
    }

    pub fn agent(&self, id: EntityId) -> Option<&EnemyAgent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advances the simulation by one rendered frame of `dt` seconds.
    ///
    /// Order within a frame: the player moves, fixed physics steps run until
    /// the accumulator drains, then every enemy gets its frame update and any
    /// attack it launched is resolved against the player.
    pub fn tick(&mut self, dt: f32) -> Result<TickReport> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(RuntimeError::InvalidDelta(dt));
        }

        self.frame += 1;
        self.elapsed += dt;
        self.player.advance(dt);

        let mut report = TickReport {
            frame: self.frame,
            physics_steps: 0,
            transitions: 0,
            attacks: 0,
        };

        self.accumulator += dt;
        let fixed_dt = self.config.fixed_dt;
        let max_steps = self.config.max_physics_steps;
        while self.accumulator >= fixed_dt && report.physics_steps < max_steps {
            self.accumulator -= fixed_dt;
            report.physics_steps += 1;
            report.transitions += self.physics_step(fixed_dt)?;
        }
        if self.accumulator >= fixed_dt {
            tracing::warn!(
                frame = self.frame,
                dropped = self.accumulator,
                "physics fell behind; dropping backlog"
            );
            self.accumulator %= fixed_dt;
        }

        let candidates = self.candidates();
        for index in 0..self.agents.len() {
            let agent = &mut self.agents[index];
            agent.sense(&candidates);
            if agent.frame_update(dt)?.is_some() {
                report.transitions += 1;
            }
            if self.resolve_attack(index)? {
                report.attacks += 1;
            }
        }

        self.bus.call(&TickCompleted {
            frame: self.frame,
            elapsed: self.elapsed,
            physics_steps: report.physics_steps,
        });
        tracing::trace!(?report, "tick completed");
        Ok(report)
    }

    /// Forwards an animation event to one enemy.
    pub fn animation_trigger(
        &mut self,
        id: EntityId,
        trigger: AnimationTrigger,
    ) -> Result<Option<EnemyStateKind>> {
        Ok(self.agent_mut(id)?.animation_trigger(trigger)?)
    }

    pub fn apply_modifier(&mut self, id: EntityId, modifier: StatModifier) -> Result<()> {
        self.agent_mut(id)?.apply_modifier(modifier);
        Ok(())
    }

    /// Deals damage to an enemy and returns how much got through.
    pub fn damage_enemy(&mut self, id: EntityId, amount: f32) -> Result<f32> {
        let agent = self.agent_mut(id)?;
        let dealt = agent.take_damage(amount);
        if dealt > 0.0 {
            agent.animation_trigger(AnimationTrigger::Damaged)?;
        }
        Ok(dealt)
    }

    /// Moves the player, abandoning its scripted path.
    pub fn set_player_position(&mut self, position: Vec2) {
        self.player.teleport(position);
        self.bus.call(&PlayerMoved { position });
    }

    /// Stops every enemy and tears the bus down.
    pub fn shutdown(self) {
        let Runtime {
            mut agents,
            bus,
            frame,
            ..
        } = self;
        for agent in &mut agents {
            agent.stop();
        }
        drop(agents);

        match Rc::try_unwrap(bus) {
            Ok(registry) => registry.dispose(),
            // a host still holds the registry; leave it usable but empty
            Err(shared) => shared.reset(),
        }
        tracing::info!(frame, "runtime shut down");
    }

    fn agent_mut(&mut self, id: EntityId) -> Result<&mut EnemyAgent> {
        self.agents
            .iter_mut()
            .find(|a| a.id() == id)
            .ok_or(RuntimeError::UnknownEnemy(id))
    }

    fn candidates(&self) -> Vec<Target> {
        self.player.target().into_iter().collect()
    }

    fn physics_step(&mut self, fixed_dt: f32) -> Result<u32> {
        let candidates = self.candidates();
        let mut transitions = 0;
        for agent in &mut self.agents {
            agent.sense(&candidates);
            if agent.physics_update(fixed_dt)?.is_some() {
                transitions += 1;
            }
            if agent.is_alive() {
                let enemy = agent.enemy_mut();
                enemy.position += enemy.intents.movement * fixed_dt;
            }
        }
        Ok(transitions)
    }

    /// Publishes the attack `agents[index]` launched this frame, if any, and
    /// applies it to the player when they are within `hit_radius` of where it
    /// was aimed.
    fn resolve_attack(&mut self, index: usize) -> Result<bool> {
        let agent = &mut self.agents[index];
        let Some(intent) = agent.enemy_mut().intents.take_attack() else {
            return Ok(false);
        };
        let attacker = agent.id();
        self.bus.call(&AttackLaunched { attacker, intent });

        if self.config.auto_attack_hit {
            agent.animation_trigger(AnimationTrigger::AttackHit)?;
        }

        let on_target = self.player.position.distance(intent.target) <= self.config.hit_radius;
        if self.player.is_alive() && on_target {
            let remaining = self.player.take_hit(intent.damage);
            tracing::debug!(%attacker, damage = intent.damage, remaining, "player hit");
            self.bus.call(&PlayerDamaged {
                attacker,
                amount: intent.damage,
                remaining,
            });
        }
        Ok(true)
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.config)
            .field("frame", &self.frame)
            .field("agents", &self.agents)
            .field("player", &self.player)
            .finish()
    }
}

/// Builder for [`Runtime`] with flexible configuration.
#[derive(Default)]
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    scenario: Option<Scenario>,
    bus: Option<Rc<BusRegistry>>,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = Some(scenario);
        self
    }

    /// Publish on an existing registry instead of a fresh one, so bindings
    /// can be registered before enemies spawn.
    pub fn bus(mut self, bus: Rc<BusRegistry>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Spawns every enemy in the scenario, starts it in Idle and announces
    /// it with [`EnemySpawned`].
    pub fn build(self) -> Result<Runtime> {
        self.config.validate()?;
        let scenario = self.scenario.ok_or(RuntimeError::MissingScenario)?;
        scenario.validate()?;

        let bus = self.bus.unwrap_or_default();
        let steering: Rc<dyn Steering> = Rc::new(ContextSteering::new(scenario.obstacles.clone()));

        let mut agents = Vec::with_capacity(scenario.spawns.len());
        for (index, spawn) in scenario.spawns.iter().enumerate() {
            let template = scenario
                .template(&spawn.template)
                .ok_or_else(|| RuntimeError::UnknownTemplate {
                    template: spawn.template.clone(),
                })?;
            // id 0 is the player
            let id = EntityId(index as u32 + 1);
            let collaborators = Collaborators {
                steering: Some(Rc::clone(&steering)),
                tracker: Some(Box::new(LastKnownTracker::new(template.tracking_memory))),
                seed: spawn.seed.unwrap_or(self.config.seed.wrapping_add(u64::from(id.0))),
            };
            let mut agent = EnemyAgent::from_template(
                id,
                spawn.position,
                template,
                collaborators,
                Rc::clone(&bus),
            )
            .map_err(|source| RuntimeError::Config {
                template: template.name.clone(),
                source,
            })?;

            agent.start(EnemyStateKind::Idle)?;
            bus.call(&EnemySpawned {
                id,
                position: spawn.position,
            });
            agents.push(agent);
        }

        tracing::info!(
            scenario = %scenario.name,
            enemies = agents.len(),
            fixed_dt = self.config.fixed_dt,
            "runtime ready"
        );

        Ok(Runtime {
            config: self.config,
            bus,
            agents,
            player: Player::new(&scenario.player),
            accumulator: 0.0,
            frame: 0,
            elapsed: 0.0,
        })
    }
}

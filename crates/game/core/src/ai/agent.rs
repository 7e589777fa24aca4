//! An enemy bundled with the machine that drives it.

use std::rc::Rc;

use event_bus::BusRegistry;
use state_machine::StateMachine;

use super::{
    AnimationTrigger, Collaborators, Enemy, EnemyMachine, EnemyStateKind, Perception,
    build_machine,
};
use crate::config::EnemyTemplate;
use crate::error::ConfigError;
use crate::events::{EnemyDied, EnemyStateChanged, Footstep, StateChanged};
use crate::stats::StatModifier;
use crate::{EntityId, Target, Vec2};

type Outcome = state_machine::Result<Option<EnemyStateKind>>;

/// Drives one enemy and announces what happens to it.
///
/// Every transition is raised twice: as a local [`StateChanged`] on the
/// enemy's own handler and as a global [`EnemyStateChanged`] on the shared
/// registry. Once the enemy dies its machine is shut down and further ticks
/// are ignored.
pub struct EnemyAgent {
    enemy: Enemy,
    machine: StateMachine<EnemyMachine>,
    perception: Perception,
    bus: Rc<BusRegistry>,
}

impl EnemyAgent {
    pub fn new(
        enemy: Enemy,
        machine: StateMachine<EnemyMachine>,
        perception: Perception,
        bus: Rc<BusRegistry>,
    ) -> Self {
        Self {
            enemy,
            machine,
            perception,
            bus,
        }
    }

    /// Builds the enemy and its machine from `template`.
    pub fn from_template(
        id: EntityId,
        position: Vec2,
        template: &EnemyTemplate,
        collaborators: Collaborators,
        bus: Rc<BusRegistry>,
    ) -> Result<Self, ConfigError> {
        let machine = build_machine(&template.behavior, &template.perception, collaborators)?;
        let enemy = Enemy::new(id, position, template.stats);
        Ok(Self::new(enemy, machine, template.perception, bus))
    }

    pub fn id(&self) -> EntityId {
        self.enemy.id
    }

    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    pub fn enemy_mut(&mut self) -> &mut Enemy {
        &mut self.enemy
    }

    pub fn state(&self) -> Option<EnemyStateKind> {
        self.machine.current()
    }

    pub fn machine(&self) -> &StateMachine<EnemyMachine> {
        &self.machine
    }

    pub fn perception(&self) -> &Perception {
        &self.perception
    }

    pub fn is_alive(&self) -> bool {
        self.enemy.is_alive()
    }

    /// Enters `initial` and announces it.
    pub fn start(&mut self, initial: EnemyStateKind) -> state_machine::Result<()> {
        self.machine.initialize(initial, &mut self.enemy)?;
        self.announce(None, initial);
        Ok(())
    }

    /// Runs perception against the visible candidates.
    pub fn sense(&mut self, candidates: &[Target]) {
        if self.enemy.is_alive() {
            self.perception.update(&mut self.enemy, candidates);
        }
    }

    pub fn frame_update(&mut self, dt: f32) -> Outcome {
        self.enemy.clock.dt = dt;
        self.enemy.clock.elapsed += dt;
        self.drive(|machine, enemy| machine.frame_update(enemy))
    }

    pub fn physics_update(&mut self, fixed_dt: f32) -> Outcome {
        self.enemy.clock.fixed_dt = fixed_dt;
        self.drive(|machine, enemy| machine.physics_update(enemy))
    }

    /// Forwards an animation event. Footsteps are announced whatever the
    /// current state.
    pub fn animation_trigger(&mut self, trigger: AnimationTrigger) -> Outcome {
        if trigger == AnimationTrigger::Footstep && self.enemy.is_alive() {
            self.enemy.events().call(&Footstep {
                position: self.enemy.position,
            });
        }
        self.drive(|machine, enemy| machine.animation_trigger(trigger, enemy))
    }

    /// Applies damage; a killing blow shuts the machine down and raises
    /// [`EnemyDied`].
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let was_alive = self.enemy.is_alive();
        let dealt = self.enemy.take_damage(amount);
        self.settle_death(was_alive);
        dealt
    }

    /// Exits the current state without announcing anything. The agent can be
    /// started again afterwards.
    pub fn stop(&mut self) {
        self.machine.shutdown(&mut self.enemy);
    }

    /// Applies `modifier`; dropping max health to zero kills like damage does.
    pub fn apply_modifier(&mut self, modifier: StatModifier) {
        let was_alive = self.enemy.is_alive();
        self.enemy.apply_modifier(modifier);
        self.settle_death(was_alive);
    }

    fn settle_death(&mut self, was_alive: bool) {
        if was_alive && !self.enemy.is_alive() {
            self.machine.shutdown(&mut self.enemy);
            self.bus.call(&EnemyDied { id: self.enemy.id });
        }
    }

    fn drive(
        &mut self,
        hook: impl FnOnce(&mut StateMachine<EnemyMachine>, &mut Enemy) -> Outcome,
    ) -> Outcome {
        if !self.enemy.is_alive() {
            return Ok(None);
        }
        let from = self.machine.current();
        let changed = hook(&mut self.machine, &mut self.enemy)?;
        if let Some(to) = changed {
            self.announce(from, to);
        }
        Ok(changed)
    }

    fn announce(&self, from: Option<EnemyStateKind>, to: EnemyStateKind) {
        tracing::debug!(enemy = %self.enemy.id, ?from, %to, "enemy state changed");
        self.enemy.events().call(&StateChanged { from, to });
        self.bus.call(&EnemyStateChanged {
            id: self.enemy.id,
            from,
            to,
        });
    }
}

impl std::fmt::Debug for EnemyAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnemyAgent")
            .field("id", &self.enemy.id)
            .field("state", &self.machine.current())
            .field("alive", &self.enemy.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use event_bus::EventBinding;

    use super::*;
    use crate::ai::LastKnownTracker;
    use crate::config::AttackBehavior;
    use crate::stats::{StatContainer, StatKind};

    fn grunt() -> EnemyTemplate {
        EnemyTemplate::new(
            "grunt",
            StatContainer::new(10.0, 0.0, 0.0, 4.0, 0.0, 1.0),
        )
    }

    fn spawn(template: &EnemyTemplate, bus: &Rc<BusRegistry>) -> EnemyAgent {
        let collaborators = Collaborators {
            tracker: Some(Box::new(LastKnownTracker::new(0.0))),
            ..Collaborators::default()
        };
        EnemyAgent::from_template(
            EntityId(3),
            Vec2::ZERO,
            template,
            collaborators,
            Rc::clone(bus),
        )
        .unwrap()
    }

    fn agent(bus: &Rc<BusRegistry>) -> EnemyAgent {
        spawn(&grunt(), bus)
    }

    fn player_at(x: f32) -> [Target; 1] {
        [Target::new(EntityId::PLAYER, Vec2::new(x, 0.0))]
    }

    #[test]
    fn idle_to_chase_happens_exactly_once() {
        let bus = Rc::new(BusRegistry::new());
        let mut agent = agent(&bus);
        agent.start(EnemyStateKind::Idle).unwrap();

        assert_eq!(agent.frame_update(0.016), Ok(None));
        assert_eq!(agent.state(), Some(EnemyStateKind::Idle));

        agent.enemy_mut().aggro_target = Some(Target::new(EntityId::PLAYER, Vec2::new(5.0, 0.0)));
        assert_eq!(agent.frame_update(0.016), Ok(Some(EnemyStateKind::Chase)));
        assert_eq!(agent.frame_update(0.016), Ok(None));

        assert_eq!(agent.machine().transition_count(), 1);
    }

    #[test]
    fn transitions_are_announced_locally_and_globally() {
        let bus = Rc::new(BusRegistry::new());
        let global = Rc::new(RefCell::new(Vec::new()));
        let local = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&global);
        let on_global =
            EventBinding::new(move |e: &EnemyStateChanged| sink.borrow_mut().push(e.to));
        bus.register(&on_global);

        let mut agent = agent(&bus);
        let sink = Rc::clone(&local);
        let on_local =
            EventBinding::new(move |e: &StateChanged| sink.borrow_mut().push((e.from, e.to)));
        agent.enemy().events().register(&on_local);

        agent.start(EnemyStateKind::Idle).unwrap();
        agent.sense(&player_at(1.0));
        agent.frame_update(0.016).unwrap();
        agent.frame_update(0.016).unwrap();

        assert_eq!(
            *local.borrow(),
            [
                (None, EnemyStateKind::Idle),
                (Some(EnemyStateKind::Idle), EnemyStateKind::Chase),
                (Some(EnemyStateKind::Chase), EnemyStateKind::Attack),
            ]
        );
        assert_eq!(
            *global.borrow(),
            [EnemyStateKind::Idle, EnemyStateKind::Chase, EnemyStateKind::Attack]
        );
    }

    #[test]
    fn footsteps_are_raised_in_any_state() {
        let bus = Rc::new(BusRegistry::new());
        let mut agent = agent(&bus);
        let steps = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&steps);
        let binding = EventBinding::<Footstep>::no_args(move || *sink.borrow_mut() += 1);
        agent.enemy().events().register(&binding);
        agent.start(EnemyStateKind::Idle).unwrap();

        agent.animation_trigger(AnimationTrigger::Footstep).unwrap();
        agent.enemy_mut().aggro_target = Some(Target::new(EntityId::PLAYER, Vec2::new(5.0, 0.0)));
        agent.frame_update(0.016).unwrap();
        agent.animation_trigger(AnimationTrigger::Footstep).unwrap();

        assert_eq!(*steps.borrow(), 2);
    }

    #[test]
    fn death_stops_the_machine_and_is_announced() {
        let bus = Rc::new(BusRegistry::new());
        let died = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&died);
        let binding = EventBinding::new(move |e: &EnemyDied| sink.borrow_mut().push(e.id));
        bus.register(&binding);

        let mut agent = agent(&bus);
        agent.start(EnemyStateKind::Idle).unwrap();
        agent.take_damage(100.0);
        agent.take_damage(100.0);

        assert!(!agent.is_alive());
        assert_eq!(agent.state(), None);
        assert_eq!(*died.borrow(), [EntityId(3)]);

        agent.enemy_mut().aggro_target = Some(Target::new(EntityId::PLAYER, Vec2::ZERO));
        assert_eq!(agent.frame_update(0.016), Ok(None));
    }

    #[test]
    fn stopped_agent_can_restart() {
        let bus = Rc::new(BusRegistry::new());
        let mut agent = agent(&bus);
        agent.start(EnemyStateKind::Idle).unwrap();

        agent.stop();
        assert_eq!(agent.state(), None);

        agent.start(EnemyStateKind::Chase).unwrap();
        assert_eq!(agent.state(), Some(EnemyStateKind::Chase));
    }

    #[test]
    fn zero_max_health_modifier_kills_the_agent() {
        let bus = Rc::new(BusRegistry::new());
        let died = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&died);
        let binding = EventBinding::new(move |e: &EnemyDied| sink.borrow_mut().push(e.id));
        bus.register(&binding);

        let mut agent = agent(&bus);
        agent.start(EnemyStateKind::Idle).unwrap();
        agent.apply_modifier(StatModifier::override_with(StatKind::Health, 0.0));

        assert!(!agent.is_alive());
        assert_eq!(agent.state(), None);
        assert_eq!(*died.borrow(), [EntityId(3)]);
        assert_eq!(agent.take_damage(50.0), 0.0);
        assert_eq!(died.borrow().len(), 1);
    }

    #[test]
    fn stepping_in_and_out_of_reach_does_not_reset_the_cooldown() {
        let bus = Rc::new(BusRegistry::new());
        let mut template = grunt();
        template.behavior.attack = AttackBehavior::Ranged {
            cooldown: 10.0,
            preferred_distance: 0.5,
        };
        let mut agent = spawn(&template, &bus);
        agent.start(EnemyStateKind::Attack).unwrap();

        let mut shots = 0;
        let mut left_attack = false;
        for x in [1.0, 2.0, 1.0, 2.0, 1.0, 1.0] {
            agent.sense(&player_at(x));
            let changed = agent.frame_update(0.016).unwrap();
            left_attack |= changed == Some(EnemyStateKind::Chase);
            shots += usize::from(agent.enemy_mut().intents.take_attack().is_some());
        }

        assert!(left_attack);
        assert_eq!(agent.state(), Some(EnemyStateKind::Attack));
        assert_eq!(shots, 1);
    }

    #[test]
    fn modifiers_feed_into_combat() {
        let bus = Rc::new(BusRegistry::new());
        let mut agent = agent(&bus);
        agent.apply_modifier(StatModifier::add(StatKind::Defense, 3.0));

        assert_eq!(agent.take_damage(5.0), 2.0);
    }
}

//! Tallies what happened during a run by listening on the global bus.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use event_bus::{BusRegistry, EventBinding};
use game_core::events::{AttackLaunched, EnemyDied, EnemySpawned, EnemyStateChanged};
use runtime::PlayerDamaged;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    pub spawned: u32,
    pub transitions: u32,
    pub attacks: u32,
    pub hits: u32,
    pub damage_taken: f32,
    pub deaths: u32,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "enemies spawned:   {}", self.spawned)?;
        writeln!(f, "state changes:     {}", self.transitions)?;
        writeln!(f, "attacks launched:  {}", self.attacks)?;
        writeln!(f, "hits on player:    {}", self.hits)?;
        writeln!(f, "damage taken:      {:.1}", self.damage_taken)?;
        write!(f, "enemies killed:    {}", self.deaths)
    }
}

/// Live subscriptions feeding a [`Report`].
///
/// The registry keeps its own handle on each binding, so dropping a `Watch`
/// leaves the tally running unseen. Call [`Watch::unregister`] to stop it.
pub struct Watch {
    report: Rc<RefCell<Report>>,
    spawned: EventBinding<EnemySpawned>,
    transitions: EventBinding<EnemyStateChanged>,
    attacks: EventBinding<AttackLaunched>,
    hits: EventBinding<PlayerDamaged>,
    deaths: EventBinding<EnemyDied>,
}

impl Watch {
    pub fn register(bus: &BusRegistry) -> Self {
        let report = Rc::new(RefCell::new(Report::default()));

        let sink = Rc::clone(&report);
        let spawned = EventBinding::new(move |e: &EnemySpawned| {
            tracing::info!(enemy = %e.id, position = ?e.position, "spawned");
            sink.borrow_mut().spawned += 1;
        });
        let sink = Rc::clone(&report);
        let transitions = EventBinding::new(move |e: &EnemyStateChanged| {
            tracing::info!(enemy = %e.id, from = ?e.from, to = %e.to, "state");
            sink.borrow_mut().transitions += 1;
        });
        let sink = Rc::clone(&report);
        let attacks = EventBinding::new(move |e: &AttackLaunched| {
            tracing::debug!(enemy = %e.attacker, kind = %e.intent.kind, "attack");
            sink.borrow_mut().attacks += 1;
        });
        let sink = Rc::clone(&report);
        let hits = EventBinding::new(move |e: &PlayerDamaged| {
            tracing::info!(
                enemy = %e.attacker,
                amount = e.amount,
                remaining = e.remaining,
                "player hit"
            );
            let mut report = sink.borrow_mut();
            report.hits += 1;
            report.damage_taken += e.amount;
        });
        let sink = Rc::clone(&report);
        let deaths = EventBinding::new(move |e: &EnemyDied| {
            tracing::info!(enemy = %e.id, "died");
            sink.borrow_mut().deaths += 1;
        });

        bus.register(&spawned);
        bus.register(&transitions);
        bus.register(&attacks);
        bus.register(&hits);
        bus.register(&deaths);

        Self {
            report,
            spawned,
            transitions,
            attacks,
            hits,
            deaths,
        }
    }

    pub fn report(&self) -> Report {
        self.report.borrow().clone()
    }

    pub fn unregister(self, bus: &BusRegistry) -> Report {
        bus.unregister(&self.spawned);
        bus.unregister(&self.transitions);
        bus.unregister(&self.attacks);
        bus.unregister(&self.hits);
        bus.unregister(&self.deaths);
        self.report()
    }
}

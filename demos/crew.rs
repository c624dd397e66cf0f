//! A crew member on a one-dimensional deck gets hungry and tired over time.
//! Vending machines and resting booths sit at fixed positions; the agent
//! plans which to visit, walks there one cell per tick and uses it.
//!
//! Run with `cargo run --example crew`.

use std::error::Error;

use goap_agent::{Action, ActionBase, DataProvider, EntityId, GoapAgent, Result, WorldState};

const MAX_HUNGER: u32 = 50;
const SLEEP_THRESHOLD: u32 = 40;

struct VendingMachine {
    id: EntityId,
    position: i32,
    food: u32,
}

struct Booth {
    id: EntityId,
    position: i32,
}

/// The crew member and the bit of ship it can see.
struct Ship {
    position: i32,
    hunger: u32,
    sleepiness: u32,
    machines: Vec<VendingMachine>,
    booths: Vec<Booth>,
}

impl Ship {
    fn update(&mut self) {
        self.hunger += 3;
        self.sleepiness += 2;
    }

    fn is_hungry(&self) -> bool {
        self.hunger > MAX_HUNGER
    }

    fn is_tired(&self) -> bool {
        self.sleepiness > SLEEP_THRESHOLD
    }

    fn position_of(&self, id: EntityId) -> Option<i32> {
        self.machines
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.position)
            .or_else(|| self.booths.iter().find(|b| b.id == id).map(|b| b.position))
    }
}

impl DataProvider for Ship {
    fn world_state(&self) -> WorldState {
        WorldState::new()
            .with("hungry", self.is_hungry())
            .with("tired", self.is_tired())
    }

    fn create_goal_state(&self) -> WorldState {
        WorldState::new().with("hungry", false).with("tired", false)
    }

    fn plan_found(&mut self, _goal: &WorldState, actions: &[&dyn Action<Self>]) {
        let names: Vec<&str> = actions.iter().map(|a| a.name()).collect();
        println!("plan found: {}", names.join(" -> "));
    }

    fn plan_failed(&mut self, failed_goal: &WorldState) {
        println!("no plan for [{}]", failed_goal);
    }

    fn plan_aborted(&mut self, aborter: &dyn Action<Self>) {
        println!("plan aborted by {}", aborter.name());
    }

    fn actions_finished(&mut self) {
        println!("actions queue empty");
    }

    fn move_agent(&mut self, next_action: &mut dyn Action<Self>) -> bool {
        let Some(target) = next_action.target().and_then(|id| self.position_of(id)) else {
            return false;
        };

        if (target - self.position).abs() <= 1 {
            next_action.set_in_range();
            return true;
        }
        self.position += (target - self.position).signum();
        false
    }
}

/// Walks to the nearest vending machine that still has food and eats.
struct Eat {
    base: ActionBase,
    ticks: u32,
    ticks_to_eat: u32,
    eaten: bool,
}

impl Eat {
    fn new(ticks_to_eat: u32) -> Result<Self> {
        let base = ActionBase::new("eat", 2.0)?
            .with_range_required(true)
            .with_precondition("hungry", true)
            .with_effect("hungry", false);
        Ok(Self {
            base,
            ticks: 0,
            ticks_to_eat,
            eaten: false,
        })
    }
}

impl Action<Ship> for Eat {
    fn base(&self) -> &ActionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ActionBase {
        &mut self.base
    }

    fn reset(&mut self) {
        self.ticks = 0;
        self.eaten = false;
    }

    fn is_done(&self) -> bool {
        self.eaten
    }

    fn check_procedural_precondition(&mut self, ship: &Ship) -> bool {
        let nearest = ship
            .machines
            .iter()
            .filter(|m| m.food >= 1)
            .min_by_key(|m| (m.position - ship.position).abs());

        match nearest {
            Some(machine) => {
                self.base.set_target(machine.id);
                true
            }
            None => false,
        }
    }

    fn perform(&mut self, ship: &mut Ship) -> bool {
        self.ticks += 1;
        if self.ticks < self.ticks_to_eat {
            return true;
        }

        let Some(target) = self.base.target() else {
            return false;
        };
        let Some(machine) = ship.machines.iter_mut().find(|m| m.id == target) else {
            return false;
        };
        if machine.food == 0 {
            // someone emptied it on the way over
            return false;
        }

        machine.food -= 1;
        ship.hunger = ship.hunger.saturating_sub(40);
        self.eaten = true;
        true
    }
}

/// Walks to the nearest booth and sleeps it off.
struct Rest {
    base: ActionBase,
    ticks: u32,
    ticks_to_rest: u32,
}

impl Rest {
    fn new(ticks_to_rest: u32) -> Result<Self> {
        let base = ActionBase::new("rest", 3.0)?
            .with_range_required(true)
            .with_precondition("tired", true)
            .with_effect("tired", false);
        Ok(Self {
            base,
            ticks: 0,
            ticks_to_rest,
        })
    }
}

impl Action<Ship> for Rest {
    fn base(&self) -> &ActionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ActionBase {
        &mut self.base
    }

    fn reset(&mut self) {
        self.ticks = 0;
    }

    fn is_done(&self) -> bool {
        self.ticks >= self.ticks_to_rest
    }

    fn check_procedural_precondition(&mut self, ship: &Ship) -> bool {
        match ship
            .booths
            .iter()
            .min_by_key(|b| (b.position - ship.position).abs())
        {
            Some(booth) => {
                self.base.set_target(booth.id);
                true
            }
            None => false,
        }
    }

    fn perform(&mut self, ship: &mut Ship) -> bool {
        self.ticks += 1;
        if self.is_done() {
            ship.sleepiness = 0;
        }
        true
    }
}

/// What the crew does when nothing needs doing.
struct FaffAbout {
    base: ActionBase,
    ticks: u32,
    ticks_to_faff: u32,
}

impl FaffAbout {
    fn new(ticks_to_faff: u32) -> Result<Self> {
        let base = ActionBase::new("faff_about", 5.0)?.with_precondition("hungry", false);
        Ok(Self {
            base,
            ticks: 0,
            ticks_to_faff,
        })
    }
}

impl Action<Ship> for FaffAbout {
    fn base(&self) -> &ActionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ActionBase {
        &mut self.base
    }

    fn reset(&mut self) {
        self.ticks = 0;
    }

    fn is_done(&self) -> bool {
        self.ticks >= self.ticks_to_faff
    }

    fn check_procedural_precondition(&mut self, _ship: &Ship) -> bool {
        true
    }

    fn perform(&mut self, _ship: &mut Ship) -> bool {
        self.ticks += 1;
        true
    }
}

fn main() -> std::result::Result<(), Box<dyn Error>> {
    let mut ship = Ship {
        position: 0,
        hunger: 45,
        sleepiness: 30,
        machines: vec![
            VendingMachine {
                id: EntityId(1),
                position: 6,
                food: 1,
            },
            VendingMachine {
                id: EntityId(2),
                position: -9,
                food: 5,
            },
        ],
        booths: vec![Booth {
            id: EntityId(3),
            position: 3,
        }],
    };

    let mut agent: GoapAgent<Ship> = GoapAgent::new();
    agent.add_action(Eat::new(2)?);
    agent.add_action(Rest::new(3)?);
    agent.add_action(FaffAbout::new(4)?);

    for tick in 0..60 {
        ship.update();
        agent.tick(&mut ship);
        println!(
            "tick {:>2}  {:<13} pos {:>3}  hunger {:>2}  sleepiness {:>2}",
            tick,
            agent.state().to_string(),
            ship.position,
            ship.hunger,
            ship.sleepiness
        );
    }

    if let Some(err) = agent.last_error() {
        println!("last error: {}", err);
    }
    Ok(())
}

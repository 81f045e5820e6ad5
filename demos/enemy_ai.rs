//! Enemy AI
//!
//! This example drives a guard NPC through patrol, chase and attack states.
//!
//! Key concepts:
//! - Enum identifiers declared with `state_id!`
//! - States requesting transitions from `on_update`
//! - The blackboard as shared memory between states and the host
//! - Diagnostics forwarded to `tracing`
//!
//! Run with: RUST_LOG=tickstate=debug cargo run --example enemy_ai

use tickstate::machine::{StateContext, StateMachine};
use tickstate::{state_id, StateNode};
use tracing_subscriber::EnvFilter;

state_id! {
    enum Guard {
        Patrol,
        Chase,
        Attack,
    }
}

/// The entity the machine runs for
struct Npc {
    name: &'static str,
    sight: i32,
    reach: i32,
}

const PLAYER_DISTANCE: &str = "player_distance";
const WAYPOINT: &str = "waypoint";

struct Patrol {
    waypoints: Vec<(i32, i32)>,
}

impl StateNode<Guard, Npc> for Patrol {
    fn on_create(&mut self, ctx: &mut StateContext<'_, Guard, Npc>) {
        ctx.set_blackboard_value(WAYPOINT, 0_usize);
    }

    fn on_update(&mut self, ctx: &mut StateContext<'_, Guard, Npc>) {
        if !self.waypoints.is_empty() {
            let next = ctx.blackboard().get_or(WAYPOINT, 0_usize).unwrap_or(0) + 1;
            let next = next % self.waypoints.len();
            ctx.set_blackboard_value(WAYPOINT, next);
            println!("  {} walks to {:?}", ctx.owner().name, self.waypoints[next]);
        }

        let distance = ctx.blackboard().get_or(PLAYER_DISTANCE, i32::MAX).unwrap_or(i32::MAX);
        if distance <= ctx.owner().sight {
            ctx.change_state(Guard::Chase);
        }
    }
}

struct Chase;

impl StateNode<Guard, Npc> for Chase {
    fn on_enter(&mut self, ctx: &mut StateContext<'_, Guard, Npc>) {
        println!("  {} spotted the player!", ctx.owner().name);
    }

    fn on_update(&mut self, ctx: &mut StateContext<'_, Guard, Npc>) {
        let distance = ctx.blackboard().get_or(PLAYER_DISTANCE, i32::MAX).unwrap_or(i32::MAX);
        let npc = ctx.owner();
        if distance <= npc.reach {
            ctx.change_state(Guard::Attack);
        } else if distance > npc.sight {
            ctx.change_state(Guard::Patrol);
        }
    }
}

struct Attack {
    swings: u32,
}

impl StateNode<Guard, Npc> for Attack {
    fn on_enter(&mut self, _ctx: &mut StateContext<'_, Guard, Npc>) {
        self.swings = 0;
    }

    fn on_update(&mut self, ctx: &mut StateContext<'_, Guard, Npc>) {
        self.swings += 1;
        println!("  {} swings (#{})", ctx.owner().name, self.swings);

        let distance = ctx.blackboard().get_or(PLAYER_DISTANCE, i32::MAX).unwrap_or(i32::MAX);
        if distance > ctx.owner().reach {
            ctx.change_state(Guard::Chase);
        }
    }

    fn on_exit(&mut self, ctx: &mut StateContext<'_, Guard, Npc>) {
        println!("  {} stops attacking after {} swings", ctx.owner().name, self.swings);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Enemy AI Example ===\n");

    let npc = Npc {
        name: "Guard",
        sight: 8,
        reach: 1,
    };
    let machine = StateMachine::<Guard, Npc>::builder()
        .owner(npc)
        .state(
            Guard::Patrol,
            Patrol {
                waypoints: vec![(0, 0), (4, 0), (4, 4), (0, 4)],
            },
        )
        .state(Guard::Chase, Chase)
        .state(Guard::Attack, Attack { swings: 0 })
        .initial(Guard::Patrol)
        .build();

    let mut machine = match machine {
        Ok(machine) => machine,
        Err(err) => {
            eprintln!("failed to build machine: {err}");
            return;
        }
    };

    // The host moves the player and ticks the machine once per frame.
    let distances = [20, 12, 7, 4, 1, 1, 3, 1, 15];
    for (frame, distance) in distances.into_iter().enumerate() {
        machine.set_blackboard_value(PLAYER_DISTANCE, distance);
        println!("Frame {frame}: player at {distance}, state {}", machine.current_state_name());
        machine.update();
    }

    println!("\nPath taken:");
    for id in machine.history().path() {
        println!("  {id}");
    }

    println!("\n=== Example Complete ===");
}

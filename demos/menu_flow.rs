//! Menu Flow
//!
//! This example models a game's UI flow with string identifiers.
//!
//! Key concepts:
//! - `String` identifiers for data-driven state names
//! - Host-driven transitions with `change_state`
//! - Recoverable failures: unknown screens are reported, not fatal
//! - Inspecting diagnostics with `MemoryDiagnostics`
//!
//! Run with: cargo run --example menu_flow

use tickstate::diagnostics::MemoryDiagnostics;
use tickstate::machine::{StateContext, StateMachine, TransitionOutcome};
use tickstate::StateNode;

struct Screen {
    title: &'static str,
}

impl StateNode<String> for Screen {
    fn on_enter(&mut self, ctx: &mut StateContext<'_, String>) {
        let visits = ctx.blackboard().get_or("visits", 0_u32).unwrap_or(0) + 1;
        ctx.set_blackboard_value("visits", visits);
        println!("  show {} (screen #{visits})", self.title);
    }

    fn on_exit(&mut self, _ctx: &mut StateContext<'_, String>) {
        println!("  hide {}", self.title);
    }
}

fn main() {
    println!("=== Menu Flow Example ===\n");

    let sink = MemoryDiagnostics::new();
    let mut menu: StateMachine<String> = StateMachine::with_capacity((), 8, 8);
    menu.set_diagnostics(sink.clone());

    for (id, title) in [
        ("title", "Title Screen"),
        ("options", "Options"),
        ("game", "In Game"),
    ] {
        if let Err(err) = menu.add_state(id, Screen { title }) {
            eprintln!("cannot register {id}: {err}");
            return;
        }
    }

    if let Err(err) = menu.run("title") {
        eprintln!("cannot start: {err}");
        return;
    }

    for target in ["options", "title", "credits", "game"] {
        println!("Request: {target}");
        match menu.change_state(target) {
            Ok(TransitionOutcome::Changed { from, to }) => println!("  moved {from} -> {to}"),
            Ok(TransitionOutcome::Missing { requested }) => {
                println!("  no screen named {requested}, staying put")
            }
            Err(err) => eprintln!("  rejected: {err}"),
        }
    }

    println!("\nCurrent: {}", menu.current_state_name());
    println!("Previous: {}", menu.previous_state_name());
    println!("Reported problems:");
    for event in sink.errors() {
        println!("  {event}");
    }

    println!("\n=== Example Complete ===");
}

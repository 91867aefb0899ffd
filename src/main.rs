//! Reference CLI moderator: drives one [`night_phase_engine::Engine`] off
//! stdin, printing every broadcast and private effect to stdout prefixed
//! with its recipient. Shaped after `main.rs`/`util::input`'s
//! sign-up-then-run loop, generalized from "collect signups, run one whole
//! game, print a winner" into "collect a seating, then drive one night
//! message by message until it ends."

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use night_phase_engine::catalog;
use night_phase_engine::engine::Engine;
use night_phase_engine::ports::{Broadcast, PrivateSink, StdRandom, SystemClock};
use night_phase_engine::protocol::{OutboundEvent, PlayerMessage};
use night_phase_engine::state::Player;
use night_phase_engine::types::{RoleId, Seat};
use night_phase_engine::util;

struct ConsoleSink;

impl PrivateSink for ConsoleSink {
    fn send_private(&mut self, seat: Seat, event: OutboundEvent) {
        println!("[private -> seat {seat}] {event:?}");
    }
}

impl Broadcast for ConsoleSink {
    fn broadcast(&mut self, event: OutboundEvent) {
        println!("[broadcast] {event:?}");
    }
}

fn input(prompt: &str) -> String {
    print!("{prompt}");
    io::stdout().flush().expect("stdout is writable");
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).expect("stdin is readable");
    line.trim().to_string()
}

fn read_seating() -> BTreeMap<Seat, Player> {
    let mut uids = Vec::new();
    let mut names = Vec::new();
    let mut roles = Vec::new();
    loop {
        let name = input("display name (blank to finish signups): ");
        if name.is_empty() {
            break;
        }
        let role_name = input(&format!("{name}'s role (villager/wolf/seer/witch/guard/...): "));
        let role = parse_role(&role_name).unwrap_or_else(|| {
            eprintln!("unrecognized role {role_name:?}, defaulting to villager");
            RoleId::Villager
        });
        uids.push(format!("uid-{}", uids.len()));
        names.push(name);
        roles.push(role);
    }
    util::build_seating(&uids, &names, &roles).unwrap_or_default()
}

fn parse_role(name: &str) -> Option<RoleId> {
    use RoleId::*;
    Some(match name.to_lowercase().as_str() {
        "villager" => Villager,
        "wolf" => Wolf,
        "nightmare" => Nightmare,
        "guard" => Guard,
        "witch" => Witch,
        "seer" => Seer,
        "hunter" => Hunter,
        "magician" => Magician,
        "dreamcatcher" => Dreamcatcher,
        "wolfqueen" => WolfQueen,
        "celebrity" => Celebrity,
        "spiritknight" => SpiritKnight,
        "wolfrobot" => WolfRobot,
        "gargoyle" => Gargoyle,
        "psychic" => Psychic,
        "mirrorseer" => MirrorSeer,
        "drunkseer" => DrunkSeer,
        "purewhite" => PureWhite,
        "wolfwitch" => WolfWitch,
        "piper" => Piper,
        _ => return None,
    })
}

fn main() {
    tracing_subscriber::fmt::init();

    let room_code = input("room code: ");
    let host_uid = "uid-0".to_string();
    let players = read_seating();
    for player in players.values() {
        if let Some(role) = player.role {
            println!("seat {}: {} is {:?}", player.seat, player.display_name, catalog::team_of(role));
        }
    }

    let mut engine = match Engine::new(room_code, host_uid.clone(), players, SystemClock, StdRandom, ConsoleSink, ConsoleSink) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("could not build the night plan: {err}");
            return;
        }
    };

    engine.start_night();
    loop {
        if let Err(err) = engine.advance(&host_uid) {
            eprintln!("advance failed: {err}");
        }
        if engine.state().current_step_id.is_none() {
            println!("night ended; deaths: {:?}", engine.state().last_night_deaths);
            break;
        }
        let line = input("> ");
        if line == "quit" {
            break;
        }
        match serde_json::from_str::<PlayerMessage>(&line) {
            Ok(msg) => {
                if let Err(err) = engine.apply_message(&msg) {
                    eprintln!("rejected: {err}");
                }
            }
            Err(err) => eprintln!("could not parse message: {err}"),
        }
    }
}

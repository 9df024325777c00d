//! Bundled demonstration strategies.

use arena_agent::{AgentHandle, World};
use arena_core::AgentRng;
use arena_strategy::{Color, Submission};

/// Turn before moving if the heading is further off than this.
const AIM_TOLERANCE_DEG: f64 = 15.0;

/// Smallest angle between two headings, in degrees.
fn angle_gap(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

/// Face `heading`, or run along it at full speed if already facing it.
fn steer(agent: &AgentHandle, heading: f64) {
    if angle_gap(agent.heading(), heading) > AIM_TOLERANCE_DEG {
        agent.set_heading(heading);
    } else {
        agent.forward(agent.max_speed());
    }
}

/// Prey: sit still and bank energy until an enemy predator comes within twice
/// the kill radius, then run directly away.  Pinned against a wall, slip
/// sideways instead.
pub fn scatter(agent: &AgentHandle, world: &World, rng: &mut AgentRng) {
    let threat = agent.closest_enemy_predator();
    if threat.is_sentinel() || threat.distance() > 2.0 * world.kill_radius() {
        agent.wait();
        return;
    }

    let cornered = agent.on_left_edge()
        || agent.on_right_edge()
        || agent.on_top_edge()
        || agent.on_bottom_edge();
    let offset = if !cornered {
        180.0
    } else if rng.gen_bool(0.5) {
        90.0
    } else {
        -90.0
    };
    steer(agent, threat.angle() + offset);
}

/// Predator: head for the closest enemy prey.
pub fn chase(agent: &AgentHandle, _world: &World, _rng: &mut AgentRng) {
    let target = agent.closest_enemy_prey();
    if target.is_sentinel() {
        agent.wait();
    } else {
        steer(agent, target.angle());
    }
}

/// Prey spread over a ring around the centre, predators at the middle.
pub fn ring(world: &World, index: usize, rng: &mut AgentRng) -> (f64, f64) {
    let b = world.bounds();
    let radius = 0.4 * b.width().min(b.height());
    let angle = (index as f64 * 37.0 + rng.gen_range(0.0_f64..30.0)).to_radians();
    (radius * angle.cos(), radius * angle.sin())
}

pub fn huddle(_world: &World, index: usize, rng: &mut AgentRng) -> (f64, f64) {
    let jitter = 20.0 + index as f64;
    (rng.gen_range(-jitter..jitter), rng.gen_range(-jitter..jitter))
}

const PALETTE: [(&str, &str, &str); 4] = [
    ("Red", "salmon", "darkred"),
    ("Gold", "khaki", "goldenrod"),
    ("Teal", "paleturquoise", "teal"),
    ("Plum", "thistle", "purple"),
];

/// The `i`-th demo team.  Names repeat after the palette runs out.
pub fn submission(i: usize) -> Submission {
    let (name, prey, predator) = PALETTE[i % PALETTE.len()];
    Submission::new()
        .team_name(name)
        .prey_color(Color::named(prey))
        .predator_color(Color::named(predator))
        .prey_placement(ring)
        .predator_placement(huddle)
        .prey_movement(scatter)
        .predator_movement(chase)
}

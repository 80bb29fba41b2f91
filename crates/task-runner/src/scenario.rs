//! Patrol robot demo scenario.
//!
//! The robot walks between two waypoints until its battery runs flat, docks
//! to recharge, and goes back on patrol. Raising the alarm evacuates it and
//! ends the shift, unless it is plugged into the charger at that moment.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use task_kernel::builder::{action, delay, during, sequence, when, while_};
use task_kernel::{ExternalLoop, Node};
use tracing::{info, warn};

/// Jump priorities, highest first.
const CHARGING_LOCK: i32 = 20;
const ALARM: i32 = 10;
const LOW_BATTERY: i32 = 5;

/// Shared robot state observed by the tree's predicates.
#[derive(Debug)]
pub struct Robot {
    capacity: u32,
    battery: AtomicU32,
    charging: AtomicBool,
    alarm: AtomicBool,
    evacuated: AtomicBool,
    legs: AtomicU32,
    dockings: AtomicU32,
}

impl Robot {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            battery: AtomicU32::new(capacity),
            charging: AtomicBool::new(false),
            alarm: AtomicBool::new(false),
            evacuated: AtomicBool::new(false),
            legs: AtomicU32::new(0),
            dockings: AtomicU32::new(0),
        }
    }

    pub fn raise_alarm(&self) {
        warn!("alarm raised");
        self.alarm.store(true, Ordering::SeqCst);
    }

    pub fn battery(&self) -> u32 {
        self.battery.load(Ordering::SeqCst)
    }

    pub fn charging(&self) -> bool {
        self.charging.load(Ordering::SeqCst)
    }

    pub fn alarm_raised(&self) -> bool {
        self.alarm.load(Ordering::SeqCst)
    }

    pub fn evacuated(&self) -> bool {
        self.evacuated.load(Ordering::SeqCst)
    }

    pub fn legs(&self) -> u32 {
        self.legs.load(Ordering::SeqCst)
    }

    pub fn dockings(&self) -> u32 {
        self.dockings.load(Ordering::SeqCst)
    }

    fn walk(&self, waypoint: &'static str) {
        let left = self
            .battery
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |level| level.checked_sub(1))
            .map_or(0, |before| before - 1);
        let legs = self.legs.fetch_add(1, Ordering::SeqCst) + 1;
        info!(waypoint, battery = left, legs, "reached waypoint");
    }

    /// Advances the robot's own hardware by one tick: while plugged in, the
    /// charger adds one unit until the battery is full.
    pub fn tick(&self) {
        if !self.charging() {
            return;
        }

        let level = (self.battery() + 1).min(self.capacity);
        self.battery.store(level, Ordering::SeqCst);
        if level == self.capacity {
            info!(battery = level, "fully charged");
            self.charging.store(false, Ordering::SeqCst);
        }
    }
}

/// Charging station driven through the kernel's external adapter.
struct Charger {
    robot: Arc<Robot>,
}

impl ExternalLoop for Charger {
    fn start(&mut self) {
        let dockings = self.robot.dockings.fetch_add(1, Ordering::SeqCst) + 1;
        info!(dockings, battery = self.robot.battery(), "charging started");
        self.robot.charging.store(true, Ordering::SeqCst);
    }

    fn running(&self) -> bool {
        self.robot.charging()
    }

    fn stop(&mut self) {
        warn!(battery = self.robot.battery(), "charging interrupted");
        self.robot.charging.store(false, Ordering::SeqCst);
    }
}

fn leg(robot: &Arc<Robot>, waypoint: &'static str) -> Node {
    let walker = Arc::clone(robot);
    let gauge = Arc::clone(robot);
    sequence(vec![
        action(move || walker.walk(waypoint)),
        when(move || gauge.battery() == 1, vec![action(|| warn!("battery low"))]).into(),
        delay(2),
    ])
}

fn dock(robot: &Arc<Robot>) -> Vec<Node> {
    let charger = Arc::new(Mutex::new(Charger {
        robot: Arc::clone(robot),
    }));
    vec![
        action(|| info!("heading to the dock")),
        delay(1),
        Node::external(charger),
    ]
}

fn evacuate(robot: &Arc<Robot>) -> Vec<Node> {
    let robot = Arc::clone(robot);
    vec![
        action(|| warn!("evacuating")),
        delay(1),
        action(move || {
            info!("robot evacuated");
            robot.evacuated.store(true, Ordering::SeqCst);
        }),
    ]
}

/// Builds the whole shift: patrol, dock when flat, evacuate on alarm.
pub fn patrol_shift(robot: &Arc<Robot>) -> Node {
    let flat = Arc::clone(robot);
    let patrol: Node = during(vec![while_(|| true, vec![leg(robot, "A"), leg(robot, "B")])])
        .jump_back_if(LOW_BATTERY, move || flat.battery() == 0, dock(robot))
        .into();

    let alarm = Arc::clone(robot);
    let plugged = Arc::clone(robot);
    during(vec![
        action(|| info!("shift started")),
        while_(|| true, vec![patrol]),
    ])
    .suppress_if(CHARGING_LOCK, move || plugged.charging())
    .jump_if(ALARM, move || alarm.alarm_raised(), evacuate(robot))
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(capacity: u32) -> (Arc<Robot>, Node) {
        let robot = Arc::new(Robot::new(capacity));
        let mut node = patrol_shift(&robot);
        node.start().unwrap();
        (robot, node)
    }

    fn advance(robot: &Robot, node: &mut Node) {
        robot.tick();
        node.resume();
    }

    fn resume_until(robot: &Robot, node: &mut Node, limit: usize, done: impl Fn(&Node) -> bool) {
        for _ in 0..limit {
            if done(node) {
                return;
            }
            advance(robot, node);
        }
        assert!(done(node), "condition not reached within {limit} ticks");
    }

    #[test]
    fn charger_poll_is_read_only() {
        let robot = Arc::new(Robot::new(3));
        robot.battery.store(0, Ordering::SeqCst);
        let mut charger = Charger {
            robot: Arc::clone(&robot),
        };

        charger.start();
        assert!(charger.running());
        assert!(charger.running());
        assert_eq!(robot.battery(), 0);

        for _ in 0..3 {
            robot.tick();
        }
        assert!(!charger.running());
        assert_eq!(robot.battery(), 3);
    }

    #[test]
    fn flat_battery_docks_and_resumes_patrol() {
        let (robot, mut node) = shift(2);

        resume_until(&robot, &mut node, 30, |_| robot.dockings() == 1 && !robot.charging());
        let legs = robot.legs();
        assert_eq!(legs, 2);
        assert_eq!(robot.battery(), 2);

        resume_until(&robot, &mut node, 10, |_| robot.legs() > legs);
        assert!(node.running());
        assert!(!robot.evacuated());
    }

    #[test]
    fn alarm_ends_shift_with_evacuation() {
        let (robot, mut node) = shift(10);
        advance(&robot, &mut node);

        robot.raise_alarm();
        resume_until(&robot, &mut node, 10, |node| !node.running());

        assert!(robot.evacuated());
        assert_eq!(robot.legs(), 1);
    }

    #[test]
    fn alarm_waits_for_charging_to_finish() {
        let (robot, mut node) = shift(3);
        resume_until(&robot, &mut node, 30, |_| robot.charging());

        robot.raise_alarm();
        advance(&robot, &mut node);
        assert!(robot.charging());
        assert!(!robot.evacuated());

        resume_until(&robot, &mut node, 10, |node| !node.running());
        assert!(robot.evacuated());
        assert_eq!(robot.battery(), 3);
    }
}

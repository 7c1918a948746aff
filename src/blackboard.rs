use parking_lot::RwLock;
use std::{sync::Arc, time::Instant};

use tilenav_navigation::NavSnapshot;

/// Latest navigation state shared with the render loop.
#[derive(Clone)]
pub struct State {
    pub nav: NavSnapshot,
    pub last_tick_ts: Instant,
    pub ticks: u64,
    /// Outcome of the last path request, shown on screen.
    pub status: Option<String>,
}

impl Default for State {
    fn default() -> Self {
        State {
            nav: NavSnapshot::default(),
            last_tick_ts: Instant::now(),
            ticks: 0,
            status: None,
        }
    }
}

pub type Blackboard = Arc<RwLock<State>>;

pub fn snapshot(bb: &Blackboard) -> State {
    (*bb.read()).clone()
}

pub fn publish_nav(bb: &Blackboard, nav: NavSnapshot) {
    let mut g = bb.write();
    g.nav = nav;
    g.ticks += 1;
    g.last_tick_ts = Instant::now();
}

pub fn set_status(bb: &Blackboard, msg: impl Into<String>) {
    bb.write().status = Some(msg.into());
}

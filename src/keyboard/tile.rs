use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use tracing::debug;

use crate::keyboard::press_bus::{KeyPressBus, Subscription};
use crate::keyboard::scheme::{self, Scheme};
use crate::keyboard::timer::RevertTimer;

/// Live state of one on-screen key: its name, the pressed flash, and its
/// subscription on the press bus.
pub struct KeyTile {
    key_name: String,
    timer: Rc<RefCell<RevertTimer>>,
    _subscription: Subscription,
}

impl KeyTile {
    pub fn new(key_name: &str, bus: &KeyPressBus) -> Self {
        let timer = Rc::new(RefCell::new(RevertTimer::default()));
        let subscription = Self::subscribe(key_name, bus, &timer);
        Self {
            key_name: key_name.to_string(),
            timer,
            _subscription: subscription,
        }
    }

    fn subscribe(
        key_name: &str,
        bus: &KeyPressBus,
        timer: &Rc<RefCell<RevertTimer>>,
    ) -> Subscription {
        let timer = Rc::clone(timer);
        bus.subscribe(key_name, move |now| timer.borrow_mut().arm(now))
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    /// Rebind the tile to another key. Any pending flash for the old key is
    /// cancelled. The old subscription is released once the new one replaces
    /// it, so the tile never listens to both keys when the call returns.
    pub fn set_key_name(&mut self, key_name: &str, bus: &KeyPressBus) {
        if self.key_name == key_name {
            return;
        }
        self.timer.borrow_mut().cancel();
        self._subscription = Self::subscribe(key_name, bus, &self.timer);
        self.key_name = key_name.to_string();
    }

    pub fn is_pressed(&self, now: Instant) -> bool {
        self.timer.borrow().is_active(now)
    }

    /// Release the pressed state if its time is up. Returns true when it was
    /// released by this call.
    pub fn tick(&self, now: Instant) -> bool {
        self.timer.borrow_mut().poll(now)
    }

}

impl Drop for KeyTile {
    fn drop(&mut self) {
        self.timer.borrow_mut().cancel();
    }
}

/// The tiles of the active scheme, row by row.
pub struct KeyboardState {
    scheme: &'static Scheme,
    rows: Vec<Vec<KeyTile>>,
    bus: KeyPressBus,
}

impl KeyboardState {
    pub fn new(scheme_id: &str, bus: &KeyPressBus) -> Self {
        let scheme = scheme::find_scheme(scheme_id);
        Self {
            scheme,
            rows: Self::build_rows(scheme, bus),
            bus: bus.clone(),
        }
    }

    fn build_rows(scheme: &Scheme, bus: &KeyPressBus) -> Vec<Vec<KeyTile>> {
        scheme
            .rows()
            .iter()
            .map(|row| row.iter().map(|key| KeyTile::new(key, bus)).collect())
            .collect()
    }

    pub fn scheme(&self) -> &'static Scheme {
        self.scheme
    }

    /// Switch to another scheme. Returns false when `scheme_id` resolves to
    /// the scheme already shown.
    pub fn set_scheme(&mut self, scheme_id: &str) -> bool {
        let scheme = scheme::find_scheme(scheme_id);
        if std::ptr::eq(scheme, self.scheme) {
            return false;
        }
        debug!(from = self.scheme.id, to = scheme.id, "switching keyboard scheme");
        // Old tiles go first so their subscriptions are released before the
        // new ones register.
        self.rows.clear();
        self.scheme = scheme;
        self.rows = Self::build_rows(scheme, &self.bus);
        true
    }

    pub fn rows(&self) -> &[Vec<KeyTile>] {
        &self.rows
    }

    pub fn tiles(&self) -> impl Iterator<Item = &KeyTile> {
        self.rows.iter().flatten()
    }

    pub fn tile(&self, key_name: &str) -> Option<&KeyTile> {
        self.tiles().find(|tile| tile.key_name() == key_name)
    }

    /// Release every expired pressed state. Returns how many were released.
    pub fn tick(&self, now: Instant) -> usize {
        self.tiles().filter(|tile| tile.tick(now)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_press_sets_and_clears_after_100ms() {
        let bus = KeyPressBus::new();
        let tile = KeyTile::new("f", &bus);
        let t0 = Instant::now();
        assert!(!tile.is_pressed(t0));

        bus.dispatch("f", t0);
        assert!(tile.is_pressed(t0));
        assert!(tile.is_pressed(t0 + ms(99)));
        assert!(!tile.is_pressed(t0 + ms(100)));
        assert!(tile.tick(t0 + ms(100)));
    }

    #[test]
    fn test_rapid_presses_stay_pressed_until_last_plus_100ms() {
        let bus = KeyPressBus::new();
        let tile = KeyTile::new("j", &bus);
        let t0 = Instant::now();
        bus.dispatch("j", t0);
        bus.dispatch("j", t0 + ms(50));

        for offset in [0, 50, 99, 100, 149] {
            assert!(tile.is_pressed(t0 + ms(offset)), "released early at {offset}ms");
        }
        assert!(!tile.tick(t0 + ms(120)));
        assert!(!tile.is_pressed(t0 + ms(150)));
        assert!(tile.tick(t0 + ms(150)));
    }

    #[test]
    fn test_other_keys_do_not_press_tile() {
        let bus = KeyPressBus::new();
        let tile = KeyTile::new("a", &bus);
        let t0 = Instant::now();
        bus.dispatch("A", t0);
        bus.dispatch("s", t0);
        assert!(!tile.is_pressed(t0));
    }

    #[test]
    fn test_rename_moves_subscription_and_cancels_flash() {
        let bus = KeyPressBus::new();
        let mut tile = KeyTile::new("a", &bus);
        let t0 = Instant::now();
        bus.dispatch("a", t0);
        assert!(tile.is_pressed(t0));

        tile.set_key_name("o", &bus);
        assert!(!tile.is_pressed(t0 + ms(1)));
        assert_eq!(bus.subscriber_count("a"), 0);
        assert_eq!(bus.subscriber_count("o"), 1);

        bus.dispatch("a", t0 + ms(2));
        assert!(!tile.is_pressed(t0 + ms(2)));
        bus.dispatch("o", t0 + ms(3));
        assert!(tile.is_pressed(t0 + ms(3)));
    }

    #[test]
    fn test_dropping_tile_unsubscribes() {
        let bus = KeyPressBus::new();
        let tile = KeyTile::new("k", &bus);
        bus.dispatch("k", Instant::now());
        drop(tile);
        assert!(bus.is_empty());
        assert_eq!(bus.dispatch("k", Instant::now()), 0);
    }

    #[test]
    fn test_keyboard_builds_scheme_rows() {
        let bus = KeyPressBus::new();
        let keyboard = KeyboardState::new("colemak", &bus);
        let rows: Vec<Vec<&str>> = keyboard
            .rows()
            .iter()
            .map(|row| row.iter().map(KeyTile::key_name).collect())
            .collect();
        assert_eq!(rows[0], scheme::find_scheme("colemak").row1);
        assert_eq!(rows[1][3], "t");
        assert_eq!(rows.len(), 3);
        assert_eq!(bus.len(), 26);
    }

    #[test]
    fn test_keyboard_unknown_scheme_uses_default() {
        let bus = KeyPressBus::new();
        let keyboard = KeyboardState::new("workman", &bus);
        assert_eq!(keyboard.scheme().id, "qwerty");
    }

    #[test]
    fn test_set_scheme_replaces_subscriptions() {
        let bus = KeyPressBus::new();
        let mut keyboard = KeyboardState::new("qwerty", &bus);
        assert!(!keyboard.set_scheme("qwerty"));
        assert!(!keyboard.set_scheme("nope"));

        assert!(keyboard.set_scheme("dvorak"));
        assert_eq!(bus.len(), 30);
        assert_eq!(bus.subscriber_count(";"), 1);
        assert_eq!(bus.subscriber_count("a"), 1);
    }

    #[test]
    fn test_keyboard_tick_releases_expired_tiles() {
        let bus = KeyPressBus::new();
        let keyboard = KeyboardState::new("qwerty", &bus);
        let t0 = Instant::now();
        bus.dispatch("q", t0);
        bus.dispatch("m", t0 + ms(40));
        let pressed = |now| {
            keyboard
                .tiles()
                .filter(|tile| tile.is_pressed(now))
                .map(KeyTile::key_name)
                .collect::<Vec<_>>()
        };
        assert_eq!(pressed(t0 + ms(50)), vec!["q", "m"]);
        assert_eq!(keyboard.tick(t0 + ms(100)), 1);
        assert_eq!(pressed(t0 + ms(100)), vec!["m"]);
        assert!(keyboard.tile("m").is_some());
        assert!(keyboard.tile(";").is_none());
    }
}

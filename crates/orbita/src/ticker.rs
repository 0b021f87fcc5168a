//! Cosmetic price label.
//!
//! There is no data source: every interval the price jumps to a random
//! value around a fixed base, flashes green or red, and fades back to
//! white shortly after.

use chrono::{DateTime, Local};
use orbita_config::TickerConfig;
use orbita_core::{Rgba, palette};
use rand::Rng;

/// Direction of the last change, used for the label colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    pub fn color(self) -> Rgba {
        match self {
            Self::Up => palette::UP,
            Self::Down => palette::DOWN,
            Self::Neutral => palette::NEUTRAL,
        }
    }
}

/// Random walk around a base price.
#[derive(Debug, Clone)]
pub struct PriceTicker {
    base: f64,
    spread: f64,
    interval_ms: u64,
    flash_ms: u64,
    price: f64,
    last_change: f64,
    next_tick_ms: u64,
    flash_until_ms: u64,
    updated_at: Option<DateTime<Local>>,
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl PriceTicker {
    pub fn new(config: &TickerConfig) -> Self {
        Self {
            base: config.base_price,
            spread: config.spread,
            interval_ms: config.interval_ms.max(1),
            flash_ms: config.flash_ms,
            price: round_cents(config.base_price),
            last_change: 0.0,
            next_tick_ms: config.interval_ms.max(1),
            flash_until_ms: 0,
            updated_at: None,
        }
    }

    /// Label text, e.g. `$142.37`.
    pub fn text(&self) -> String {
        format!("${:.2}", self.price)
    }

    /// Wall-clock time of the last update.
    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }

    /// Draw a new price. `change > 0` flashes up, anything else flashes down.
    pub fn tick<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) {
        let change = (rng.gen_range(0.0..1.0) - 0.5) * self.spread;
        self.last_change = change;
        self.price = round_cents(self.base + change);
        self.flash_until_ms = now_ms + self.flash_ms;
        self.updated_at = Some(Local::now());
        tracing::trace!(price = self.price, change, "ticker update");
    }

    /// Tick if the interval has elapsed. Missed intervals are not replayed.
    /// Returns whether the price changed.
    pub fn update<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) -> bool {
        if now_ms < self.next_tick_ms {
            return false;
        }
        self.tick(now_ms, rng);
        self.next_tick_ms = now_ms + self.interval_ms;
        true
    }

    pub fn trend(&self, now_ms: u64) -> Trend {
        if now_ms >= self.flash_until_ms {
            Trend::Neutral
        } else if self.last_change > 0.0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn ticker() -> PriceTicker {
        PriceTicker::new(&TickerConfig::default())
    }

    #[test]
    fn test_initial_state() {
        let t = ticker();
        assert_eq!(t.text(), "$142.50");
        assert_eq!(t.trend(0), Trend::Neutral);
        assert!(t.updated_at().is_none());
    }

    #[test]
    fn test_prices_stay_in_band() {
        let mut t = ticker();
        let mut rng = StdRng::seed_from_u64(42);
        for i in 0..2000 {
            t.tick(i * 2000, &mut rng);
            assert!((142.0..=143.0).contains(&t.price));
            assert!((142.25..=142.75).contains(&t.price));
            assert_eq!(t.price, round_cents(t.price));
        }
    }

    #[test]
    fn test_trend_color_and_reset() {
        let mut t = ticker();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            t.tick(10_000, &mut rng);
            let expected = if t.last_change > 0.0 {
                Trend::Up
            } else {
                Trend::Down
            };
            assert_eq!(t.trend(10_000), expected);
            assert_eq!(t.trend(10_499), expected);
            assert_eq!(t.trend(10_500), Trend::Neutral);
        }
        assert_eq!(Trend::Up.color(), palette::UP);
        assert_eq!(Trend::Neutral.color(), palette::NEUTRAL);
    }

    #[test]
    fn test_update_follows_interval() {
        let mut t = ticker();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(!t.update(0, &mut rng));
        assert!(!t.update(1999, &mut rng));
        assert!(t.update(2000, &mut rng));
        assert!(!t.update(3999, &mut rng));
        assert!(t.update(4000, &mut rng));
        // A long stall produces one tick, not a burst.
        assert!(t.update(60_000, &mut rng));
        assert!(!t.update(60_001, &mut rng));
        assert!(t.updated_at().is_some());
    }

    #[test]
    fn test_text_has_two_decimals() {
        let mut t = ticker();
        t.price = 142.3;
        assert_eq!(t.text(), "$142.30");
    }
}

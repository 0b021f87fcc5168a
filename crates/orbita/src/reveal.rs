//! Scroll-triggered reveal transitions.
//!
//! Every revealable block starts invisible and shifted down. Once enough of
//! it scrolls into view it fades in and slides up; it never hides again.
//! Blocks with children reveal them one after another.

/// CSS-style `cubic-bezier(x1, y1, x2, y2)` timing function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn component(t: f64, p1: f64, p2: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    }

    /// Eased progress for linear progress `x` in `0.0..=1.0`.
    pub fn ease(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        if x == 0.0 || x == 1.0 {
            return x;
        }
        // x(t) is monotonic for control points inside [0, 1].
        let (mut lo, mut hi) = (0.0, 1.0);
        for _ in 0..40 {
            let mid = (lo + hi) / 2.0;
            if Self::component(mid, self.x1, self.x2) < x {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Self::component((lo + hi) / 2.0, self.y1, self.y2)
    }
}

/// Timing and trigger settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealParams {
    /// Fraction of a block that must be visible to trigger it.
    pub threshold: f64,
    pub duration_ms: u64,
    /// Delay between consecutive children of one block.
    pub stagger_ms: u64,
    pub easing: CubicBezier,
}

impl Default for RevealParams {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            duration_ms: 800,
            stagger_ms: 100,
            easing: CubicBezier::new(0.2, 0.8, 0.2, 1.0),
        }
    }
}

/// Layout box of a revealable block, in page rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Revealable {
    pub top: f64,
    pub height: f64,
    /// Number of children animated with a stagger; 0 animates the block itself.
    pub children: usize,
}

impl Revealable {
    /// Fraction of the block inside `[scroll, scroll + viewport)`.
    fn visible_fraction(&self, scroll: f64, viewport: f64) -> f64 {
        let top = self.top.max(scroll);
        let bottom = (self.top + self.height).min(scroll + viewport);
        if self.height <= 0.0 {
            return if self.top >= scroll && self.top < scroll + viewport {
                1.0
            } else {
                0.0
            };
        }
        ((bottom - top) / self.height).max(0.0)
    }
}

/// How far into its transition an element is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealStyle {
    /// `0.0` invisible, `1.0` fully shown.
    pub opacity: f64,
    /// `1.0` fully displaced, `0.0` at rest.
    pub shift: f64,
}

impl RevealStyle {
    pub const HIDDEN: Self = Self {
        opacity: 0.0,
        shift: 1.0,
    };
    pub const SHOWN: Self = Self {
        opacity: 1.0,
        shift: 0.0,
    };
}

#[derive(Debug, Clone)]
struct Tracked {
    target: Revealable,
    triggered_at: Option<u64>,
}

/// Watches scroll position and drives reveal transitions.
#[derive(Debug, Clone)]
pub struct RevealTracker {
    params: RevealParams,
    tracked: Vec<Tracked>,
}

impl RevealTracker {
    pub fn new(params: RevealParams, targets: impl IntoIterator<Item = Revealable>) -> Self {
        Self {
            params,
            tracked: targets
                .into_iter()
                .map(|target| Tracked {
                    target,
                    triggered_at: None,
                })
                .collect(),
        }
    }

    /// Trigger every untriggered block that is now sufficiently visible.
    /// Returns how many were triggered by this call.
    pub fn observe(&mut self, scroll: f64, viewport: f64, now_ms: u64) -> usize {
        let mut triggered = 0;
        for (index, tracked) in self.tracked.iter_mut().enumerate() {
            if tracked.triggered_at.is_some() {
                continue;
            }
            if tracked.target.visible_fraction(scroll, viewport) >= self.params.threshold {
                tracked.triggered_at = Some(now_ms);
                triggered += 1;
                tracing::debug!(index, now_ms, "reveal triggered");
            }
        }
        triggered
    }

    /// Style of `child` of block `target` at time `now_ms`. Unknown
    /// targets are shown as-is.
    pub fn style(&self, target: usize, child: usize, now_ms: u64) -> RevealStyle {
        let Some(tracked) = self.tracked.get(target) else {
            return RevealStyle::SHOWN;
        };
        let Some(start) = tracked.triggered_at else {
            return RevealStyle::HIDDEN;
        };
        let delay = if tracked.target.children == 0 {
            0
        } else {
            child as u64 * self.params.stagger_ms
        };
        let begin = start + delay;
        if now_ms < begin {
            return RevealStyle::HIDDEN;
        }
        let linear = (now_ms - begin) as f64 / self.params.duration_ms.max(1) as f64;
        let eased = self.params.easing.ease(linear);
        RevealStyle {
            opacity: eased,
            shift: 1.0 - eased,
        }
    }
}

//! Smooth scrolling with exponential ease-out.
//!
//! When a fragment anchor jumps the view to a new document row, the animator
//! injects a displacement equal to the distance jumped.  Each tick the
//! displacement decays toward zero, so the content slides a few rows per
//! frame with visible deceleration instead of teleporting.

/// Row-offset scroll animator.
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    /// Current displacement from the logical target, in document rows.
    /// Negative while easing downward (content still above the target),
    /// positive while easing upward.
    row_offset: f64,
    /// Previous logical target row (to detect jumps).
    prev_target: usize,
    /// Damping: `offset *= (1 - speed)` each tick.
    /// Higher speed = faster settle.  Good range: 0.25–0.45 at 10–20 fps.
    speed: f64,
}

impl ScrollAnimator {
    pub fn new(speed: f64) -> Self {
        Self {
            row_offset: 0.0,
            prev_target: 0,
            speed: speed.clamp(0.05, 0.95),
        }
    }

    /// Move the logical target to `target` document row, injecting the
    /// displacement that will be eased away.  Jumps while a previous ease is
    /// still in flight accumulate, so chained anchor clicks stay continuous.
    pub fn jump_to(&mut self, target: usize) {
        if target != self.prev_target {
            self.row_offset += self.prev_target as f64 - target as f64;
            self.prev_target = target;
        }
    }

    /// Snap to the target immediately (animations disabled).
    pub fn snap_to(&mut self, target: usize) {
        self.prev_target = target;
        self.row_offset = 0.0;
    }

    /// Decay the displacement toward zero.  Call once per frame.
    pub fn tick(&mut self) {
        self.row_offset *= 1.0 - self.speed;
        if self.row_offset.abs() < 0.5 {
            self.row_offset = 0.0;
        }
    }

    /// The row the viewport should render from right now: the logical target
    /// plus the remaining displacement, clamped at the document start.
    pub fn effective_offset(&self, target: usize) -> usize {
        let row = target as i64 + self.row_offset.round() as i64;
        row.max(0) as usize
    }

    /// True while there is still visible motion.
    pub fn is_animating(&self) -> bool {
        self.row_offset != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_injects_displacement_toward_old_position() {
        let mut anim = ScrollAnimator::new(0.35);
        anim.jump_to(40);
        // Right after the jump the viewport still shows row 0.
        assert_eq!(anim.effective_offset(40), 0);
        assert!(anim.is_animating());
    }

    #[test]
    fn decay_is_monotonic_and_settles() {
        let mut anim = ScrollAnimator::new(0.35);
        anim.jump_to(40);

        let mut prev = 40.0f64;
        for _ in 0..64 {
            anim.tick();
            let remaining = (40 - anim.effective_offset(40) as i64).abs() as f64;
            assert!(remaining <= prev);
            prev = remaining;
        }
        assert!(!anim.is_animating());
        assert_eq!(anim.effective_offset(40), 40);
    }

    #[test]
    fn chained_jumps_accumulate() {
        let mut anim = ScrollAnimator::new(0.35);
        anim.jump_to(40);
        anim.tick();
        anim.jump_to(10);
        // Displacement now points from wherever the ease had reached.
        assert!(anim.effective_offset(10) > 10);
        while anim.is_animating() {
            anim.tick();
        }
        assert_eq!(anim.effective_offset(10), 10);
    }

    #[test]
    fn snap_clears_motion() {
        let mut anim = ScrollAnimator::new(0.35);
        anim.jump_to(40);
        anim.snap_to(25);
        assert!(!anim.is_animating());
        assert_eq!(anim.effective_offset(25), 25);
    }

    #[test]
    fn speed_is_clamped() {
        let mut anim = ScrollAnimator::new(7.0);
        anim.jump_to(100);
        anim.tick();
        // Even a clamped max-speed animator keeps the offset finite.
        assert!(anim.effective_offset(100) <= 100);
    }
}

/// Caret blink state for the editor.
///
/// The timer only runs while the editor is focused:
/// - call `set_focused` on focus changes
/// - call `update` each frame with `delta_time`
/// - call `reset` after edits and caret moves
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaretBlink {
    pub visible: bool,
    blink_time: f32,
    blink_interval: f32,
    focused: bool,
}

impl CaretBlink {
    pub fn new(blink_interval: f32) -> Self {
        Self {
            visible: false,
            blink_time: 0.0,
            blink_interval: blink_interval.max(0.1),
            focused: false,
        }
    }

    pub fn blink_interval(&self) -> f32 {
        self.blink_interval
    }

    /// Whether the blink timer is running.
    pub fn is_running(&self) -> bool {
        self.focused
    }

    /// Start the timer on focus, stop it and hide the caret on blur.
    pub fn set_focused(&mut self, focused: bool) {
        if focused == self.focused {
            return;
        }
        self.focused = focused;
        self.visible = focused;
        self.blink_time = 0.0;
    }

    /// Advance the timer. Returns true when visibility toggled.
    pub fn update(&mut self, delta_time: f32) -> bool {
        if !self.focused {
            return false;
        }
        self.blink_time += delta_time;
        let mut toggled = false;
        while self.blink_time >= self.blink_interval {
            self.blink_time -= self.blink_interval;
            self.visible = !self.visible;
            toggled = !toggled;
        }
        toggled
    }

    /// Make the caret visible and restart the blink phase.
    pub fn reset(&mut self) {
        if self.focused {
            self.visible = true;
            self.blink_time = 0.0;
        }
    }
}

impl Default for CaretBlink {
    fn default() -> Self {
        Self::new(0.5)
    }
}

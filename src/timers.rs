/// # Timers
/// Two 8-bit countdown timers, decremented towards 0 once per `tick`.
///
/// Hosts call `tick` at `TIMER_HZ` regardless of how fast instructions run.
/// While the sound timer is above 0 a tone should be playing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerUnit {
    delay: u8,
    sound: u8,
}

impl TimerUnit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    pub fn delay(&self) -> u8 {
        self.delay
    }

    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    pub fn sound(&self) -> u8 {
        self.sound
    }

    pub fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }
}

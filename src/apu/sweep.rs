//! Pulse channel frequency sweep.
//!
//! The target period is `period +/- (period >> shift)`. Pulse 1 negates with ones'
//! complement, so its downward step is one larger than pulse 2's. The channel is muted
//! while the current period is below 8 or the target exceeds $7FF, whether or not the
//! sweep is enabled.

#[derive(Debug, Clone)]
pub struct Sweep {
    enabled: bool,
    negate: bool,
    shift: u8,
    period: u8,
    divider: u8,
    reload: bool,
    /// Ones' complement negation (pulse 1).
    ones_complement: bool,
}

impl Sweep {
    pub fn new(ones_complement: bool) -> Self {
        Self {
            enabled: false,
            negate: false,
            shift: 0,
            period: 0,
            divider: 0,
            reload: false,
            ones_complement,
        }
    }

    /// $4001 / $4005: EPPP NSSS.
    pub fn write(&mut self, data: u8) {
        self.enabled = data & 0x80 != 0;
        self.period = (data >> 4) & 0x07;
        self.negate = data & 0x08 != 0;
        self.shift = data & 0x07;
        self.reload = true;
    }

    pub fn target(&self, timer_period: u16) -> u16 {
        let change = timer_period >> self.shift;
        if self.negate {
            let change = change + self.ones_complement as u16;
            timer_period.saturating_sub(change)
        } else {
            timer_period + change
        }
    }

    #[inline]
    pub fn mutes(&self, timer_period: u16) -> bool {
        timer_period < 8 || self.target(timer_period) > 0x07FF
    }

    /// Half-frame clock. Returns the new timer period when the sweep adjusts it.
    pub fn clock(&mut self, timer_period: u16) -> Option<u16> {
        let mut updated = None;
        if self.divider == 0 && self.enabled && self.shift > 0 && !self.mutes(timer_period) {
            updated = Some(self.target(timer_period));
        }

        if self.divider == 0 || self.reload {
            self.divider = self.period;
            self.reload = false;
        } else {
            self.divider -= 1;
        }
        updated
    }
}

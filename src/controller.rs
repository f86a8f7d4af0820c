/*!
Standard controller: eight buttons read serially through $4016/$4017.

Behavior:
- The host sets the live button state at any time (`set_buttons` / `press` / `release`).
- A CPU write to the port copies the live state into the shift register.
- Each CPU read returns bit 7 of the shift register and shifts it left, so buttons come
  out in A, B, Select, Start, Up, Down, Left, Right order. After eight reads the register
  is empty and further reads return 0.
*/

use bitflags::bitflags;

bitflags! {
    /// Button bits in shift-out order (bit 7 is read first).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Button: u8 {
        const A = 0x80;
        const B = 0x40;
        const SELECT = 0x20;
        const START = 0x10;
        const UP = 0x08;
        const DOWN = 0x04;
        const LEFT = 0x02;
        const RIGHT = 0x01;
    }
}

#[derive(Clone, Debug, Default)]
pub struct Controller {
    buttons: Button,
    shift: u8,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_buttons(&mut self, buttons: Button) {
        self.buttons = buttons;
    }

    pub fn press(&mut self, button: Button) {
        self.buttons.insert(button);
    }

    pub fn release(&mut self, button: Button) {
        self.buttons.remove(button);
    }

    pub fn buttons(&self) -> Button {
        self.buttons
    }

    /// Snapshot the live state into the shift register.
    #[inline]
    pub fn latch(&mut self) {
        self.shift = self.buttons.bits();
    }

    /// Next serial bit (0 or 1).
    #[inline]
    pub fn read(&mut self) -> u8 {
        let bit = (self.shift & 0x80 != 0) as u8;
        self.shift <<= 1;
        bit
    }

    /// Next bit without shifting.
    #[inline]
    pub fn peek(&self) -> u8 {
        (self.shift & 0x80 != 0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_in_hardware_order() {
        let mut c = Controller::new();
        c.set_buttons(Button::A | Button::START | Button::RIGHT);
        c.latch();
        let bits: Vec<u8> = (0..8).map(|_| c.read()).collect();
        assert_eq!(bits, vec![1, 0, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn exhausted_register_reads_zero() {
        let mut c = Controller::new();
        c.set_buttons(Button::all());
        c.latch();
        for _ in 0..8 {
            assert_eq!(c.read(), 1);
        }
        assert_eq!(c.read(), 0);
    }

    #[test]
    fn changes_after_latch_wait_for_next_latch() {
        let mut c = Controller::new();
        c.press(Button::B);
        c.latch();
        c.release(Button::B);
        assert_eq!(c.peek(), 0);
        c.read();
        assert_eq!(c.read(), 1);
        c.latch();
        assert_eq!(c.read(), 0);
    }
}

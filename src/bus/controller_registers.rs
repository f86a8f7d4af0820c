/*!
Controller registers handler

Addressing overview (CPU):
- $4016 / $4017 (write): snapshot the live state of controller 1 / 2 into its shift
  register.
- $4016 / $4017 (read): next serial bit of controller 1 / 2.

$4017 writes also reach the APU frame counter; the CPU decoder forwards them to both.
*/

use crate::bus::Bus;

pub struct ControllerRegisters;

impl ControllerRegisters {
    /// `Some(bit)` for $4016/$4017, `None` otherwise. Read-only accesses do not shift.
    #[inline]
    pub fn read(bus: &mut Bus, addr: u16, read_only: bool) -> Option<u8> {
        let port = match addr {
            0x4016 | 0x4017 => (addr & 0x0001) as usize,
            _ => return None,
        };
        let controller = &mut bus.controllers[port];
        Some(if read_only {
            controller.peek()
        } else {
            controller.read()
        })
    }

    /// Returns true when `addr` is a controller port.
    #[inline]
    pub fn write(bus: &mut Bus, addr: u16, _value: u8) -> bool {
        match addr {
            0x4016 | 0x4017 => {
                bus.controllers[(addr & 0x0001) as usize].latch();
                true
            }
            _ => false,
        }
    }
}

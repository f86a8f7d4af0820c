/*!
OAM DMA: copies one 256-byte CPU page into sprite memory while the CPU is stalled.

Behavioral model
- A write of page `P` to $4014 starts a transfer from `P << 8`.
- The transfer first idles until an odd CPU cycle has passed (one or two cycles,
  depending on alignment), then alternates: even cycles read a source byte, odd cycles
  store it to OAM. 256 read/write pairs follow, 513 or 514 cycles in total.
- The CPU does not advance while a transfer is active; PPU and APU keep running.

The controller only needs a way to read CPU space and a way to store OAM bytes, expressed
by `CpuMemory` and `OamWriter` so it can be driven without borrowing the whole Bus.
*/

/// CPU-space reads used as the DMA source.
pub trait CpuMemory {
    fn dma_read(&mut self, addr: u16) -> u8;
}

/// OAM stores used as the DMA destination.
pub trait OamWriter {
    fn write_oam(&mut self, index: u8, value: u8);
}

#[derive(Debug, Clone)]
pub struct DmaController {
    page: u8,
    addr: u8,
    data: u8,
    /// Waiting for alignment before the first read.
    dummy: bool,
    transfer: bool,
}

impl Default for DmaController {
    fn default() -> Self {
        Self {
            page: 0,
            addr: 0,
            data: 0,
            dummy: true,
            transfer: false,
        }
    }
}

impl DmaController {
    pub fn start(&mut self, page: u8) {
        self.page = page;
        self.addr = 0x00;
        self.dummy = true;
        self.transfer = true;
        log::trace!("OAM DMA from ${:02X}00", page);
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.transfer
    }

    /// One CPU cycle of the transfer. `odd_cycle` is the parity of the current CPU cycle.
    pub fn step<M: CpuMemory + OamWriter>(&mut self, odd_cycle: bool, mem: &mut M) {
        if !self.transfer {
            return;
        }

        if self.dummy {
            if odd_cycle {
                self.dummy = false;
            }
            return;
        }

        if !odd_cycle {
            let addr = ((self.page as u16) << 8) | self.addr as u16;
            self.data = mem.dma_read(addr);
        } else {
            mem.write_oam(self.addr, self.data);
            self.addr = self.addr.wrapping_add(1);
            if self.addr == 0x00 {
                self.transfer = false;
                self.dummy = true;
            }
        }
    }
}

/*!
Clock/timing orchestrator for the Bus.

Order of operations for one call (one PPU dot):
1. PPU advances one dot.
2. APU advances one dot.
3. Every third dot: one DMA cycle if a transfer is active, otherwise one CPU cycle.
4. Audio time advances by one dot; once a sample period has elapsed the APU output is
   captured and the call reports a new sample.
5. On an instruction boundary (CPU complete, no DMA in flight), a latched PPU NMI is
   cleared and delivered to the CPU; otherwise a pending mapper IRQ is acknowledged and
   delivered (masked by the I flag). Signals raised mid-instruction stay latched until the
   instruction has spent all of its cycles.
*/

use crate::bus::Bus;

impl Bus {
    /// Advance the system by one PPU dot. Returns true when a new audio sample is ready.
    pub fn clock(&mut self) -> bool {
        let Some(cart) = self.cartridge.as_mut() else {
            return false;
        };

        self.ppu.clock(cart);
        self.apu.clock();

        if self.system_clock_counter % 3 == 0 {
            if self.dma.is_active() {
                let odd_cycle = (self.system_clock_counter / 3) % 2 == 1;
                let mut dma = std::mem::take(&mut self.dma);
                dma.step(odd_cycle, self);
                self.dma = dma;
            } else {
                self.with_cpu(|cpu, bus| cpu.clock(bus));
            }
        }

        let mut sample_ready = false;
        self.audio_time += self.time_per_clock;
        if self.audio_time >= self.time_per_sample {
            self.audio_time -= self.time_per_sample;
            self.audio_sample = self.apu.output_sample();
            sample_ready = true;
        }

        if self.cpu.complete() && !self.dma.is_active() {
            self.service_interrupts();
        }

        self.system_clock_counter += 1;
        sample_ready
    }

    /// Hand latched interrupt lines to the CPU. NMI wins over IRQ.
    fn service_interrupts(&mut self) {
        if self.ppu.nmi {
            self.ppu.nmi = false;
            self.with_cpu(|cpu, bus| cpu.nmi(bus));
            return;
        }

        if let Some(cart) = self.cartridge.as_mut() {
            if cart.irq_state() {
                cart.irq_clear();
                log::trace!("mapper IRQ at dot {}", self.system_clock_counter);
                self.with_cpu(|cpu, bus| cpu.irq(bus));
            }
        }
    }
}

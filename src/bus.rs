/*!
The CPU-side address bus: 2 KiB of internal work RAM plus the fixed
routing of the memory map to attached devices.

Map (bit-exact, mirrors included):

```text
$0000-$1FFF  internal RAM, 2 KiB mirrored 4x  (addr % $800)
$2000-$3FFF  PPU registers, 8 mirrored        ($2000 + addr % 8)
$4000-$4013  APU registers
$4014        OAM DMA register
$4015        APU status/control
$4016        controller port (strobe on write)
$4017        controller 2 on read, APU frame counter on write
$4018-$FFFF  cartridge space
```

Devices are attached as boxed [`Memory`] objects; the bus only routes,
it knows nothing about what is behind each window. The cartridge slot
may be empty, in which case its window reads back open bus ($00) and
swallows writes.
*/

use crate::memory::Memory;

/// Internal work RAM size; the $0000-$1FFF window mirrors it four times.
const WRAM_SIZE: usize = 0x800;

/// The CPU's view of the system. Implements [`Memory`] so it plugs
/// straight into [`crate::cpu::Cpu::step`].
pub struct CpuBus {
    wram: [u8; WRAM_SIZE],
    ppu: Box<dyn Memory>,
    apu: Box<dyn Memory>,
    dma: Box<dyn Memory>,
    joy: Box<dyn Memory>,
    cart: Option<Box<dyn Memory>>,
}

impl CpuBus {
    /// A bus with zeroed RAM, the fixed devices attached, and an empty
    /// cartridge slot.
    pub fn new(
        ppu: Box<dyn Memory>,
        apu: Box<dyn Memory>,
        dma: Box<dyn Memory>,
        joy: Box<dyn Memory>,
    ) -> Self {
        Self {
            wram: [0; WRAM_SIZE],
            ppu,
            apu,
            dma,
            joy,
            cart: None,
        }
    }

    /// Put a cartridge in the slot, replacing any previous one.
    pub fn attach_cartridge(&mut self, cart: Box<dyn Memory>) {
        self.cart = Some(cart);
    }

    /// Empty the slot, returning the previous cartridge if any.
    pub fn remove_cartridge(&mut self) -> Option<Box<dyn Memory>> {
        self.cart.take()
    }
}

impl Memory for CpuBus {
    fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.wram[addr as usize % WRAM_SIZE],
            0x2000..=0x3FFF => self.ppu.peek(0x2000 + addr % 8),
            0x4000..=0x4013 => self.apu.peek(addr),
            0x4014 => self.dma.peek(addr),
            0x4015 => self.apu.peek(addr),
            0x4016 | 0x4017 => self.joy.peek(addr),
            0x4018..=0xFFFF => match &self.cart {
                Some(cart) => cart.peek(addr),
                None => 0x00,
            },
        }
    }

    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.wram[addr as usize % WRAM_SIZE],
            0x2000..=0x3FFF => self.ppu.read(0x2000 + addr % 8),
            0x4000..=0x4013 => self.apu.read(addr),
            0x4014 => self.dma.read(addr),
            0x4015 => self.apu.read(addr),
            0x4016 | 0x4017 => self.joy.read(addr),
            0x4018..=0xFFFF => match &mut self.cart {
                Some(cart) => cart.read(addr),
                None => {
                    log::warn!(target: "bus", "read {addr:#06X} with no cartridge");
                    0x00
                }
            },
        }
    }

    fn write(&mut self, addr: u16, val: u8) {
        match addr {
            0x0000..=0x1FFF => self.wram[addr as usize % WRAM_SIZE] = val,
            0x2000..=0x3FFF => self.ppu.write(0x2000 + addr % 8, val),
            0x4000..=0x4013 => self.apu.write(addr, val),
            0x4014 => self.dma.write(addr, val),
            0x4015 => self.apu.write(addr, val),
            0x4016 => self.joy.write(addr, val),
            // $4017 is asymmetric: controller 2 on read, APU on write.
            0x4017 => self.apu.write(addr, val),
            0x4018..=0xFFFF => match &mut self.cart {
                Some(cart) => cart.write(addr, val),
                None => {
                    log::warn!(target: "bus", "write {addr:#06X} with no cartridge");
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Access {
        Read(u8, u16),
        Write(u8, u16, u8),
    }

    type Log = Rc<RefCell<Vec<Access>>>;

    /// Device double: answers reads with its id and logs every access.
    struct Probe {
        id: u8,
        log: Log,
    }

    impl Memory for Probe {
        fn peek(&self, _addr: u16) -> u8 {
            self.id
        }
        fn read(&mut self, addr: u16) -> u8 {
            self.log.borrow_mut().push(Access::Read(self.id, addr));
            self.id
        }
        fn write(&mut self, addr: u16, val: u8) {
            self.log.borrow_mut().push(Access::Write(self.id, addr, val));
        }
    }

    const PPU: u8 = 1;
    const APU: u8 = 2;
    const DMA: u8 = 3;
    const JOY: u8 = 4;
    const CART: u8 = 5;

    fn bus() -> (CpuBus, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let probe = |id| -> Box<dyn Memory> { Box::new(Probe { id, log: Rc::clone(&log) }) };
        let bus = CpuBus::new(probe(PPU), probe(APU), probe(DMA), probe(JOY));
        (bus, log)
    }

    #[test]
    fn wram_mirrors_every_2k() {
        let (mut bus, _log) = bus();
        bus.write(0x0000, 0xAA);
        assert_eq!(bus.read(0x0800), 0xAA);
        assert_eq!(bus.read(0x1000), 0xAA);
        assert_eq!(bus.read(0x1800), 0xAA);

        bus.write(0x1805, 0xBB);
        assert_eq!(bus.read(0x0005), 0xBB);
        assert_eq!(bus.peek(0x0005), 0xBB);
    }

    #[test]
    fn ppu_registers_mirror_every_8() {
        let (mut bus, log) = bus();
        bus.read(0x3456); // 0x1456 % 8 == 6
        bus.write(0x2008, 0x12); // mirror of $2000
        assert_eq!(
            log.borrow().as_slice(),
            &[
                Access::Read(PPU, 0x2006),
                Access::Write(PPU, 0x2000, 0x12),
            ]
        );
    }

    #[test]
    fn apu_window_covers_both_ranges() {
        let (mut bus, log) = bus();
        bus.write(0x4000, 0x01);
        bus.write(0x4013, 0x02);
        bus.read(0x4015);
        assert_eq!(
            log.borrow().as_slice(),
            &[
                Access::Write(APU, 0x4000, 0x01),
                Access::Write(APU, 0x4013, 0x02),
                Access::Read(APU, 0x4015),
            ]
        );
    }

    #[test]
    fn dma_register_routes_alone() {
        let (mut bus, log) = bus();
        bus.write(0x4014, 0x02);
        assert_eq!(log.borrow().as_slice(), &[Access::Write(DMA, 0x4014, 0x02)]);
    }

    #[test]
    fn port_4017_splits_read_and_write() {
        let (mut bus, log) = bus();
        bus.read(0x4017);
        bus.write(0x4017, 0x40);
        bus.read(0x4016);
        assert_eq!(
            log.borrow().as_slice(),
            &[
                Access::Read(JOY, 0x4017),
                Access::Write(APU, 0x4017, 0x40),
                Access::Read(JOY, 0x4016),
            ]
        );
    }

    #[test]
    fn empty_cartridge_slot_reads_open_bus() {
        let (mut bus, _log) = bus();
        assert_eq!(bus.read(0x8000), 0x00);
        assert_eq!(bus.read(0x4018), 0x00);
        assert_eq!(bus.peek(0xFFFC), 0x00);
        bus.write(0x8000, 0xFF); // swallowed
        assert_eq!(bus.read(0x8000), 0x00);
    }

    #[test]
    fn cartridge_window_starts_at_4018() {
        let (mut bus, log) = bus();
        let cart_log = Rc::clone(&log);
        bus.attach_cartridge(Box::new(Probe { id: CART, log: cart_log }));

        bus.read(0x4018);
        bus.read(0xFFFC);
        bus.write(0x6000, 0x55);
        assert_eq!(
            log.borrow().as_slice(),
            &[
                Access::Read(CART, 0x4018),
                Access::Read(CART, 0xFFFC),
                Access::Write(CART, 0x6000, 0x55),
            ]
        );

        assert!(bus.remove_cartridge().is_some());
        assert_eq!(bus.read(0xFFFC), 0x00);
    }
}

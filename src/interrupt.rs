/*!
Interrupt lines shared between the CPU and the peripherals that can pull
them.

This is a level-style model, not an edge-style one: a line stays asserted
until the CPU explicitly services it, and asserting an already-asserted
line is a no-op (requests coalesce; there is no counter). A peripheral
that wants the CPU to notice an event exactly once asserts the line and
relies on the CPU clearing it when it services the interrupt at the top
of its next step.

Priority is fixed in hardware: RESET beats NMI beats IRQ, regardless of
the order the requests arrived in.
*/

/// The three physical interrupt lines, in descending priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Reset,
    Nmi,
    Irq,
}

/// Pending-interrupt state. One instance is shared (by `&mut`) between the
/// CPU and whatever peripherals the driving loop wires up.
#[derive(Debug, Clone, Default)]
pub struct InterruptLines {
    reset: bool,
    nmi: bool,
    irq: bool,
}

impl InterruptLines {
    /// All lines deasserted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deassert every line. Called on power-up and explicit reset.
    pub fn clear(&mut self) {
        self.reset = false;
        self.nmi = false;
        self.irq = false;
    }

    /// Assert a line. Idempotent: repeated requests before service coalesce.
    pub fn request(&mut self, kind: Interrupt) {
        match kind {
            Interrupt::Reset => self.reset = true,
            Interrupt::Nmi => self.nmi = true,
            Interrupt::Irq => self.irq = true,
        }
    }

    /// Deassert a line. The CPU calls this after consuming the interrupt.
    pub fn service(&mut self, kind: Interrupt) {
        match kind {
            Interrupt::Reset => self.reset = false,
            Interrupt::Nmi => self.nmi = false,
            Interrupt::Irq => self.irq = false,
        }
    }

    /// Highest-priority pending line, if any.
    pub fn get(&self) -> Option<Interrupt> {
        if self.reset {
            Some(Interrupt::Reset)
        } else if self.nmi {
            Some(Interrupt::Nmi)
        } else if self.irq {
            Some(Interrupt::Irq)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lines_report_none() {
        let lines = InterruptLines::new();
        assert_eq!(lines.get(), None);
    }

    #[test]
    fn priority_is_reset_nmi_irq() {
        let mut lines = InterruptLines::new();
        lines.request(Interrupt::Irq);
        lines.request(Interrupt::Nmi);
        lines.request(Interrupt::Reset);
        assert_eq!(lines.get(), Some(Interrupt::Reset));
        lines.service(Interrupt::Reset);
        assert_eq!(lines.get(), Some(Interrupt::Nmi));
        lines.service(Interrupt::Nmi);
        assert_eq!(lines.get(), Some(Interrupt::Irq));
        lines.service(Interrupt::Irq);
        assert_eq!(lines.get(), None);
    }

    #[test]
    fn requests_coalesce() {
        let mut lines = InterruptLines::new();
        lines.request(Interrupt::Nmi);
        lines.request(Interrupt::Nmi);
        lines.request(Interrupt::Nmi);
        lines.service(Interrupt::Nmi);
        assert_eq!(lines.get(), None);
    }

    #[test]
    fn clear_deasserts_everything() {
        let mut lines = InterruptLines::new();
        lines.request(Interrupt::Reset);
        lines.request(Interrupt::Irq);
        lines.clear();
        assert_eq!(lines.get(), None);
    }
}

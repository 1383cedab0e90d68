//! RAM-backed test doubles for the injected capabilities.

use std::cell::RefCell;
use std::rc::Rc;

use super::advanced_pwm::AdvancedPwm;
use super::regs::{Reg, RegisterBank};
use super::{Channel, ChannelCount, ChipConfig, Counter, CounterEvent, EventHandler};
use crate::gpio::{PinConfigurator, PinId, PinMode};
use crate::time::Hertz;

/// A register bank backed by an array. Clones share their storage, so a
/// test can keep a handle while the driver owns another.
#[derive(Clone)]
pub(crate) struct TestBank {
    regs: Rc<RefCell<[u8; Reg::COUNT]>>,
}

impl Default for TestBank {
    fn default() -> Self {
        Self {
            regs: Rc::new(RefCell::new([0; Reg::COUNT])),
        }
    }
}

impl TestBank {
    pub fn get(&self, reg: Reg) -> u8 {
        self.regs.borrow()[reg.index()]
    }

    pub fn set(&self, reg: Reg, value: u8) {
        self.regs.borrow_mut()[reg.index()] = value;
    }

    pub fn snapshot(&self) -> [u8; Reg::COUNT] {
        *self.regs.borrow()
    }
}

impl RegisterBank for TestBank {
    fn read(&self, reg: Reg) -> u8 {
        self.regs.borrow()[reg.index()]
    }

    fn write(&mut self, reg: Reg, value: u8) {
        self.regs.borrow_mut()[reg.index()] = value;
    }
}

/// A pin configurator that accepts every in-range pin not explicitly
/// refused, recording the successful configurations.
#[derive(Clone, Default)]
pub(crate) struct TestPins {
    configured: Rc<RefCell<Vec<(PinId, PinMode)>>>,
    refused: Rc<RefCell<Vec<u8>>>,
}

impl TestPins {
    /// Refuse configuration of the pin with this packed code.
    pub fn refuse_code(&self, code: u8) {
        self.refused.borrow_mut().push(code);
    }

    /// Pins configured so far, in call order.
    pub fn calls(&self) -> Vec<(PinId, PinMode)> {
        self.configured.borrow().clone()
    }
}

impl PinConfigurator for TestPins {
    fn configure_pin(&mut self, pin: PinId, mode: PinMode) -> bool {
        if !pin.is_valid() || self.refused.borrow().contains(&pin.code()) {
            return false;
        }
        self.configured.borrow_mut().push((pin, mode));
        true
    }
}

/// Collects dispatched events.
#[derive(Default)]
pub(crate) struct TestHandler {
    pub channel_events: Vec<(Channel, u16, bool)>,
    pub counter_events: Vec<(Counter, CounterEvent)>,
}

impl EventHandler for TestHandler {
    fn on_channel_event(&mut self, channel: Channel, captured: u16, counting_down: bool) {
        self.channel_events.push((channel, captured, counting_down));
    }

    fn on_counter_event(&mut self, counter: Counter, event: CounterEvent) {
        self.counter_events.push((counter, event));
    }
}

/// A driver for an eight-channel chip at 24 MHz, plus handles onto its
/// banks and pin configurator.
pub(crate) fn eight_channel() -> (
    AdvancedPwm<TestBank, TestPins>,
    TestBank,
    TestBank,
    TestPins,
) {
    let bank_a = TestBank::default();
    let bank_b = TestBank::default();
    let gpio = TestPins::default();
    let pwm = AdvancedPwm::new(
        ChipConfig::new(Hertz::mhz(24), ChannelCount::Eight),
        bank_a.clone(),
        Some(bank_b.clone()),
        gpio.clone(),
    );
    (pwm, bank_a, bank_b, gpio)
}

/// A driver for a four-channel chip at 24 MHz.
pub(crate) fn four_channel() -> (AdvancedPwm<TestBank, TestPins>, TestBank, TestPins) {
    let bank_a = TestBank::default();
    let gpio = TestPins::default();
    let pwm = AdvancedPwm::new(
        ChipConfig::new(Hertz::mhz(24), ChannelCount::Four),
        bank_a.clone(),
        None,
        gpio.clone(),
    );
    (pwm, bank_a, gpio)
}

//! Advanced PWM driver.
//!
//! [`AdvancedPwm`] owns the per-channel usage registry, the register banks
//! of both counter groups, and the pin configurator. Configuration entry
//! points run in thread context; [`AdvancedPwm::on_interrupt`] is called
//! from the counter's interrupt vector and demultiplexes the status flags
//! into [`EventHandler`] callbacks.
//!
//! Configuration calls are fire and forget: a request that cannot be
//! satisfied (no routing for the selected pin-switch variant, a channel
//! the chip does not have) skips its register writes and returns
//! normally.

use core::convert::Infallible;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};

use super::low_level::{
    compute_counter_values, dead_time_bits, CaptureSource, CounterMode, CountingMode, FaultResponse,
    FaultResume, FaultTrigger, OutputCompareMode, OutputLevel, OutputSelection, Polarity,
    RegisterUpdate, RunMode, TriggerEdge, TriggerPrescaler, TriggerSource, UpdateEvents,
};
use super::regs::{
    int_channel, Reg, RegisterBank, Registers, BKR_AOE_SHIFT, BKR_BKE, BKR_BKP_SHIFT, BKR_MOE,
    BKR_OSSI_SHIFT, CCMR_FILTER_SHIFT, CCMR_OCM_MASK, CCMR_OCM_SHIFT, CCMR_OCPE, CR1_ARPE_SHIFT,
    CR1_CEN, CR1_DIR_SHIFT, CR1_OPM_SHIFT, CR1_UDIS_SHIFT, ETRPS_BRK, ETRPS_BRK_SHIFT,
    ETRPS_ETR_MASK, ETR_ECE_SHIFT, ETR_ETPS_SHIFT, ETR_ETP_SHIFT, ETR_FILTER_MASK, INT_BREAK,
    INT_COM, INT_TRIGGER, INT_UPDATE, SMCR_TS_SHIFT,
};
use super::{pins, Channel, ChannelUsage, ChipConfig, Counter, CounterEvent, EventHandler};
use crate::gpio::{PinConfigurator, PinMode};
use crate::time::Hertz;

/// Counter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterConfig {
    /// What drives the count.
    pub mode: CounterMode,
    /// Slave-mode trigger selection.
    pub trigger: TriggerSource,
    /// Update events fire every `repeat_count + 1` periods.
    pub repeat_count: u8,
    /// Whether period/compare writes are buffered until the next update.
    pub register_update: RegisterUpdate,
    /// One-shot or continuous counting.
    pub run_mode: RunMode,
    /// Counting direction and alignment.
    pub direction: CountingMode,
    /// Update event generation policy.
    pub update_events: UpdateEvents,
    /// Unmask the commutation interrupt.
    pub commutation_interrupt: bool,
}

/// PWM output configuration for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Pin-switch routing variant.
    pub pin_switch: u8,
    /// Electrical mode for the output pin(s). High impedance is upgraded
    /// to push-pull, an output cannot drive a floating line.
    pub pin_mode: PinMode,
    /// Output polarity.
    pub polarity: Polarity,
    /// Arm fault override for the configured output(s).
    pub fault_control: bool,
    /// Level driven while fault protection idles the output.
    pub idle_level: OutputLevel,
    /// Which of the channel's outputs to configure. Counter B channels
    /// always configure their (only) primary output.
    pub outputs: OutputSelection,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pin_switch: 0,
            pin_mode: PinMode::PushPull,
            polarity: Polarity::ActiveHigh,
            fault_control: false,
            idle_level: OutputLevel::Low,
            outputs: OutputSelection::Primary,
        }
    }
}

/// Fault (break) protection configuration for one counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaultConfig {
    /// What asserts the fault.
    pub trigger: FaultTrigger,
    /// Active level of the fault input.
    pub polarity: Polarity,
    /// Output behavior while the fault holds.
    pub response: FaultResponse,
    /// How output resumes after the fault clears.
    pub resume: FaultResume,
    /// Unmask the break interrupt.
    pub enable_interrupt: bool,
}

/// External trigger input configuration for one counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExternalTriggerConfig {
    /// Pin-switch routing variant.
    pub pin_switch: u8,
    /// Active edge.
    pub edge: TriggerEdge,
    /// Clock the counter directly from the trigger input.
    pub external_clock: bool,
    /// Trigger edge prescaler.
    pub prescaler: TriggerPrescaler,
    /// Input filter value (0..15).
    pub filter: u8,
    /// Unmask the trigger interrupt.
    pub enable_interrupt: bool,
}

/// Driver for the advanced 16-bit PWM peripheral.
///
/// Owns both counter groups' register banks (counter B only where the
/// chip has one) and the externally supplied pin configurator.
pub struct AdvancedPwm<B, G> {
    config: ChipConfig,
    gpio: G,
    bank_a: B,
    bank_b: Option<B>,
    usage: [ChannelUsage; 8],
    periods: [u16; 2],
}

/// Select the register bank owning `counter`, without borrowing the rest
/// of the driver.
fn bank_for<'a, B: RegisterBank>(
    bank_a: &'a mut B,
    bank_b: &'a mut Option<B>,
    config: &ChipConfig,
    counter: Counter,
) -> Option<&'a mut B> {
    match counter {
        Counter::A => Some(bank_a),
        Counter::B if config.channels.counters() > 1 => bank_b.as_mut(),
        Counter::B => None,
    }
}

impl<B: RegisterBank, G: PinConfigurator> AdvancedPwm<B, G> {
    /// Create a new driver. All channels start out unused.
    ///
    /// `bank_b` is `None` on chips without counter B; a bank supplied for
    /// a four-channel chip is never touched.
    pub fn new(config: ChipConfig, bank_a: B, bank_b: Option<B>, gpio: G) -> Self {
        Self {
            config,
            gpio,
            bank_a,
            bank_b,
            usage: [ChannelUsage::Unused; 8],
            periods: [0; 2],
        }
    }

    /// Release the register banks and the pin configurator.
    pub fn free(self) -> (B, Option<B>, G) {
        (self.bank_a, self.bank_b, self.gpio)
    }

    /// The chip capability description this driver was built with.
    pub fn chip_config(&self) -> &ChipConfig {
        &self.config
    }

    /// What `channel` is currently used for.
    ///
    /// [`close_channel`](Self::close_channel) does not reset this tag.
    pub fn usage(&self, channel: Channel) -> ChannelUsage {
        self.usage[channel.index()]
    }

    fn bank(&self, counter: Counter) -> Option<&B> {
        match counter {
            Counter::A => Some(&self.bank_a),
            Counter::B if self.config.channels.counters() > 1 => self.bank_b.as_ref(),
            Counter::B => None,
        }
    }

    fn valid_channel(&self, channel: Channel) -> bool {
        channel.index() < self.config.channels.channels()
    }

    /// Configure a counter and return the achieved period in ticks.
    ///
    /// `counter_freq` sets the counter's tick rate, i.e. its resolution,
    /// and `signal_freq` the frequency of the output signal. In the
    /// event-driven modes `signal_freq` is reused as a raw reload value,
    /// and in external clock mode `counter_freq` is additionally reused as
    /// a raw prescaler divisor.
    ///
    /// The achieved period can differ from the request because of integer
    /// division; duty cycles must be scaled against the returned value.
    /// Returns 0 for a counter the chip does not have.
    pub fn configure_counter(
        &mut self,
        counter: Counter,
        counter_freq: Hertz,
        signal_freq: Hertz,
        config: CounterConfig,
    ) -> u16 {
        let Some(bank) = bank_for(&mut self.bank_a, &mut self.bank_b, &self.config, counter) else {
            return 0;
        };

        let (prescaler, reload) = compute_counter_values(
            self.config.sysclk,
            counter_freq,
            signal_freq,
            config.mode,
            config.direction,
        );

        let slave_mode = config.mode as u8 | (config.trigger as u8) << SMCR_TS_SHIFT;
        let cr1 = (config.register_update as u8) << CR1_ARPE_SHIFT
            | (config.run_mode as u8) << CR1_OPM_SHIFT
            | (config.direction as u8) << CR1_DIR_SHIFT
            | (config.update_events as u8) << CR1_UDIS_SHIFT;

        let mut unmask = 0;
        if config.commutation_interrupt {
            unmask |= INT_COM;
        }
        if config.update_events == UpdateEvents::Enabled {
            unmask |= INT_UPDATE;
        }

        critical_section::with(|_| {
            let mut regs = Registers(bank);
            regs.write16(Reg::PscrH, Reg::PscrL, prescaler);
            regs.write16(Reg::ArrH, Reg::ArrL, reload);
            regs.0.write(Reg::Smcr, slave_mode);
            regs.0.write(Reg::Rcr, config.repeat_count);
            regs.0.write(Reg::Cr1, cr1);
            regs.0
                .modify(Reg::Ier, |v| (v & !(INT_COM | INT_UPDATE)) | unmask);
        });

        let period = reload.wrapping_add(1);
        self.periods[counter.index()] = period;
        period
    }

    /// Set a counter's dead time in prescaler input clock pulses, i.e.
    /// system clock pulses unless an external PWM clock is used.
    ///
    /// See [`dead_time_bits`] for the encoding resolution.
    pub fn configure_dead_time(&mut self, counter: Counter, clock_pulses: u16) {
        let Some(bank) = bank_for(&mut self.bank_a, &mut self.bank_b, &self.config, counter) else {
            return;
        };
        bank.write(Reg::Dtr, dead_time_bits(clock_pulses));
    }

    /// Start a counter.
    pub fn enable_counter(&mut self, counter: Counter) {
        let Some(bank) = bank_for(&mut self.bank_a, &mut self.bank_b, &self.config, counter) else {
            return;
        };
        bank.modify(Reg::Cr1, |v| v | CR1_CEN);
    }

    /// Stop a counter. Register state is preserved.
    pub fn disable_counter(&mut self, counter: Counter) {
        let Some(bank) = bank_for(&mut self.bank_a, &mut self.bank_b, &self.config, counter) else {
            return;
        };
        bank.modify(Reg::Cr1, |v| v & !CR1_CEN);
    }

    /// Enable a counter's main output stage. Without this none of the
    /// counter's channels drive their pins.
    pub fn enable_main_output(&mut self, counter: Counter) {
        let Some(bank) = bank_for(&mut self.bank_a, &mut self.bank_b, &self.config, counter) else {
            return;
        };
        bank.modify(Reg::Bkr, |v| v | BKR_MOE);
    }

    /// Read a counter's current count, e.g. a quadrature encoder
    /// position. Returns 0 for a counter the chip does not have.
    pub fn counter_value(&self, counter: Counter) -> u16 {
        let Some(bank) = self.bank(counter) else {
            return 0;
        };
        (bank.read(Reg::CntH) as u16) << 8 | bank.read(Reg::CntL) as u16
    }

    /// Configure a channel's output path: pin routing, electrical mode,
    /// output enable, polarity, and optionally fault override.
    ///
    /// Each selected output resolves and configures its pin
    /// independently, so the call can partially succeed; an output whose
    /// pin does not resolve or configure is skipped without touching its
    /// registers. The pin-switch selection is only applied when at least
    /// one output was configured.
    pub fn configure_output(&mut self, channel: Channel, config: OutputConfig) {
        if !self.valid_channel(channel) {
            return;
        }

        let pin_mode = if config.pin_mode == PinMode::HighImpedance {
            PinMode::PushPull
        } else {
            config.pin_mode
        };
        let local = channel.local_index();
        let active_low = bool::from(config.polarity);
        let idle_high = config.idle_level == OutputLevel::High;

        critical_section::with(|_| {
            let Some(bank) =
                bank_for(&mut self.bank_a, &mut self.bank_b, &self.config, channel.counter())
            else {
                return;
            };
            let mut regs = Registers(bank);
            let mut configured = false;

            // Counter B channels only have a primary output and always
            // configure it.
            if !channel.has_complementary() || config.outputs.primary() {
                if let Some(pin) = pins::channel_pin(&self.config, channel, config.pin_switch, false)
                {
                    if self.gpio.configure_pin(pin, pin_mode) {
                        regs.enable_output(local, false);
                        regs.enable_channel(local, false, active_low);
                        if config.fault_control {
                            regs.enable_fault_override(local, false, idle_high);
                        }
                        configured = true;
                    }
                }
            }

            if channel.has_complementary() && config.outputs.complementary() {
                if let Some(pin) = pins::channel_pin(&self.config, channel, config.pin_switch, true)
                {
                    if self.gpio.configure_pin(pin, pin_mode) {
                        regs.enable_output(local, true);
                        regs.enable_channel(local, true, active_low);
                        if config.fault_control {
                            regs.enable_fault_override(local, true, idle_high);
                        }
                        configured = true;
                    }
                }
            }

            if configured {
                regs.apply_pin_switch(local, pins::clamp_pin_switch(config.pin_switch));
            }
        });
    }

    /// Configure a channel's input path for capture.
    ///
    /// The pin-switch selection is applied even when the pin itself
    /// cannot be configured.
    pub fn configure_input(
        &mut self,
        channel: Channel,
        pin_switch: u8,
        polarity: Polarity,
        source: CaptureSource,
        filter: u8,
    ) {
        if !self.valid_channel(channel) {
            return;
        }
        let local = channel.local_index();
        let ccmr = (filter & 0x0f) << CCMR_FILTER_SHIFT | source as u8;

        critical_section::with(|_| {
            let Some(bank) =
                bank_for(&mut self.bank_a, &mut self.bank_b, &self.config, channel.counter())
            else {
                return;
            };
            let mut regs = Registers(bank);
            regs.apply_pin_switch(local, pins::clamp_pin_switch(pin_switch));
            if let Some(pin) = pins::channel_pin(&self.config, channel, pin_switch, false) {
                let _ = self.gpio.configure_pin(pin, PinMode::HighImpedance);
            }
            regs.write_ccmr(local, ccmr);
            regs.enable_channel(local, false, polarity.into());
        });
    }

    /// Set up a channel as a PWM output and tag it as such.
    ///
    /// Writes the initial duty value and selects the waveform that starts
    /// at `initial_level`. The output path itself is configured separately
    /// with [`configure_output`](Self::configure_output).
    pub fn init_pwm(
        &mut self,
        channel: Channel,
        initial_level: OutputLevel,
        enable_interrupt: bool,
        register_update: RegisterUpdate,
        ticks: u16,
    ) {
        if !self.valid_channel(channel) {
            return;
        }
        let local = channel.local_index();

        let mut ccmr = match register_update {
            RegisterUpdate::Buffered => CCMR_OCPE,
            RegisterUpdate::Immediate => 0,
        };
        let waveform = match initial_level {
            OutputLevel::High => OutputCompareMode::PwmMode1,
            OutputLevel::Low => OutputCompareMode::PwmMode2,
        };
        ccmr |= (waveform as u8) << CCMR_OCM_SHIFT;

        critical_section::with(|_| {
            let Some(bank) =
                bank_for(&mut self.bank_a, &mut self.bank_b, &self.config, channel.counter())
            else {
                return;
            };
            let mut regs = Registers(bank);
            // The channel must be closed while its compare mode byte is
            // rewritten.
            regs.close_channel(local);
            regs.set_compare(local, ticks);
            regs.write_ccmr(local, ccmr);
            self.usage[channel.index()] = ChannelUsage::PwmOutput;
            if enable_interrupt {
                regs.enable_channel_interrupt(local);
            }
        });
    }

    /// Write a channel's compare value. Valid at any time once the
    /// channel is set up; with buffered updates the value takes effect at
    /// the next update event.
    pub fn set_duty_cycle(&mut self, channel: Channel, ticks: u16) {
        if !self.valid_channel(channel) {
            return;
        }
        let local = channel.local_index();
        critical_section::with(|_| {
            let Some(bank) =
                bank_for(&mut self.bank_a, &mut self.bank_b, &self.config, channel.counter())
            else {
                return;
            };
            Registers(bank).set_compare(local, ticks);
        });
    }

    /// Force a channel's output to a constant level without disabling the
    /// channel. Used for safe-stop and fault recovery.
    pub fn lock_output(&mut self, channel: Channel, level: OutputLevel) {
        if !self.valid_channel(channel) {
            return;
        }
        let local = channel.local_index();
        let mode = match level {
            OutputLevel::High => OutputCompareMode::ForceActive,
            OutputLevel::Low => OutputCompareMode::ForceInactive,
        };
        let Some(bank) =
            bank_for(&mut self.bank_a, &mut self.bank_b, &self.config, channel.counter())
        else {
            return;
        };
        Registers(bank)
            .modify_ccmr(local, |v| (v & !CCMR_OCM_MASK) | (mode as u8) << CCMR_OCM_SHIFT);
    }

    /// Freeze a channel's PWM waveform by clearing its compare mode.
    pub fn stop_pwm(&mut self, channel: Channel) {
        if !self.valid_channel(channel) {
            return;
        }
        let local = channel.local_index();
        let Some(bank) =
            bank_for(&mut self.bank_a, &mut self.bank_b, &self.config, channel.counter())
        else {
            return;
        };
        Registers(bank).write_ccmr(local, 0);
    }

    /// Disable a channel's compare/capture function by clearing its
    /// enable and polarity bits.
    ///
    /// The usage registry keeps its tag: a closed channel whose interrupt
    /// is still unmasked keeps dispatching under the old tag until it is
    /// reconfigured.
    pub fn close_channel(&mut self, channel: Channel) {
        if !self.valid_channel(channel) {
            return;
        }
        let local = channel.local_index();
        let Some(bank) =
            bank_for(&mut self.bank_a, &mut self.bank_b, &self.config, channel.counter())
        else {
            return;
        };
        Registers(bank).close_channel(local);
    }

    /// Set up a quadrature encoder on the channel pair containing
    /// `first_channel` and start its counter.
    ///
    /// The counter runs continuously with the maximum period; read the
    /// position with [`counter_value`](Self::counter_value). Both inputs
    /// are tagged [`ChannelUsage::PwmOutput`], so their edges dispatch as
    /// plain channel events with zero value and direction; only the first
    /// channel's interrupt is unmasked.
    pub fn init_quadrature_encoder(
        &mut self,
        first_channel: Channel,
        pin_switch: u8,
        polarity: Polarity,
        filter: u8,
    ) {
        if !self.valid_channel(first_channel) {
            return;
        }
        let counter = first_channel.counter();
        // Both inputs must belong to the same fixed channel pair.
        let second_channel = first_channel.paired();

        self.configure_counter(
            counter,
            Hertz(0),
            Hertz(0xffff),
            CounterConfig {
                mode: CounterMode::QuadratureEncoder,
                trigger: TriggerSource::None,
                repeat_count: 0,
                register_update: RegisterUpdate::Immediate,
                run_mode: RunMode::Continuous,
                direction: CountingMode::EdgeAlignedUp,
                update_events: UpdateEvents::Disabled,
                commutation_interrupt: false,
            },
        );

        self.configure_input(first_channel, pin_switch, polarity, CaptureSource::SamePin, filter);
        self.configure_input(second_channel, pin_switch, polarity, CaptureSource::SamePin, filter);

        critical_section::with(|_| {
            let Some(bank) = bank_for(&mut self.bank_a, &mut self.bank_b, &self.config, counter)
            else {
                return;
            };
            self.usage[first_channel.index()] = ChannelUsage::PwmOutput;
            self.usage[second_channel.index()] = ChannelUsage::PwmOutput;
            // One interrupt suffices, the pair shares the counter.
            Registers(bank).enable_channel_interrupt(first_channel.local_index());
        });

        self.enable_counter(counter);
    }

    /// Set up a channel as a capture input and unmask its interrupt.
    pub fn init_capture(&mut self, channel: Channel, pin_switch: u8, polarity: Polarity, filter: u8) {
        if !self.valid_channel(channel) {
            return;
        }
        self.configure_input(channel, pin_switch, polarity, CaptureSource::SamePin, filter);

        critical_section::with(|_| {
            let Some(bank) =
                bank_for(&mut self.bank_a, &mut self.bank_b, &self.config, channel.counter())
            else {
                return;
            };
            self.usage[channel.index()] = ChannelUsage::Capture;
            Registers(bank).enable_channel_interrupt(channel.local_index());
        });
    }

    /// Arm fault (break) protection for a counter.
    ///
    /// Enables the main output stage together with the break input, so
    /// this also serves as the final arming step of a protected output
    /// stage.
    pub fn configure_fault_detection(&mut self, counter: Counter, config: FaultConfig) {
        if self.bank(counter).is_none() {
            return;
        }
        // The comparator source resolves to a code outside the GPIO range
        // and is refused by the configurator, which is the intended no-op.
        let pin = pins::fault_pin(config.trigger, counter);
        let _ = self.gpio.configure_pin(pin, PinMode::HighImpedance);

        let bkr = BKR_MOE
            | (config.resume as u8) << BKR_AOE_SHIFT
            | (bool::from(config.polarity) as u8) << BKR_BKP_SHIFT
            | BKR_BKE
            | (config.response as u8) << BKR_OSSI_SHIFT;

        critical_section::with(|_| {
            let Some(bank) = bank_for(&mut self.bank_a, &mut self.bank_b, &self.config, counter)
            else {
                return;
            };
            let mut regs = Registers(bank);
            regs.0.modify(Reg::Etrps, |v| {
                (v & !ETRPS_BRK) | (config.trigger as u8) << ETRPS_BRK_SHIFT
            });
            regs.0.write(Reg::Bkr, bkr);
            if config.enable_interrupt {
                regs.enable_interrupts(INT_BREAK);
            }
        });
    }

    /// Configure a counter's external trigger input.
    ///
    /// Silently does nothing when the selected pin-switch variant has no
    /// trigger routing for this counter.
    pub fn configure_external_trigger(&mut self, counter: Counter, config: ExternalTriggerConfig) {
        if self.bank(counter).is_none() {
            return;
        }
        let Some(pin) = pins::trigger_pin(config.pin_switch, counter) else {
            return;
        };
        let _ = self.gpio.configure_pin(pin, PinMode::HighImpedance);

        let etr = (config.edge as u8) << ETR_ETP_SHIFT
            | (config.external_clock as u8) << ETR_ECE_SHIFT
            | (config.prescaler as u8) << ETR_ETPS_SHIFT
            | (config.filter & ETR_FILTER_MASK);
        let pin_switch = pins::clamp_pin_switch(config.pin_switch);

        critical_section::with(|_| {
            let Some(bank) = bank_for(&mut self.bank_a, &mut self.bank_b, &self.config, counter)
            else {
                return;
            };
            let mut regs = Registers(bank);
            regs.0
                .modify(Reg::Etrps, |v| (v & !ETRPS_ETR_MASK) | pin_switch);
            regs.0.write(Reg::Etr, etr);
            if config.enable_interrupt {
                regs.enable_interrupts(INT_TRIGGER);
            }
        });
    }

    /// Demultiplex a counter's interrupt.
    ///
    /// Call from the counter's interrupt vector. Reads the status register
    /// once, clears every flag found, and forwards at most one channel
    /// event and one counter event to `handler`. When several flags of the
    /// same kind are set at once, only the last one in fixed scan order is
    /// reported; the others are cleared without an event.
    pub fn on_interrupt<H: EventHandler>(&mut self, counter: Counter, handler: &mut H) {
        let usage = self.usage;
        let Some(bank) = bank_for(&mut self.bank_a, &mut self.bank_b, &self.config, counter) else {
            return;
        };
        let regs = Registers(bank);

        let status = regs.0.read(Reg::Sr1);
        let decoded = decode_status(status);
        if decoded.cleared != 0 {
            // The break flag is cleared here too, even though hardware may
            // keep it asserted while the fault input is still active.
            regs.0.modify(Reg::Sr1, |v| v & !decoded.cleared);
        }

        if let Some(local) = decoded.channel {
            if let Some(channel) = Channel::from_index(4 * counter.index() + local) {
                let (captured, counting_down) = if usage[channel.index()] == ChannelUsage::Capture {
                    (regs.capture_value(local), regs.counting_down())
                } else {
                    (0, false)
                };
                handler.on_channel_event(channel, captured, counting_down);
            }
        }

        if let Some(event) = decoded.event {
            handler.on_counter_event(counter, event);
        }
    }

    /// Borrow one channel as an `embedded-hal` PWM channel.
    pub fn channel(&mut self, channel: Channel) -> PwmChannel<'_, B, G> {
        PwmChannel { pwm: self, channel }
    }
}

struct DecodedStatus {
    channel: Option<usize>,
    event: Option<CounterEvent>,
    cleared: u8,
}

/// Split a status byte into at most one channel event and one counter
/// event, last match winning within each kind.
fn decode_status(status: u8) -> DecodedStatus {
    let mut decoded = DecodedStatus {
        channel: None,
        event: None,
        cleared: 0,
    };

    for local in 0..4 {
        let flag = int_channel(local);
        if status & flag != 0 {
            decoded.cleared |= flag;
            decoded.channel = Some(local);
        }
    }

    let events = [
        (INT_TRIGGER, CounterEvent::Trigger),
        (INT_COM, CounterEvent::Commutation),
        (INT_UPDATE, CounterEvent::Update),
        (INT_BREAK, CounterEvent::Fault),
    ];
    for (flag, event) in events {
        if status & flag != 0 {
            decoded.cleared |= flag;
            decoded.event = Some(event);
        }
    }

    decoded
}

/// One channel of an [`AdvancedPwm`], usable through
/// [`embedded_hal::pwm::SetDutyCycle`].
pub struct PwmChannel<'a, B, G> {
    pwm: &'a mut AdvancedPwm<B, G>,
    channel: Channel,
}

impl<B: RegisterBank, G: PinConfigurator> ErrorType for PwmChannel<'_, B, G> {
    type Error = Infallible;
}

impl<B: RegisterBank, G: PinConfigurator> SetDutyCycle for PwmChannel<'_, B, G> {
    fn max_duty_cycle(&self) -> u16 {
        self.pwm.periods[self.channel.counter().index()]
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.pwm.set_duty_cycle(self.channel, duty);
        Ok(())
    }
}

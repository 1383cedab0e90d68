//! Register encodings and counter arithmetic.
//!
//! The enums in this module carry their hardware field encodings as
//! discriminants, so assembling a control byte is a cast and a shift.

use crate::time::Hertz;

/// Timer counting mode.
///
/// Discriminants encode the DIR bit and the two CMS bits as one field.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CountingMode {
    /// The counter counts up to the reload value and then resets back to 0.
    #[default]
    EdgeAlignedUp = 0,
    /// The counter counts down to 0 and then resets back to the reload value.
    EdgeAlignedDown = 1,
    /// Counts up to the reload value and back down. The output compare
    /// interrupt flags of output channels are set while counting down.
    CenterAlignedDownInterrupts = 2,
    /// Counts up to the reload value and back down. The output compare
    /// interrupt flags of output channels are set while counting up.
    CenterAlignedUpInterrupts = 4,
    /// Counts up to the reload value and back down. The output compare
    /// interrupt flags of output channels are set in both directions.
    CenterAlignedBothInterrupts = 6,
}

impl CountingMode {
    /// Return whether this mode is edge-aligned (up or down).
    pub fn is_edge_aligned(&self) -> bool {
        matches!(self, CountingMode::EdgeAlignedUp | CountingMode::EdgeAlignedDown)
    }

    /// Return whether this mode is center-aligned.
    ///
    /// Center-aligned counters traverse the period twice per output cycle,
    /// so the reload value is halved to keep the requested signal
    /// frequency.
    pub fn is_center_aligned(&self) -> bool {
        matches!(
            self,
            CountingMode::CenterAlignedDownInterrupts
                | CountingMode::CenterAlignedUpInterrupts
                | CountingMode::CenterAlignedBothInterrupts
        )
    }
}

/// What drives the counter.
///
/// Discriminants encode the slave-mode selection field.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CounterMode {
    /// Internally clocked through the prescaler.
    #[default]
    InternalClock = 0,
    /// Count edges of the first paired input.
    EventCounter1 = 1,
    /// Count edges of the second paired input.
    EventCounter2 = 2,
    /// Quadrature decode on both paired inputs.
    QuadratureEncoder = 3,
    /// Clocked by the external trigger input.
    ExternalClock = 7,
}

impl CounterMode {
    /// Modes where the count advances on input edges rather than the
    /// prescaled system clock. The frequency arguments are reused as raw
    /// register values for these.
    pub fn is_event_driven(&self) -> bool {
        matches!(
            self,
            CounterMode::EventCounter1 | CounterMode::EventCounter2 | CounterMode::QuadratureEncoder
        )
    }
}

/// Trigger input selection for the slave-mode controller.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerSource {
    /// No trigger.
    #[default]
    None = 0,
    /// Edge detector on the first paired input.
    EdgeDetector = 4,
    /// Filtered first paired input.
    FilteredInput1 = 5,
    /// Filtered second paired input.
    FilteredInput2 = 6,
    /// External trigger pin.
    ExternalTrigger = 7,
}

/// When configuration registers take effect.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterUpdate {
    /// Writes take effect immediately.
    #[default]
    Immediate = 0,
    /// Writes are buffered and applied at the next update event.
    Buffered = 1,
}

/// One-shot or continuous counting.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunMode {
    /// Keep counting after each period.
    #[default]
    Continuous = 0,
    /// Stop at the end of the current period.
    OneShot = 1,
}

/// Update event generation policy.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UpdateEvents {
    /// Update events are generated and their interrupt unmasked.
    #[default]
    Enabled = 0,
    /// No update events at all.
    Disabled = 1,
}

/// Output compare modes used by this driver.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCompareMode {
    /// Compare match has no effect on the output.
    Frozen = 0,
    /// Output forced to the inactive level.
    ForceInactive = 4,
    /// Output forced to the active level.
    ForceActive = 5,
    /// Waveform starts at the active level.
    PwmMode1 = 6,
    /// Waveform starts at the inactive level.
    PwmMode2 = 7,
}

/// Output or capture polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Active high output, or capture on rising edge.
    #[default]
    ActiveHigh,
    /// Active low output, or capture on falling edge.
    ActiveLow,
}

impl From<Polarity> for bool {
    fn from(polarity: Polarity) -> Self {
        match polarity {
            Polarity::ActiveHigh => false,
            Polarity::ActiveLow => true,
        }
    }
}

/// Capture input selection for a channel.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CaptureSource {
    /// The channel's own pin.
    #[default]
    SamePin = 1,
    /// The paired channel's pin.
    AlternatePin = 2,
    /// The slave-mode trigger.
    TriggerInput = 3,
}

/// Which outputs of a channel to configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputSelection {
    /// Primary output only.
    #[default]
    Primary,
    /// Complementary output only.
    Complementary,
    /// Both outputs.
    Both,
}

impl OutputSelection {
    pub(crate) fn primary(&self) -> bool {
        matches!(self, OutputSelection::Primary | OutputSelection::Both)
    }

    pub(crate) fn complementary(&self) -> bool {
        matches!(self, OutputSelection::Complementary | OutputSelection::Both)
    }
}

/// A constant output level.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputLevel {
    /// Logic low.
    #[default]
    Low = 0,
    /// Logic high.
    High = 1,
}

/// What asserts the fault (break) input.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultTrigger {
    /// The dedicated fault pin.
    #[default]
    Pin = 0,
    /// The on-chip comparator output.
    Comparator = 1,
}

/// What the outputs do while fault protection holds them off.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultResponse {
    /// Outputs float.
    #[default]
    HighImpedance = 0,
    /// Outputs drive their configured idle level.
    IdleLevel = 1,
}

/// How PWM output resumes after the fault condition clears.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultResume {
    /// Software must re-enable the main output.
    #[default]
    Manual = 0,
    /// The main output re-arms at the next update event.
    Automatic = 1,
}

/// Active edge of the external trigger input.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerEdge {
    /// Rising edge.
    #[default]
    Rising = 0,
    /// Falling edge.
    Falling = 1,
}

/// External trigger prescaler.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerPrescaler {
    /// Every edge.
    #[default]
    Div1 = 0,
    /// Every second edge.
    Div2 = 1,
    /// Every fourth edge.
    Div4 = 2,
    /// Every eighth edge.
    Div8 = 3,
}

/// Compute the hardware prescaler and reload values for a counter.
///
/// For the internally clocked modes the prescaler divides `sysclk` down to
/// `counter_freq` and the reload divides that down to `signal_freq`. The
/// event-driven modes take the reload directly from `signal_freq`, and
/// external clock mode additionally takes the prescaler directly from
/// `counter_freq` (both truncated to 16 bits).
///
/// Returns the register values, biased by one for the hardware's zero
/// based counting. The achieved period in counter ticks is the returned
/// reload value plus one, which can differ from the request because of
/// integer division.
pub(crate) fn compute_counter_values(
    sysclk: Hertz,
    counter_freq: Hertz,
    signal_freq: Hertz,
    mode: CounterMode,
    direction: CountingMode,
) -> (u16, u16) {
    let mut prescaler: u16 = match mode {
        _ if mode.is_event_driven() => 0,
        CounterMode::ExternalClock => counter_freq.0 as u16,
        _ => {
            assert!(counter_freq.0 > 0);
            (sysclk.0 / counter_freq.0) as u16
        }
    };

    if prescaler != 0 {
        prescaler -= 1;
    }

    let mut reload: u16 = if mode.is_event_driven() || mode == CounterMode::ExternalClock {
        signal_freq.0 as u16
    } else {
        assert!(signal_freq.0 > 0);
        (counter_freq.0 / signal_freq.0) as u16
    };

    // A center-aligned counter traverses the period twice per output
    // cycle, so it must count twice as fast for the same signal frequency.
    if direction.is_center_aligned() {
        reload >>= 1;
    }

    if reload != 0 {
        reload -= 1;
    }

    (prescaler, reload)
}

/// Encode a dead time in prescaler input clock pulses into the dead-time
/// register's piecewise format.
///
/// Resolution degrades over four ranges: 1 pulse up to 127, 2 pulses up to
/// 254, 8 pulses up to 504, 16 pulses up to 1008. Longer requests saturate
/// at the maximum supported dead time.
pub fn dead_time_bits(clock_pulses: u16) -> u8 {
    if clock_pulses < 128 {
        clock_pulses as u8
    } else if clock_pulses < 255 {
        ((clock_pulses >> 1) - 64) as u8 | 0x80
    } else if clock_pulses < 505 {
        ((clock_pulses >> 3).wrapping_sub(32)) as u8 | 0xc0
    } else if clock_pulses < 1009 {
        ((clock_pulses >> 4).wrapping_sub(32)) as u8 | 0xe0
    } else {
        0xff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Hertz;

    #[test]
    fn dead_time_single_pulse_range() {
        assert_eq!(dead_time_bits(0), 0);
        assert_eq!(dead_time_bits(100), 100);
        assert_eq!(dead_time_bits(127), 127);
    }

    #[test]
    fn dead_time_double_pulse_range() {
        assert_eq!(dead_time_bits(128), 0x80);
        assert_eq!(dead_time_bits(200), 164);
        assert_eq!(dead_time_bits(254), 0xbf);
    }

    #[test]
    fn dead_time_coarse_ranges() {
        assert_eq!(dead_time_bits(256), 0xc0);
        assert_eq!(dead_time_bits(504), 0xdf);
        assert_eq!(dead_time_bits(512), 0xe0);
        assert_eq!(dead_time_bits(1008), 0xff);
    }

    #[test]
    fn dead_time_saturates() {
        assert_eq!(dead_time_bits(1009), 0xff);
        assert_eq!(dead_time_bits(2000), 0xff);
        assert_eq!(dead_time_bits(u16::MAX), 0xff);
    }

    #[test]
    fn edge_aligned_period_is_the_frequency_ratio() {
        let (prescaler, reload) = compute_counter_values(
            Hertz::mhz(24),
            Hertz::hz(10_000),
            Hertz::hz(1_000),
            CounterMode::InternalClock,
            CountingMode::EdgeAlignedUp,
        );
        assert_eq!(prescaler, 2399);
        assert_eq!(reload, 9);
        assert_eq!(reload + 1, 10);
    }

    #[test]
    fn center_aligned_period_is_halved() {
        let (_, reload) = compute_counter_values(
            Hertz::mhz(24),
            Hertz::hz(10_000),
            Hertz::hz(1_000),
            CounterMode::InternalClock,
            CountingMode::CenterAlignedBothInterrupts,
        );
        assert_eq!(reload + 1, 5);
    }

    #[test]
    fn event_driven_modes_take_the_reload_raw() {
        let (prescaler, reload) = compute_counter_values(
            Hertz::mhz(24),
            Hertz::hz(0),
            Hertz::hz(0xffff),
            CounterMode::QuadratureEncoder,
            CountingMode::EdgeAlignedUp,
        );
        assert_eq!(prescaler, 0);
        assert_eq!(reload, 0xfffe);
    }

    #[test]
    fn external_clock_takes_the_prescaler_raw() {
        let (prescaler, reload) = compute_counter_values(
            Hertz::mhz(24),
            Hertz::hz(8),
            Hertz::hz(100),
            CounterMode::ExternalClock,
            CountingMode::EdgeAlignedUp,
        );
        assert_eq!(prescaler, 7);
        assert_eq!(reload, 99);
    }

    #[test]
    fn zero_values_stay_unbiased() {
        let (prescaler, reload) = compute_counter_values(
            Hertz::mhz(24),
            Hertz::mhz(24),
            Hertz::mhz(24),
            CounterMode::InternalClock,
            CountingMode::EdgeAlignedUp,
        );
        // 24 MHz / 24 MHz gives 1, biased to 0; a ratio of 1 likewise.
        assert_eq!(prescaler, 0);
        assert_eq!(reload, 0);
    }
}

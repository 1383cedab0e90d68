//! Alternate pin routing tables.
//!
//! Each channel output, the external trigger input, and the fault input
//! can be routed to a small set of physical pins, selected per channel by
//! a two-bit pin-switch field. The tables below are fixed per chip family;
//! `0xff` marks a combination with no routing.
//!
//! Rows are pin-switch variants. Variant indices at or above
//! [`PIN_SWITCH_MAX`] select variant 0, they are not errors.

use super::low_level::FaultTrigger;
use super::{Channel, ChipConfig, Counter};
use crate::gpio::PinId;

/// Table code for "no routing under this variant".
pub const UNSUPPORTED: u8 = 0xff;

/// Number of selectable pin-switch variants.
pub const PIN_SWITCH_MAX: u8 = 3;

/// Channel output routing. Columns 0..7 interleave the primary and
/// complementary pins of counter A's channels; columns 8..11 are counter
/// B's primary pins. The last row is a reserved default, unreachable
/// through the variant clamp.
static CHANNEL_PINS: [[u8; 12]; 4] = [
    [
        0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x20, 0x21, 0x22, 0x23,
    ],
    [
        0x20, 0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x17, 0x54, 0x33, 0x34,
    ],
    [
        0x60, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0x00, 0x01, 0x02, 0x03,
    ],
    [
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x34, 0x33, 0x74, 0x75, 0x76, 0x77,
    ],
];

/// External trigger input routing, one column per counter.
static TRIGGER_PINS: [[u8; 2]; 4] = [[0x32, 0x32], [0x41, 0x06], [0x73, 0xff], [0xff, 0xff]];

/// Fault input routing, rows keyed by trigger source. The comparator row
/// holds a code outside the GPIO range on purpose: the comparator output
/// needs no pin configuration, and the out-of-range code makes the pin
/// configurator refuse it.
static FAULT_PINS: [[u8; 2]; 2] = [[0x35, 0x35], [0x99, 0x99]];

pub(crate) fn clamp_pin_switch(pin_switch: u8) -> u8 {
    if pin_switch >= PIN_SWITCH_MAX {
        0
    } else {
        pin_switch
    }
}

/// Resolve the physical pin of a channel's primary or complementary
/// output under a pin-switch variant.
///
/// Counter B channels have no complementary output and must not be
/// queried for one.
pub fn channel_pin(
    config: &ChipConfig,
    channel: Channel,
    pin_switch: u8,
    complementary: bool,
) -> Option<PinId> {
    debug_assert!(!complementary || channel.has_complementary());

    let row = clamp_pin_switch(pin_switch) as usize;
    let index = channel.index();
    let column = if index < 4 {
        2 * index + complementary as usize
    } else {
        8 + (index - 4)
    };

    let mut code = CHANNEL_PINS[row][column];
    // Packages without P1.2 route the channel 2 primary to P5.4.
    if code == 0x12 && !config.has_p12 {
        code = 0x54;
    }

    (code != UNSUPPORTED).then(|| PinId::from_code(code))
}

/// Resolve the external trigger input pin of a counter under a pin-switch
/// variant.
pub fn trigger_pin(pin_switch: u8, counter: Counter) -> Option<PinId> {
    let code = TRIGGER_PINS[clamp_pin_switch(pin_switch) as usize][counter.index()];
    (code != UNSUPPORTED).then(|| PinId::from_code(code))
}

/// Resolve the fault input pin of a counter for a fault trigger source.
pub fn fault_pin(trigger: FaultTrigger, counter: Counter) -> PinId {
    PinId::from_code(FAULT_PINS[trigger as usize][counter.index()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Hertz;
    use crate::timer::ChannelCount;

    fn config() -> ChipConfig {
        ChipConfig::new(Hertz::mhz(24), ChannelCount::Eight)
    }

    #[test]
    fn out_of_range_variant_falls_back_to_default() {
        let cfg = config();
        for variant in 3..=16u8 {
            for index in 0..8 {
                let channel = Channel::from_index(index).unwrap();
                assert_eq!(
                    channel_pin(&cfg, channel, variant, false),
                    channel_pin(&cfg, channel, 0, false),
                );
            }
        }
    }

    #[test]
    fn counter_a_channels_interleave_primary_and_complementary() {
        let cfg = config();
        assert_eq!(
            channel_pin(&cfg, Channel::Ch1, 0, false),
            Some(PinId::new(1, 0))
        );
        assert_eq!(
            channel_pin(&cfg, Channel::Ch1, 0, true),
            Some(PinId::new(1, 1))
        );
        assert_eq!(
            channel_pin(&cfg, Channel::Ch4, 0, false),
            Some(PinId::new(1, 6))
        );
        assert_eq!(
            channel_pin(&cfg, Channel::Ch4, 0, true),
            Some(PinId::new(1, 7))
        );
    }

    #[test]
    fn counter_b_channels_use_the_trailing_columns() {
        let cfg = config();
        assert_eq!(
            channel_pin(&cfg, Channel::Ch5, 0, false),
            Some(PinId::new(2, 0))
        );
        assert_eq!(
            channel_pin(&cfg, Channel::Ch8, 0, false),
            Some(PinId::new(2, 3))
        );
        assert_eq!(
            channel_pin(&cfg, Channel::Ch6, 1, false),
            Some(PinId::new(5, 4))
        );
    }

    #[test]
    fn missing_p12_reroutes_channel_2_primary() {
        let mut cfg = config();
        cfg.has_p12 = false;
        assert_eq!(
            channel_pin(&cfg, Channel::Ch2, 0, false),
            Some(PinId::new(5, 4))
        );
        // Other cells are unaffected.
        assert_eq!(
            channel_pin(&cfg, Channel::Ch2, 1, false),
            Some(PinId::new(2, 2))
        );
    }

    #[test]
    fn trigger_pin_reports_unsupported_combinations() {
        assert_eq!(trigger_pin(0, Counter::A), Some(PinId::new(3, 2)));
        assert_eq!(trigger_pin(1, Counter::B), Some(PinId::new(0, 6)));
        assert_eq!(trigger_pin(2, Counter::B), None);
        // Clamped back to variant 0.
        assert_eq!(trigger_pin(7, Counter::B), Some(PinId::new(3, 2)));
    }

    #[test]
    fn comparator_fault_source_is_not_a_configurable_pin() {
        let pin = fault_pin(FaultTrigger::Comparator, Counter::A);
        assert!(!pin.is_valid());
        let pin = fault_pin(FaultTrigger::Pin, Counter::B);
        assert_eq!(pin, PinId::new(3, 5));
        assert!(pin.is_valid());
    }
}

//! Advanced 16-bit PWM/timer driver for STC's STC8H family of 8-bit
//! microcontrollers.
//!
//! The advanced PWM peripheral pairs two 16-bit counter groups with up to
//! eight compare/capture channels: complementary PWM outputs with
//! dead-time insertion and fault (break) protection, input capture,
//! quadrature decoding, and external trigger/clock inputs.
//!
//! The driver is environment independent. Register access, pin
//! configuration, and the interrupt vector binding are injected:
//!
//! - [`timer::regs::RegisterBank`] gives the driver byte-wide access to
//!   one counter group's registers. On hardware this is a thin wrapper
//!   over the extended SFR area; on the host it can be a plain array,
//!   which is how this crate tests itself.
//! - [`gpio::PinConfigurator`] applies an electrical mode to a physical
//!   pin. The driver resolves which pin a channel is routed to (per chip
//!   package and pin-switch variant) and delegates the rest.
//! - [`timer::EventHandler`] receives the demultiplexed channel and
//!   counter events. The application's interrupt vectors call
//!   [`timer::AdvancedPwm::on_interrupt`] with the owning counter.
//!
//! Chip variants differ in channel count and pinout; a
//! [`timer::ChipConfig`] selected at construction describes the part in
//! use, there is no per-chip conditional compilation.
//!
//! Configuration calls are deliberately fire and forget, mirroring the
//! peripheral's nature: requests that cannot be satisfied on the selected
//! routing skip their effect silently, and partial success is possible
//! where a channel drives two pins.
#![cfg_attr(not(test), no_std)]

pub mod gpio;
pub mod time;
pub mod timer;

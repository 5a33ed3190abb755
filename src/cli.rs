/*
 * SPDX-License-Identifier: Apache-2.0
 *
 * Copyright The Asahi Linux Contributors
 */

use crate::{Error, Result};
use clap::{value_parser, ArgMatches, Command};
use std::path::PathBuf;

pub(crate) const DEFAULT_BUS: u32 = 3;
pub(crate) const DEFAULT_ADDRESS: u16 = 0x38;

/// Which bus the controller sits on and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Session {
    pub(crate) bus: u32,
    pub(crate) address: u16,
}

impl Session {
    pub(crate) fn device_path(&self) -> PathBuf {
        PathBuf::from(format!("/dev/i2c-{}", self.bus))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Read { register: u8 },
    Write { register: u8, value: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Args {
    pub(crate) session: Session,
    pub(crate) read: Option<u8>,
    pub(crate) write: Option<u8>,
    pub(crate) value: Option<u8>,
}

impl Args {
    pub(crate) fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            session: Session {
                bus: matches.get_one::<u32>("bus").copied().unwrap_or(DEFAULT_BUS),
                address: matches
                    .get_one::<u16>("address")
                    .copied()
                    .unwrap_or(DEFAULT_ADDRESS),
            },
            read: matches.get_one::<u8>("read").copied(),
            write: matches.get_one::<u8>("write").copied(),
            value: matches.get_one::<u8>("value").copied(),
        }
    }

    /// Resolves the request into at most one operation. `Ok(None)` means
    /// nothing was asked for.
    pub(crate) fn operation(&self) -> Result<Option<Operation>> {
        match (self.read, self.write, self.value) {
            (Some(_), Some(_), _) => Err(Error::Rejected("Received both read and write")),
            (_, None, Some(_)) => Err(Error::Rejected("Didn't receive write address")),
            (_, Some(_), None) => Err(Error::Rejected("Didn't receive write value")),
            (Some(register), None, None) => Ok(Some(Operation::Read { register })),
            (None, Some(register), Some(value)) => Ok(Some(Operation::Write { register, value })),
            (None, None, None) => Ok(None),
        }
    }
}

fn strip_hex(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

fn parse_hex_u8(s: &str) -> std::result::Result<u8, String> {
    u8::from_str_radix(strip_hex(s), 16).map_err(|e| format!("\"{s}\" is not a hex byte: {e}"))
}

fn parse_target_address(s: &str) -> std::result::Result<u16, String> {
    let addr = u16::from_str_radix(strip_hex(s), 16)
        .map_err(|e| format!("\"{s}\" is not a hex address: {e}"))?;
    if addr > 0x7f {
        return Err(format!("{addr:#04x} is not a 7-bit address"));
    }
    Ok(addr)
}

pub(crate) fn command() -> Command {
    clap::command!()
        .about("FT5x06 touch controller register tool")
        .arg(
            clap::arg!(-a --address [ADDRESS] "I2C address of the FT5x06 controller (hex).")
                .value_parser(parse_target_address)
                .default_value("0x38"),
        )
        .arg(
            clap::arg!(-b --bus [BUS] "I2C bus the FT5x06 controller is on.")
                .value_parser(value_parser!(u32))
                .default_value("3"),
        )
        .arg(clap::arg!(-r --read <REGISTER> "Address to read from (hex).").value_parser(parse_hex_u8))
        .arg(clap::arg!(-w --write <REGISTER> "Address to write to (hex).").value_parser(parse_hex_u8))
        .arg(clap::arg!(-v --value <VALUE> "Value to write (hex).").value_parser(parse_hex_u8))
}

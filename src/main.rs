/*
 * SPDX-License-Identifier: Apache-2.0
 *
 * Copyright The Asahi Linux Contributors
 */


#![cfg_attr(not(any(target_os = "linux", target_os = "android")), allow(dead_code, unused_imports))]
#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn main() {
    eprintln!("ft5x06-tool currently supports Linux only.");
}

pub mod cli;
pub mod ft5x06;
pub mod transport;

use cli::{Args, Operation};
use env_logger::Env;
use log::error;
use std::{
    io::{self, Write},
    process::ExitCode,
};
use transport::{i2c::I2cTransport, Transport};

#[derive(Debug)]
#[allow(dead_code)]
enum Error {
    Usage,
    FeatureMissing,
    DeviceOpen(io::Error),
    Bind(io::Error),
    Transaction(io::Error),
    Rejected(&'static str),
    Io(io::Error),
}

type Result<T> = std::result::Result<T, Error>;

/// Performs the requested operation over `transport`, then releases it.
///
/// Rejected requests and failed transactions are logged where they are
/// detected and do not fail the run.
fn run<T: Transport, W: Write>(mut transport: T, args: &Args, out: &mut W) -> Result<()> {
    let op = match args.operation() {
        Ok(op) => op,
        Err(Error::Rejected(reason)) => {
            error!("{reason}");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let mut device = ft5x06::Device::new(&mut transport);
    let res = match op {
        Some(Operation::Read { register }) => device
            .read_register(register)
            .and_then(|value| writeln!(out, "{value:02x}").map_err(Error::Io)),
        Some(Operation::Write { register, value }) => device
            .write_register(register, value)
            .and_then(|_| writeln!(out, "{register:02x} = {value:02x}").map_err(Error::Io)),
        None => Ok(()),
    };

    match res {
        Err(Error::Transaction(_)) => Ok(()),
        res => res,
    }
}

fn ft5x06tool() -> Result<()> {
    let matches = cli::command().try_get_matches().map_err(|e| {
        let _ = e.print();
        Error::Usage
    })?;
    let args = Args::from_matches(&matches);

    let transport = I2cTransport::open(&args.session)?;
    run(transport, &args, &mut io::stdout().lock())
}

/// Maps the outcome to a process status. Usage, open and bind failures were
/// already reported where they happened.
fn exit_status(res: &Result<()>) -> u8 {
    match res {
        Ok(_) => 0,
        Err(Error::Usage | Error::DeviceOpen(_) | Error::Bind(_)) => 1,
        Err(e) => {
            error!("ft5x06tool: {:?}", e);
            1
        }
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    ExitCode::from(exit_status(&ft5x06tool()))
}

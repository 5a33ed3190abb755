/*
 * SPDX-License-Identifier: Apache-2.0
 *
 * Copyright The Asahi Linux Contributors
 */

use crate::cli::Session;
use crate::transport::{Transaction, Transport};
use crate::{Error, Result};
use std::io;

use crate::transport::Message;
#[cfg(any(target_os = "linux", target_os = "android"))]
use i2cdev::{
    core::{I2CMessage, I2CTransfer},
    linux::{LinuxI2CDevice, LinuxI2CMessage},
};
#[cfg(any(target_os = "linux", target_os = "android"))]
use log::{debug, error, info};
#[cfg(any(target_os = "linux", target_os = "android"))]
use std::{fs::OpenOptions, path::Path};

/// An i2c-dev node bound to one target address. Dropping it closes the node.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) struct I2cTransport {
    dev: LinuxI2CDevice,
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn bind_i2c(path: &Path, addr: u16) -> Result<LinuxI2CDevice> {
    match LinuxI2CDevice::new(path, addr) {
        Ok(dev) => return Ok(dev),
        Err(e) => info!("Safely binding {addr:#04x} failed ({e}) ==> Forcefully binding device..."),
    }
    unsafe { LinuxI2CDevice::force_new(path, addr) }.map_err(|e| {
        let e = io::Error::from(e);
        error!("Couldn't set slave addr: {e}");
        Error::Bind(e)
    })
}

#[cfg(any(target_os = "linux", target_os = "android"))]
impl I2cTransport {
    pub(crate) fn open(session: &Session) -> Result<Self> {
        let path = session.device_path();

        // i2cdev opens and binds in one call; open the node on its own first so
        // a missing or unreadable device is not reported as a bind failure.
        debug!("Opening {}", path.display());
        let node = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| {
                error!("Couldn't open {}: {e}", path.display());
                Error::DeviceOpen(e)
            })?;
        // Closed right away, i2cdev opens its own descriptor.
        drop(node);

        debug!("Setting addr to {:#04x}", session.address);
        Ok(Self {
            dev: bind_i2c(&path, session.address)?,
        })
    }
}

/// One zeroed buffer per read message, in message order.
fn read_buffers(transaction: &Transaction) -> Vec<Vec<u8>> {
    transaction
        .messages()
        .iter()
        .filter_map(|m| match m {
            Message::Read(len) => Some(vec![0u8; *len]),
            Message::Write(_) => None,
        })
        .collect()
}

fn join_reads(transaction: &Transaction, reads: Vec<Vec<u8>>) -> Vec<u8> {
    let mut reply = Vec::with_capacity(transaction.read_len());
    for buf in reads {
        reply.extend_from_slice(&buf);
    }
    reply
}

#[cfg(any(target_os = "linux", target_os = "android"))]
impl Transport for I2cTransport {
    fn execute(&mut self, transaction: &Transaction) -> io::Result<Vec<u8>> {
        let mut reads = read_buffers(transaction);

        {
            let mut read_bufs = reads.iter_mut();
            let mut msgs: Vec<LinuxI2CMessage> = Vec::with_capacity(transaction.messages().len());
            for m in transaction.messages() {
                match m {
                    Message::Write(data) => msgs.push(LinuxI2CMessage::write(data)),
                    Message::Read(_) => {
                        if let Some(buf) = read_bufs.next() {
                            msgs.push(LinuxI2CMessage::read(buf));
                        }
                    }
                }
            }
            self.dev.transfer(&mut msgs).map_err(io::Error::from)?;
        }

        Ok(join_reads(transaction, reads))
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub(crate) struct I2cTransport;

#[cfg(not(any(target_os = "linux", target_os = "android")))]
impl I2cTransport {
    pub(crate) fn open(_session: &Session) -> Result<Self> {
        Err(Error::FeatureMissing)
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
impl Transport for I2cTransport {
    fn execute(&mut self, _transaction: &Transaction) -> io::Result<Vec<u8>> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "i2c transport is linux-only"))
    }
}

/*
 * SPDX-License-Identifier: Apache-2.0
 *
 * Copyright The Asahi Linux Contributors
 */

use crate::transport::{Transaction, Transport};
use crate::{Error, Result};
use log::error;
use std::io;

fn transaction_error(e: io::Error) -> Error {
    match e.raw_os_error() {
        Some(code) => error!("Error {code}: {e}"),
        None => error!("Error: {e}"),
    }
    Error::Transaction(e)
}

/// Register access to an FT5x06 controller behind a bound transport.
pub(crate) struct Device<'a> {
    transport: &'a mut dyn Transport,
}

impl<'a> Device<'a> {
    pub(crate) fn new(transport: &'a mut dyn Transport) -> Self {
        Self { transport }
    }

    /// Selects `reg` and reads it back within one combined transaction, so no
    /// other master can get between the address write and the data read.
    pub(crate) fn read_register(&mut self, reg: u8) -> Result<u8> {
        let reply = self
            .transport
            .execute(&Transaction::write_read(&[reg], 1))
            .map_err(transaction_error)?;

        match reply.as_slice() {
            [value] => Ok(*value),
            _ => Err(transaction_error(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("read_register: expected 1 byte, got {}", reply.len()),
            ))),
        }
    }

    pub(crate) fn write_register(&mut self, reg: u8, value: u8) -> Result<()> {
        self.transport
            .execute(&Transaction::write(&[reg, value]))
            .map_err(transaction_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{mock::MockTransport, Message};

    // What i2c-dev reports when the target does not ack.
    const EREMOTEIO: i32 = 121;

    #[test]
    fn read_is_one_combined_transaction() {
        for reg in 0..=u8::MAX {
            let (mut transport, seen) = MockTransport::replying(&[reg.wrapping_mul(7)]);
            let value = Device::new(&mut transport).read_register(reg).unwrap();

            assert_eq!(value, reg.wrapping_mul(7));
            assert_eq!(
                seen.transactions(),
                vec![Transaction::write_read(&[reg], 1)]
            );
            assert_eq!(
                seen.transactions()[0].messages(),
                &[Message::Write(vec![reg]), Message::Read(1)]
            );
        }
    }

    #[test]
    fn write_sends_register_then_value() {
        let (mut transport, seen) = MockTransport::replying(&[]);
        let mut device = Device::new(&mut transport);
        device.write_register(0x86, 0x08).unwrap();
        device.write_register(0x00, 0xff).unwrap();

        assert_eq!(
            seen
                .transactions()
                .iter()
                .map(|t| t.messages().to_vec())
                .collect::<Vec<_>>(),
            vec![
                vec![Message::Write(vec![0x86, 0x08])],
                vec![Message::Write(vec![0x00, 0xff])],
            ]
        );
    }

    #[test]
    fn failed_read_is_an_error_not_a_value() {
        let (mut transport, seen) = MockTransport::failing(EREMOTEIO);
        let err = Device::new(&mut transport).read_register(0xa6).unwrap_err();

        assert!(matches!(err, Error::Transaction(ref e) if e.raw_os_error() == Some(EREMOTEIO)));
        assert_eq!(seen.transactions().len(), 1);
    }

    #[test]
    fn short_read_is_an_error() {
        let (mut transport, _seen) = MockTransport::replying(&[]);
        let err = Device::new(&mut transport).read_register(0xa6).unwrap_err();

        assert!(
            matches!(err, Error::Transaction(ref e) if e.kind() == io::ErrorKind::UnexpectedEof)
        );
    }

    #[test]
    fn failed_write_is_reported() {
        let (mut transport, _seen) = MockTransport::failing(EREMOTEIO);
        assert!(matches!(
            Device::new(&mut transport).write_register(0x86, 0x08),
            Err(Error::Transaction(_))
        ));
    }
}

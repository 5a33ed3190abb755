use super::{Transaction, Transport};
use std::{
    cell::{Cell, RefCell},
    io,
    rc::Rc,
};

/// What the test can observe after the transport has been moved away.
#[derive(Clone, Default)]
pub(crate) struct Recording {
    transactions: Rc<RefCell<Vec<Transaction>>>,
    drops: Rc<Cell<usize>>,
}

impl Recording {
    pub(crate) fn transactions(&self) -> Vec<Transaction> {
        self.transactions.borrow().clone()
    }

    pub(crate) fn drops(&self) -> usize {
        self.drops.get()
    }
}

pub(crate) struct MockTransport {
    seen: Recording,
    reply: Vec<u8>,
    errno: Option<i32>,
}

impl MockTransport {
    /// Answers every read with bytes taken from `reply`.
    pub(crate) fn replying(reply: &[u8]) -> (Self, Recording) {
        let seen = Recording::default();
        let transport = Self {
            seen: seen.clone(),
            reply: reply.to_vec(),
            errno: None,
        };
        (transport, seen)
    }

    /// Fails every transaction with the given errno.
    pub(crate) fn failing(errno: i32) -> (Self, Recording) {
        let (mut transport, seen) = Self::replying(&[]);
        transport.errno = Some(errno);
        (transport, seen)
    }
}

impl Transport for MockTransport {
    fn execute(&mut self, transaction: &Transaction) -> io::Result<Vec<u8>> {
        self.seen
            .transactions
            .borrow_mut()
            .push(transaction.clone());

        if let Some(errno) = self.errno {
            return Err(io::Error::from_raw_os_error(errno));
        }
        Ok(self
            .reply
            .iter()
            .copied()
            .take(transaction.read_len())
            .collect())
    }
}

impl Drop for MockTransport {
    fn drop(&mut self) {
        self.seen.drops.set(self.seen.drops.get() + 1);
    }
}

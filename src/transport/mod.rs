pub mod i2c;

#[cfg(test)]
pub(crate) mod mock;

/// One leg of a bus transaction, addressed to the bound target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Write(Vec<u8>),
    Read(usize),
}

/// Messages issued back to back as a single bus operation, with repeated
/// starts between them instead of a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    messages: Vec<Message>,
}

impl Transaction {
    pub fn write(data: &[u8]) -> Self {
        Self {
            messages: vec![Message::Write(data.to_vec())],
        }
    }

    pub fn write_read(data: &[u8], len: usize) -> Self {
        Self {
            messages: vec![Message::Write(data.to_vec()), Message::Read(len)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Total number of bytes the read messages expect back.
    pub fn read_len(&self) -> usize {
        self.messages
            .iter()
            .map(|m| match m {
                Message::Read(len) => *len,
                Message::Write(_) => 0,
            })
            .sum()
    }
}

pub trait Transport {
    /// Runs `transaction` atomically and returns the bytes of its read
    /// messages, concatenated in order.
    fn execute(&mut self, transaction: &Transaction) -> std::io::Result<Vec<u8>>;
}

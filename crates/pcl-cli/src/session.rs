//! Interactive product collection.
//!
//! [`Collector`] is a plain state machine over input lines; [`run_session`]
//! drives it against a reader/writer pair and submits assembled records to
//! the ledger.

use std::io::{BufRead, Write};

use anyhow::bail;
use pcl_ledger::LedgerWriter;
use pcl_types::Record;
use tracing::info;

pub const NAME_FIELD: &str = "productName";
pub const DESCRIPTION_FIELD: &str = "description";
pub const PRICE_FIELD: &str = "price";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prompt {
    AwaitKey,
    AwaitName,
    AwaitDescription,
    AwaitPrice,
    Confirm,
}

impl Prompt {
    pub fn text(self) -> &'static str {
        match self {
            Self::AwaitKey => "Enter Product ID: ",
            Self::AwaitName => "Enter Product Name: ",
            Self::AwaitDescription => "Enter Product Description: ",
            Self::AwaitPrice => "Enter Product Price: ",
            Self::Confirm => {
                "Add another product (1/yes), generate a receipt (2), or finish (no)? "
            }
        }
    }
}

/// How the user chose to end the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ending {
    PrintChain,
    Receipt,
}

#[derive(Debug, PartialEq)]
pub enum Event {
    /// Input accepted; ask the next prompt.
    Next,
    /// Input rejected; ask the same prompt again.
    Retry(String),
    /// A full record is assembled and should be submitted.
    Ready(Record),
    Done(Ending),
}

pub struct Collector {
    key_field: String,
    state: Prompt,
    key: String,
    name: String,
    description: String,
}

impl Collector {
    pub fn new(key_field: impl Into<String>) -> Self {
        Self {
            key_field: key_field.into(),
            state: Prompt::AwaitKey,
            key: String::new(),
            name: String::new(),
            description: String::new(),
        }
    }

    pub fn state(&self) -> Prompt {
        self.state
    }

    pub fn feed(&mut self, line: &str) -> Event {
        let input = line.trim();
        match self.state {
            Prompt::AwaitKey => {
                self.key = input.to_string();
                self.state = Prompt::AwaitName;
                Event::Next
            }
            Prompt::AwaitName => {
                self.name = input.to_string();
                self.state = Prompt::AwaitDescription;
                Event::Next
            }
            Prompt::AwaitDescription => {
                self.description = input.to_string();
                self.state = Prompt::AwaitPrice;
                Event::Next
            }
            Prompt::AwaitPrice => {
                let Ok(price) = input.trim_start_matches('$').parse::<f64>() else {
                    return Event::Retry(format!("{input:?} is not a valid price"));
                };
                self.state = Prompt::Confirm;
                Event::Ready(
                    Record::new()
                        .with(self.key_field.as_str(), std::mem::take(&mut self.key))
                        .with(NAME_FIELD, std::mem::take(&mut self.name))
                        .with(DESCRIPTION_FIELD, std::mem::take(&mut self.description))
                        .with(PRICE_FIELD, price),
                )
            }
            Prompt::Confirm => match input.to_ascii_lowercase().as_str() {
                "1" | "y" | "yes" => {
                    self.state = Prompt::AwaitKey;
                    Event::Next
                }
                "2" => Event::Done(Ending::Receipt),
                "n" | "no" => Event::Done(Ending::PrintChain),
                _ => Event::Retry("Invalid choice.".into()),
            },
        }
    }
}

/// Run a full session. Rejected submissions are reported and the session
/// continues; input ending before the user finishes is an error.
pub fn run_session<L, R, W>(
    ledger: &L,
    key_field: &str,
    mut input: R,
    mut output: W,
) -> anyhow::Result<Ending>
where
    L: LedgerWriter,
    R: BufRead,
    W: Write,
{
    let mut collector = Collector::new(key_field);
    let mut line = String::new();

    loop {
        write!(output, "{}", collector.state().text())?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            bail!("input ended while waiting for: {}", collector.state().text().trim());
        }

        match collector.feed(&line) {
            Event::Next => {}
            Event::Retry(message) => writeln!(output, "{message}")?,
            Event::Ready(record) => match ledger.submit(record) {
                Ok(block) => {
                    info!(index = block.index, "product added");
                    writeln!(
                        output,
                        "New block added: {}",
                        serde_json::to_string_pretty(&block)?
                    )?;
                }
                Err(err) => writeln!(output, "Error: {err}")?,
            },
            Event::Done(ending) => return Ok(ending),
        }
    }
}

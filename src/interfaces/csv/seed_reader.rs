use crate::error::{PaymentError, Result};
use serde::de::DeserializeOwned;
use std::io::Read;

/// Reads seed records (accounts or payments) from a CSV source.
///
/// This reader wraps `csv::Reader` and handles whitespace trimming and
/// flexible record lengths automatically.
pub struct SeedReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> SeedReader<R> {
    /// Creates a new `SeedReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes records.
    pub fn records<T: DeserializeOwned>(self) -> impl Iterator<Item = Result<T>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PaymentError::from))
    }

    /// Reads every record, failing on the first malformed row.
    pub fn read_all<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        self.records().collect()
    }
}

pub mod payment_writer;
pub mod seed_reader;

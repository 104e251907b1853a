pub mod account;
pub mod notification;
pub mod payment;
pub mod ports;

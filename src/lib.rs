#![no_std]

#[cfg(test)]
extern crate std;

#[cfg(feature = "net-mqtt")]
extern crate alloc;

pub mod firmware;

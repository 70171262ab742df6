#![cfg(test)]

mod discovery;
mod transaction;
mod util;

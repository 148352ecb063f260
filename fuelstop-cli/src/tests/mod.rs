//! Shared test harness modules for the Fuelstop CLI.

use super::*;

mod helpers;
mod unit;

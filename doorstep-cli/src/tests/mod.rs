//! Shared test harness modules for the Doorstep CLI.

use super::*;

mod entrances_unit;
mod helpers;

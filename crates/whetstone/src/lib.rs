/* Copyright (C) 2024  AlphaKeks <alphakeks@dawn.sh>
 *
 * This library is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This library is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this repository.  If not, see <https://www.gnu.org/licenses/>.
 */

//! Population-rank estimation for practice tracking.
//!
//! Every function in this crate is a pure function of its inputs. Callers own all state
//! (accumulated practice time, action counts, timestamps) and pass a full snapshot of it on
//! every call, together with the current time. See [`Engine`] for the entry point that ties
//! the individual models together.

#[macro_use]
extern crate derive_more;

#[allow(unused_imports)]
#[macro_use(trace, debug, info, warn)]
extern crate tracing;

mod num;

pub mod time;
pub use time::Timestamp;

pub mod config;
pub use config::Config;

pub mod population;
pub mod tiers;
pub mod decay;
pub mod tgi;
pub mod percentile;
pub mod rank;
pub mod animation;
pub mod grinding;
pub mod levels;
pub mod streak;

pub mod engine;
pub use engine::{ActivityState, Engine, RankSnapshot};

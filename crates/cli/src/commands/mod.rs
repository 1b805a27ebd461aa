// SPDX-License-Identifier: MIT

pub mod project;
pub mod queue;
pub mod supervisor;
pub mod worker;

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Inserts return the row ID assigned by `SQLite`. Callers group related
//! writes with `Persistence::transaction`.

pub mod attendances;
pub mod audit;
pub mod ledger;
pub mod members;
pub mod notifications;
pub mod partners;
pub mod shifts;
pub mod solidarity;
pub mod templates;
pub mod watches;

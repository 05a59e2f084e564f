// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQL that Diesel's DSL cannot express: connection setup, PRAGMAs,
//! migrations and `last_insert_rowid()`.

pub mod sqlite;

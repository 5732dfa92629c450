// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations, one module per table.
//!
//! Inserts read back the new row through `last_insert_rowid()` so callers
//! always receive the stored record.

pub mod bookings;
pub mod rooms;
pub mod users;

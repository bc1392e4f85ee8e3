// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure bookkeeping logic. Nothing in here touches the database: functions
//! take loaded rows and return new rows or aggregates.

pub mod balances;
pub mod goals;
pub mod history;
pub mod installments;
pub mod monthly;
pub mod rollover;

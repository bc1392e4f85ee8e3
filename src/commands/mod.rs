// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cards;
pub mod das;
pub mod doctor;
pub mod extras;
pub mod goals;
pub mod history;
pub mod month;
pub mod savings;
pub mod settings;
pub mod transactions;

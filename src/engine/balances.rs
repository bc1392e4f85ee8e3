// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Card dashboard figures, derived from the current installment rows on every
//! read.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{CardInstallment, CardSummary, CardTransaction, CreditCard};

/// Flat, id-indexed view of all card data. Installments point at purchases and
/// purchases point at cards by id only.
#[derive(Debug, Default, Clone)]
pub struct CardBook {
    cards: Vec<CreditCard>,
    purchases: HashMap<i64, CardTransaction>,
    installments: Vec<CardInstallment>,
}

impl CardBook {
    pub fn new(
        cards: Vec<CreditCard>,
        purchases: Vec<CardTransaction>,
        installments: Vec<CardInstallment>,
    ) -> Self {
        CardBook {
            cards,
            purchases: purchases.into_iter().map(|p| (p.id, p)).collect(),
            installments,
        }
    }

    pub fn cards(&self) -> &[CreditCard] {
        &self.cards
    }

    pub fn purchase(&self, id: i64) -> Option<&CardTransaction> {
        self.purchases.get(&id)
    }

    /// Card owning an installment, resolved through its purchase.
    pub fn card_of(&self, installment: &CardInstallment) -> Option<i64> {
        self.purchase(installment.card_transaction_id)
            .map(|p| p.card_id)
    }

    pub fn purchases_of(&self, card_id: i64) -> impl Iterator<Item = &CardTransaction> {
        self.purchases.values().filter(move |p| p.card_id == card_id)
    }

    pub fn installments_of(&self, card_id: i64) -> impl Iterator<Item = &CardInstallment> {
        self.installments
            .iter()
            .filter(move |i| self.card_of(i) == Some(card_id))
    }

    pub fn summarize(&self, card: &CreditCard, today: NaiveDate) -> CardSummary {
        let unpaid: Vec<&CardInstallment> =
            self.installments_of(card.id).filter(|i| !i.paid).collect();

        let current_balance: Decimal = unpaid.iter().map(|i| i.amount).sum();
        let next_due_date = unpaid
            .iter()
            .map(|i| i.due_date)
            .filter(|due| *due >= today)
            .min();
        let next_due_amount = match next_due_date {
            Some(due) => unpaid
                .iter()
                .filter(|i| i.due_date == due)
                .map(|i| i.amount)
                .sum(),
            None => Decimal::ZERO,
        };

        let mut transactions_count = 0;
        let mut total_spent = Decimal::ZERO;
        for p in self.purchases_of(card.id) {
            transactions_count += 1;
            total_spent += p.amount;
        }

        CardSummary {
            card: card.clone(),
            current_balance,
            available_limit: card.credit_limit - current_balance,
            next_due_date,
            next_due_amount,
            transactions_count,
            total_spent,
        }
    }

    /// One summary per card, in the order the cards were loaded.
    pub fn summaries(&self, today: NaiveDate) -> Vec<CardSummary> {
        self.cards
            .iter()
            .map(|c| self.summarize(c, today))
            .collect()
    }
}
